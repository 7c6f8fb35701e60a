//! Signed identity tokens carried in the session cookie.
//!
//! Tokens are HS256 JWTs. Verification collapses every failure (bad
//! structure, bad signature, expiry, unreadable claims) into the same
//! opaque authentication error so callers cannot tell them apart.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vitrine_core::{AppError, AppResult, RoleId, UserIdentity};

/// Minimum accepted signing key length in bytes.
pub const MIN_SIGNING_KEY_LENGTH: usize = 32;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

const AUTHENTICATION_REQUIRED: &str = "authentication required";

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    username: String,
    role_id: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Token string together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact JWT.
    pub token: String,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies identity tokens with one process-wide symmetric key.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    ttl: Duration,
}

impl TokenService {
    /// Creates a token service from the signing secret and token lifetime.
    pub fn new(secret: &str, ttl: Duration) -> AppResult<Self> {
        if secret.len() < MIN_SIGNING_KEY_LENGTH {
            return Err(AppError::Validation(format!(
                "token signing key must be at least {MIN_SIGNING_KEY_LENGTH} characters"
            )));
        }

        if ttl <= Duration::zero() {
            return Err(AppError::Validation(
                "token lifetime must be positive".to_owned(),
            ));
        }

        Ok(Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            ttl,
        })
    }

    /// Returns the configured token lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `identity` valid from now.
    pub fn issue(&self, identity: &UserIdentity) -> AppResult<IssuedToken> {
        self.issue_at(identity, Utc::now())
    }

    /// Issues a token for `identity` as if it were issued at `issued_at`.
    pub fn issue_at(
        &self,
        identity: &UserIdentity,
        issued_at: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        let expires_at = issued_at + self.ttl;
        let claims = TokenClaims {
            sub: identity.subject_id().to_owned(),
            username: identity.username().to_owned(),
            role_id: identity.role_id().to_string(),
            role: identity.role_name().to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            self.encoding_key.as_ref(),
        )
        .map_err(|error| AppError::Internal(format!("failed to sign token: {error}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies a token and returns the identity it carries.
    pub fn verify(&self, token: &str) -> AppResult<UserIdentity> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = jsonwebtoken::decode::<TokenClaims>(token, self.decoding_key.as_ref(), &validation)
            .map_err(|error| {
                debug!(%error, "token verification failed");
                unauthenticated()
            })?;

        let claims = data.claims;
        let role_id = RoleId::from_str(claims.role_id.as_str()).map_err(|_| unauthenticated())?;
        if claims.sub.trim().is_empty() || claims.username.trim().is_empty() {
            return Err(unauthenticated());
        }

        Ok(UserIdentity::new(
            claims.sub,
            claims.username,
            role_id,
            claims.role,
        ))
    }
}

fn unauthenticated() -> AppError {
    AppError::Unauthorized(AUTHENTICATION_REQUIRED.to_owned())
}
