use std::sync::Arc;

use tracing::info;
use vitrine_core::{AppError, AppResult, UserIdentity};
use vitrine_domain::AuditAction;

use crate::{AccountRepository, AuditEvent, AuditSink, IssuedToken, PasswordVerifier, TokenService};

const INVALID_CREDENTIALS: &str = "invalid username or password";

/// Well-formed argon2id hash that matches no password.
pub const UNMATCHABLE_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$BVjX+DoCKAsey2GpYpD9IA$qwJtJsn2teLMLGkOpCGeiVsiH+kae9TQ3rS+R4apHiI";

/// Successful login result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Token to hand to the client.
    pub token: IssuedToken,
    /// Identity the token carries.
    pub identity: UserIdentity,
}

/// Exchanges credentials for a signed identity token.
#[derive(Clone)]
pub struct LoginService {
    account_repository: Arc<dyn AccountRepository>,
    password_verifier: Arc<dyn PasswordVerifier>,
    token_service: TokenService,
    audit_sink: Arc<dyn AuditSink>,
}

impl LoginService {
    /// Creates a login service.
    #[must_use]
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        password_verifier: Arc<dyn PasswordVerifier>,
        token_service: TokenService,
        audit_sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            account_repository,
            password_verifier,
            token_service,
            audit_sink,
        }
    }

    /// Verifies credentials and issues a token.
    ///
    /// Unknown accounts, disabled accounts and wrong passwords fail with the
    /// same error after the same hashing work.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "username and password are required".to_owned(),
            ));
        }

        let account = self
            .account_repository
            .find_account_by_username(username)
            .await?;

        let verified = match &account {
            Some(account) if account.is_active => self
                .password_verifier
                .verify_password(password, account.password_hash.as_str())?,
            _ => {
                // Unknown and disabled accounts still pay for one verification.
                let _ = self
                    .password_verifier
                    .verify_password(password, UNMATCHABLE_PASSWORD_HASH);
                false
            }
        };

        let Some(account) = account.filter(|_| verified) else {
            self.record(username, AuditAction::LoginFailed, "rejected credentials")
                .await?;
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        };

        let identity = UserIdentity::new(
            account.account_id,
            account.username,
            account.role_id,
            account.role_name,
        );
        let token = self.token_service.issue(&identity)?;

        info!(
            subject = identity.subject_id(),
            role = identity.role_name(),
            "login succeeded"
        );
        self.record(
            identity.subject_id(),
            AuditAction::LoginSucceeded,
            "issued session token",
        )
        .await?;

        Ok(LoginOutcome { token, identity })
    }

    /// Records the end of a session. Tokens are stateless, so nothing is revoked.
    pub async fn logout(&self, identity: &UserIdentity) -> AppResult<()> {
        self.record(identity.subject_id(), AuditAction::Logout, "cleared session token")
            .await
    }

    async fn record(&self, subject: &str, action: AuditAction, detail: &str) -> AppResult<()> {
        self.audit_sink
            .record(AuditEvent {
                subject: subject.to_owned(),
                action,
                resource_type: "session".to_owned(),
                resource_id: subject.to_owned(),
                detail: Some(detail.to_owned()),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Duration;
    use vitrine_core::AppError;
    use vitrine_domain::AuditAction;

    use super::LoginService;
    use crate::test_support::{FakeStore, PlainPasswordVerifier};
    use crate::{AccountRecord, PasswordVerifier, TokenService};

    #[derive(Default)]
    struct CountingVerifier {
        calls: AtomicUsize,
    }

    impl PasswordVerifier for CountingVerifier {
        fn verify_password(&self, password: &str, hash: &str) -> vitrine_core::AppResult<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            PlainPasswordVerifier.verify_password(password, hash)
        }
    }

    async fn service_with_account(is_active: bool) -> (Arc<FakeStore>, LoginService, TokenService) {
        let store = FakeStore::seeded();
        let role = store.role("Contributor").await;
        store.accounts.lock().await.push(AccountRecord {
            account_id: "account-3".to_owned(),
            username: "carol".to_owned(),
            password_hash: "plain:correct horse".to_owned(),
            role_id: role.role_id,
            role_name: role.name,
            is_active,
        });

        let tokens = match TokenService::new("0123456789abcdef0123456789abcdef", Duration::hours(24)) {
            Ok(tokens) => tokens,
            Err(error) => panic!("token service should build: {error}"),
        };
        let service = LoginService::new(
            store.clone(),
            Arc::new(PlainPasswordVerifier),
            tokens.clone(),
            store.clone(),
        );
        (store, service, tokens)
    }

    #[tokio::test]
    async fn valid_credentials_issue_verifiable_token() {
        let (store, service, tokens) = service_with_account(true).await;

        let outcome = match service.login(" carol ", "correct horse").await {
            Ok(outcome) => outcome,
            Err(error) => panic!("login should succeed: {error}"),
        };

        assert_eq!(outcome.identity.role_name(), "Contributor");
        assert_eq!(
            tokens.verify(outcome.token.token.as_str()).ok(),
            Some(outcome.identity)
        );
        assert_eq!(store.actions().await, vec![AuditAction::LoginSucceeded]);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_fail_identically() {
        let (_store, service, _tokens) = service_with_account(true).await;

        let wrong_password = service.login("carol", "battery staple").await;
        let unknown_user = service.login("mallory", "correct horse").await;

        match (wrong_password, unknown_user) {
            (Err(AppError::Unauthorized(first)), Err(AppError::Unauthorized(second))) => {
                assert_eq!(first, second);
            }
            other => panic!("expected identical unauthorized errors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn disabled_account_cannot_log_in() {
        let (store, service, _tokens) = service_with_account(false).await;

        let result = service.login("carol", "correct horse").await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert_eq!(store.actions().await, vec![AuditAction::LoginFailed]);
    }

    #[tokio::test]
    async fn blank_credentials_are_invalid_input() {
        let (_store, service, _tokens) = service_with_account(true).await;

        assert!(matches!(
            service.login("  ", "secret").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn every_rejected_login_runs_one_verification() {
        let (store, _service, tokens) = service_with_account(false).await;
        let verifier = Arc::new(CountingVerifier::default());
        let service = LoginService::new(store.clone(), verifier.clone(), tokens, store.clone());

        assert!(service.login("mallory", "correct horse").await.is_err());
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);

        assert!(service.login("carol", "correct horse").await.is_err());
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 2);
    }
}
