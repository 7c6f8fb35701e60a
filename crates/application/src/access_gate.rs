//! Per-request authorization state machine.
//!
//! A request is either public, unauthenticated, authenticated but forbidden,
//! or authorized. Only administrative resources are capability-checked;
//! every other console resource is open to any authenticated role.

use std::sync::Arc;

use tracing::{debug, warn};
use vitrine_core::{AppResult, UserIdentity};
use vitrine_domain::{MenuKey, ResolvedMenu, Role, path_is_within};

use crate::{PermissionResolver, TokenService};

mod routes;

pub use routes::{ADMINISTRATION_PATH_PREFIX, DEFAULT_LANDING_PATH, LOGIN_PATH, safe_return_path};

/// Whether a request targets a page or the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Browser navigation.
    Page,
    /// JSON API call.
    Api,
}

impl RequestKind {
    /// Classifies a request path.
    #[must_use]
    pub fn of(path: &str) -> Self {
        if path_is_within(path, "/api") {
            Self::Api
        } else {
            Self::Page
        }
    }
}

/// Outcome of gating one request.
#[derive(Debug, Clone)]
pub enum GateDecision {
    /// Allowlisted path, no identity needed.
    Public,
    /// Missing or invalid token.
    Unauthenticated {
        /// Request kind.
        kind: RequestKind,
    },
    /// Valid token without the capability for the target resource.
    Forbidden {
        /// Request kind.
        kind: RequestKind,
        /// Verified caller.
        identity: UserIdentity,
    },
    /// Request may proceed.
    Authorized {
        /// Request kind.
        kind: RequestKind,
        /// Verified caller, attached to the request downstream.
        identity: UserIdentity,
        /// Menu resolved for the caller's role.
        menu: Arc<ResolvedMenu>,
        /// Menu node addressed by the request, if any.
        resource: Option<MenuKey>,
    },
}

/// Authorization gate run in front of every route.
#[derive(Clone)]
pub struct AccessGate {
    token_service: TokenService,
    resolver: PermissionResolver,
}

impl AccessGate {
    /// Creates a gate from token verification and permission resolution.
    #[must_use]
    pub fn new(token_service: TokenService, resolver: PermissionResolver) -> Self {
        Self {
            token_service,
            resolver,
        }
    }

    /// Returns the identity carried by a token, if it verifies.
    #[must_use]
    pub fn authenticate(&self, token: Option<&str>) -> Option<UserIdentity> {
        let token = token.filter(|token| !token.is_empty())?;
        self.token_service.verify(token).ok()
    }

    /// Decides whether a request for `path` carrying `token` may proceed.
    ///
    /// Fails only when resolving capabilities fails, for example with
    /// [`vitrine_core::AppError::Unavailable`] after a store timeout.
    pub async fn evaluate(&self, path: &str, token: Option<&str>) -> AppResult<GateDecision> {
        if routes::is_public(path) {
            return Ok(GateDecision::Public);
        }

        let kind = RequestKind::of(path);
        let Some(identity) = self.authenticate(token) else {
            debug!(path, "request without valid token");
            return Ok(GateDecision::Unauthenticated { kind });
        };

        let menu = self.resolver.resolve_for(&identity).await?;
        let role = Role::classify(identity.role_id(), identity.role_name());
        let target = match kind {
            RequestKind::Page => page_target(&menu, path),
            RequestKind::Api => api_target(path),
        };

        let allowed = match &target {
            Target::Open(_) => true,
            Target::Administrative(key) => view_granted(&menu, &role, key.as_str()),
            Target::UnmappedAdministration => {
                view_granted(&menu, &role, routes::ADMINISTRATION_ROOT_KEY)
            }
        };

        if !allowed {
            warn!(
                role = identity.role_name(),
                subject = identity.subject_id(),
                path,
                resource = target.key().map(MenuKey::as_str),
                "access denied"
            );
            return Ok(GateDecision::Forbidden { kind, identity });
        }

        Ok(GateDecision::Authorized {
            kind,
            identity,
            menu,
            resource: target.into_key(),
        })
    }
}

enum Target {
    Open(Option<MenuKey>),
    Administrative(MenuKey),
    UnmappedAdministration,
}

impl Target {
    fn key(&self) -> Option<&MenuKey> {
        match self {
            Self::Open(key) => key.as_ref(),
            Self::Administrative(key) => Some(key),
            Self::UnmappedAdministration => None,
        }
    }

    fn into_key(self) -> Option<MenuKey> {
        match self {
            Self::Open(key) => key,
            Self::Administrative(key) => Some(key),
            Self::UnmappedAdministration => None,
        }
    }
}

fn view_granted(menu: &ResolvedMenu, role: &Role, key: &str) -> bool {
    menu.administrative_capabilities(key, role).can_view
}

fn page_target(menu: &ResolvedMenu, path: &str) -> Target {
    match menu.match_path(path) {
        Some(resolved) if resolved.administrative => {
            Target::Administrative(resolved.node.key().clone())
        }
        _ if path_is_within(path, ADMINISTRATION_PATH_PREFIX) => Target::UnmappedAdministration,
        resolved => Target::Open(resolved.map(|resolved| resolved.node.key().clone())),
    }
}

fn api_target(path: &str) -> Target {
    match routes::api_resource(path).map(MenuKey::new) {
        None => Target::Open(None),
        Some(Ok(key)) if key.is_administrative() => Target::Administrative(key),
        Some(Ok(key)) => Target::Open(Some(key)),
        Some(Err(_)) => Target::UnmappedAdministration,
    }
}
