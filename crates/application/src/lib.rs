//! Application services and ports.

#![forbid(unsafe_code)]

mod access_gate;
mod authorization_ports;
mod login_service;
mod menu_registry;
mod permission_admin_service;
mod permission_resolver;
mod store_health;
mod token_service;

#[cfg(test)]
mod test_support;

pub use access_gate::{
    ADMINISTRATION_PATH_PREFIX, AccessGate, DEFAULT_LANDING_PATH, GateDecision, LOGIN_PATH,
    RequestKind, safe_return_path,
};
pub use authorization_ports::{
    AccountRecord, AccountRepository, AuditEvent, AuditSink, MenuRegistryRepository,
    PasswordVerifier, PermissionStore, ResolvedMenuCache, RoleDefinition, RoleRepository,
};
pub use login_service::{LoginOutcome, LoginService, UNMATCHABLE_PASSWORD_HASH};
pub use menu_registry::{MenuNodeListing, MenuRegistry};
pub use permission_admin_service::{
    MenuNodeInput, MenuPermissionEntry, PermissionAdministrationService,
};
pub use permission_resolver::{DEFAULT_STORE_TIMEOUT, PermissionResolver};
pub use store_health::{DEFAULT_PING_TIMEOUT, StoreHealth, StoreStatus};
pub use token_service::{
    DEFAULT_TOKEN_TTL_HOURS, IssuedToken, MIN_SIGNING_KEY_LENGTH, TokenService,
};
