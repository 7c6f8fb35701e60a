use std::sync::Arc;

use vitrine_application::{
    AccessGate, LoginService, PermissionAdministrationService, PermissionStore, StoreHealth,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_gate: AccessGate,
    pub login_service: LoginService,
    pub permission_admin_service: PermissionAdministrationService,
    pub store_health: StoreHealth,
    pub permission_store: Arc<dyn PermissionStore>,
    pub session_max_age_seconds: i64,
    pub frontend_url: String,
    pub cookie_secure: bool,
}
