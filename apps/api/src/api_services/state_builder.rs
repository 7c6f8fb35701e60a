use std::sync::Arc;

use sqlx::PgPool;
use vitrine_application::{
    AccessGate, AccountRepository, AuditSink, LoginService, MenuRegistry, MenuRegistryRepository,
    PasswordVerifier, PermissionAdministrationService, PermissionResolver, PermissionStore,
    RoleRepository, StoreHealth, TokenService,
};
use vitrine_core::AppError;
use vitrine_infrastructure::{
    Argon2PasswordHasher, InMemoryResolvedMenuCache, PostgresAccountRepository,
    PostgresMenuRegistryRepository, PostgresPermissionStore, PostgresRoleRepository,
    TracingAuditSink,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

/// Persistence and security adapters behind the authorization services.
#[derive(Clone)]
pub struct AuthorizationAdapters {
    pub menu_repository: Arc<dyn MenuRegistryRepository>,
    pub permission_store: Arc<dyn PermissionStore>,
    pub role_repository: Arc<dyn RoleRepository>,
    pub account_repository: Arc<dyn AccountRepository>,
    pub password_verifier: Arc<dyn PasswordVerifier>,
    pub audit_sink: Arc<dyn AuditSink>,
}

impl AuthorizationAdapters {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            menu_repository: Arc::new(PostgresMenuRegistryRepository::new(pool.clone())),
            permission_store: Arc::new(PostgresPermissionStore::new(pool.clone())),
            role_repository: Arc::new(PostgresRoleRepository::new(pool.clone())),
            account_repository: Arc::new(PostgresAccountRepository::new(pool.clone())),
            password_verifier: Arc::new(Argon2PasswordHasher::new()),
            audit_sink: Arc::new(TracingAuditSink::new()),
        }
    }
}

pub fn build_app_state(
    adapters: AuthorizationAdapters,
    config: &ApiConfig,
) -> Result<AppState, AppError> {
    let token_service = TokenService::new(
        config.jwt_secret.as_str(),
        chrono::Duration::hours(config.token_ttl_hours),
    )?;

    let store_health = StoreHealth::new(config.store_health_failure_threshold)
        .with_ping_timeout(config.permission_timeout);
    let resolver = PermissionResolver::new(
        MenuRegistry::new(adapters.menu_repository.clone()),
        adapters.permission_store.clone(),
        store_health.clone(),
        config.permission_timeout,
    )
    .with_cache(
        Arc::new(InMemoryResolvedMenuCache::new()),
        config.permission_cache_ttl_seconds,
    );

    let session_max_age_seconds = token_service.ttl().num_seconds();

    Ok(AppState {
        access_gate: AccessGate::new(token_service.clone(), resolver.clone()),
        login_service: LoginService::new(
            adapters.account_repository,
            adapters.password_verifier,
            token_service,
            adapters.audit_sink.clone(),
        ),
        permission_admin_service: PermissionAdministrationService::new(
            resolver,
            adapters.menu_repository,
            adapters.role_repository,
            adapters.permission_store.clone(),
            adapters.audit_sink,
        ),
        store_health,
        permission_store: adapters.permission_store,
        session_max_age_seconds,
        frontend_url: config.frontend_url.clone(),
        cookie_secure: config.cookie_secure,
    })
}
