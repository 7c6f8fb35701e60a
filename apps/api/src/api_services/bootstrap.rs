use sqlx::PgPool;
use tracing::info;
use vitrine_application::RoleRepository;
use vitrine_core::{AppError, AppResult};
use vitrine_domain::Role;
use vitrine_infrastructure::{
    Argon2PasswordHasher, PostgresAccountRepository, PostgresRoleRepository,
};

use crate::api_config::BootstrapAdminConfig;

/// Creates the configured administrator account, or resets its password and role.
pub async fn ensure_bootstrap_admin(pool: &PgPool, config: &BootstrapAdminConfig) -> AppResult<()> {
    let admin_role = PostgresRoleRepository::new(pool.clone())
        .find_role_by_name(Role::ADMIN_NAME)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!("seeded role '{}' is missing", Role::ADMIN_NAME))
        })?;

    let password_hash = Argon2PasswordHasher::new().hash_password(config.password.as_str())?;
    PostgresAccountRepository::new(pool.clone())
        .upsert_account(
            config.username.trim(),
            password_hash.as_str(),
            admin_role.role_id,
        )
        .await?;

    info!(username = %config.username.trim(), "bootstrap administrator ensured");
    Ok(())
}
