use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use vitrine_application::PermissionStore;
use vitrine_core::{AppError, AppResult, RoleId};
use vitrine_domain::{Capabilities, MenuKey, PermissionAssignment};

#[cfg(test)]
mod tests;

/// PostgreSQL-backed store for per-role menu capability rows.
#[derive(Clone)]
pub struct PostgresPermissionStore {
    pool: PgPool,
}

impl PostgresPermissionStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    menu_key: String,
    can_view: bool,
    can_create: bool,
    can_update: bool,
    can_delete: bool,
}

impl PermissionRow {
    fn into_assignment(self) -> AppResult<PermissionAssignment> {
        let menu_key = MenuKey::new(self.menu_key.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "stored permission row references invalid menu key '{}': {error}",
                self.menu_key
            ))
        })?;

        Ok(PermissionAssignment::new(
            menu_key,
            Capabilities {
                can_view: self.can_view,
                can_create: self.can_create,
                can_update: self.can_update,
                can_delete: self.can_delete,
            },
        ))
    }
}

#[async_trait]
impl PermissionStore for PostgresPermissionStore {
    async fn list_assignments(&self, role_id: RoleId) -> AppResult<Vec<PermissionAssignment>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT menu_key, can_view, can_create, can_update, can_delete
            FROM role_menu_permissions
            WHERE role_id = $1
            ORDER BY menu_key
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list menu permissions for role '{role_id}': {error}"
            ))
        })?;

        rows.into_iter()
            .map(PermissionRow::into_assignment)
            .collect()
    }

    async fn replace_assignments(
        &self,
        role_id: RoleId,
        rows: Vec<PermissionAssignment>,
    ) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query(
            r#"
            DELETE FROM role_menu_permissions
            WHERE role_id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to clear menu permissions for role '{role_id}': {error}"
            ))
        })?;

        for row in &rows {
            sqlx::query(
                r#"
                INSERT INTO role_menu_permissions (
                    role_id,
                    menu_key,
                    can_view,
                    can_create,
                    can_update,
                    can_delete
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(role_id.as_uuid())
            .bind(row.menu_key.as_str())
            .bind(row.capabilities.can_view)
            .bind(row.capabilities.can_create)
            .bind(row.capabilities.can_update)
            .bind(row.capabilities.can_delete)
            .execute(&mut *transaction)
            .await
            .map_err(|error| map_permission_write_error(error, &row.menu_key))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|error| AppError::Unavailable(format!("permission store unreachable: {error}")))
    }
}

fn map_permission_write_error(error: sqlx::Error, menu_key: &MenuKey) -> AppError {
    if let sqlx::Error::Database(database_error) = &error {
        match database_error.code().as_deref() {
            Some("23505") => {
                return AppError::Validation(format!(
                    "menu key '{menu_key}' appears more than once"
                ));
            }
            Some("23503") => {
                return AppError::Validation(format!("menu key '{menu_key}' does not exist"));
            }
            _ => {}
        }
    }

    AppError::Internal(format!(
        "failed to persist menu permission for '{menu_key}': {error}"
    ))
}
