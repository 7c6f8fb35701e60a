use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use vitrine_application::{RoleDefinition, RoleRepository};
use vitrine_core::{AppError, AppResult, NonEmptyString, RoleId};


/// PostgreSQL-backed repository for role administration.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: uuid::Uuid,
    role_name: String,
    is_system: bool,
}

impl From<RoleRow> for RoleDefinition {
    fn from(row: RoleRow) -> Self {
        Self {
            role_id: RoleId::from_uuid(row.role_id),
            name: row.role_name,
            is_system: row.is_system,
        }
    }
}

fn map_role_conflict(error: sqlx::Error, role_name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Validation(format!("name: role '{role_name}' already exists"));
    }

    AppError::Internal(format!("failed to persist role '{role_name}': {error}"))
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id AS role_id, name AS role_name, is_system
            FROM roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(rows.into_iter().map(RoleDefinition::from).collect())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id AS role_id, name AS role_name, is_system
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role '{role_id}': {error}")))?;

        Ok(row.map(RoleDefinition::from))
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleDefinition>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id AS role_id, name AS role_name, is_system
            FROM roles
            WHERE LOWER(name) = LOWER($1)
            LIMIT 1
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role '{name}': {error}")))?;

        Ok(row.map(RoleDefinition::from))
    }

    async fn create_role(&self, name: NonEmptyString) -> AppResult<RoleDefinition> {
        let role_id = RoleId::new();

        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (id, name, is_system)
            VALUES ($1, $2, FALSE)
            RETURNING id AS role_id, name AS role_name, is_system
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_role_conflict(error, name.as_str()))?;

        Ok(row.into())
    }

    async fn rename_role(
        &self,
        role_id: RoleId,
        name: NonEmptyString,
    ) -> AppResult<RoleDefinition> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            UPDATE roles
            SET name = $2, updated_at = now()
            WHERE id = $1
            RETURNING id AS role_id, name AS role_name, is_system
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_role_conflict(error, name.as_str()))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        Ok(row.into())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(database_error) = &error
                && database_error.code().as_deref() == Some("23503")
            {
                return AppError::Validation(format!(
                    "role '{role_id}' is still assigned to accounts"
                ));
            }

            AppError::Internal(format!("failed to delete role '{role_id}': {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        Ok(())
    }

    async fn count_accounts_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM accounts
            WHERE role_id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to count accounts for role '{role_id}': {error}"
            ))
        })?;

        u64::try_from(count).map_err(|error| {
            AppError::Internal(format!("invalid account count for role '{role_id}': {error}"))
        })
    }
}
