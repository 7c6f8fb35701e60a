use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use vitrine_application::{AccountRecord, AccountRepository};
use vitrine_core::{AppError, AppResult, RoleId};

/// PostgreSQL-backed account lookups.
#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates or updates an account with an already hashed password.
    pub async fn upsert_account(
        &self,
        username: &str,
        password_hash: &str,
        role_id: RoleId,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, password_hash, role_id, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            ON CONFLICT (username) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                role_id = EXCLUDED.role_id,
                is_active = TRUE,
                updated_at = now()
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to upsert account '{username}': {error}"))
        })?;

        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct AccountRow {
    account_id: uuid::Uuid,
    username: String,
    password_hash: String,
    role_id: uuid::Uuid,
    role_name: String,
    is_active: bool,
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<AccountRecord>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                accounts.id AS account_id,
                accounts.username,
                accounts.password_hash,
                accounts.role_id,
                roles.name AS role_name,
                accounts.is_active
            FROM accounts
            INNER JOIN roles ON roles.id = accounts.role_id
            WHERE accounts.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find account '{username}': {error}"))
        })?;

        Ok(row.map(|row| AccountRecord {
            account_id: row.account_id.to_string(),
            username: row.username,
            password_hash: row.password_hash,
            role_id: RoleId::from_uuid(row.role_id),
            role_name: row.role_name,
            is_active: row.is_active,
        }))
    }
}
