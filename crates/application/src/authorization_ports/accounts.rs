use async_trait::async_trait;
use vitrine_core::{AppResult, RoleId};

/// Stored console account used during login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    /// Stable account identifier.
    pub account_id: String,
    /// Unique login name.
    pub username: String,
    /// Encoded password hash.
    pub password_hash: String,
    /// Role held by the account.
    pub role_id: RoleId,
    /// Display name of the role.
    pub role_name: String,
    /// Disabled accounts cannot log in.
    pub is_active: bool,
}

/// Repository port for account lookups.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds an account by login name.
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<AccountRecord>>;
}

/// Port for checking a password against a stored hash.
pub trait PasswordVerifier: Send + Sync {
    /// Returns whether `password` matches `hash`.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
