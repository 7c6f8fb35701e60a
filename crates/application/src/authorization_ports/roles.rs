use async_trait::async_trait;
use vitrine_core::{AppResult, NonEmptyString, RoleId};
use vitrine_domain::Role;

/// Role definition returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Stable role identifier.
    pub role_id: RoleId,
    /// Unique display name.
    pub name: String,
    /// Indicates one of the seeded well-known roles.
    pub is_system: bool,
}

impl RoleDefinition {
    /// Classifies the role for policy decisions.
    #[must_use]
    pub fn role(&self) -> Role {
        Role::classify(self.role_id, self.name.as_str())
    }
}

/// Repository port for role administration.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists all roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>>;

    /// Finds a role by id.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>>;

    /// Finds a role by display name, ignoring case.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleDefinition>>;

    /// Creates a custom role.
    async fn create_role(&self, name: NonEmptyString) -> AppResult<RoleDefinition>;

    /// Renames an existing role.
    async fn rename_role(&self, role_id: RoleId, name: NonEmptyString)
    -> AppResult<RoleDefinition>;

    /// Deletes a role and its permission rows.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Counts accounts currently holding the role.
    async fn count_accounts_with_role(&self, role_id: RoleId) -> AppResult<u64>;
}
