use async_trait::async_trait;
use vitrine_core::{AppResult, RoleId};
use vitrine_domain::PermissionAssignment;

/// Persistence port for per-role menu capability rows.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Lists stored rows for one role.
    async fn list_assignments(&self, role_id: RoleId) -> AppResult<Vec<PermissionAssignment>>;

    /// Replaces every row of one role atomically.
    ///
    /// Implementations delete all existing rows and insert `rows` in a single
    /// transaction. Callers pass only rows with at least one flag set.
    async fn replace_assignments(
        &self,
        role_id: RoleId,
        rows: Vec<PermissionAssignment>,
    ) -> AppResult<()>;

    /// Cheap reachability check.
    async fn ping(&self) -> AppResult<()>;
}
