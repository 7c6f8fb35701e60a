use std::sync::Arc;

use async_trait::async_trait;
use vitrine_core::{AppResult, RoleId};
use vitrine_domain::ResolvedMenu;

/// Optional cache port for resolved menus.
#[async_trait]
pub trait ResolvedMenuCache: Send + Sync {
    /// Returns the cached menu for one role, if still fresh.
    async fn get_menu(&self, role_id: RoleId) -> AppResult<Option<Arc<ResolvedMenu>>>;

    /// Stores the menu for one role with ttl.
    async fn set_menu(
        &self,
        role_id: RoleId,
        menu: Arc<ResolvedMenu>,
        ttl_seconds: u32,
    ) -> AppResult<()>;

    /// Drops the cached menu for one role.
    async fn invalidate_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Drops every cached menu.
    async fn invalidate_all(&self) -> AppResult<()>;
}
