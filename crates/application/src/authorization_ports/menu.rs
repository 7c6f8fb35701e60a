use async_trait::async_trait;
use vitrine_core::AppResult;
use vitrine_domain::{MenuKey, MenuNode};

/// Repository port for the menu registry.
#[async_trait]
pub trait MenuRegistryRepository: Send + Sync {
    /// Lists active nodes ordered by sort order, then key.
    async fn list_active_menu_nodes(&self) -> AppResult<Vec<MenuNode>>;

    /// Lists every node, active or not, ordered by sort order, then key.
    async fn list_menu_nodes(&self) -> AppResult<Vec<MenuNode>>;

    /// Finds a node by key.
    async fn find_menu_node(&self, key: &MenuKey) -> AppResult<Option<MenuNode>>;

    /// Inserts a new node. Fails with a validation error when the key exists.
    async fn create_menu_node(&self, node: MenuNode) -> AppResult<MenuNode>;

    /// Replaces the stored attributes of an existing node.
    async fn update_menu_node(&self, node: MenuNode) -> AppResult<MenuNode>;
}
