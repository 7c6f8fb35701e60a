use super::*;

use vitrine_domain::{MenuKey, MenuNode};

use crate::MenuNodeListing;

/// Transport-neutral menu node attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNodeInput {
    /// Node key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Navigable path.
    pub path: String,
    /// Optional icon name.
    pub icon: Option<String>,
    /// Optional parent key.
    pub parent_key: Option<String>,
    /// Position among siblings.
    pub sort_order: i32,
    /// Whether the node participates in navigation.
    pub is_active: bool,
}

impl MenuNodeInput {
    fn into_node(self) -> AppResult<MenuNode> {
        let parent_key = self
            .parent_key
            .filter(|value| !value.trim().is_empty())
            .map(MenuKey::new)
            .transpose()?;

        MenuNode::new(
            MenuKey::new(self.key)?,
            self.label,
            self.path,
            self.icon,
            parent_key,
            self.sort_order,
            self.is_active,
        )
    }
}

impl PermissionAdministrationService {
    /// Lists every node, active or not, with parent labels.
    pub async fn list_menu_items(&self, actor: &UserIdentity) -> AppResult<Vec<MenuNodeListing>> {
        self.require_capability(actor, AdminCapability::View)
            .await?;
        self.menu_registry.list_with_parents().await
    }

    /// Adds a node to the registry.
    pub async fn create_menu_item(
        &self,
        actor: &UserIdentity,
        input: MenuNodeInput,
    ) -> AppResult<MenuNode> {
        self.require_capability(actor, AdminCapability::Create)
            .await?;

        let node = input.into_node()?;
        if self.menu_registry.find(node.key()).await?.is_some() {
            return Err(AppError::Validation(format!(
                "key: menu item '{}' already exists",
                node.key()
            )));
        }
        self.check_parent(&node).await?;

        let node = self.menu_repository.create_menu_node(node).await?;
        self.resolver.invalidate_all().await;

        self.audit(
            actor,
            AuditAction::MenuNodeCreated,
            "menu_item",
            node.key().to_string(),
            format!("created menu item '{}' at '{}'", node.label(), node.path()),
        )
        .await?;

        Ok(node)
    }

    /// Replaces the attributes of an existing node.
    pub async fn update_menu_item(
        &self,
        actor: &UserIdentity,
        input: MenuNodeInput,
    ) -> AppResult<MenuNode> {
        self.require_capability(actor, AdminCapability::Update)
            .await?;

        let node = input.into_node()?;
        if self.menu_registry.find(node.key()).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "menu item '{}' does not exist",
                node.key()
            )));
        }
        self.check_parent(&node).await?;

        let node = self.menu_repository.update_menu_node(node).await?;
        self.resolver.invalidate_all().await;

        self.audit(
            actor,
            AuditAction::MenuNodeUpdated,
            "menu_item",
            node.key().to_string(),
            format!("updated menu item '{}'", node.label()),
        )
        .await?;

        Ok(node)
    }

    /// Rejects parent cycles. A parent that does not exist is accepted and
    /// logged; the node is placed at the root until the parent appears.
    async fn check_parent(&self, node: &MenuNode) -> AppResult<()> {
        let Some(parent_key) = node.parent_key() else {
            return Ok(());
        };

        if let Some(cycle_key) = self.menu_registry.find_parent_cycle(node).await? {
            return Err(AppError::Validation(format!(
                "parent_key: setting '{parent_key}' as parent of '{}' creates a cycle through '{cycle_key}'",
                node.key()
            )));
        }

        if !self.menu_registry.parent_exists(parent_key).await? {
            warn!(
                menu_key = %node.key(),
                parent_key = %parent_key,
                "menu item parent does not exist, node will be shown at the root"
            );
        }

        Ok(())
    }
}
