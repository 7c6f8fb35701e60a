use super::*;

use std::collections::{HashMap, HashSet};

use vitrine_domain::{MenuKey, MenuNode, PermissionAssignment};

/// One active menu node with the flags stored for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPermissionEntry {
    /// Registry node.
    pub node: MenuNode,
    /// Stored flags, all false when no row exists.
    pub capabilities: Capabilities,
}

impl PermissionAdministrationService {
    /// Lists every active node with the role's stored flags.
    pub async fn list_assignments(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
    ) -> AppResult<Vec<MenuPermissionEntry>> {
        self.require_capability(actor, AdminCapability::View)
            .await?;
        self.require_role(role_id).await?;

        let nodes = self.menu_registry.list_active().await?;
        let rows: HashMap<MenuKey, Capabilities> = self
            .permission_store
            .list_assignments(role_id)
            .await?
            .into_iter()
            .map(|row| (row.menu_key, row.capabilities))
            .collect();

        Ok(nodes
            .into_iter()
            .map(|node| MenuPermissionEntry {
                capabilities: rows.get(node.key()).copied().unwrap_or_default(),
                node,
            })
            .collect())
    }

    /// Replaces the complete permission set of a role.
    ///
    /// Rows without any flag are dropped before writing, so the stored set
    /// stays sparse. Keys must name existing menu nodes and appear once.
    pub async fn replace_assignments(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        rows: Vec<PermissionAssignment>,
    ) -> AppResult<()> {
        self.require_capability(actor, AdminCapability::Update)
            .await?;
        let role = self.require_role(role_id).await?;

        let known: HashSet<MenuKey> = self
            .menu_repository
            .list_menu_nodes()
            .await?
            .into_iter()
            .map(|node| node.key().clone())
            .collect();

        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !known.contains(&row.menu_key) {
                return Err(AppError::Validation(format!(
                    "permissions: unknown menu item '{}'",
                    row.menu_key
                )));
            }
            if !seen.insert(&row.menu_key) {
                return Err(AppError::Validation(format!(
                    "permissions: menu item '{}' listed more than once",
                    row.menu_key
                )));
            }
        }

        let granted: Vec<PermissionAssignment> = rows
            .into_iter()
            .filter(|row| row.capabilities.any())
            .collect();
        let granted_count = granted.len();

        self.permission_store
            .replace_assignments(role_id, granted)
            .await?;
        self.resolver.invalidate_role(role_id).await;

        self.audit(
            actor,
            AuditAction::PermissionsReplaced,
            "role_permissions",
            role_id.to_string(),
            format!(
                "replaced permissions of role '{}' with {granted_count} granted row(s)",
                role.name
            ),
        )
        .await
    }
}
