use std::collections::HashMap;

use crate::menu::{MenuKey, MenuNode, MenuTreeNode, TreeAssembly, assemble_tree};
use crate::{Capabilities, Role};

/// Stored capability row for one role and one menu node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionAssignment {
    /// Menu node the row applies to.
    pub menu_key: MenuKey,
    /// Granted flags.
    pub capabilities: Capabilities,
}

impl PermissionAssignment {
    /// Creates an assignment row.
    #[must_use]
    pub fn new(menu_key: MenuKey, capabilities: Capabilities) -> Self {
        Self {
            menu_key,
            capabilities,
        }
    }
}

/// Where the capabilities of one resolution come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionSource {
    /// Built-in table keyed by the role.
    Static,
    /// Administered rows from the permission store.
    Dynamic(Vec<PermissionAssignment>),
}

impl PermissionSource {
    /// Picks the source for a role's stored rows.
    ///
    /// A role without rows, or whose rows grant no view at all, has never been
    /// meaningfully configured and falls back to the static table.
    #[must_use]
    pub fn select(rows: Vec<PermissionAssignment>) -> Self {
        if rows.iter().any(|row| row.capabilities.can_view) {
            Self::Dynamic(rows)
        } else {
            Self::Static
        }
    }

    /// Returns whether administered rows are in effect.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

/// Capabilities the static table grants `role` on a node.
#[must_use]
pub fn static_capabilities(role: &Role, administrative: bool) -> Capabilities {
    match (role, administrative) {
        (Role::Admin, _) => Capabilities::full(),
        (Role::Contributor, false) => Capabilities::full(),
        (Role::User | Role::Other(_), false) => Capabilities::view_only(),
        (Role::Contributor | Role::User | Role::Other(_), true) => Capabilities::none(),
    }
}

/// Menu node annotated with the capabilities resolved for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMenuNode {
    /// Registry node.
    pub node: MenuNode,
    /// Effective flags.
    pub capabilities: Capabilities,
    /// Node is administrative itself or sits below an administrative node.
    pub administrative: bool,
    /// Children ordered by sort order, then key.
    pub children: Vec<ResolvedMenuNode>,
}

/// Capability-annotated menu forest for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMenu {
    /// Root nodes.
    pub nodes: Vec<ResolvedMenuNode>,
    /// Whether administered rows were used.
    pub is_dynamic: bool,
    /// Keys whose declared parent could not be linked.
    pub promoted: Vec<MenuKey>,
}

impl ResolvedMenu {
    /// Resolves the active registry for `role` from the chosen source.
    ///
    /// Inactive nodes are ignored. Every active node appears in the result,
    /// including nodes whose flags are all false.
    #[must_use]
    pub fn resolve(role: &Role, nodes: Vec<MenuNode>, source: &PermissionSource) -> Self {
        let active: Vec<MenuNode> = nodes.into_iter().filter(MenuNode::is_active).collect();
        let TreeAssembly { roots, promoted } = assemble_tree(active);

        let nodes = match source {
            PermissionSource::Static => roots
                .into_iter()
                .map(|root| {
                    annotate(root, false, &|administrative, _| {
                        static_capabilities(role, administrative)
                    })
                })
                .collect(),
            PermissionSource::Dynamic(rows) => {
                let by_key: HashMap<&MenuKey, Capabilities> = rows
                    .iter()
                    .map(|row| (&row.menu_key, row.capabilities))
                    .collect();
                roots
                    .into_iter()
                    .map(|root| {
                        annotate(root, false, &|_, key| {
                            by_key.get(key).copied().unwrap_or_default()
                        })
                    })
                    .collect()
            }
        };

        Self {
            nodes,
            is_dynamic: source.is_dynamic(),
            promoted,
        }
    }

    /// Iterates over every node depth first.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedMenuNode> {
        let mut stack: Vec<&ResolvedMenuNode> = self.nodes.iter().rev().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// Finds a node by key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&ResolvedMenuNode> {
        self.iter().find(|resolved| resolved.node.key().as_str() == key)
    }

    /// Returns the flags for a key, all false when the key is unknown.
    #[must_use]
    pub fn capabilities_for(&self, key: &str) -> Capabilities {
        self.find(key)
            .map(|resolved| resolved.capabilities)
            .unwrap_or_default()
    }

    /// Returns the flags for an administrative key.
    ///
    /// When the node is missing from the menu (deactivated or deleted), the
    /// static table for `role` applies so only administrators keep access.
    #[must_use]
    pub fn administrative_capabilities(&self, key: &str, role: &Role) -> Capabilities {
        self.find(key)
            .map(|resolved| resolved.capabilities)
            .unwrap_or_else(|| static_capabilities(role, true))
    }

    /// Finds the node with the longest path that addresses `request_path`.
    #[must_use]
    pub fn match_path(&self, request_path: &str) -> Option<&ResolvedMenuNode> {
        self.iter()
            .filter(|resolved| resolved.node.matches_path(request_path))
            .max_by_key(|resolved| resolved.node.path().len())
    }
}

fn annotate(
    tree_node: MenuTreeNode<MenuNode>,
    parent_administrative: bool,
    capabilities_of: &dyn Fn(bool, &MenuKey) -> Capabilities,
) -> ResolvedMenuNode {
    let MenuTreeNode { item, children } = tree_node;
    let administrative = parent_administrative || item.key().is_administrative();
    let capabilities = capabilities_of(administrative, item.key());

    ResolvedMenuNode {
        children: children
            .into_iter()
            .map(|child| annotate(child, administrative, capabilities_of))
            .collect(),
        node: item,
        capabilities,
        administrative,
    }
}
