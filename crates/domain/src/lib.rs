//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod menu;
mod permission;
mod role;

pub use audit::AuditAction;
pub use menu::{
    ADMINISTRATIVE_MENU_KEYS, Capabilities, MenuKey, MenuNode, MenuTreeItem, MenuTreeNode,
    ROLE_MANAGEMENT_MENU_KEY, TreeAssembly, assemble_tree, builtin_menu_nodes, path_is_within,
};
pub use permission::{
    PermissionAssignment, PermissionSource, ResolvedMenu, ResolvedMenuNode, static_capabilities,
};
pub use role::Role;
