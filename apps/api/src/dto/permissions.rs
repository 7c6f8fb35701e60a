use serde::{Deserialize, Serialize};
use ts_rs::TS;
use vitrine_application::MenuPermissionEntry;
use vitrine_core::{AppError, AppResult};
use vitrine_domain::{Capabilities, MenuKey, PermissionAssignment, ResolvedMenu, ResolvedMenuNode};

use super::common::UserIdentityResponse;

/// Query of `GET /api/permissions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPermissionsQuery {
    pub role_id: Option<String>,
}

/// Query of `GET /api/role-permissions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissionsQuery {
    pub role_id: String,
}

/// One node of a resolved menu tree.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/resolved-menu-node-response.ts"
)]
pub struct ResolvedMenuNodeResponse {
    pub menu_item_id: String,
    pub label: String,
    pub path: String,
    pub icon: Option<String>,
    pub parent_id: Option<String>,
    pub sort_order: i32,
    pub can_view: bool,
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
    pub is_administrative: bool,
    pub children: Vec<ResolvedMenuNodeResponse>,
}

/// Resolved menu of one role.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/menu-permissions-response.ts"
)]
pub struct MenuPermissionsResponse {
    pub permissions: Vec<ResolvedMenuNodeResponse>,
    pub is_dynamic: bool,
}

/// Stored flags of one role on one node.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-permission-entry-response.ts"
)]
pub struct RolePermissionEntryResponse {
    pub menu_item_id: String,
    pub menu_label: String,
    pub menu_path: String,
    pub parent_id: Option<String>,
    pub can_view: bool,
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

/// Stored permission set of one role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-permissions-response.ts"
)]
pub struct RolePermissionsResponse {
    pub permissions: Vec<RolePermissionEntryResponse>,
}

/// Requested flags for one node.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/menu-permission-input.ts"
)]
pub struct MenuPermissionInput {
    pub menu_item_id: String,
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_create: bool,
    #[serde(default)]
    pub can_update: bool,
    #[serde(default)]
    pub can_delete: bool,
}

/// Incoming payload replacing the permission set of one role.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/replace-role-permissions-request.ts"
)]
pub struct ReplaceRolePermissionsRequest {
    pub role_id: String,
    pub permissions: Vec<MenuPermissionInput>,
}

/// Context handed to the page renderer for an authorized console page.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/page-context-response.ts"
)]
pub struct PageContextResponse {
    pub user: UserIdentityResponse,
    pub path: String,
    pub menu_item_id: Option<String>,
    pub can_view: bool,
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
    pub navigation: Vec<ResolvedMenuNodeResponse>,
}

impl MenuPermissionInput {
    pub fn into_assignment(self) -> AppResult<PermissionAssignment> {
        let menu_key = MenuKey::new(self.menu_item_id.as_str()).map_err(|_| {
            AppError::Validation(format!(
                "permissions: invalid menuItemId '{}'",
                self.menu_item_id
            ))
        })?;

        Ok(PermissionAssignment::new(
            menu_key,
            Capabilities {
                can_view: self.can_view,
                can_create: self.can_create,
                can_update: self.can_update,
                can_delete: self.can_delete,
            },
        ))
    }
}

impl From<&ResolvedMenuNode> for ResolvedMenuNodeResponse {
    fn from(value: &ResolvedMenuNode) -> Self {
        Self {
            menu_item_id: value.node.key().as_str().to_owned(),
            label: value.node.label().to_owned(),
            path: value.node.path().to_owned(),
            icon: value.node.icon().map(ToOwned::to_owned),
            parent_id: value.node.parent_key().map(|key| key.as_str().to_owned()),
            sort_order: value.node.sort_order(),
            can_view: value.capabilities.can_view,
            can_create: value.capabilities.can_create,
            can_update: value.capabilities.can_update,
            can_delete: value.capabilities.can_delete,
            is_administrative: value.administrative,
            children: value.children.iter().map(Self::from).collect(),
        }
    }
}

impl From<&ResolvedMenu> for MenuPermissionsResponse {
    fn from(value: &ResolvedMenu) -> Self {
        Self {
            permissions: value.nodes.iter().map(ResolvedMenuNodeResponse::from).collect(),
            is_dynamic: value.is_dynamic,
        }
    }
}

impl From<MenuPermissionEntry> for RolePermissionEntryResponse {
    fn from(value: MenuPermissionEntry) -> Self {
        Self {
            menu_item_id: value.node.key().as_str().to_owned(),
            menu_label: value.node.label().to_owned(),
            menu_path: value.node.path().to_owned(),
            parent_id: value.node.parent_key().map(|key| key.as_str().to_owned()),
            can_view: value.capabilities.can_view,
            can_create: value.capabilities.can_create,
            can_update: value.capabilities.can_update,
            can_delete: value.capabilities.can_delete,
        }
    }
}
