use serde::{Deserialize, Serialize};
use ts_rs::TS;
use vitrine_application::{MenuNodeInput, MenuNodeListing};
use vitrine_domain::MenuNode;

/// Incoming payload for menu node creation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-menu-item-request.ts"
)]
pub struct CreateMenuItemRequest {
    pub menu_key: String,
    pub label: String,
    pub path: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub parent_key: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Incoming payload for menu node edits. The key comes from the path.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-menu-item-request.ts"
)]
pub struct UpdateMenuItemRequest {
    pub label: String,
    pub path: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub parent_key: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl From<CreateMenuItemRequest> for MenuNodeInput {
    fn from(value: CreateMenuItemRequest) -> Self {
        Self {
            key: value.menu_key,
            label: value.label,
            path: value.path,
            icon: value.icon,
            parent_key: blank_to_none(value.parent_key),
            sort_order: value.sort_order,
            is_active: value.is_active,
        }
    }
}

impl UpdateMenuItemRequest {
    pub fn into_input(self, key: String) -> MenuNodeInput {
        MenuNodeInput {
            key,
            label: self.label,
            path: self.path,
            icon: self.icon,
            parent_key: blank_to_none(self.parent_key),
            sort_order: self.sort_order,
            is_active: self.is_active,
        }
    }
}

/// API representation of a menu node.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/menu-item-response.ts"
)]
pub struct MenuItemResponse {
    pub menu_key: String,
    pub label: String,
    pub path: String,
    pub icon: Option<String>,
    pub parent_key: Option<String>,
    pub parent_label: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Menu node listing payload.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/menu-item-list-response.ts"
)]
pub struct MenuItemListResponse {
    pub menu_items: Vec<MenuItemResponse>,
}

/// Single menu node payload.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/menu-item-envelope.ts"
)]
pub struct MenuItemEnvelope {
    pub menu_item: MenuItemResponse,
}

impl From<MenuNodeListing> for MenuItemResponse {
    fn from(value: MenuNodeListing) -> Self {
        let mut response = Self::from(value.node);
        response.parent_label = value.parent_label;
        response
    }
}

impl From<MenuNode> for MenuItemResponse {
    fn from(node: MenuNode) -> Self {
        Self {
            menu_key: node.key().as_str().to_owned(),
            label: node.label().to_owned(),
            path: node.path().to_owned(),
            icon: node.icon().map(ToOwned::to_owned),
            parent_key: node.parent_key().map(|key| key.as_str().to_owned()),
            parent_label: None,
            sort_order: node.sort_order(),
            is_active: node.is_active(),
        }
    }
}
