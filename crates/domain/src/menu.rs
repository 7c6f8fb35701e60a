use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use vitrine_core::{AppError, AppResult, NonEmptyString};

mod registry;
mod tree;

pub use registry::builtin_menu_nodes;
pub use tree::{MenuTreeItem, MenuTreeNode, TreeAssembly, assemble_tree};

/// Menu keys that guard administrative pages.
///
/// Descendants of these nodes are treated as administrative too.
pub const ADMINISTRATIVE_MENU_KEYS: &[&str] = &[
    "administrator",
    "user_management",
    "role_management",
    "system_settings",
    "audit_logs",
];

/// Menu key of the node guarding role and permission administration.
pub const ROLE_MANAGEMENT_MENU_KEY: &str = "role_management";

const MENU_KEY_MAX_LENGTH: usize = 64;

/// Stable identifier of a menu node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MenuKey(String);

impl MenuKey {
    /// Creates a validated menu key (`[a-z0-9_]`, at most 64 characters).
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let value = value.trim();

        if value.is_empty() || value.len() > MENU_KEY_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "menu key must be between 1 and {MENU_KEY_MAX_LENGTH} characters"
            )));
        }

        if !value
            .chars()
            .all(|character| character.is_ascii_lowercase() || character.is_ascii_digit() || character == '_')
        {
            return Err(AppError::Validation(format!(
                "menu key '{value}' may only contain lowercase letters, digits and underscores"
            )));
        }

        Ok(Self(value.to_owned()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether the key itself is in the administrative set.
    #[must_use]
    pub fn is_administrative(&self) -> bool {
        ADMINISTRATIVE_MENU_KEYS.contains(&self.0.as_str())
    }
}

impl Display for MenuKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// CRUD capability flags granted on one menu node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    /// Node is visible and navigable.
    pub can_view: bool,
    /// Records under the node may be created.
    pub can_create: bool,
    /// Records under the node may be updated.
    pub can_update: bool,
    /// Records under the node may be deleted.
    pub can_delete: bool,
}

impl Capabilities {
    /// No capability at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            can_view: false,
            can_create: false,
            can_update: false,
            can_delete: false,
        }
    }

    /// View without mutation.
    #[must_use]
    pub const fn view_only() -> Self {
        Self {
            can_view: true,
            can_create: false,
            can_update: false,
            can_delete: false,
        }
    }

    /// Full CRUD.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            can_view: true,
            can_create: true,
            can_update: true,
            can_delete: true,
        }
    }

    /// Returns whether at least one flag is set.
    #[must_use]
    pub fn any(&self) -> bool {
        self.can_view || self.can_create || self.can_update || self.can_delete
    }
}

/// Addressable console resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNode {
    key: MenuKey,
    label: NonEmptyString,
    path: String,
    icon: Option<String>,
    parent_key: Option<MenuKey>,
    sort_order: i32,
    is_active: bool,
}

impl MenuNode {
    /// Creates a validated menu node.
    pub fn new(
        key: MenuKey,
        label: impl AsRef<str>,
        path: impl AsRef<str>,
        icon: Option<String>,
        parent_key: Option<MenuKey>,
        sort_order: i32,
        is_active: bool,
    ) -> AppResult<Self> {
        if parent_key.as_ref() == Some(&key) {
            return Err(AppError::Validation(format!(
                "menu node '{key}' cannot be its own parent"
            )));
        }

        Ok(Self {
            label: NonEmptyString::trimmed(label).map_err(|_| {
                AppError::Validation(format!("label of menu node '{key}' must not be empty"))
            })?,
            path: normalize_path(path.as_ref())?,
            icon: icon
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
            key,
            parent_key,
            sort_order,
            is_active,
        })
    }

    /// Returns the node key.
    #[must_use]
    pub fn key(&self) -> &MenuKey {
        &self.key
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the navigable path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Returns the icon name, if any.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the declared parent key.
    #[must_use]
    pub fn parent_key(&self) -> Option<&MenuKey> {
        self.parent_key.as_ref()
    }

    /// Returns the sibling sort order.
    #[must_use]
    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    /// Returns whether the node participates in navigation.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns whether `request_path` addresses this node or one of its sub-pages.
    #[must_use]
    pub fn matches_path(&self, request_path: &str) -> bool {
        path_is_within(request_path, self.path.as_str())
    }
}

impl MenuTreeItem for MenuNode {
    fn key(&self) -> &MenuKey {
        &self.key
    }

    fn parent_key(&self) -> Option<&MenuKey> {
        self.parent_key.as_ref()
    }

    fn sort_order(&self) -> i32 {
        self.sort_order
    }
}

/// Returns whether `path` equals `prefix` or continues it at a segment boundary.
#[must_use]
pub fn path_is_within(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }

    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn normalize_path(value: &str) -> AppResult<String> {
    let value = value.trim();
    if !value.starts_with('/') || value.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(format!(
            "menu path '{value}' must be an absolute path without whitespace"
        )));
    }

    let trimmed = value.trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok("/".to_owned());
    }

    Ok(trimmed.to_owned())
}
