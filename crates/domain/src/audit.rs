use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by authentication and administration use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted after a successful login.
    LoginSucceeded,
    /// Emitted after a rejected login attempt.
    LoginFailed,
    /// Emitted when a session token is discarded.
    Logout,
    /// Emitted when a role is created.
    RoleCreated,
    /// Emitted when a role is renamed.
    RoleRenamed,
    /// Emitted when a role is deleted.
    RoleDeleted,
    /// Emitted when a role's permission set is replaced.
    PermissionsReplaced,
    /// Emitted when a menu node is created.
    MenuNodeCreated,
    /// Emitted when a menu node is updated.
    MenuNodeUpdated,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginSucceeded => "auth.login.succeeded",
            Self::LoginFailed => "auth.login.failed",
            Self::Logout => "auth.logout",
            Self::RoleCreated => "security.role.created",
            Self::RoleRenamed => "security.role.renamed",
            Self::RoleDeleted => "security.role.deleted",
            Self::PermissionsReplaced => "security.permissions.replaced",
            Self::MenuNodeCreated => "menu.node.created",
            Self::MenuNodeUpdated => "menu.node.updated",
        }
    }
}
