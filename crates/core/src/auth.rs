use serde::{Deserialize, Serialize};

use crate::RoleId;

/// Identity attached to a request once its token has been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject_id: String,
    username: String,
    role_id: RoleId,
    role_name: String,
}

impl UserIdentity {
    /// Creates a user identity from verified token claims.
    #[must_use]
    pub fn new(
        subject_id: impl Into<String>,
        username: impl Into<String>,
        role_id: RoleId,
        role_name: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            username: username.into(),
            role_id,
            role_name: role_name.into(),
        }
    }

    /// Returns the stable account identifier.
    #[must_use]
    pub fn subject_id(&self) -> &str {
        self.subject_id.as_str()
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the role the account held when the token was issued.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the display name of the role.
    #[must_use]
    pub fn role_name(&self) -> &str {
        self.role_name.as_str()
    }
}
