use vitrine_core::RoleId;

/// Role as seen by authorization policy.
///
/// The three well-known roles drive the static capability table. Every
/// admin-defined role lands in [`Role::Other`] and callers decide explicitly
/// how it falls back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Read-only console user.
    User,
    /// Catalog editor without administrative access.
    Contributor,
    /// Full administrative access.
    Admin,
    /// Admin-defined role identified by its id.
    Other(RoleId),
}

impl Role {
    /// Well-known name of the read-only role.
    pub const USER_NAME: &'static str = "User";
    /// Well-known name of the editor role.
    pub const CONTRIBUTOR_NAME: &'static str = "Contributor";
    /// Well-known name of the administrative role.
    pub const ADMIN_NAME: &'static str = "Admin";

    /// Classifies a stored role by its display name.
    #[must_use]
    pub fn classify(role_id: RoleId, name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case(Self::ADMIN_NAME) {
            Self::Admin
        } else if name.eq_ignore_ascii_case(Self::CONTRIBUTOR_NAME) {
            Self::Contributor
        } else if name.eq_ignore_ascii_case(Self::USER_NAME) {
            Self::User
        } else {
            Self::Other(role_id)
        }
    }

    /// Returns whether a display name collides with a well-known role name.
    #[must_use]
    pub fn is_reserved_name(name: &str) -> bool {
        [Self::USER_NAME, Self::CONTRIBUTOR_NAME, Self::ADMIN_NAME]
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use vitrine_core::RoleId;

    use super::Role;

    #[test]
    fn classify_matches_well_known_names_case_insensitively() {
        let role_id = RoleId::new();

        assert_eq!(Role::classify(role_id, "Admin"), Role::Admin);
        assert_eq!(Role::classify(role_id, " contributor "), Role::Contributor);
        assert_eq!(Role::classify(role_id, "USER"), Role::User);
    }

    #[test]
    fn classify_keeps_custom_roles_by_id() {
        let role_id = RoleId::new();
        let role = Role::classify(role_id, "Auditor");

        assert_eq!(role, Role::Other(role_id));
    }

    #[test]
    fn reserved_names_cover_all_well_known_roles() {
        assert!(Role::is_reserved_name("admin"));
        assert!(Role::is_reserved_name("Contributor"));
        assert!(!Role::is_reserved_name("Auditor"));
    }
}
