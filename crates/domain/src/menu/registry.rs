use vitrine_core::AppResult;

use super::{MenuKey, MenuNode};

/// (key, label, path, icon, parent, sort order)
type BuiltinEntry = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    Option<&'static str>,
    i32,
);

const BUILTIN_MENU: &[BuiltinEntry] = &[
    ("dashboard", "Dashboard", "/dashboard", "dashboard", None, 1),
    ("product_catalog", "Product Catalog", "/catalog", "box", None, 2),
    ("lifecycle_analyst", "Lifecycle Analyst", "/lifecycle", "cycle", None, 3),
    ("solar_hub", "Solar HUB", "/solar-hub", "monitor", None, 4),
    (
        "monitoring_crjr",
        "Monitoring CR/JR",
        "/solar-hub/monitoring-crjr",
        "monitor",
        Some("solar_hub"),
        1,
    ),
    (
        "monitoring_license",
        "Monitoring License",
        "/solar-hub/monitoring-license",
        "monitor",
        Some("solar_hub"),
        2,
    ),
    (
        "monitoring_run_program",
        "Monitoring Run Program",
        "/solar-hub/monitoring-run-program",
        "monitor",
        Some("solar_hub"),
        3,
    ),
    ("administrator", "Administrator", "/administrator", "shield", None, 5),
    (
        "user_management",
        "User Management",
        "/administrator/users",
        "users",
        Some("administrator"),
        1,
    ),
    (
        "role_management",
        "Role Management",
        "/administrator/roles",
        "file-text",
        Some("administrator"),
        2,
    ),
    (
        "system_settings",
        "System Settings",
        "/administrator/settings",
        "settings",
        Some("administrator"),
        3,
    ),
    (
        "audit_logs",
        "Audit Logs",
        "/administrator/audit",
        "file-text",
        Some("administrator"),
        4,
    ),
];

/// Returns the menu registry shipped with a fresh installation.
///
/// The SQL seed migration inserts the same rows.
pub fn builtin_menu_nodes() -> AppResult<Vec<MenuNode>> {
    BUILTIN_MENU
        .iter()
        .map(|(key, label, path, icon, parent, sort_order)| {
            MenuNode::new(
                MenuKey::new(*key)?,
                label,
                path,
                Some((*icon).to_owned()),
                parent.map(MenuKey::new).transpose()?,
                *sort_order,
                true,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::builtin_menu_nodes;
    use crate::ADMINISTRATIVE_MENU_KEYS;

    #[test]
    fn builtin_registry_is_valid_and_unique() {
        let nodes = builtin_menu_nodes();
        assert!(nodes.is_ok());

        let nodes = nodes.unwrap_or_default();
        let keys: HashSet<&str> = nodes.iter().map(|node| node.key().as_str()).collect();
        assert_eq!(keys.len(), nodes.len());
        assert_eq!(nodes.len(), 12);
    }

    #[test]
    fn builtin_registry_contains_every_administrative_key() {
        let nodes = builtin_menu_nodes().unwrap_or_default();
        for administrative_key in ADMINISTRATIVE_MENU_KEYS {
            assert!(
                nodes
                    .iter()
                    .any(|node| node.key().as_str() == *administrative_key),
                "missing {administrative_key}"
            );
        }
    }
}
