use vitrine_application::PermissionStore;
use vitrine_core::AppError;
use vitrine_domain::{Capabilities, MenuKey, PermissionAssignment};

use super::PostgresPermissionStore;
use crate::postgres_test_support::{insert_role, test_pool, unique_suffix};

fn row(menu_key: &str, capabilities: Capabilities) -> PermissionAssignment {
    match MenuKey::new(menu_key) {
        Ok(menu_key) => PermissionAssignment::new(menu_key, capabilities),
        Err(error) => panic!("invalid test key: {error}"),
    }
}

#[tokio::test]
async fn replace_assignments_swaps_the_whole_set() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let role_id = insert_role(&pool, format!("Store {}", unique_suffix()).as_str()).await;
    let store = PostgresPermissionStore::new(pool);

    let first = store
        .replace_assignments(
            role_id,
            vec![
                row("dashboard", Capabilities::view_only()),
                row("product_catalog", Capabilities::full()),
            ],
        )
        .await;
    assert!(first.is_ok());

    let second = store
        .replace_assignments(
            role_id,
            vec![row(
                "role_management",
                Capabilities {
                    can_view: true,
                    can_create: false,
                    can_update: true,
                    can_delete: false,
                },
            )],
        )
        .await;
    assert!(second.is_ok());

    let stored = store.list_assignments(role_id).await.unwrap_or_default();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].menu_key.as_str(), "role_management");
    assert!(stored[0].capabilities.can_update);
    assert!(!stored[0].capabilities.can_create);
}

#[tokio::test]
async fn failed_replace_keeps_previous_rows() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let role_id = insert_role(&pool, format!("Store {}", unique_suffix()).as_str()).await;
    let store = PostgresPermissionStore::new(pool);

    let seeded = store
        .replace_assignments(role_id, vec![row("dashboard", Capabilities::view_only())])
        .await;
    assert!(seeded.is_ok());

    let unknown_key = format!("unknown_{}", unique_suffix());
    let failed = store
        .replace_assignments(
            role_id,
            vec![
                row("audit_logs", Capabilities::view_only()),
                row(unknown_key.as_str(), Capabilities::view_only()),
            ],
        )
        .await;
    assert!(matches!(failed, Err(AppError::Validation(_))));

    let stored = store.list_assignments(role_id).await.unwrap_or_default();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].menu_key.as_str(), "dashboard");
}

#[tokio::test]
async fn ping_succeeds_against_a_live_database() {
    let Some(pool) = test_pool().await else {
        return;
    };

    assert!(PostgresPermissionStore::new(pool).ping().await.is_ok());
}
