use std::sync::Arc;

use vitrine_application::PermissionStore;

use super::*;

pub(super) async fn check_permission_store(
    store: Arc<dyn PermissionStore>,
) -> HealthDependencyStatus {
    match store.ping().await {
        Ok(()) => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Err(error) => HealthDependencyStatus {
            status: "error",
            detail: Some(format!("permission store check failed: {error}")),
        },
    }
}
