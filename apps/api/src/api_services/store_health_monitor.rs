use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use vitrine_application::{PermissionStore, StoreHealth};

/// Pings the permission store on a fixed interval for the lifetime of the process.
pub fn spawn_store_health_monitor(
    store_health: StoreHealth,
    permission_store: Arc<dyn PermissionStore>,
    interval: Duration,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        let mut last_status = store_health.status();

        loop {
            ticker.tick().await;
            let status = store_health.check(permission_store.as_ref()).await;
            if status != last_status {
                info!(
                    from = last_status.as_str(),
                    to = status.as_str(),
                    "permission store status changed"
                );
                last_status = status;
            }
        }
    });
}
