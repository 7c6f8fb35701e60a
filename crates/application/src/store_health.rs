use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tracing::{info, warn};

use crate::PermissionStore;

/// Default bound on a single reachability ping.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Reachability of the permission store as seen by periodic pings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    /// Last ping succeeded.
    Reachable,
    /// Some pings failed, below the outage threshold.
    Degraded,
    /// Enough consecutive pings failed to declare an outage.
    Unreachable,
}

impl StoreStatus {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reachable => "ok",
            Self::Degraded => "degraded",
            Self::Unreachable => "unreachable",
        }
    }
}

/// Shared outage detector fed by [`StoreHealth::check`].
///
/// Only a confirmed outage switches navigation reads to the static table.
/// Individual request timeouts never do.
#[derive(Clone)]
pub struct StoreHealth {
    consecutive_failures: Arc<AtomicU32>,
    failure_threshold: u32,
    ping_timeout: Duration,
}

impl StoreHealth {
    /// Creates a detector that reports an outage after `failure_threshold` failed pings.
    #[must_use]
    pub fn new(failure_threshold: u32) -> Self {
        Self {
            consecutive_failures: Arc::new(AtomicU32::new(0)),
            failure_threshold: failure_threshold.max(1),
            ping_timeout: DEFAULT_PING_TIMEOUT,
        }
    }

    /// Bounds each reachability ping. A ping that does not answer in time counts as a failure.
    #[must_use]
    pub fn with_ping_timeout(mut self, ping_timeout: Duration) -> Self {
        self.ping_timeout = ping_timeout;
        self
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> StoreStatus {
        let failures = self.consecutive_failures.load(Ordering::Acquire);
        if failures == 0 {
            StoreStatus::Reachable
        } else if failures < self.failure_threshold {
            StoreStatus::Degraded
        } else {
            StoreStatus::Unreachable
        }
    }

    /// Returns whether an outage is confirmed.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        self.status() == StoreStatus::Unreachable
    }

    /// Records a successful ping.
    pub fn record_success(&self) {
        let previous = self.consecutive_failures.swap(0, Ordering::AcqRel);
        if previous >= self.failure_threshold {
            info!(failed_pings = previous, "permission store reachable again");
        }
    }

    /// Records a failed ping.
    pub fn record_failure(&self, detail: &str) {
        let failures = self
            .consecutive_failures
            .fetch_add(1, Ordering::AcqRel)
            .saturating_add(1);
        if failures == self.failure_threshold {
            warn!(
                failed_pings = failures,
                detail, "permission store declared unreachable"
            );
        }
    }

    /// Pings the store once and records the outcome.
    pub async fn check(&self, store: &dyn PermissionStore) -> StoreStatus {
        match tokio::time::timeout(self.ping_timeout, store.ping()).await {
            Ok(Ok(())) => self.record_success(),
            Ok(Err(error)) => self.record_failure(error.to_string().as_str()),
            Err(_) => self.record_failure("ping timed out"),
        }

        self.status()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::{StoreHealth, StoreStatus};
    use crate::test_support::FakeStore;

    #[test]
    fn outage_requires_consecutive_failures() {
        let health = StoreHealth::new(3);
        assert_eq!(health.status(), StoreStatus::Reachable);

        health.record_failure("timeout");
        health.record_failure("timeout");
        assert_eq!(health.status(), StoreStatus::Degraded);
        assert!(!health.is_unreachable());

        health.record_failure("timeout");
        assert!(health.is_unreachable());
    }

    #[test]
    fn success_resets_failures() {
        let health = StoreHealth::new(1);
        health.record_failure("refused");
        assert!(health.is_unreachable());

        health.record_success();
        assert_eq!(health.status(), StoreStatus::Reachable);
    }

    #[tokio::test]
    async fn unanswered_ping_counts_as_failure() {
        let store = FakeStore::seeded();
        store.hang_ping.store(true, Ordering::SeqCst);
        let health = StoreHealth::new(1).with_ping_timeout(Duration::from_millis(20));

        let status = tokio::time::timeout(Duration::from_secs(1), health.check(store.as_ref())).await;

        assert_eq!(status.ok(), Some(StoreStatus::Unreachable));
        assert!(health.is_unreachable());
    }

    #[tokio::test]
    async fn answered_ping_clears_failures() {
        let store = FakeStore::seeded();
        let health = StoreHealth::new(2);
        health.record_failure("refused");

        assert_eq!(health.check(store.as_ref()).await, StoreStatus::Reachable);

        store.fail_ping.store(true, Ordering::SeqCst);
        assert_eq!(health.check(store.as_ref()).await, StoreStatus::Degraded);
    }
}
