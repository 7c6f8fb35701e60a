use async_trait::async_trait;
use tracing::info;

use vitrine_application::{AuditEvent, AuditSink};
use vitrine_core::AppResult;

/// Audit sink writing each event as a structured log line on the `audit` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    /// Creates the sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            target: "audit",
            subject = %event.subject,
            action = event.action.as_str(),
            resource_type = %event.resource_type,
            resource_id = %event.resource_id,
            detail = event.detail.as_deref().unwrap_or_default(),
            "audit event"
        );

        Ok(())
    }
}
