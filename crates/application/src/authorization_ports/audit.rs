use async_trait::async_trait;
use vitrine_core::AppResult;
use vitrine_domain::AuditAction;

/// Immutable audit event payload emitted by application services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Subject that performed the action.
    pub subject: String,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Port receiving audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records one audit event.
    async fn record(&self, event: AuditEvent) -> AppResult<()>;
}
