use std::sync::Arc;

use tracing::warn;

use vitrine_core::{AppError, AppResult, RoleId, UserIdentity};
use vitrine_domain::{AuditAction, Capabilities, ROLE_MANAGEMENT_MENU_KEY, ResolvedMenu, Role};

use crate::{
    AuditEvent, AuditSink, MenuRegistry, MenuRegistryRepository, PermissionResolver,
    PermissionStore, RoleRepository,
};

mod assignments;
mod menu_items;
mod roles;

pub use assignments::MenuPermissionEntry;
pub use menu_items::MenuNodeInput;

/// Capability on the role management node required by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminCapability {
    View,
    Create,
    Update,
    Delete,
}

impl AdminCapability {
    fn granted_by(self, capabilities: Capabilities) -> bool {
        match self {
            Self::View => capabilities.can_view,
            Self::Create => capabilities.can_create,
            Self::Update => capabilities.can_update,
            Self::Delete => capabilities.can_delete,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Administrative mutation surface over roles, menu nodes and permission rows.
#[derive(Clone)]
pub struct PermissionAdministrationService {
    resolver: PermissionResolver,
    menu_registry: MenuRegistry,
    menu_repository: Arc<dyn MenuRegistryRepository>,
    role_repository: Arc<dyn RoleRepository>,
    permission_store: Arc<dyn PermissionStore>,
    audit_sink: Arc<dyn AuditSink>,
}

impl PermissionAdministrationService {
    /// Creates the administration service.
    #[must_use]
    pub fn new(
        resolver: PermissionResolver,
        menu_repository: Arc<dyn MenuRegistryRepository>,
        role_repository: Arc<dyn RoleRepository>,
        permission_store: Arc<dyn PermissionStore>,
        audit_sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            resolver,
            menu_registry: MenuRegistry::new(menu_repository.clone()),
            menu_repository,
            role_repository,
            permission_store,
            audit_sink,
        }
    }

    /// Returns the resolved menu for the caller or, for administrators, another role.
    ///
    /// Omitting `role_id`, or passing the caller's own role, needs no
    /// administrative capability.
    pub async fn menu_permissions(
        &self,
        actor: &UserIdentity,
        role_id: Option<RoleId>,
    ) -> AppResult<Arc<ResolvedMenu>> {
        match role_id {
            None => self.resolver.resolve_for(actor).await,
            Some(role_id) if role_id == actor.role_id() => self.resolver.resolve_for(actor).await,
            Some(role_id) => {
                self.require_capability(actor, AdminCapability::View)
                    .await?;
                let role = self.require_role(role_id).await?;
                self.resolver.resolve(role.role_id, &role.role()).await
            }
        }
    }

    async fn require_capability(
        &self,
        actor: &UserIdentity,
        capability: AdminCapability,
    ) -> AppResult<()> {
        let menu = self.resolver.resolve_for(actor).await?;
        let role = Role::classify(actor.role_id(), actor.role_name());
        let capabilities = menu.administrative_capabilities(ROLE_MANAGEMENT_MENU_KEY, &role);

        if capability.granted_by(capabilities) {
            return Ok(());
        }

        warn!(
            role = actor.role_name(),
            subject = actor.subject_id(),
            resource = ROLE_MANAGEMENT_MENU_KEY,
            capability = capability.as_str(),
            "administration denied"
        );

        Err(AppError::Forbidden(format!(
            "role '{}' is missing '{}' on '{ROLE_MANAGEMENT_MENU_KEY}'",
            actor.role_name(),
            capability.as_str()
        )))
    }

    async fn require_role(&self, role_id: RoleId) -> AppResult<crate::RoleDefinition> {
        self.role_repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    async fn audit(
        &self,
        actor: &UserIdentity,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_sink
            .record(AuditEvent {
                subject: actor.subject_id().to_owned(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }
}
