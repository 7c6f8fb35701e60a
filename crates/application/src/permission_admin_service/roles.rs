use super::*;

use vitrine_core::NonEmptyString;

use crate::RoleDefinition;

impl PermissionAdministrationService {
    /// Lists every role.
    pub async fn list_roles(&self, actor: &UserIdentity) -> AppResult<Vec<RoleDefinition>> {
        self.require_capability(actor, AdminCapability::View)
            .await?;
        self.role_repository.list_roles().await
    }

    /// Returns one role.
    pub async fn get_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<RoleDefinition> {
        self.require_capability(actor, AdminCapability::View)
            .await?;
        self.require_role(role_id).await
    }

    /// Creates a custom role with a unique, trimmed name.
    pub async fn create_role(&self, actor: &UserIdentity, name: &str) -> AppResult<RoleDefinition> {
        self.require_capability(actor, AdminCapability::Create)
            .await?;

        let name = self.available_role_name(name, None).await?;
        let role = self.role_repository.create_role(name).await?;

        self.audit(
            actor,
            AuditAction::RoleCreated,
            "role",
            role.role_id.to_string(),
            format!("created role '{}'", role.name),
        )
        .await?;

        Ok(role)
    }

    /// Renames a custom role.
    pub async fn rename_role(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        name: &str,
    ) -> AppResult<RoleDefinition> {
        self.require_capability(actor, AdminCapability::Update)
            .await?;

        let existing = self.require_role(role_id).await?;
        if existing.is_system {
            return Err(AppError::Validation(format!(
                "system role '{}' cannot be renamed",
                existing.name
            )));
        }

        let name = self.available_role_name(name, Some(role_id)).await?;
        let role = self.role_repository.rename_role(role_id, name).await?;
        self.resolver.invalidate_role(role_id).await;

        self.audit(
            actor,
            AuditAction::RoleRenamed,
            "role",
            role_id.to_string(),
            format!("renamed role '{}' to '{}'", existing.name, role.name),
        )
        .await?;

        Ok(role)
    }

    /// Deletes a custom role that no account references.
    pub async fn delete_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<()> {
        self.require_capability(actor, AdminCapability::Delete)
            .await?;

        let existing = self.require_role(role_id).await?;
        if existing.is_system {
            return Err(AppError::Validation(format!(
                "system role '{}' cannot be deleted",
                existing.name
            )));
        }

        let accounts = self.role_repository.count_accounts_with_role(role_id).await?;
        if accounts > 0 {
            return Err(AppError::Validation(format!(
                "role '{}' is assigned to {accounts} account(s) and cannot be deleted",
                existing.name
            )));
        }

        self.role_repository.delete_role(role_id).await?;
        self.resolver.invalidate_role(role_id).await;

        self.audit(
            actor,
            AuditAction::RoleDeleted,
            "role",
            role_id.to_string(),
            format!("deleted role '{}'", existing.name),
        )
        .await
    }

    async fn available_role_name(
        &self,
        name: &str,
        renaming: Option<RoleId>,
    ) -> AppResult<NonEmptyString> {
        let name = NonEmptyString::trimmed(name)
            .map_err(|_| AppError::Validation("name: role name is required".to_owned()))?;

        if let Some(existing) = self.role_repository.find_role_by_name(name.as_str()).await?
            && Some(existing.role_id) != renaming
        {
            return Err(AppError::Validation(format!(
                "name: role '{}' already exists",
                existing.name
            )));
        }

        if Role::is_reserved_name(name.as_str()) {
            return Err(AppError::Validation(format!(
                "name: '{}' is reserved for a system role",
                name.as_str()
            )));
        }

        Ok(name)
    }
}
