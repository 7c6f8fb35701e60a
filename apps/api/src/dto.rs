mod auth;
mod common;
mod menu_items;
mod permissions;
mod roles;

pub use auth::{LoginRequest, LoginResponse, MeResponse};
pub use common::{HealthDependencyStatus, HealthResponse, SuccessResponse, UserIdentityResponse};
pub use menu_items::{
    CreateMenuItemRequest, MenuItemEnvelope, MenuItemListResponse, MenuItemResponse,
    UpdateMenuItemRequest,
};
pub use permissions::{
    MenuPermissionInput, MenuPermissionsQuery, MenuPermissionsResponse, PageContextResponse,
    ReplaceRolePermissionsRequest, ResolvedMenuNodeResponse, RolePermissionEntryResponse,
    RolePermissionsQuery, RolePermissionsResponse,
};
pub use roles::{RoleResponse, SaveRoleRequest};

#[cfg(test)]
mod tests {
    use super::{
        CreateMenuItemRequest, HealthDependencyStatus, HealthResponse, LoginRequest,
        LoginResponse, MeResponse, MenuItemEnvelope, MenuItemListResponse, MenuItemResponse,
        MenuPermissionInput, MenuPermissionsResponse, PageContextResponse,
        ReplaceRolePermissionsRequest, ResolvedMenuNodeResponse, RolePermissionEntryResponse,
        RolePermissionsResponse, RoleResponse, SaveRoleRequest, SuccessResponse,
        UpdateMenuItemRequest, UserIdentityResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        ErrorResponse::export(&config)?;
        HealthResponse::export(&config)?;
        HealthDependencyStatus::export(&config)?;
        SuccessResponse::export(&config)?;
        UserIdentityResponse::export(&config)?;
        LoginRequest::export(&config)?;
        LoginResponse::export(&config)?;
        MeResponse::export(&config)?;
        SaveRoleRequest::export(&config)?;
        RoleResponse::export(&config)?;
        CreateMenuItemRequest::export(&config)?;
        UpdateMenuItemRequest::export(&config)?;
        MenuItemResponse::export(&config)?;
        MenuItemListResponse::export(&config)?;
        MenuItemEnvelope::export(&config)?;
        ResolvedMenuNodeResponse::export(&config)?;
        MenuPermissionsResponse::export(&config)?;
        RolePermissionEntryResponse::export(&config)?;
        RolePermissionsResponse::export(&config)?;
        MenuPermissionInput::export(&config)?;
        ReplaceRolePermissionsRequest::export(&config)?;
        PageContextResponse::export(&config)?;

        Ok(())
    }

    #[test]
    fn permission_input_defaults_missing_flags_to_false() -> Result<(), serde_json::Error> {
        let input: MenuPermissionInput =
            serde_json::from_str(r#"{ "menuItemId": "dashboard", "canView": true }"#)?;

        assert_eq!(input.menu_item_id, "dashboard");
        assert!(input.can_view);
        assert!(!input.can_create && !input.can_update && !input.can_delete);
        Ok(())
    }
}
