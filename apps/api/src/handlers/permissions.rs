use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Query, State};
use vitrine_core::{AppResult, RoleId, UserIdentity};

use crate::dto::{
    MenuPermissionInput, MenuPermissionsQuery, MenuPermissionsResponse,
    ReplaceRolePermissionsRequest, RolePermissionEntryResponse, RolePermissionsQuery,
    RolePermissionsResponse, SuccessResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn menu_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<MenuPermissionsQuery>,
) -> ApiResult<Json<MenuPermissionsResponse>> {
    let role_id = query
        .role_id
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(RoleId::from_str)
        .transpose()?;

    let menu = state
        .permission_admin_service
        .menu_permissions(&user, role_id)
        .await?;

    Ok(Json(MenuPermissionsResponse::from(menu.as_ref())))
}

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<RolePermissionsQuery>,
) -> ApiResult<Json<RolePermissionsResponse>> {
    let role_id = RoleId::from_str(query.role_id.as_str())?;
    let permissions = state
        .permission_admin_service
        .list_assignments(&user, role_id)
        .await?
        .into_iter()
        .map(RolePermissionEntryResponse::from)
        .collect();

    Ok(Json(RolePermissionsResponse { permissions }))
}

pub async fn replace_role_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<ReplaceRolePermissionsRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let role_id = RoleId::from_str(payload.role_id.as_str())?;
    let rows = payload
        .permissions
        .into_iter()
        .map(MenuPermissionInput::into_assignment)
        .collect::<AppResult<Vec<_>>>()?;

    state
        .permission_admin_service
        .replace_assignments(&user, role_id, rows)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}
