use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use vitrine_core::{RoleId, UserIdentity};

use crate::dto::{RoleResponse, SaveRoleRequest, SuccessResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .permission_admin_service
        .list_roles(&user)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .permission_admin_service
        .create_role(&user, payload.name.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .permission_admin_service
        .get_role(&user, RoleId::from_str(role_id.as_str())?)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn rename_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
    Json(payload): Json<SaveRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .permission_admin_service
        .rename_role(
            &user,
            RoleId::from_str(role_id.as_str())?,
            payload.name.as_str(),
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .permission_admin_service
        .delete_role(&user, RoleId::from_str(role_id.as_str())?)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}
