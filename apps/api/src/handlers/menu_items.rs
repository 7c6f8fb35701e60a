use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use vitrine_core::UserIdentity;

use crate::dto::{
    CreateMenuItemRequest, MenuItemEnvelope, MenuItemListResponse, MenuItemResponse,
    UpdateMenuItemRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_menu_items_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<MenuItemListResponse>> {
    let menu_items = state
        .permission_admin_service
        .list_menu_items(&user)
        .await?
        .into_iter()
        .map(MenuItemResponse::from)
        .collect();

    Ok(Json(MenuItemListResponse { menu_items }))
}

pub async fn create_menu_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateMenuItemRequest>,
) -> ApiResult<(StatusCode, Json<MenuItemEnvelope>)> {
    let node = state
        .permission_admin_service
        .create_menu_item(&user, payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MenuItemEnvelope {
            menu_item: MenuItemResponse::from(node),
        }),
    ))
}

pub async fn update_menu_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(menu_key): Path<String>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> ApiResult<Json<MenuItemEnvelope>> {
    let node = state
        .permission_admin_service
        .update_menu_item(&user, payload.into_input(menu_key))
        .await?;

    Ok(Json(MenuItemEnvelope {
        menu_item: MenuItemResponse::from(node),
    }))
}
