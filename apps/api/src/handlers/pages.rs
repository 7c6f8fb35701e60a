use axum::Json;
use axum::extract::Extension;
use axum::http::Uri;
use vitrine_application::RequestKind;
use vitrine_core::{AppError, UserIdentity};
use vitrine_domain::{Capabilities, ResolvedMenuNode};

use crate::dto::{PageContextResponse, ResolvedMenuNodeResponse, UserIdentityResponse};
use crate::error::ApiResult;
use crate::middleware::RequestAccess;

/// Serves the render context of a console page that passed the gate.
///
/// Unknown API routes and public assets without a renderer end here as 404.
pub async fn page_context_handler(
    uri: Uri,
    user: Option<Extension<UserIdentity>>,
    access: Option<Extension<RequestAccess>>,
) -> ApiResult<Json<PageContextResponse>> {
    let path = uri.path();
    let (Some(Extension(user)), Some(Extension(access)), RequestKind::Page) =
        (user, access, RequestKind::of(path))
    else {
        return Err(AppError::NotFound(format!("no route for '{path}'")).into());
    };

    let capabilities = access
        .resource
        .as_ref()
        .map(|key| access.menu.capabilities_for(key.as_str()))
        .unwrap_or_else(Capabilities::view_only);

    Ok(Json(PageContextResponse {
        user: UserIdentityResponse::from(&user),
        path: path.to_owned(),
        menu_item_id: access.resource.as_ref().map(|key| key.as_str().to_owned()),
        can_view: capabilities.can_view,
        can_create: capabilities.can_create,
        can_update: capabilities.can_update,
        can_delete: capabilities.can_delete,
        navigation: access.menu.nodes.iter().filter_map(visible_branch).collect(),
    }))
}

fn visible_branch(node: &ResolvedMenuNode) -> Option<ResolvedMenuNodeResponse> {
    if !node.capabilities.can_view {
        return None;
    }

    let mut response = ResolvedMenuNodeResponse::from(node);
    response.children = node.children.iter().filter_map(visible_branch).collect();
    Some(response)
}
