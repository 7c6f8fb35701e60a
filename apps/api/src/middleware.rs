use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;
use vitrine_application::{
    DEFAULT_LANDING_PATH, GateDecision, LOGIN_PATH, RequestKind, safe_return_path,
};
use vitrine_core::AppError;
use vitrine_domain::{MenuKey, ResolvedMenu};

use crate::error::ApiResult;
use crate::session_cookies::{TOKEN_COOKIE, last_page_cookie, read_cookie};
use crate::state::AppState;

/// Menu and addressed node of an authorized request.
#[derive(Clone)]
pub struct RequestAccess {
    pub menu: Arc<ResolvedMenu>,
    pub resource: Option<MenuKey>,
}

pub async fn gate_requests(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let path = request.uri().path().to_owned();
    let token = read_cookie(request.headers(), TOKEN_COOKIE);

    let decision = state
        .access_gate
        .evaluate(path.as_str(), token.as_deref())
        .await?;

    match decision {
        GateDecision::Public => Ok(next.run(request).await),
        GateDecision::Unauthenticated {
            kind: RequestKind::Page,
        } => Ok(Redirect::temporary(LOGIN_PATH).into_response()),
        GateDecision::Unauthenticated {
            kind: RequestKind::Api,
        } => Err(AppError::Unauthorized("authentication required".to_owned()).into()),
        GateDecision::Forbidden {
            kind: RequestKind::Page,
            ..
        } => Ok(Redirect::temporary(DEFAULT_LANDING_PATH).into_response()),
        GateDecision::Forbidden {
            kind: RequestKind::Api,
            identity,
        } => Err(AppError::Forbidden(format!(
            "role '{}' may not call '{path}'",
            identity.role_name()
        ))
        .into()),
        GateDecision::Authorized {
            kind,
            identity,
            menu,
            resource,
        } => {
            request.extensions_mut().insert(identity);
            request
                .extensions_mut()
                .insert(RequestAccess { menu, resource });

            let mut response = next.run(request).await;
            if kind == RequestKind::Page
                && response.status().is_success()
                && let Some(page) = safe_return_path(path.as_str())
            {
                response
                    .headers_mut()
                    .append(header::SET_COOKIE, last_page_cookie(page, state.cookie_secure)?);
            }

            Ok(response)
        }
    }
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site")
            && fetch_site == HeaderValue::from_static("cross-site")
        {
            return Err(AppError::Forbidden("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url.as_str();
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer == allowed_origin
            || referer
                .strip_prefix(allowed_origin)
                .is_some_and(|rest| rest.starts_with('/'));

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Forbidden("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
