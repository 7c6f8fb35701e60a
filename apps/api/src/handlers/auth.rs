use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use tracing::warn;
use vitrine_application::{DEFAULT_LANDING_PATH, safe_return_path};
use vitrine_core::UserIdentity;

use crate::dto::{LoginRequest, LoginResponse, MeResponse, SuccessResponse, UserIdentityResponse};
use crate::error::ApiResult;
use crate::session_cookies::{
    LAST_PAGE_COOKIE, TOKEN_COOKIE, cleared_token_cookie, read_cookie, token_cookie,
};
use crate::state::AppState;

pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Response> {
    let outcome = state
        .login_service
        .login(payload.username.as_str(), payload.password.as_str())
        .await?;

    let cookie = token_cookie(
        outcome.token.token.as_str(),
        state.session_max_age_seconds,
        state.cookie_secure,
    )?;

    let body = LoginResponse {
        success: true,
        user: UserIdentityResponse::from(&outcome.identity),
        redirect_to: return_path(&headers),
        expires_at: outcome.token.expires_at.to_rfc3339(),
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let token = read_cookie(&headers, TOKEN_COOKIE);
    if let Some(identity) = state.access_gate.authenticate(token.as_deref())
        && let Err(error) = state.login_service.logout(&identity).await
    {
        warn!(error = %error, "failed to record logout");
    }

    let cookie = cleared_token_cookie(state.cookie_secure)?;
    Ok(([(header::SET_COOKIE, cookie)], Json(SuccessResponse::ok())).into_response())
}

pub async fn me_handler(Extension(user): Extension<UserIdentity>) -> Json<MeResponse> {
    Json(MeResponse {
        authenticated: true,
        user: UserIdentityResponse::from(&user),
    })
}

/// Sends callers that already hold a valid token back into the console.
pub async fn login_page_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = read_cookie(&headers, TOKEN_COOKIE);
    if state.access_gate.authenticate(token.as_deref()).is_some() {
        return Redirect::temporary(return_path(&headers).as_str()).into_response();
    }

    StatusCode::NO_CONTENT.into_response()
}

fn return_path(headers: &HeaderMap) -> String {
    read_cookie(headers, LAST_PAGE_COOKIE)
        .as_deref()
        .and_then(safe_return_path)
        .unwrap_or(DEFAULT_LANDING_PATH)
        .to_owned()
}
