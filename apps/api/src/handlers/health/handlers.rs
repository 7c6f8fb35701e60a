use super::checks::check_permission_store;
use super::*;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let permission_store = check_permission_store(state.permission_store.clone()).await;

    let ready = is_healthy(permission_store.status);
    let status = if ready { "ok" } else { "degraded" };
    let http_status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            ready,
            permission_store,
        }),
    )
}

fn is_healthy(status: &str) -> bool {
    status == "ok"
}
