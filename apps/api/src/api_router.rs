use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;
use vitrine_core::AppError;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;


use cors::build_cors_layer;

pub fn build_router(app_state: AppState) -> Result<Router, AppError> {
    let cors_layer = build_cors_layer(app_state.frontend_url.as_str())?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/login", get(handlers::auth::login_page_handler))
        .route("/api/login", post(handlers::auth::login_handler))
        .route("/api/logout", post(handlers::auth::logout_handler))
        .route("/api/me", get(handlers::auth::me_handler))
        .route(
            "/api/permissions",
            get(handlers::permissions::menu_permissions_handler),
        )
        .route(
            "/api/role-permissions",
            get(handlers::permissions::list_role_permissions_handler)
                .post(handlers::permissions::replace_role_permissions_handler),
        )
        .route(
            "/api/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}",
            get(handlers::roles::get_role_handler)
                .put(handlers::roles::rename_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/menu-items",
            get(handlers::menu_items::list_menu_items_handler)
                .post(handlers::menu_items::create_menu_item_handler),
        )
        .route(
            "/api/menu-items/{menu_key}",
            put(handlers::menu_items::update_menu_item_handler),
        )
        .fallback(handlers::pages::page_context_handler)
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::gate_requests,
        ))
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
