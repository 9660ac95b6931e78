pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;
pub mod validation;

use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Builds the full application router over shared state.
pub fn build_router(state: AppState) -> Router {
    // Unauthenticated surface; IP rate-limited. The refresh endpoint lives
    // here because its access token may already be expired.
    let public_routes = Router::new()
        .route("/auth/email/exist", post(handlers::auth::check_email_exists))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/signup/code", post(handlers::auth::send_signup_code))
        .route(
            "/auth/signup/verify",
            post(handlers::auth::verify_signup_code),
        )
        .route("/auth/signup", post(handlers::auth::signup))
        .route(
            "/auth/reset-password/code",
            post(handlers::auth::send_reset_password_code),
        )
        .route(
            "/auth/reset-password/verify",
            post(handlers::auth::verify_reset_password_code),
        )
        .route("/auth/reset-password", post(handlers::auth::reset_password))
        .route(
            "/tokens/refresh",
            post(handlers::tokens::refresh_access_token),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ));

    let user_routes = Router::new()
        .route("/tokens", get(handlers::tokens::get_tokens))
        .route(
            "/tokens/current",
            delete(handlers::tokens::delete_current_token),
        )
        .route(
            "/tokens/{refresh_token}",
            delete(handlers::tokens::delete_token),
        )
        .route(
            "/user",
            get(handlers::users::get_user_detail).patch(handlers::users::update_user),
        )
        .route("/user/password", put(handlers::users::change_password))
        .route(
            "/todos",
            get(handlers::todos::get_todos).post(handlers::todos::create_todo),
        )
        .route(
            "/todos/statistics",
            get(handlers::todos::get_todo_statistics),
        )
        .route(
            "/todos/{todo_id}",
            get(handlers::todos::get_todo)
                .put(handlers::todos::update_todo)
                .patch(handlers::todos::patch_todo)
                .delete(handlers::todos::delete_todo),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allow_origins)),
        )
        .with_state(state)
}

fn cors_layer(allow_origins: &[String]) -> CorsLayer {
    let origins: Vec<_> = allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(24 * 60 * 60));

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
