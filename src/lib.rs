pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod fares;
pub mod handlers;
pub mod markups;
pub mod middleware;
pub mod permissions;
pub mod roles;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let max_body = state.config.server.max_request_size_bytes;

    Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        // API (authorization handled per handler)
        .merge(api_routes())
        .fallback(not_found)
        // Page gate runs after the session is decoded
        .layer(from_fn_with_state(state.clone(), middleware::gate_middleware))
        .layer(from_fn_with_state(state.clone(), middleware::session_middleware))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.security.cors_origins)),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    use handlers::api;

    Router::new()
        .route("/api/fare-rules", post(api::fare_rules_post))
        .route("/api/permissions", get(api::permissions_get))
        .route("/api/roles/current", get(api::current_role_get))
        .route("/api/markups", get(api::markups_get).post(api::markups_post))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
