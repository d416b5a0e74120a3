use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: std::sync::Arc<services::AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any); // TODO: restrict to specific origins in production

    Router::new()
        // Public endpoints (no auth required)
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .nest("/api/v1/customer-quests", customer_quest_routes())
        .nest("/api/v1/quests", quest_routes())
        .with_state(app_state)
        .layer(cors)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn customer_quest_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route("/{id}/start", post(handlers::progression::start_quest))
        .route("/{id}/answers", post(handlers::progression::submit_answer))
        .route(
            "/{id}/suggestions",
            post(handlers::progression::request_suggestion),
        )
        .route("/{id}/advance", post(handlers::progression::advance_to_next))
        .route(
            "/{id}/completion",
            get(handlers::progression::quest_completion),
        )
        .route(
            "/{id}/geofence",
            get(handlers::progression::check_customer_geofence),
        )
        .route("/{id}/stream", get(handlers::sse::progression_stream))
}

fn quest_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new().route(
        "/{id}/geofence",
        get(handlers::progression::check_quest_geofence),
    )
}
