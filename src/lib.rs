pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use db::AnnouncementStore;
use middleware::auth::JwtSecret;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AnnouncementStore>,
}

/// All routes, with the JWT secret made available to the identity extractor.
pub fn build_router(state: AppState, jwt_secret: &str) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        .route(
            "/announcements",
            get(routes::announcements::list_announcements)
                .post(routes::announcements::create_announcement),
        )
        .route(
            "/announcements/{id}",
            put(routes::announcements::update_announcement)
                .delete(routes::announcements::delete_announcement),
        )
        .layer(axum::Extension(JwtSecret(jwt_secret.to_string())))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
