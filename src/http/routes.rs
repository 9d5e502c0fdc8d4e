use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Listening control
        .route("/listen/start", post(handlers::start_listening))
        .route("/listen/stop", post(handlers::stop_listening))
        .route("/listen/status", get(handlers::get_status))
        // Phrase maintenance
        .route(
            "/phrases",
            get(handlers::list_phrases).post(handlers::add_phrase),
        )
        .route("/phrases/:text", delete(handlers::delete_phrase))
        .route("/counts/reset", post(handlers::reset_counts))
        // Language info
        .route("/languages", get(handlers::list_languages))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
