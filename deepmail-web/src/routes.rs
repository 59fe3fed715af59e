//! Route definitions for the Deepmail web server

use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // SDR auto-reply
        .route("/webhook/email", post(handlers::receive_email))
        .route("/test/simulate", post(handlers::simulate_email))
        // Conversations
        .route("/conversations", get(handlers::list_conversations))
        .route(
            "/conversations/{thread_id}",
            get(handlers::get_conversation),
        )
        // Deep research
        .route("/research/questions", post(handlers::research_questions))
        .route("/research/run", post(handlers::research_run))
}
