pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::errors::AppError;
use crate::interview::handlers as session;
use crate::state::AppState;
use crate::topics::handlers as topics;

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/me", get(auth::handle_me))
        // Session API
        .route("/api/session/start", post(session::handle_start))
        .route("/api/session/respond", post(session::handle_respond))
        .route("/api/session/end/:id", post(session::handle_end))
        .route("/api/session/result/:id", get(session::handle_result))
        .route("/api/session/history", get(session::handle_history))
        // Topics API
        .route("/api/topics", get(topics::handle_get_topics))
        .fallback(route_not_found)
        .with_state(state)
}
