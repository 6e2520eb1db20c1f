use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::jwt::TokenService;
use crate::interview::interviewer::Interviewer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable interviewer. Default: `LlmInterviewer` over the configured chat model.
    pub interviewer: Arc<dyn Interviewer>,
    pub tokens: TokenService,
}
