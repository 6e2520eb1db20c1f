use axum::Json;

use crate::topics::catalog::{TopicCatalog, CATALOG};

/// GET /api/topics
pub async fn handle_get_topics() -> Json<TopicCatalog> {
    Json(CATALOG)
}
