use axum::response::{Json, Redirect};
use serde::Serialize;
use std::sync::Arc;

use crate::model::book_instance_list_url;

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET / and GET /catalog land on the copy list
pub async fn catalog_home() -> Redirect {
    Redirect::to(&book_instance_list_url())
}
