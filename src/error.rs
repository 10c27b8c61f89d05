use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::api::views;

/// Message shown whenever a book copy id does not resolve
pub const BOOK_COPY_NOT_FOUND: &str = "Book copy not found";

/// Request-level failure. Validation problems are not represented here; they
/// re-render the form instead.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn book_copy_not_found() -> Self {
        Self::NotFound(BOOK_COPY_NOT_FOUND.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::NotFound(message) => log::warn!("{}", message),
            Self::StoreUnavailable(e) => log::error!("Store failure: {:#}", e),
        }
        (status, Html(views::error_page(status, &self.to_string()))).into_response()
    }
}
