//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use omn_site::SiteError;
use serde_json::json;

/// Server error type.
///
/// JSON handlers return it directly. Page handlers turn not-found errors
/// into the HTML not-found page instead.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Site lookup or rendering failed.
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Listen address could not be parsed.
    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    /// I/O error while binding or serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::Site(err) if err.is_not_found())
    }

    pub(crate) fn status(&self) -> StatusCode {
        if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Site(SiteError::CategoryNotFound(category)) => {
                json!({"error": "Category not found", "category": category})
            }
            Self::Site(SiteError::PageNotFound(path)) => {
                json!({"error": "Page not found", "path": path})
            }
            other => {
                tracing::error!(error = %other, "Request failed");
                json!({"error": other.to_string()})
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
