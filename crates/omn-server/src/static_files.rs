//! Asset serving from `omn-assets`, embedded or read from disk.

use axum::extract::Path;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Handle GET /assets/{*path}.
pub(crate) async fn get_asset(Path(path): Path<String>) -> Response {
    match omn_assets::get(&path) {
        Some(content) => (
            [
                (header::CONTENT_TYPE, omn_assets::mime_for(&path)),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ],
            content.into_owned(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
