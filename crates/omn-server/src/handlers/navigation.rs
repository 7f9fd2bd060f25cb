//! Navigation API endpoint.
//!
//! Returns the menu tree of one category.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::Uri;
use omn_site::{NavItem, SiteError};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::raw_segments;
use crate::state::AppState;

/// Response for GET /api/navigation/{category}.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    items: Vec<NavItem>,
}

/// Handle GET /api/navigation/{category}.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Json<NavigationResponse>, ServerError> {
    let segments = raw_segments(uri.path(), "/api/navigation/");
    let [category] = segments.as_slice() else {
        return Err(SiteError::CategoryNotFound(segments.join("/")).into());
    };
    let tree = state.site.navigation(category)?;
    Ok(Json(NavigationResponse {
        items: tree.to_items(),
    }))
}
