//! HTML page handlers.
//!
//! Every page is rendered server-side into the shell. Missing categories
//! and documents get the not-found page with a 404 status.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use omn_site::{PageView, SiteError, doc_href, render_not_found, render_page};

use crate::handlers::raw_segments;
use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn get_home(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    page_response(&state, &headers, state.site.render_home())
}

/// Handle GET /change-log.
pub(crate) async fn get_changelog(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    page_response(&state, &headers, state.site.render_changelog())
}

/// Handle GET /docs/{category} and GET /docs/{category}/{*slug}.
///
/// A bare category redirects to its first document.
pub(crate) async fn get_doc(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let segments = raw_segments(uri.path(), "/docs/");
    let Some((category, slug)) = segments.split_first() else {
        return not_found(&state, &headers, "Page not found");
    };

    if slug.is_empty() {
        return redirect_to_first(&state, &headers, category);
    }
    page_response(&state, &headers, state.site.render_doc(category, slug))
}

/// Fallback for every unmatched route.
pub(crate) async fn fallback(State(state): State<Arc<AppState>>, uri: Uri, headers: HeaderMap) -> Response {
    not_found(&state, &headers, &format!("Nothing lives at {}", uri.path()))
}

fn redirect_to_first(state: &AppState, headers: &HeaderMap, category: &str) -> Response {
    match state.site.navigation(category) {
        Ok(tree) => match tree.first_leaf() {
            Some(leaf) => (StatusCode::FOUND, [(header::LOCATION, doc_href(leaf.key()))]).into_response(),
            None => not_found(state, headers, &format!("Category has no documents: {category}")),
        },
        Err(err) => error_response(state, headers, &err),
    }
}

fn page_response(state: &AppState, headers: &HeaderMap, result: Result<PageView, SiteError>) -> Response {
    match result {
        Ok(view) => {
            let categories = state.categories();
            let shell = state.shell(state.signed_in(headers), &categories);
            Html(render_page(&view, &shell)).into_response()
        }
        Err(err) => error_response(state, headers, &err),
    }
}

fn error_response(state: &AppState, headers: &HeaderMap, err: &SiteError) -> Response {
    if err.is_not_found() {
        return not_found(state, headers, &err.to_string());
    }
    tracing::error!(error = %err, "Page render failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

fn not_found(state: &AppState, headers: &HeaderMap, message: &str) -> Response {
    let categories = state.categories();
    let shell = state.shell(state.signed_in(headers), &categories);
    (StatusCode::NOT_FOUND, Html(render_not_found(message, &shell))).into_response()
}
