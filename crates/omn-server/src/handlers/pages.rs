//! Pages API endpoint.
//!
//! Renders one document and returns JSON with metadata, breadcrumbs, table
//! of contents, and HTML content.

use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use omn_renderer::Heading;
use omn_site::{PageLink, SiteError, doc_href};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::raw_segments;
use crate::state::AppState;

/// Response for GET /api/pages/{category}/{*slug}.
#[derive(Serialize)]
struct PageResponse {
    meta: PageMeta,
    breadcrumbs: Vec<String>,
    toc: Vec<TocResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prev: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<PageLink>,
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    title: String,
    /// Page URL, e.g. `/docs/frontend/git`.
    path: String,
    category: String,
    /// RFC 3339.
    last_modified: String,
}

#[derive(Serialize)]
struct TocResponse {
    level: u8,
    title: String,
    id: String,
}

impl From<&Heading> for TocResponse {
    fn from(heading: &Heading) -> Self {
        Self {
            level: heading.depth,
            title: heading.text.clone(),
            id: heading.id.clone(),
        }
    }
}

/// Handle GET /api/pages/{category}/{*slug}.
pub(crate) async fn get_page(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let segments = raw_segments(uri.path(), "/api/pages/");
    let Some((category, slug)) = segments.split_first() else {
        return Err(SiteError::PageNotFound(String::new()).into());
    };
    let view = state.site.render_doc(category, slug)?;

    let etag = compute_etag(&state.version, &view.html);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let modified = UNIX_EPOCH + Duration::try_from_secs_f64(view.source_mtime).unwrap_or_default();
    let last_modified: DateTime<Utc> = modified.into();

    let response = PageResponse {
        meta: PageMeta {
            title: view.title,
            path: view.key.as_deref().map(doc_href).unwrap_or_default(),
            category: view.category.unwrap_or_default(),
            last_modified: last_modified.to_rfc3339(),
        },
        breadcrumbs: view.breadcrumb,
        toc: view.toc.iter().map(TocResponse::from).collect(),
        prev: view.prev,
        next: view.next,
        content: view.html,
    };

    Ok((
        [
            (header::ETAG, etag),
            (
                header::LAST_MODIFIED,
                last_modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            ),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Json(response),
    )
        .into_response())
}

/// Compute `ETag` from version and content.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
