//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/config", get(handlers::config::get_config))
        .route(
            "/api/navigation/{category}",
            get(handlers::navigation::get_navigation),
        )
        .route(
            "/api/pages/{category}/{*slug}",
            get(handlers::pages::get_page),
        );

    let page_routes = Router::new()
        .route("/", get(handlers::docs::get_home))
        .route("/change-log", get(handlers::docs::get_changelog))
        .route("/docs/{category}", get(handlers::docs::get_doc))
        .route("/docs/{category}/{*slug}", get(handlers::docs::get_doc))
        .route("/assets/{*path}", get(static_files::get_asset));

    let [csp, content_type_options, frame_options] =
        security::SECURITY_HEADERS.map(|(name, value)| security::header_layer(name, value));

    Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .fallback(handlers::docs::fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(csp)
                .layer(content_type_options)
                .layer(frame_options),
        )
        .with_state(state)
}
