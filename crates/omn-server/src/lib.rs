//! HTTP server for omn documentation sites.
//!
//! Pages are rendered server-side into the page shell. The same content is
//! available as JSON for client-side navigation:
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | home page from the project `README` |
//! | `GET /change-log` | change log page from `CHANGELOG` |
//! | `GET /docs/{category}` | 302 to the category's first document |
//! | `GET /docs/{category}/{*slug}` | rendered document |
//! | `GET /api/config` | branding, categories, search and sign-in settings |
//! | `GET /api/navigation/{category}` | menu tree |
//! | `GET /api/pages/{category}/{*slug}` | page JSON with `ETag` |
//! | `GET /assets/{*path}` | stylesheet and script |
//!
//! Unknown routes get the HTML not-found page.

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use omn_config::Config;
use omn_site::Site;

pub use error::ServerError;
use state::AppState;

/// Build the application router over a site.
pub fn router(site: Site, config: Config, version: &str) -> Router {
    app::create_router(Arc::new(AppState {
        site,
        config,
        version: version.to_owned(),
    }))
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener fails.
pub async fn run_server(config: Config, version: &str) -> Result<(), ServerError> {
    let site = Site::from_config(&config.docs_resolved, version);
    let addr = SocketAddr::from_str(&format!("{}:{}", config.server.host, config.server.port))?;
    let app = router(site, config, version);

    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
