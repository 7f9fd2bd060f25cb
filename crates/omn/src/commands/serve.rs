//! `omn serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use omn_config::{CliSettings, Config};
use omn_server::run_server;

use crate::commands::ensure_project_dir;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover omn.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "OMN_PORT")]
    port: Option<u16>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable caching (default: enabled).
    #[arg(long)]
    cache: Option<bool>,

    /// Disable caching.
    #[arg(long, conflicts_with = "cache")]
    no_cache: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
            cache_enabled: self.no_cache.then_some(false).or(self.cache),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        config.validate()?;

        ensure_project_dir(&config.docs_resolved.project_dir)?;

        output.field(
            "Listening",
            format!("http://{}:{}", config.server.host, config.server.port),
        );
        output.field("Docs", config.docs_resolved.source_dir.display());
        if config.docs_resolved.cache_enabled {
            output.field("Cache", config.docs_resolved.cache_dir().display());
        } else {
            output.field("Cache", "disabled");
        }
        if config.search.is_some() && config.auth.is_none() {
            output.warning("Search is configured but no auth is: the widget will never show");
        }

        run_server(config, version).await?;
        Ok(())
    }
}
