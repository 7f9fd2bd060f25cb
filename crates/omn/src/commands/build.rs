//! `omn build` command implementation.

use std::path::PathBuf;

use clap::Args;
use omn_config::{CliSettings, Config};
use omn_site::Site;
use omn_static::StaticSiteBuilder;

use crate::commands::ensure_project_dir;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover omn.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory (default: .omn/build/).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Disable caching.
    #[arg(long)]
    no_cache: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            cache_enabled: self.no_cache.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        config.validate()?;
        ensure_project_dir(&config.docs_resolved.project_dir)?;

        let output_dir = self
            .output_dir
            .unwrap_or_else(|| config.docs_resolved.project_dir.join("build"));

        output.field("Docs", config.docs_resolved.source_dir.display());
        output.field("Output", output_dir.display());

        let site = Site::from_config(&config.docs_resolved, version);
        let report = StaticSiteBuilder::new(&site, &config).build(&output_dir)?;

        if report.failed > 0 {
            output.warning(&format!(
                "{} page(s) failed to render, see the log for details",
                report.failed
            ));
        }
        output.success(&format!(
            "Built {} pages and {} assets into {}",
            report.pages,
            report.assets,
            output_dir.display()
        ));
        Ok(())
    }
}
