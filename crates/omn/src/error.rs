//! CLI error types.

use omn_config::ConfigError;
use omn_server::ServerError;
use omn_static::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("Failed to create project directory {}: {source}", path.display())]
    ProjectDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
