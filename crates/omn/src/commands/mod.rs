//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod serve;

use std::path::Path;

pub(crate) use build::BuildArgs;
pub(crate) use serve::ServeArgs;

use crate::error::CliError;

/// Ensure the `.omn/` project directory exists with a `.gitignore`.
pub(crate) fn ensure_project_dir(project_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(project_dir).map_err(|source| CliError::ProjectDir {
        path: project_dir.to_path_buf(),
        source,
    })?;

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by omn\n*\n");
    }

    Ok(())
}
