//! Filesystem storage.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Storage backed by a directory on disk.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use omn_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("docs"));
/// let text = storage.read("frontend/git.md")?;
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory this storage reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a relative path to a location under the root.
    ///
    /// Rejects absolute paths and `..` components so nothing outside the
    /// root can be reached (e.g. `../../etc/passwd`).
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(relative)
                .with_backend(BACKEND));
        }
        Ok(self.root.join(relative))
    }

    fn io_error(err: std::io::Error, path: &Path) -> StorageError {
        StorageError::io(err, Some(path.to_path_buf())).with_backend(BACKEND)
    }
}

impl Storage for FsStorage {
    fn list(&self, dir: &str) -> Result<Vec<Entry>, StorageError> {
        let full_path = self.resolve(dir)?;
        let read_dir = fs::read_dir(&full_path).map_err(|e| Self::io_error(e, &full_path))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| Self::io_error(e, &full_path))?;
            let Ok(name) = entry.file_name().into_string() else {
                tracing::warn!(path = %entry.path().display(), "Skipping entry with non UTF-8 name");
                continue;
            };
            // Symlinks are followed so linked directories behave like real ones.
            let is_dir = match entry.file_type() {
                Ok(t) if t.is_symlink() => entry.path().is_dir(),
                Ok(t) => t.is_dir(),
                Err(_) => false,
            };
            entries.push(Entry {
                name,
                kind: if is_dir { EntryKind::Dir } else { EntryKind::File },
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let full_path = self.resolve(path)?;
        fs::read_to_string(&full_path).map_err(|e| Self::io_error(e, &full_path))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.exists())
    }

    fn is_dir(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_dir())
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        let full_path = self.resolve(path)?;
        let modified = fs::metadata(&full_path)
            .and_then(|m| m.modified())
            .map_err(|e| Self::io_error(e, &full_path))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64()))
    }

    fn glob(&self, dir: &str, pattern: &str) -> Result<Vec<String>, StorageError> {
        let base = self.resolve(dir)?;
        if !base.is_dir() {
            return Err(StorageError::not_found(&base).with_backend(BACKEND));
        }

        let full_pattern = format!(
            "{}/{pattern}",
            glob::Pattern::escape(&base.to_string_lossy())
        );
        let options = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };
        let paths = glob::glob_with(&full_pattern, options).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(&full_pattern)
                .with_backend(BACKEND)
                .with_source(e)
        })?;

        let mut matches = Vec::new();
        for path in paths {
            let path = path.map_err(|e| {
                let at = e.path().to_path_buf();
                Self::io_error(e.into(), &at)
            })?;
            if !path.is_file() {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&base) else {
                continue;
            };
            let segments: Option<Vec<&str>> = relative
                .components()
                .map(|c| c.as_os_str().to_str())
                .collect();
            if let Some(segments) = segments {
                matches.push(segments.join("/"));
            }
        }

        matches.sort();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_storage_is_send_sync() {
        assert_send_sync::<FsStorage>();
    }

    fn create_docs() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("frontend/tools")).unwrap();
        fs::create_dir_all(root.join("frontend/.drafts")).unwrap();
        fs::write(root.join("frontend/git.md"), "# Git Basics").unwrap();
        fs::write(root.join("frontend/css.md"), "# CSS").unwrap();
        fs::write(root.join("frontend/tools/vim.md"), "# Vim").unwrap();
        fs::write(root.join("frontend/.DS_Store"), "").unwrap();
        fs::write(root.join("frontend/.drafts/wip.md"), "# WIP").unwrap();
        temp_dir
    }

    #[test]
    fn test_list_sorted_with_kinds() {
        let temp_dir = create_docs();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let entries = storage.list("frontend").unwrap();

        assert_eq!(
            entries,
            vec![
                Entry::file(".DS_Store"),
                Entry::dir(".drafts"),
                Entry::file("css.md"),
                Entry::file("git.md"),
                Entry::dir("tools"),
            ]
        );
    }

    #[test]
    fn test_list_missing_dir() {
        let temp_dir = create_docs();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let err = storage.list("backend").unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_list_file_is_wrong_kind() {
        let temp_dir = create_docs();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let err = storage.list("frontend/git.md").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::WrongKind);
    }

    #[test]
    fn test_read_nested_file() {
        let temp_dir = create_docs();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(storage.read("frontend/tools/vim.md").unwrap(), "# Vim");
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = create_docs();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert!(storage.read("frontend/nope.md").unwrap_err().is_not_found());
    }

    #[test]
    fn test_read_non_utf8_is_invalid_data() {
        let temp_dir = create_docs();
        fs::write(temp_dir.path().join("frontend/bin.md"), [0xff, 0xfe, 0x00]).unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let err = storage.read("frontend/bin.md").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidData);
    }

    #[test]
    fn test_read_with_spaces_in_name() {
        let temp_dir = create_docs();
        fs::write(temp_dir.path().join("frontend/My Page.md"), "# Mine").unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(storage.read("frontend/My Page.md").unwrap(), "# Mine");
    }

    #[test]
    fn test_rejects_path_traversal() {
        let temp_dir = create_docs();
        let storage = FsStorage::new(temp_dir.path().join("frontend"));

        let err = storage.read("../frontend/git.md").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);

        let err = storage.read("tools/../../frontend/git.md").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);

        assert!(!storage.exists("../frontend"));
        assert!(storage.mtime("../frontend/git.md").is_err());
        assert!(storage.list("/etc").is_err());
    }

    #[test]
    fn test_exists_and_is_dir() {
        let temp_dir = create_docs();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert!(storage.exists("frontend/git.md"));
        assert!(storage.exists("frontend/tools"));
        assert!(storage.is_dir("frontend/tools"));
        assert!(!storage.is_dir("frontend/git.md"));
        assert!(!storage.exists("frontend/missing.md"));
        assert!(storage.is_dir(""));
    }

    #[test]
    fn test_mtime_returns_modification_time() {
        let temp_dir = create_docs();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let mtime = storage.mtime("frontend/git.md").unwrap();

        assert!(mtime > 0.0);
        assert!(storage.mtime("frontend/missing.md").unwrap_err().is_not_found());
    }

    #[test]
    fn test_glob_recursive_skips_hidden_and_dirs() {
        let temp_dir = create_docs();
        fs::create_dir_all(temp_dir.path().join("frontend/folder.md")).unwrap();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        let files = storage.glob("frontend", "**/*.md").unwrap();

        assert_eq!(files, vec!["css.md", "git.md", "tools/vim.md"]);
    }

    #[test]
    fn test_glob_missing_dir() {
        let temp_dir = create_docs();
        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert!(storage.glob("backend", "**/*.md").unwrap_err().is_not_found());
    }

    #[test]
    fn test_glob_root_with_brackets_in_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("notes [draft]");
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/one.md"), "# One").unwrap();
        let storage = FsStorage::new(root);

        assert_eq!(storage.glob("a", "**/*.md").unwrap(), vec!["one.md"]);
    }
}
