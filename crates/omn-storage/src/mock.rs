//! In-memory storage for tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use crate::storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind, join};

const BACKEND: &str = "Mock";

/// Storage holding files in memory.
///
/// Directories are implied by file paths; empty ones can be added with
/// [`MockStorage::with_dir`].
///
/// # Example
///
/// ```ignore
/// use omn_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("frontend/git.md", "# Git Basics")
///     .with_mtime("frontend/git.md", 1_700_000_000.0);
///
/// assert_eq!(storage.read("frontend/git.md").unwrap(), "# Git Basics");
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, String>>,
    dirs: RwLock<BTreeSet<String>>,
    mtimes: RwLock<BTreeMap<String, f64>>,
}

impl MockStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file and all of its parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.files.write().unwrap().insert(path, content.into());
        self
    }

    /// Add a directory, possibly empty.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_dir(self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.dirs.write().unwrap().insert(path);
        self
    }

    /// Set the modification time reported for a path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_mtime(self, path: impl Into<String>, mtime: f64) -> Self {
        self.mtimes.write().unwrap().insert(path.into(), mtime);
        self
    }

    /// Replace the content of a file after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        self.add_parents(&path);
        self.files.write().unwrap().insert(path, content.into());
    }

    /// Update the modification time after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_mtime(&self, path: impl Into<String>, mtime: f64) {
        self.mtimes.write().unwrap().insert(path.into(), mtime);
    }

    fn add_parents(&self, path: &str) {
        let mut dirs = self.dirs.write().unwrap();
        let mut current = path;
        while let Some((parent, _)) = current.rsplit_once('/') {
            dirs.insert(parent.to_owned());
            current = parent;
        }
    }

    fn dir_exists(&self, dir: &str) -> bool {
        dir.is_empty() || self.dirs.read().unwrap().contains(dir)
    }

    fn check(path: &str) -> Result<&str, StorageError> {
        if path.starts_with('/') || path.split('/').any(|s| s == "..") {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(path.trim_end_matches('/'))
    }
}

/// Immediate child name of `path` below `dir`, if `path` lies under it.
fn child_of<'a>(dir: &str, path: &'a str) -> Option<&'a str> {
    let rest = if dir.is_empty() {
        path
    } else {
        path.strip_prefix(dir)?.strip_prefix('/')?
    };
    Some(rest.split('/').next().unwrap_or(rest))
}

impl Storage for MockStorage {
    fn list(&self, dir: &str) -> Result<Vec<Entry>, StorageError> {
        let dir = Self::check(dir)?;
        if self.files.read().unwrap().contains_key(dir) {
            return Err(StorageError::new(StorageErrorKind::WrongKind)
                .with_path(dir)
                .with_backend(BACKEND));
        }
        if !self.dir_exists(dir) {
            return Err(StorageError::not_found(dir).with_backend(BACKEND));
        }

        let mut entries: BTreeMap<String, EntryKind> = BTreeMap::new();
        for path in self.dirs.read().unwrap().iter() {
            if let Some(name) = child_of(dir, path)
                && !name.is_empty()
            {
                entries.insert(name.to_owned(), EntryKind::Dir);
            }
        }
        for path in self.files.read().unwrap().keys() {
            if let Some(name) = child_of(dir, path)
                && join(dir, name) == *path
            {
                entries.entry(name.to_owned()).or_insert(EntryKind::File);
            }
        }

        Ok(entries
            .into_iter()
            .map(|(name, kind)| Entry { name, kind })
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let path = Self::check(path)?;
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        Self::check(path)
            .is_ok_and(|p| self.files.read().unwrap().contains_key(p) || self.dir_exists(p))
    }

    fn is_dir(&self, path: &str) -> bool {
        Self::check(path).is_ok_and(|p| self.dir_exists(p))
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        let path = Self::check(path)?;
        if let Some(mtime) = self.mtimes.read().unwrap().get(path) {
            return Ok(*mtime);
        }
        if self.exists(path) {
            Ok(0.0)
        } else {
            Err(StorageError::not_found(path).with_backend(BACKEND))
        }
    }

    fn glob(&self, dir: &str, pattern: &str) -> Result<Vec<String>, StorageError> {
        let dir = Self::check(dir)?;
        if !self.dir_exists(dir) {
            return Err(StorageError::not_found(dir).with_backend(BACKEND));
        }
        let pattern = glob::Pattern::new(pattern).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(pattern)
                .with_backend(BACKEND)
                .with_source(e)
        })?;
        let options = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };

        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        Ok(self
            .files
            .read()
            .unwrap()
            .keys()
            .filter_map(|path| path.strip_prefix(prefix.as_str()))
            .filter(|relative| pattern.matches_with(relative, options))
            .map(str::to_owned)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> MockStorage {
        MockStorage::new()
            .with_file("frontend/git.md", "# Git Basics")
            .with_file("frontend/tools/vim.md", "# Vim")
            .with_file("frontend/.DS_Store", "")
            .with_dir("frontend/empty")
            .with_file("backend/commit.md", "# Commit")
    }

    #[test]
    fn test_list_root() {
        let storage = sample();

        assert_eq!(
            storage.list("").unwrap(),
            vec![Entry::dir("backend"), Entry::dir("frontend")]
        );
    }

    #[test]
    fn test_list_nested() {
        let storage = sample();

        assert_eq!(
            storage.list("frontend").unwrap(),
            vec![
                Entry::file(".DS_Store"),
                Entry::dir("empty"),
                Entry::file("git.md"),
                Entry::dir("tools"),
            ]
        );
        assert!(storage.list("frontend/empty").unwrap().is_empty());
    }

    #[test]
    fn test_list_errors() {
        let storage = sample();

        assert!(storage.list("missing").unwrap_err().is_not_found());
        assert_eq!(
            storage.list("frontend/git.md").unwrap_err().kind,
            StorageErrorKind::WrongKind
        );
        assert_eq!(
            storage.list("../etc").unwrap_err().kind,
            StorageErrorKind::InvalidPath
        );
    }

    #[test]
    fn test_read_and_mtime() {
        let storage = sample().with_mtime("frontend/git.md", 42.0);

        assert_eq!(storage.read("frontend/git.md").unwrap(), "# Git Basics");
        assert_eq!(storage.mtime("frontend/git.md").unwrap(), 42.0);
        assert_eq!(storage.mtime("frontend/tools/vim.md").unwrap(), 0.0);
        assert!(storage.read("frontend/nope.md").unwrap_err().is_not_found());
    }

    #[test]
    fn test_glob_matches_like_fs() {
        let storage = sample();

        assert_eq!(
            storage.glob("frontend", "**/*.md").unwrap(),
            vec!["git.md", "tools/vim.md"]
        );
    }

    #[test]
    fn test_set_file_updates_content() {
        let storage = sample();
        storage.set_file("frontend/git.md", "# Git Advanced");
        storage.set_mtime("frontend/git.md", 7.0);

        assert_eq!(storage.read("frontend/git.md").unwrap(), "# Git Advanced");
        assert_eq!(storage.mtime("frontend/git.md").unwrap(), 7.0);
    }
}
