//! Storage trait and error types.

use std::path::PathBuf;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// File or directory name, without any parent components.
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Whether a name is hidden from navigation.
///
/// Covers the macOS `.DS_Store` marker and every other dot-prefixed name.
#[must_use]
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    PermissionDenied,
    /// Path escapes the root or is otherwise malformed.
    InvalidPath,
    /// A file was found where a directory was expected, or the reverse.
    WrongKind,
    /// Content is not valid UTF-8.
    InvalidData,
    Other,
}

/// Storage error with a semantic kind and the backend's source error.
#[derive(Debug)]
pub struct StorageError {
    pub kind: StorageErrorKind,
    /// Path the operation was about, if any.
    pub path: Option<PathBuf>,
    /// Backend identifier ("Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }

    /// Map an I/O error onto a semantic kind.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => StorageErrorKind::InvalidData,
            std::io::ErrorKind::NotADirectory | std::io::ErrorKind::IsADirectory => {
                StorageErrorKind::WrongKind
            }
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        f.write_str(match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::WrongKind => "Wrong entry kind",
            StorageErrorKind::InvalidData => "Invalid data",
            StorageErrorKind::Other => "Error",
        })?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read-only access to a tree of markdown files.
///
/// Paths are slash-separated and relative to the storage root; `""` is the
/// root itself. Implementations reject paths that climb out of the root.
pub trait Storage: Send + Sync {
    /// List the entries of a directory, sorted by name.
    ///
    /// Hidden entries are included; callers decide what to show. Fails with
    /// `NotFound` when the directory is missing and `WrongKind` when `dir`
    /// names a file.
    fn list(&self, dir: &str) -> Result<Vec<Entry>, StorageError>;

    /// Read a file as UTF-8 text.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Whether anything (file or directory) exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &str) -> bool;

    /// Modification time in seconds since the Unix epoch.
    fn mtime(&self, path: &str) -> Result<f64, StorageError>;

    /// Files under `dir` matching a glob `pattern`, relative to `dir`.
    ///
    /// Only files are returned, sorted, with `/` separators. Dot-prefixed
    /// components never match a wildcard.
    fn glob(&self, dir: &str, pattern: &str) -> Result<Vec<String>, StorageError>;
}

/// Join a relative directory and a child name.
pub(crate) fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{}/{name}", dir.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(".DS_Store"));
        assert!(is_hidden(".git"));
        assert!(!is_hidden("git.md"));
        assert!(!is_hidden("tools"));
    }

    #[test]
    fn test_entry_constructors() {
        assert!(Entry::dir("tools").is_dir());
        assert!(!Entry::file("git.md").is_dir());
    }

    #[test]
    fn test_join() {
        assert_eq!(join("", "frontend"), "frontend");
        assert_eq!(join("frontend", "git.md"), "frontend/git.md");
        assert_eq!(join("frontend/", "git.md"), "frontend/git.md");
    }

    #[test]
    fn test_storage_error_io_kinds() {
        let err = StorageError::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            Some(PathBuf::from("/docs/a.md")),
        );
        assert!(err.is_not_found());
        assert_eq!(err.path.as_deref(), Some(Path::new("/docs/a.md")));

        let err = StorageError::io(
            std::io::Error::new(std::io::ErrorKind::InvalidData, "bad utf-8"),
            None,
        );
        assert_eq!(err.kind, StorageErrorKind::InvalidData);

        let err = StorageError::io(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no"),
            None,
        );
        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
    }

    #[test]
    fn test_storage_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("/docs/frontend")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (path: /docs/frontend)"
        );
    }

    #[test]
    fn test_storage_error_display_simple() {
        assert_eq!(
            StorageError::new(StorageErrorKind::InvalidPath).to_string(),
            "Invalid path"
        );
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }
}
