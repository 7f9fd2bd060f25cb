//! Cache stored under a directory on disk.
//!
//! Layout:
//!
//! ```text
//! {root}/
//! +-- VERSION              # version string the entries were written by
//! +-- pages/               # bucket
//!     +-- frontend/
//!         +-- git.entry    # "{etag}\n{bytes}"
//! ```
//!
//! Entries are written to a sibling temp file and renamed into place, so a
//! reader never sees a half-written entry.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Component, Path, PathBuf};

use crate::{Cache, CacheBucket};

const ENTRY_EXT: &str = "entry";

/// File-backed [`Cache`].
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Open a cache at `root`.
    ///
    /// Entries written by a different `version` are discarded by wiping the
    /// directory. Failures are logged and leave the cache usable but empty.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        reset_if_stale(&root, version);
        Self { root }
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
        })
    }
}

struct FileCacheBucket {
    dir: PathBuf,
}

impl FileCacheBucket {
    /// Location of an entry. Keys that would leave the bucket get no slot.
    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        safe.then(|| {
            let mut path = self.dir.join(relative).into_os_string();
            path.push(".");
            path.push(ENTRY_EXT);
            PathBuf::from(path)
        })
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(key)?;
        let mut reader = BufReader::new(fs::File::open(&path).ok()?);

        let mut header = String::new();
        reader.read_line(&mut header).ok()?;
        if header.strip_suffix('\n')? != etag {
            return None;
        }

        let mut data = Vec::new();
        reader.read_to_end(&mut data).ok()?;
        Some(data)
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        if etag.contains('\n') {
            tracing::warn!(key, "Refusing to cache entry with multi-line etag");
            return;
        }
        let Some(path) = self.entry_path(key) else {
            tracing::warn!(key, "Refusing to cache entry with unsafe key");
            return;
        };
        if let Err(e) = write_atomic(&path, etag, value) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write cache entry");
        }
    }
}

fn write_atomic(path: &Path, etag: &str, value: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut buf = Vec::with_capacity(etag.len() + 1 + value.len());
    buf.extend_from_slice(etag.as_bytes());
    buf.push(b'\n');
    buf.extend_from_slice(value);

    let tmp = path.with_extension(format!("{ENTRY_EXT}.{}.tmp", std::process::id()));
    fs::write(&tmp, &buf)?;
    fs::rename(&tmp, path)
}

fn reset_if_stale(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!(version, "Cache version matches");
            return;
        }
        Ok(stored) => {
            tracing::info!(stored, version, "Cache version changed, clearing cache");
        }
        Err(_) => {
            tracing::debug!(root = %root.display(), "Initializing cache");
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!(error = %e, "Failed to clear cache directory");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!(error = %e, "Failed to create cache directory");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!(error = %e, "Failed to write cache VERSION file");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn open(tmp: &TempDir, version: &str) -> FileCache {
        FileCache::new(tmp.path().join("cache"), version)
    }

    #[test]
    fn test_set_and_get_nested_key() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp, "v1").bucket("pages");

        bucket.set("frontend/tools/vim", "1700", b"<h1>Vim</h1>");

        assert_eq!(
            bucket.get("frontend/tools/vim", "1700"),
            Some(b"<h1>Vim</h1>".to_vec())
        );
        assert!(tmp.path().join("cache/pages/frontend/tools/vim.entry").exists());
    }

    #[test]
    fn test_leaf_and_directory_with_same_name() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp, "v1").bucket("pages");

        bucket.set("frontend/tools", "1", b"tools page");
        bucket.set("frontend/tools/vim", "1", b"vim page");

        assert_eq!(bucket.get("frontend/tools", "1"), Some(b"tools page".to_vec()));
        assert_eq!(bucket.get("frontend/tools/vim", "1"), Some(b"vim page".to_vec()));
    }

    #[test]
    fn test_etag_mismatch_misses() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp, "v1").bucket("pages");

        bucket.set("frontend/git", "old", b"stale");

        assert_eq!(bucket.get("frontend/git", "new"), None);
        assert_eq!(bucket.get("frontend/git", ""), None);
    }

    #[test]
    fn test_overwrite_replaces_entry() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp, "v1").bucket("pages");

        bucket.set("k", "1", b"first");
        bucket.set("k", "2", b"second\nwith newline");

        assert_eq!(bucket.get("k", "1"), None);
        assert_eq!(bucket.get("k", "2"), Some(b"second\nwith newline".to_vec()));
    }

    #[test]
    fn test_unsafe_keys_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp, "v1").bucket("pages");

        bucket.set("../escape", "1", b"x");
        bucket.set("/abs", "1", b"x");

        assert_eq!(bucket.get("../escape", "1"), None);
        assert!(!tmp.path().join("cache/escape.entry").exists());
    }

    #[test]
    fn test_version_match_keeps_entries() {
        let tmp = TempDir::new().unwrap();
        open(&tmp, "v1").bucket("pages").set("k", "1", b"kept");

        assert_eq!(open(&tmp, "v1").bucket("pages").get("k", "1"), Some(b"kept".to_vec()));
    }

    #[test]
    fn test_version_change_wipes_entries() {
        let tmp = TempDir::new().unwrap();
        open(&tmp, "v1").bucket("pages").set("k", "1", b"gone");

        let cache = open(&tmp, "v2");

        assert_eq!(cache.bucket("pages").get("k", "1"), None);
        assert_eq!(
            fs::read_to_string(tmp.path().join("cache/VERSION")).unwrap(),
            "v2"
        );
    }
}
