//! Page assets for omn.
//!
//! The shell links `omn.css` and `omn.js` from this crate. Two modes share
//! one API:
//!
//! - **`embed` feature on**: files under `static/` are compiled into the
//!   binary via `rust-embed`
//! - **`embed` feature off**: files are read from the crate's `static/`
//!   directory at runtime, so edits show up without a rebuild

use std::borrow::Cow;
#[cfg(not(feature = "embed"))]
use std::path::Path;

#[cfg(feature = "embed")]
#[derive(rust_embed::RustEmbed)]
#[folder = "static"]
struct Assets;

#[cfg(not(feature = "embed"))]
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Stylesheet linked from every page.
pub const STYLESHEET: &str = "omn.css";

/// Script loaded (deferred) by every page.
pub const SCRIPT: &str = "omn.js";

/// Get an asset by its path relative to `static/`.
#[cfg(feature = "embed")]
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    Assets::get(path).map(|f| f.data)
}

/// Get an asset by its path relative to `static/`.
///
/// Paths that try to leave the asset directory are refused.
#[cfg(not(feature = "embed"))]
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    if path.split('/').any(|part| part == ".." || part.is_empty()) {
        return None;
    }
    std::fs::read(Path::new(STATIC_DIR).join(path))
        .ok()
        .map(Cow::Owned)
}

/// Every asset path, sorted.
#[cfg(feature = "embed")]
pub fn iter() -> Vec<String> {
    let mut paths: Vec<String> = Assets::iter().map(Cow::into_owned).collect();
    paths.sort();
    paths
}

/// Every asset path, sorted.
#[cfg(not(feature = "embed"))]
pub fn iter() -> Vec<String> {
    let base = Path::new(STATIC_DIR);
    let mut paths = Vec::new();
    let mut pending = vec![base.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if let Ok(rel) = path.strip_prefix(base) {
                paths.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    paths.sort();
    paths
}

/// MIME type for the given asset path.
pub fn mime_for(path: &str) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}
