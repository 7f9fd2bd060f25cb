//! HTTP request handlers.

pub(crate) mod config;
pub(crate) mod docs;
pub(crate) mod navigation;
pub(crate) mod pages;

/// Path segments after `prefix`, still percent-encoded.
///
/// Routes are matched by axum, but segments are taken from the raw URI so
/// the site decodes each one exactly once. Empty segments are dropped.
pub(crate) fn raw_segments<'a>(path: &'a str, prefix: &str) -> Vec<&'a str> {
    path.strip_prefix(prefix)
        .unwrap_or_default()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect()
}
