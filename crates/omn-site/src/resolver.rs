//! Route to document resolution.

use omn_renderer::{Heading, extract_headings};
use omn_storage::{Storage, is_hidden};
use percent_encoding::percent_decode_str;

use crate::error::SiteError;
use crate::walker::join;

/// A document located and read for one route.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPage {
    /// Decoded category, empty for the home and change log documents.
    pub category: String,
    /// Decoded slug segments.
    pub segments: Vec<String>,
    /// Storage path of the source file.
    pub source_path: String,
    pub content: String,
    /// First non-empty level 1 heading.
    pub title: Option<String>,
    /// Headings of depth 1 to 3.
    pub headings: Vec<Heading>,
    /// `[category, ...intermediate segments, title or last segment]`.
    pub breadcrumb: Vec<String>,
    /// `headings` without level 1.
    pub toc: Vec<Heading>,
}

impl ResolvedPage {
    /// Navigation key of the document, e.g. `frontend/tools/vim`.
    #[must_use]
    pub fn key(&self) -> String {
        join(&self.category, &self.segments.join("/"))
    }
}

/// Percent-decode one route segment.
///
/// `None` when the result is not UTF-8, is empty, is hidden (which covers
/// `.` and `..`), or holds a `/` or NUL: such a segment never names a
/// document the navigation shows. A backslash is an ordinary file name
/// character; storage still confines the joined path to its root.
#[must_use]
pub fn decode_segment(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    let valid = !decoded.is_empty() && !is_hidden(&decoded) && !decoded.contains(['/', '\0']);
    valid.then(|| decoded.into_owned())
}

/// Resolves routes against a docs storage.
pub struct PageResolver<'a> {
    storage: &'a dyn Storage,
    suffix: &'a str,
}

impl<'a> PageResolver<'a> {
    #[must_use]
    pub fn new(storage: &'a dyn Storage, suffix: &'a str) -> Self {
        Self { storage, suffix }
    }

    /// Decode and check a category name.
    pub fn category(&self, raw: &str) -> Result<String, SiteError> {
        match decode_segment(raw) {
            Some(category) if self.storage.is_dir(&category) => Ok(category),
            _ => Err(SiteError::CategoryNotFound(raw.to_owned())),
        }
    }

    /// Resolve `/docs/{category}/{segments...}` with raw, still encoded parts.
    pub fn resolve(&self, category: &str, raw_segments: &[&str]) -> Result<ResolvedPage, SiteError> {
        let category = self.category(category)?;
        let route = join(&category, &raw_segments.join("/"));

        if raw_segments.is_empty() {
            return Err(SiteError::PageNotFound(route));
        }
        let segments = raw_segments
            .iter()
            .map(|raw| decode_segment(raw))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| SiteError::PageNotFound(route.clone()))?;

        let source_path = format!("{}{}", join(&category, &segments.join("/")), self.suffix);
        let content = self
            .storage
            .read(&source_path)
            .map_err(|e| SiteError::from_read(e, &route))?;

        let headings = extract_headings(&content, &[1, 2, 3]);
        let title = first_title(&headings);

        let mut breadcrumb = Vec::with_capacity(segments.len() + 1);
        breadcrumb.push(category.clone());
        breadcrumb.extend(segments.iter().take(segments.len() - 1).cloned());
        breadcrumb.push(
            title
                .clone()
                .or_else(|| segments.last().cloned())
                .unwrap_or_default(),
        );

        Ok(ResolvedPage {
            toc: toc(&headings),
            category,
            segments,
            source_path,
            content,
            title,
            headings,
            breadcrumb,
        })
    }
}

/// Resolve a fixed document such as `README` in `storage`.
///
/// The breadcrumb is just the title, or `name` without a title.
pub fn resolve_document(
    storage: &dyn Storage,
    name: &str,
    suffix: &str,
) -> Result<ResolvedPage, SiteError> {
    let source_path = format!("{name}{suffix}");
    let content = storage
        .read(&source_path)
        .map_err(|e| SiteError::from_read(e, name))?;

    let headings = extract_headings(&content, &[1, 2, 3]);
    let title = first_title(&headings);

    Ok(ResolvedPage {
        category: String::new(),
        segments: Vec::new(),
        breadcrumb: vec![title.clone().unwrap_or_else(|| name.to_owned())],
        toc: toc(&headings),
        source_path,
        content,
        title,
        headings,
    })
}

fn first_title(headings: &[Heading]) -> Option<String> {
    headings
        .iter()
        .find(|h| h.depth == 1 && !h.text.is_empty())
        .map(|h| h.text.clone())
}

fn toc(headings: &[Heading]) -> Vec<Heading> {
    headings.iter().filter(|h| h.depth != 1).cloned().collect()
}
