//! HTML fragments for headings, images, links, and plain code blocks.

use std::fmt::Write;

use crate::state::escape_html;

const SVG_LINK: &str = r#"<svg class="heading-icon" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="m7.775 3.275 1.25-1.25a3.5 3.5 0 1 1 4.95 4.95l-2.5 2.5a3.5 3.5 0 0 1-4.95 0 .751.751 0 0 1 .018-1.042.751.751 0 0 1 1.042-.018 1.998 1.998 0 0 0 2.83 0l2.5-2.5a2.002 2.002 0 0 0-2.83-2.83l-1.25 1.25a.751.751 0 0 1-1.042-.018.751.751 0 0 1-.018-1.042Zm-4.69 9.64a1.998 1.998 0 0 0 2.83 0l1.25-1.25a.751.751 0 0 1 1.042.018.751.751 0 0 1 .018 1.042l-1.25 1.25a3.5 3.5 0 1 1-4.95-4.95l2.5-2.5a3.5 3.5 0 0 1 4.95 0 .751.751 0 0 1-.018 1.042.751.751 0 0 1-1.042.018 1.998 1.998 0 0 0-2.83 0l-2.5 2.5a1.998 1.998 0 0 0 0 2.83Z"></path></svg>"#;
const SVG_EXTERNAL: &str = r#"<svg class="link-external-icon" viewBox="0 0 16 16" width="12" height="12" aria-hidden="true"><path d="M3.75 2h3.5a.75.75 0 0 1 0 1.5h-3.5a.25.25 0 0 0-.25.25v8.5c0 .138.112.25.25.25h8.5a.25.25 0 0 0 .25-.25v-3.5a.75.75 0 0 1 1.5 0v3.5A1.75 1.75 0 0 1 12.25 14h-8.5A1.75 1.75 0 0 1 2 12.25v-8.5C2 2.784 2.784 2 3.75 2Zm6.854-1h4.146a.25.25 0 0 1 .25.25v4.146a.25.25 0 0 1-.427.177L13.03 4.03 9.28 7.78a.751.751 0 0 1-1.042-.018.751.751 0 0 1-.018-1.042l3.75-3.75-1.543-1.543A.25.25 0 0 1 10.604 1Z"></path></svg>"#;

/// Whether a link leaves the site.
///
/// Absolute `http(s)` URLs and protocol-relative URLs count as external.
/// Everything else, including `mailto:` and fragments, stays in the page.
#[must_use]
pub fn is_external(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || url.starts_with("//")
}

/// Heading with its anchor id, level marker, and a self-link around the content.
pub(crate) fn heading(out: &mut String, depth: u8, id: &str, inner_html: &str) {
    let id = escape_html(id);
    write!(
        out,
        r##"<h{depth} id="{id}" data-doc-level="{depth}"><a class="heading-link" href="#{id}">{}{SVG_LINK}</a></h{depth}>"##,
        inner_html.trim()
    )
    .unwrap();
}

/// Lazily loaded image inside a frame. The `blur-sm` class is removed by the
/// page script once the image scrolls into view.
pub(crate) fn image(out: &mut String, src: &str, alt: &str, title: &str) {
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    write!(
        out,
        r#"<span class="image-frame"><img src="{}" alt="{}"{title_attr} loading="lazy" class="blur-sm"></span>"#,
        escape_html(src),
        escape_html(alt)
    )
    .unwrap();
}

/// Opening anchor tag. Returns whether the link is external, which the
/// caller needs to close it with [`link_end`].
///
/// Internal links to documents ending in `suffix` are resolved against
/// `base_path` when one is given.
pub(crate) fn link_start(
    out: &mut String,
    url: &str,
    title: &str,
    base_path: Option<&str>,
    suffix: &str,
) -> bool {
    let external = is_external(url);
    let href = match base_path {
        Some(base) if !external => resolve_link(url, base, suffix),
        _ => url.to_owned(),
    };
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };

    if external {
        write!(
            out,
            r#"<a href="{}"{title_attr} target="_blank" rel="noopener noreferrer" class="link-external">"#,
            escape_html(&href)
        )
        .unwrap();
    } else {
        write!(out, r#"<a href="{}"{title_attr}>"#, escape_html(&href)).unwrap();
    }
    external
}

pub(crate) fn link_end(out: &mut String, external: bool) {
    if external {
        out.push_str(SVG_EXTERNAL);
    }
    out.push_str("</a>");
}

/// Code block that no processor claimed.
pub(crate) fn code_block(out: &mut String, language: Option<&str>, content: &str) {
    match language {
        Some(lang) => write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(content)
        )
        .unwrap(),
        None => write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap(),
    }
}

/// Resolve a markdown link against the URL directory of the current page.
///
/// Relative document links become clean absolute URLs (suffix `.md`):
/// - `./sibling.md` with base `docs/frontend` becomes `/docs/frontend/sibling`
/// - `../other/page.md#usage` becomes `/docs/other/page#usage`
/// - `sub/index.md` becomes `/docs/frontend/sub/index`
///
/// An `index` document is an ordinary page with its own route.
/// Fragments, `mailto:`, `tel:`, and links to other files are left alone.
fn resolve_link(url: &str, base_path: &str, suffix: &str) -> String {
    if url.starts_with('#') || url.starts_with("mailto:") || url.starts_with("tel:") {
        return url.to_owned();
    }
    let (path_part, fragment) = match url.find('#') {
        Some(pos) => (&url[..pos], &url[pos..]),
        None => (url, ""),
    };
    let Some(stem) = path_part.strip_suffix(suffix).filter(|_| !suffix.is_empty()) else {
        return url.to_owned();
    };

    let resolved = if stem.starts_with('/') {
        stem.trim_start_matches('/').to_owned()
    } else {
        resolve_relative_path(stem, base_path)
    };
    format!("/{resolved}{fragment}")
}

/// `..` never climbs above the root.
fn resolve_relative_path(relative: &str, base: &str) -> String {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }
    segments.join("/")
}
