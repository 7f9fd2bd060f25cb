//! Heading extraction.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

use crate::anchor::AnchorAllocator;

/// A heading found in a markdown document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Plain text of the heading's inline content, trimmed. Emphasis markers
    /// and code backticks are not part of it.
    pub text: String,
    /// Level, 1 through 6.
    pub depth: u8,
    /// Anchor id, unique within the document.
    pub id: String,
}

/// Parser options used for every markdown document (GFM subset).
#[must_use]
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

pub(crate) fn level_to_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Collects headings from a stream of parser events.
///
/// Every heading gets an id from one [`AnchorAllocator`], in document order
/// and regardless of depth. The renderer feeds its events through a collector
/// too, which is what keeps rendered ids and extracted ids identical.
#[derive(Debug, Default)]
pub struct HeadingCollector {
    anchors: AnchorAllocator,
    current: Option<(u8, String)>,
    image_depth: usize,
    headings: Vec<Heading>,
}

impl HeadingCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one event. Returns the heading it completes, if any.
    pub fn observe(&mut self, event: &Event<'_>) -> Option<&Heading> {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.current = Some((level_to_depth(*level), String::new()));
            }
            Event::Start(Tag::Image { .. }) => self.image_depth += 1,
            Event::End(TagEnd::Image) => self.image_depth = self.image_depth.saturating_sub(1),
            Event::Text(text) | Event::Code(text) if self.image_depth == 0 => {
                if let Some((_, buf)) = &mut self.current {
                    buf.push_str(text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buf)) = &mut self.current {
                    buf.push(' ');
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                let (depth, raw) = self.current.take()?;
                let text = raw.trim().to_owned();
                let id = self.anchors.allocate(&text);
                self.headings.push(Heading { text, depth, id });
                return self.headings.last();
            }
            _ => {}
        }
        None
    }

    /// All headings seen so far, in document order.
    #[must_use]
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    #[must_use]
    pub fn into_headings(self) -> Vec<Heading> {
        self.headings
    }
}

/// Headings whose depth is in `depths`, in document order.
///
/// The whole document is scanned. Ids are allocated over all headings, so a
/// filtered result carries the same ids the rendered page uses. Input that
/// holds no matching heading yields an empty vector.
#[must_use]
pub fn extract_headings(markdown: &str, depths: &[u8]) -> Vec<Heading> {
    let mut collector = HeadingCollector::new();
    for event in Parser::new_ext(markdown, parser_options()) {
        collector.observe(&event);
    }
    collector
        .into_headings()
        .into_iter()
        .filter(|h| depths.contains(&h.depth))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn heading(text: &str, depth: u8, id: &str) -> Heading {
        Heading {
            text: text.to_owned(),
            depth,
            id: id.to_owned(),
        }
    }

    #[test]
    fn test_single_title() {
        assert_eq!(
            extract_headings("# Title", &[1]),
            vec![heading("Title", 1, "Title")]
        );
    }

    #[test]
    fn test_no_headings() {
        assert!(extract_headings("Just a paragraph.\n\n- and a list", &[1, 2, 3]).is_empty());
        assert!(extract_headings("", &[1]).is_empty());
    }

    #[test]
    fn test_depth_filter_and_order() {
        let md = "# Git Basics\n\n## Setup\n\ntext\n\n### Config File\n\n#### Deep\n\n## Usage\n";

        assert_eq!(
            extract_headings(md, &[2, 3]),
            vec![
                heading("Setup", 2, "Setup"),
                heading("Config File", 3, "ConfigFile"),
                heading("Usage", 2, "Usage"),
            ]
        );
    }

    #[test]
    fn test_scans_whole_document() {
        let mut md = String::new();
        for i in 0..500 {
            md.push_str(&format!("paragraph {i}\n\n"));
        }
        md.push_str("## Late Heading\n");

        assert_eq!(
            extract_headings(&md, &[2]),
            vec![heading("Late Heading", 2, "LateHeading")]
        );
    }

    #[test]
    fn test_inline_markup_is_plain_text() {
        let md = "## Using **bold** and `code` and [links](x.md)\n";

        assert_eq!(
            extract_headings(md, &[2]),
            vec![heading(
                "Using bold and code and links",
                2,
                "Usingboldandcodeandlinks"
            )]
        );
    }

    #[test]
    fn test_image_alt_text_not_in_heading() {
        let md = "## Logo ![alt words](logo.png) here\n";

        assert_eq!(extract_headings(md, &[2])[0].text, "Logo  here");
        assert_eq!(extract_headings(md, &[2])[0].id, "Logohere");
    }

    #[test]
    fn test_duplicates_are_distinct_entries() {
        let md = "## Example\n\n## Example\n";

        assert_eq!(
            extract_headings(md, &[2]),
            vec![heading("Example", 2, "Example"), heading("Example", 2, "Example-1")]
        );
    }

    #[test]
    fn test_ids_allocated_across_filtered_depths() {
        // The h1 claims "Intro", so the h2 must get the suffixed id even when
        // only depth 2 is requested.
        let md = "# Intro\n\n## Intro\n";

        assert_eq!(extract_headings(md, &[2]), vec![heading("Intro", 2, "Intro-1")]);
    }

    #[test]
    fn test_setext_headings() {
        let md = "Title\n=====\n\nSub\n---\n";

        assert_eq!(
            extract_headings(md, &[1, 2]),
            vec![heading("Title", 1, "Title"), heading("Sub", 2, "Sub")]
        );
    }

    #[test]
    fn test_heading_like_text_in_code_block_ignored() {
        let md = "```md\n# not a heading\n```\n\n## Real\n";

        assert_eq!(extract_headings(md, &[1, 2]), vec![heading("Real", 2, "Real")]);
    }
}
