//! Heading anchor ids.

use std::collections::HashSet;

/// Fallback id for headings without any text.
const EMPTY_ID: &str = "section";

/// Base anchor id for a heading's plain text: the text with every
/// whitespace character removed.
///
/// Case and punctuation are preserved, so `Git Basics` becomes `GitBasics`
/// and `Vue 3.x 指南` becomes `Vue3.x指南`.
#[must_use]
pub fn heading_id(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Hands out unique ids within one document.
///
/// The first heading with a given base id keeps it unchanged. Later ones get
/// the first free `-N` suffix (N = 1, 2, ...), checked against every id
/// already handed out, including suffixed ones.
#[derive(Debug, Default)]
pub struct AnchorAllocator {
    used: HashSet<String>,
}

impl AnchorAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the id for the next heading in document order.
    pub fn allocate(&mut self, text: &str) -> String {
        let mut base = heading_id(text);
        if base.is_empty() {
            base = EMPTY_ID.to_owned();
        }

        if self.used.insert(base.clone()) {
            return base;
        }

        let mut n = 1usize;
        loop {
            let candidate = format!("{base}-{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_id_strips_all_whitespace() {
        assert_eq!(heading_id("Git Basics"), "GitBasics");
        assert_eq!(heading_id("  a\tb\nc  "), "abc");
        assert_eq!(heading_id("Vue 3.x 指南"), "Vue3.x指南");
    }

    #[test]
    fn test_heading_id_keeps_case_and_punctuation() {
        assert_eq!(heading_id("What's New?"), "What'sNew?");
    }

    #[test]
    fn test_allocator_first_use_unchanged() {
        let mut anchors = AnchorAllocator::new();
        assert_eq!(anchors.allocate("Usage"), "Usage");
        assert_eq!(anchors.allocate("Install"), "Install");
    }

    #[test]
    fn test_allocator_duplicates_get_suffixes() {
        let mut anchors = AnchorAllocator::new();
        assert_eq!(anchors.allocate("Example"), "Example");
        assert_eq!(anchors.allocate("Example"), "Example-1");
        assert_eq!(anchors.allocate("Ex ample"), "Example-2");
    }

    #[test]
    fn test_allocator_never_collides_with_literal_suffix() {
        let mut anchors = AnchorAllocator::new();
        assert_eq!(anchors.allocate("a-1"), "a-1");
        assert_eq!(anchors.allocate("a"), "a");
        assert_eq!(anchors.allocate("a"), "a-2");
    }

    #[test]
    fn test_allocator_empty_text() {
        let mut anchors = AnchorAllocator::new();
        assert_eq!(anchors.allocate("   "), "section");
        assert_eq!(anchors.allocate(""), "section-1");
    }
}
