//! Code block processor trait and fence info parsing.
//!
//! Processors are registered with the renderer and tried in order for every
//! fenced block with a language. The first one returning something other
//! than [`ProcessResult::PassThrough`] wins; blocks nobody claims are emitted
//! as a plain `<pre><code>`.

use std::collections::HashMap;

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the block with this HTML.
    Inline(String),
    /// Not handled here.
    PassThrough,
}

/// Presentation mode requested in the fence info.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeMode {
    /// Live sandbox embedded in an iframe.
    CodeSandbox,
    /// Rendered output above a collapsible source listing.
    Preview,
}

/// Parsed fence info string, e.g. `` ```html-preview title=demo ``.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FenceInfo {
    /// Leading word characters of the first token, lowercased.
    pub language: String,
    pub mode: Option<CodeMode>,
    /// `key=value` pairs after the first token.
    pub attrs: HashMap<String, String>,
}

/// A processor for fenced code blocks.
pub trait CodeBlockProcessor {
    /// Process one block. `index` counts code blocks from zero in document order.
    fn process(&mut self, info: &FenceInfo, source: &str, index: usize) -> ProcessResult;

    /// Warnings collected while processing.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Parse a fence info string.
///
/// The mode is a case-insensitive substring match on the whole info string:
/// `codesandbox` is checked before `preview`.
#[must_use]
pub fn parse_fence_info(info: &str) -> FenceInfo {
    let mut parts = info.split_whitespace();
    let first = parts.next().unwrap_or("");

    let language: String = first
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect();

    let lower = info.to_lowercase();
    let mode = if lower.contains("codesandbox") {
        Some(CodeMode::CodeSandbox)
    } else if lower.contains("preview") {
        Some(CodeMode::Preview)
    } else {
        None
    };

    let attrs = parts
        .filter_map(|part| part.split_once('='))
        .map(|(k, v)| (k.to_owned(), v.trim_matches('"').to_owned()))
        .collect();

    FenceInfo {
        language,
        mode,
        attrs,
    }
}
