//! Markdown rendering for omn.
//!
//! [`MarkdownRenderer`] turns markdown into HTML with a few overrides:
//!
//! - headings carry an `id` and a self-link
//! - images load lazily inside a framed placeholder
//! - external links open in a new tab and are marked with an icon
//! - fenced code goes through registered [`CodeBlockProcessor`]s, such as
//!   [`InteractiveCodeBlocks`] for copy/run buttons and live previews
//!
//! [`extract_headings`] reads headings without rendering. It shares the
//! anchor allocation with the renderer, so table-of-contents links always
//! point at the ids the rendered headings carry.
//!
//! # Example
//!
//! ```
//! use omn_renderer::{InteractiveCodeBlocks, MarkdownRenderer, extract_headings};
//!
//! let markdown = "# Git Basics\n\n## First Steps\n";
//! let result = MarkdownRenderer::new()
//!     .with_processor(InteractiveCodeBlocks::default())
//!     .render_markdown(markdown);
//!
//! let toc = extract_headings(markdown, &[2, 3]);
//! assert!(result.html.contains(&format!("id=\"{}\"", toc[0].id)));
//! ```

mod anchor;
mod code_block;
mod headings;
mod html;
mod interactive;
mod renderer;
mod sandbox;
mod state;

pub use anchor::{AnchorAllocator, heading_id};
pub use code_block::{CodeBlockProcessor, CodeMode, FenceInfo, ProcessResult, parse_fence_info};
pub use headings::{Heading, HeadingCollector, extract_headings, parser_options};
pub use html::is_external;
pub use interactive::InteractiveCodeBlocks;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use sandbox::{SANDBOX_DEFINE_URL, sandbox_embed_url, sandbox_parameters};
pub use state::escape_html;
