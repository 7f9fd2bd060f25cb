//! Markdown to HTML renderer.

use std::fmt::Write;

use pulldown_cmark::{BlockQuoteKind, CodeBlockKind, Event, Parser, Tag, TagEnd};

use crate::code_block::{CodeBlockProcessor, ProcessResult, parse_fence_info};
use crate::headings::{Heading, HeadingCollector, parser_options};
use crate::html;
use crate::state::{CodeBlockState, HeadingState, ImageState, TableState, escape_html};

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    pub html: String,
    /// Text of the first non-empty level 1 heading.
    pub title: Option<String>,
    /// Every heading in document order, with the ids used in `html`.
    pub headings: Vec<Heading>,
    pub warnings: Vec<String>,
}

/// Markdown renderer.
///
/// Every event also goes through a [`HeadingCollector`], so heading ids in
/// the output are exactly those [`extract_headings`](crate::extract_headings)
/// returns for the same input.
///
/// Code blocks with a language are offered to the processors added with
/// [`with_processor`](Self::with_processor), in order.
pub struct MarkdownRenderer {
    output: String,
    headings: HeadingCollector,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    /// One entry per open link: whether it is external, or `None` when the
    /// link sits inside a heading and its tags are dropped.
    links: Vec<Option<bool>>,
    completed_heading: Option<(u8, String)>,
    base_path: Option<String>,
    suffix: String,
    processors: Vec<Box<dyn CodeBlockProcessor>>,
    code_block_index: usize,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            headings: HeadingCollector::new(),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            links: Vec::new(),
            completed_heading: None,
            base_path: None,
            suffix: ".md".to_owned(),
            processors: Vec::new(),
            code_block_index: 0,
        }
    }

    /// URL directory of the page being rendered, e.g. `docs/frontend`.
    /// Relative document links are resolved against it.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Suffix of document files, `.md` by default.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_processor<P: CodeBlockProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        self.render(Parser::new_ext(markdown, parser_options()))
    }

    /// Render parser events. The renderer can be reused afterwards.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.completed_heading = self
                .headings
                .observe(&event)
                .map(|h| (h.depth, h.id.clone()));
            self.process_event(event);
        }

        self.code_block_index = 0;
        self.links.clear();
        let headings = std::mem::take(&mut self.headings).into_headings();
        let title = headings
            .iter()
            .find(|h| h.depth == 1 && !h.text.is_empty())
            .map(|h| h.text.clone());

        RenderResult {
            html: std::mem::take(&mut self.output),
            title,
            headings,
            warnings: self
                .processors
                .iter()
                .flat_map(|p| p.warnings())
                .cloned()
                .collect(),
        }
    }

    /// Buffer inline content goes to: the pending heading, or the output.
    fn inline_sink(&mut self) -> &mut String {
        if self.heading.is_active() {
            self.heading.buffer()
        } else {
            &mut self.output
        }
    }

    fn push_inline(&mut self, content: &str) {
        self.inline_sink().push_str(content);
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if self.image.is_active() {
                    self.image.push_str(&code);
                } else {
                    let html = format!("<code>{}</code>", escape_html(&code));
                    self.push_inline(&html);
                }
            }
            Event::Html(raw) | Event::InlineHtml(raw) => self.push_inline(&raw),
            Event::SoftBreak => {
                if self.image.is_active() {
                    self.image.push_str(" ");
                } else {
                    self.push_inline("\n");
                }
            }
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => {
                let checked = if checked { " checked" } else { "" };
                write!(self.output, r#"<input type="checkbox" disabled{checked}>"#).unwrap();
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { .. } => self.heading.start(),
            Tag::BlockQuote(kind) => match kind {
                Some(kind) => {
                    let class = match kind {
                        BlockQuoteKind::Note => "note",
                        BlockQuoteKind::Tip => "tip",
                        BlockQuoteKind::Important => "important",
                        BlockQuoteKind::Warning => "warning",
                        BlockQuoteKind::Caution => "caution",
                    };
                    write!(self.output, r#"<blockquote class="alert alert-{class}">"#).unwrap();
                }
                None => self.output.push_str("<blockquote>"),
            },
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.into_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code.start(info);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str(r#"<div class="table-wrap"><table>"#);
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let cell = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{cell}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                // The heading is already wrapped in its self-link.
                let external = (!self.heading.is_active()).then(|| {
                    html::link_start(
                        &mut self.output,
                        &dest_url,
                        &title,
                        self.base_path.as_deref(),
                        &self.suffix,
                    )
                });
                self.links.push(external);
            }
            Tag::Image {
                dest_url, title, ..
            } => self.image.start(dest_url.into_string(), title.into_string()),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                let inner = self.heading.end();
                if let Some((depth, id)) = self.completed_heading.take() {
                    html::heading(&mut self.output, depth, &id, &inner);
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => self.code_block(),
            TagEnd::List(ordered) => self.output.push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table></div>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => {
                if let Some(Some(external)) = self.links.pop() {
                    html::link_end(self.inline_sink(), external);
                }
            }
            TagEnd::Image => {
                if let Some((src, title, alt)) = self.image.end() {
                    html::image(self.inline_sink(), &src, &alt, &title);
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else {
            let escaped = escape_html(text);
            self.push_inline(&escaped);
        }
    }

    fn code_block(&mut self) {
        let (raw_info, source) = self.code.end();
        let info = parse_fence_info(&raw_info);
        let index = self.code_block_index;
        self.code_block_index += 1;

        if !info.language.is_empty() {
            for processor in &mut self.processors {
                if let ProcessResult::Inline(html) = processor.process(&info, &source, index) {
                    self.output.push_str(&html);
                    return;
                }
            }
        }

        let language = (!info.language.is_empty()).then_some(info.language.as_str());
        html::code_block(&mut self.output, language, &source);
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
