//! Per-element state tracked while walking parser events.

use pulldown_cmark::Alignment;

/// Buffer for the fenced or indented code block being read.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    info: String,
    buffer: String,
}

impl CodeBlockState {
    pub fn start(&mut self, info: String) {
        self.active = true;
        self.info = info;
        self.buffer.clear();
    }

    /// Finish the block and return `(fence info, source)`.
    ///
    /// The single trailing newline the parser leaves on every block is dropped.
    pub fn end(&mut self) -> (String, String) {
        self.active = false;
        let mut source = std::mem::take(&mut self.buffer);
        if source.ends_with('\n') {
            source.pop();
        }
        (std::mem::take(&mut self.info), source)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Alt text capture for an image. Images may nest inside link text, so
/// only the outermost image collects.
#[derive(Default)]
pub(crate) struct ImageState {
    depth: usize,
    alt_text: String,
    pending: Option<(String, String)>,
}

impl ImageState {
    pub fn start(&mut self, src: String, title: String) {
        if self.depth == 0 {
            self.alt_text.clear();
            self.pending = Some((src, title));
        }
        self.depth += 1;
    }

    /// Returns `(src, title, alt)` once the outermost image closes.
    pub fn end(&mut self) -> Option<(String, String, String)> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth > 0 {
            return None;
        }
        let (src, title) = self.pending.take()?;
        Some((src, title, std::mem::take(&mut self.alt_text)))
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Inline HTML of the heading being rendered.
///
/// The opening tag needs the id, which is only known once the heading ends,
/// so inline content is buffered until then.
#[derive(Default)]
pub(crate) struct HeadingState {
    active: bool,
    html: String,
}

impl HeadingState {
    pub fn start(&mut self) {
        self.active = true;
        self.html.clear();
    }

    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.html)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn buffer(&mut self) -> &mut String {
        &mut self.html
    }
}

/// Escape HTML special characters for text and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""q""#), "&quot;q&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_code_block_state_drops_one_trailing_newline() {
        let mut state = CodeBlockState::default();
        state.start("js".to_owned());
        state.push_str("console.log(1)\n\n");

        let (info, source) = state.end();

        assert_eq!(info, "js");
        assert_eq!(source, "console.log(1)\n");
        assert!(!state.is_active());
    }

    #[test]
    fn test_table_state_alignment() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::None, Alignment::Right]);
        state.start_head();

        assert_eq!(state.current_alignment_style(), r#" style="text-align:left""#);
        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");
        state.next_cell();
        assert_eq!(state.current_alignment_style(), r#" style="text-align:right""#);
        state.end_head();
        assert!(!state.is_in_head());
    }

    #[test]
    fn test_image_state_nested() {
        let mut state = ImageState::default();
        state.start("outer.png".to_owned(), String::new());
        state.push_str("outer ");
        state.start("inner.png".to_owned(), String::new());
        state.push_str("inner");

        assert!(state.end().is_none());
        assert_eq!(
            state.end(),
            Some(("outer.png".to_owned(), String::new(), "outer inner".to_owned()))
        );
        assert!(!state.is_active());
    }
}
