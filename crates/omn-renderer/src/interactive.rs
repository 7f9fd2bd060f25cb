//! Code blocks with a toolbar, live previews, and embedded sandboxes.
//!
//! The server only emits markup. Copying, running, and toggling are wired up
//! by the page script through the `data-action` attributes:
//!
//! - `copy` writes the block's `textarea.code-source` to the clipboard
//! - `run` evaluates the source as JavaScript (only offered for `js`)
//! - `toggle-source` shows or hides the listing under a preview

use std::fmt::Write;

use crate::code_block::{CodeBlockProcessor, CodeMode, FenceInfo, ProcessResult};
use crate::sandbox::{SANDBOX_DEFINE_URL, sandbox_embed_url, sandbox_parameters};
use crate::state::escape_html;

const SVG_COPY: &str = r#"<svg class="icon-copy" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M0 6.75C0 5.784.784 5 1.75 5h1.5a.75.75 0 0 1 0 1.5h-1.5a.25.25 0 0 0-.25.25v7.5c0 .138.112.25.25.25h7.5a.25.25 0 0 0 .25-.25v-1.5a.75.75 0 0 1 1.5 0v1.5A1.75 1.75 0 0 1 9.25 16h-7.5A1.75 1.75 0 0 1 0 14.25Z"></path><path d="M5 1.75C5 .784 5.784 0 6.75 0h7.5C15.216 0 16 .784 16 1.75v7.5A1.75 1.75 0 0 1 14.25 11h-7.5A1.75 1.75 0 0 1 5 9.25Zm1.75-.25a.25.25 0 0 0-.25.25v7.5c0 .138.112.25.25.25h7.5a.25.25 0 0 0 .25-.25v-7.5a.25.25 0 0 0-.25-.25Z"></path></svg>"#;
const SVG_CHECK: &str = r#"<svg class="icon-check" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M13.78 4.22a.75.75 0 0 1 0 1.06l-7.25 7.25a.75.75 0 0 1-1.06 0L2.22 9.28a.751.751 0 0 1 .018-1.042.751.751 0 0 1 1.042-.018L6 10.94l6.72-6.72a.75.75 0 0 1 1.06 0Z"></path></svg>"#;
const SVG_RUN: &str = r#"<svg viewBox="0 0 16 16" width="16" height="16" aria-hidden="true"><path d="M4 2.5v11l9-5.5-9-5.5Z"></path></svg>"#;
const SVG_SANDBOX: &str = r#"<svg viewBox="0 0 16 16" width="18" height="18" aria-hidden="true"><path d="M8 1 2 4.5v7L8 15l6-3.5v-7L8 1Zm0 1.7 4.3 2.5L8 7.7 3.7 5.2 8 2.7ZM3.5 6.5l3.75 2.2v4.4L3.5 10.9V6.5Zm5.25 6.6V8.7l3.75-2.2v4.4l-3.75 2.2Z"></path></svg>"#;
const SVG_CODE: &str = r#"<svg viewBox="0 0 16 16" width="18" height="18" aria-hidden="true"><path d="m11.28 3.22 4.25 4.25a.75.75 0 0 1 0 1.06l-4.25 4.25a.749.749 0 0 1-1.275-.326.749.749 0 0 1 .215-.734L13.94 8l-3.72-3.72a.749.749 0 0 1 .326-1.275.749.749 0 0 1 .734.215Zm-6.56 0a.751.751 0 0 1 1.042.018.751.751 0 0 1 .018 1.042L2.06 8l3.72 3.72a.749.749 0 0 1-.326 1.275.749.749 0 0 1-.734-.215L.47 8.53a.75.75 0 0 1 0-1.06Z"></path></svg>"#;

/// Languages that get a run button.
fn is_runnable(language: &str) -> bool {
    matches!(language, "js" | "javascript")
}

/// Processor that wraps every block with a language in the interactive shell.
///
/// Blocks without a language pass through and render as plain `<pre>`.
#[derive(Debug, Default)]
pub struct InteractiveCodeBlocks;

impl CodeBlockProcessor for InteractiveCodeBlocks {
    fn process(&mut self, info: &FenceInfo, source: &str, index: usize) -> ProcessResult {
        if info.language.is_empty() {
            return ProcessResult::PassThrough;
        }

        let language = escape_html(&info.language);
        let mut out = String::with_capacity(source.len() * 2 + 1024);

        write!(
            out,
            r#"<div class="code-block" id="code-{index}" data-language="{language}"{mode}>"#,
            mode = match info.mode {
                Some(CodeMode::Preview) => r#" data-mode="preview""#,
                Some(CodeMode::CodeSandbox) => r#" data-mode="codesandbox""#,
                None => "",
            }
        )
        .unwrap();
        toolbar(&mut out, &info.language);
        write!(
            out,
            r#"<textarea class="code-source" hidden readonly>{}</textarea>"#,
            escape_html(source)
        )
        .unwrap();

        match info.mode {
            Some(CodeMode::Preview) => preview(&mut out, &info.language, source),
            Some(CodeMode::CodeSandbox) => {
                let src = sandbox_embed_url(&sandbox_parameters(&info.language, source));
                write!(
                    out,
                    r#"<div class="code-sandbox"><iframe src="{}" title="CodeSandbox" loading="lazy"></iframe></div>"#,
                    escape_html(&src)
                )
                .unwrap();
            }
            None => listing(&mut out, &info.language, source),
        }

        out.push_str("</div>");
        ProcessResult::Inline(out)
    }
}

fn toolbar(out: &mut String, language: &str) {
    write!(
        out,
        r#"<div class="code-toolbar"><span class="code-language">{}</span><div class="code-actions">"#,
        escape_html(language)
    )
    .unwrap();
    if is_runnable(language) {
        write!(
            out,
            r#"<button type="button" class="code-action" data-action="run" title="Run code" aria-label="Run code">{SVG_RUN}</button>"#
        )
        .unwrap();
    }
    write!(
        out,
        r#"<button type="button" class="code-action" data-action="copy" title="Copy code" aria-label="Copy code">{SVG_COPY}{SVG_CHECK}</button></div></div>"#
    )
    .unwrap();
}

/// Rendered snippet in an isolated shadow root, followed by a footer that can
/// open the snippet in a sandbox or reveal the source.
fn preview(out: &mut String, language: &str, source: &str) {
    let parameters = sandbox_parameters(language, source);

    // Declarative shadow DOM keeps the snippet's styles away from the page.
    write!(
        out,
        r#"<div class="code-preview"><template shadowrootmode="open">{source}</template></div>"#
    )
    .unwrap();
    write!(
        out,
        r#"<footer class="code-preview-footer"><form action="{SANDBOX_DEFINE_URL}" method="POST" target="_blank"><input type="hidden" name="parameters" value="{}"><button type="submit" title="Open in CodeSandbox" aria-label="Open in CodeSandbox">{SVG_SANDBOX}</button><button type="button" data-action="toggle-source" title="Show code" aria-label="Show code" aria-expanded="false">{SVG_CODE}</button></form><div class="code-preview-source" hidden>"#,
        escape_html(&parameters)
    )
    .unwrap();
    listing(out, language, source);
    out.push_str("</div></footer>");
}

/// Source listing with one span per line, for line numbers in CSS.
fn listing(out: &mut String, language: &str, source: &str) {
    write!(
        out,
        r#"<pre class="code-lines"><code class="language-{}">"#,
        escape_html(language)
    )
    .unwrap();
    for (i, line) in source.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write!(out, r#"<span class="line">{}</span>"#, escape_html(line)).unwrap();
    }
    out.push_str("</code></pre>");
}
