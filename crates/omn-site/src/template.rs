//! Server-side page shell.
//!
//! Produces the full HTML document around a rendered [`PageView`]: header
//! with search and sign-in, sidebar menu, breadcrumb, article, table of
//! contents, and pagination. Client behaviour lives in `omn.js`.

use std::fmt::Write;

use omn_config::{AuthConfig, SearchConfig, SiteConfig};
use omn_renderer::{Heading, escape_html as escape};

use crate::navigation::NavItem;
use crate::site::{PageLink, PageView, doc_href};

/// Per-request inputs of the shell besides the page itself.
pub struct ShellContext<'a> {
    pub site: &'a SiteConfig,
    pub search: Option<&'a SearchConfig>,
    pub auth: Option<&'a AuthConfig>,
    /// Whether the visitor carries a session cookie.
    pub signed_in: bool,
    /// Categories linked from the header.
    pub categories: &'a [String],
    /// URL prefix of the stylesheet and script, without trailing slash.
    pub asset_base: &'a str,
}

/// Render a complete page.
pub fn render_page(view: &PageView, ctx: &ShellContext<'_>) -> String {
    let mut html = String::with_capacity(view.html.len() + 16 * 1024);

    render_head(&mut html, &view.title, ctx);
    render_header(&mut html, ctx, view.category.as_deref());

    html.push_str("<div class=\"layout\">\n");
    if !view.menu.is_empty() {
        render_sidebar(&mut html, &view.menu, view.key.as_deref());
    }

    html.push_str("<main class=\"content\">\n");
    render_breadcrumbs(&mut html, &view.breadcrumb);
    html.push_str("<article class=\"markdown-body\">\n");
    html.push_str(&view.html);
    html.push_str("\n</article>\n");
    render_pagination(&mut html, view.prev.as_ref(), view.next.as_ref());
    html.push_str("</main>\n");

    render_toc(&mut html, &view.toc);
    html.push_str("</div>\n");

    render_tail(&mut html);
    html
}

/// Render the not-found page.
pub fn render_not_found(message: &str, ctx: &ShellContext<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    render_head(&mut html, "Not Found", ctx);
    render_header(&mut html, ctx, None);
    html.push_str("<div class=\"layout\">\n<main class=\"content not-found\">\n");
    html.push_str("<h1>404</h1>\n");
    let _ = writeln!(html, "<p>{}</p>", escape(message));
    html.push_str("<p><a href=\"/\">Back to home</a></p>\n");
    html.push_str("</main>\n</div>\n");
    render_tail(&mut html);
    html
}

fn render_head(html: &mut String, title: &str, ctx: &ShellContext<'_>) {
    let brand = &ctx.site.brand;
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if title.is_empty() || title == brand {
        let _ = writeln!(html, "<title>{}</title>", escape(brand));
    } else {
        let _ = writeln!(html, "<title>{} - {}</title>", escape(title), escape(brand));
    }
    let _ = writeln!(
        html,
        "<meta name=\"description\" content=\"{}\">",
        escape(&ctx.site.description)
    );
    let _ = writeln!(
        html,
        "<link rel=\"stylesheet\" href=\"{}/omn.css\">",
        ctx.asset_base
    );
    let _ = writeln!(
        html,
        "<script src=\"{}/omn.js\" defer></script>",
        ctx.asset_base
    );
    html.push_str("</head>\n<body>\n");
}

fn render_header(html: &mut String, ctx: &ShellContext<'_>, active_category: Option<&str>) {
    html.push_str("<header class=\"site-header\">\n");
    let _ = writeln!(
        html,
        "<a href=\"/\" class=\"brand\">{}</a>",
        escape(&ctx.site.brand)
    );

    html.push_str("<nav class=\"header-nav\">\n");
    for category in ctx.categories {
        let active = if active_category == Some(category.as_str()) {
            " active"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<a href=\"{}\" class=\"header-link{active}\">{}</a>",
            escape(&doc_href(category)),
            escape(category)
        );
    }
    for link in &ctx.site.navigation {
        let _ = writeln!(
            html,
            "<a href=\"{}\" class=\"header-link\">{}</a>",
            escape(&link.path),
            escape(&link.title)
        );
    }
    html.push_str("</nav>\n");

    // The widget only appears for signed-in visitors.
    if let Some(search) = ctx.search
        && ctx.signed_in
    {
        let _ = writeln!(
            html,
            "<div id=\"search\" class=\"search\" data-app-id=\"{}\" data-api-key=\"{}\" data-index-name=\"{}\"></div>",
            escape(&search.app_id),
            escape(&search.api_key),
            escape(&search.index_name)
        );
    }

    html.push_str("<div class=\"header-actions\">\n");
    if let Some(auth) = ctx.auth {
        if ctx.signed_in {
            let _ = writeln!(
                html,
                "<a href=\"{}\" class=\"auth-link\">Sign out</a>",
                escape(&auth.signout_url())
            );
        } else {
            for provider in &auth.providers {
                let _ = writeln!(
                    html,
                    "<a href=\"{}\" class=\"auth-link auth-{}\">Sign in with {}</a>",
                    escape(&auth.signin_url(*provider)),
                    provider.id(),
                    provider.label()
                );
            }
        }
    }
    if let Some(github) = &ctx.site.github {
        let _ = writeln!(
            html,
            "<a href=\"{}\" class=\"icon-link\" target=\"_blank\" rel=\"noopener noreferrer\" aria-label=\"GitHub\">GitHub</a>",
            escape(github)
        );
    }
    if let Some(npm) = &ctx.site.npm {
        let _ = writeln!(
            html,
            "<a href=\"{}\" class=\"icon-link\" target=\"_blank\" rel=\"noopener noreferrer\" aria-label=\"npm\">npm</a>",
            escape(npm)
        );
    }
    html.push_str("<button type=\"button\" class=\"theme-toggle\" data-action=\"toggle-theme\" aria-label=\"Toggle dark mode\"></button>\n");
    html.push_str("</div>\n</header>\n");
}

fn render_sidebar(html: &mut String, items: &[NavItem], active_key: Option<&str>) {
    html.push_str("<aside class=\"sidebar\">\n<nav class=\"menu\">\n<ul>\n");
    render_nav_items(html, items, active_key);
    html.push_str("</ul>\n</nav>\n</aside>\n");
}

/// Branches become `<details>` groups, open when they hold the active page.
fn render_nav_items(html: &mut String, items: &[NavItem], active_key: Option<&str>) {
    for item in items {
        html.push_str("<li>\n");
        match &item.children {
            None => {
                let is_active = active_key == Some(item.key.as_str());
                let class = if is_active { "menu-link active" } else { "menu-link" };
                let current = if is_active {
                    " aria-current=\"page\""
                } else {
                    ""
                };
                let _ = writeln!(
                    html,
                    "<a href=\"{}\" class=\"{class}\"{current}>{}</a>",
                    escape(&doc_href(&item.key)),
                    escape(&item.label)
                );
            }
            Some(children) => {
                let open = if active_key.is_some_and(|k| k.starts_with(&item.key)) {
                    " open"
                } else {
                    ""
                };
                let _ = writeln!(
                    html,
                    "<details class=\"menu-group\"{open}>\n<summary>{}</summary>\n<ul>",
                    escape(&item.label)
                );
                render_nav_items(html, children, active_key);
                html.push_str("</ul>\n</details>\n");
            }
        }
        html.push_str("</li>\n");
    }
}

fn render_breadcrumbs(html: &mut String, breadcrumb: &[String]) {
    if breadcrumb.is_empty() {
        return;
    }
    html.push_str("<nav class=\"breadcrumb\" aria-label=\"Breadcrumb\">\n<ol>\n");
    let last = breadcrumb.len() - 1;
    for (i, crumb) in breadcrumb.iter().enumerate() {
        let class = if i == last {
            "breadcrumb-item current"
        } else if i == 0 {
            "breadcrumb-item level-0"
        } else {
            "breadcrumb-item"
        };
        let _ = writeln!(html, "<li class=\"{class}\">{}</li>", escape(crumb));
    }
    html.push_str("</ol>\n</nav>\n");
}

/// Table of contents. Entries carry the heading id in `data-id` so the
/// script can highlight the section in view.
fn render_toc(html: &mut String, toc: &[Heading]) {
    if toc.is_empty() {
        return;
    }
    html.push_str("<aside class=\"toc\">\n");
    html.push_str("<h2 class=\"toc-title\">On this page</h2>\n<ul>\n");
    for heading in toc {
        let indent = if heading.depth >= 3 { " pl-3" } else { "" };
        let id = escape(&heading.id);
        let _ = writeln!(
            html,
            "<li class=\"toc-item{indent}\" data-id=\"{id}\"><a href=\"#{id}\">{}</a></li>",
            escape(&heading.text)
        );
    }
    html.push_str("</ul>\n</aside>\n");
}

fn render_pagination(html: &mut String, prev: Option<&PageLink>, next: Option<&PageLink>) {
    if prev.is_none() && next.is_none() {
        return;
    }
    html.push_str("<nav class=\"pagination\">\n");
    if let Some(prev) = prev {
        let _ = writeln!(
            html,
            "<a href=\"{}\" class=\"pagination-prev\" rel=\"prev\"><span>Previous</span>{}</a>",
            escape(&prev.href),
            escape(&prev.label)
        );
    }
    if let Some(next) = next {
        let _ = writeln!(
            html,
            "<a href=\"{}\" class=\"pagination-next\" rel=\"next\"><span>Next</span>{}</a>",
            escape(&next.href),
            escape(&next.label)
        );
    }
    html.push_str("</nav>\n");
}

fn render_tail(html: &mut String) {
    html.push_str("<button type=\"button\" class=\"back-to-top\" data-action=\"back-to-top\" aria-label=\"Back to top\" hidden>&uarr;</button>\n");
    html.push_str("</body>\n</html>");
}
