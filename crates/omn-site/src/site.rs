//! Site façade: navigation, page resolution, and rendering in one place.
//!
//! [`Site`] holds no navigation state between calls. Every page render walks
//! its category again and returns the menu inside the [`PageView`], so the
//! page shell always gets the menu it should draw as an explicit value.

use std::sync::Arc;

use omn_cache::{Cache, CacheBucket, CacheBucketExt, FileCache, NullCache};
use omn_config::DocsConfig;
use omn_renderer::{Heading, InteractiveCodeBlocks, MarkdownRenderer};
use omn_storage::{FsStorage, Storage};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::error::SiteError;
use crate::navigation::{NavItem, NavNode, NavTree};
use crate::resolver::{PageResolver, ResolvedPage, resolve_document};
use crate::routes;
use crate::walker::walk;

/// Characters escaped in one URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// File name of the home document, without suffix.
pub const HOME_DOCUMENT: &str = "README";
/// File name of the change log document, without suffix.
pub const CHANGELOG_DOCUMENT: &str = "CHANGELOG";

/// Percent-encode one route segment, the inverse of
/// [`decode_segment`](crate::decode_segment).
#[must_use]
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// URL of a document key, e.g. `/docs/frontend/My%20Page`.
#[must_use]
pub fn doc_href(key: &str) -> String {
    let mut href = String::from("/docs");
    for segment in key.split('/').filter(|s| !s.is_empty()) {
        href.push('/');
        href.extend(utf8_percent_encode(segment, SEGMENT));
    }
    href
}

/// Options for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteOptions {
    /// Markdown file suffix, including the dot.
    pub suffix: String,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            suffix: ".md".to_owned(),
        }
    }
}

/// Which kind of document a [`PageView`] shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Doc,
    Home,
    Changelog,
}

/// Link to a neighbouring document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub label: String,
    pub href: String,
}

impl PageLink {
    fn from_node(node: &NavNode) -> Self {
        Self {
            label: node.label().to_owned(),
            href: doc_href(node.key()),
        }
    }
}

/// Everything the page shell needs to draw one page.
#[derive(Clone, Debug)]
pub struct PageView {
    pub kind: PageKind,
    /// Category of a doc page.
    pub category: Option<String>,
    /// Navigation key of a doc page, e.g. `frontend/tools/vim`.
    pub key: Option<String>,
    pub title: String,
    pub html: String,
    pub breadcrumb: Vec<String>,
    /// Headings of depth 2 and 3.
    pub toc: Vec<Heading>,
    pub prev: Option<PageLink>,
    pub next: Option<PageLink>,
    /// Sidebar menu of the page's category. Empty for home and change log.
    pub menu: Vec<NavItem>,
    /// Source modification time, seconds since the Unix epoch.
    pub source_mtime: f64,
    pub from_cache: bool,
}

#[derive(Serialize, Deserialize)]
struct CachedHtml {
    html: String,
}

/// Documentation site over a docs storage and a project root storage.
pub struct Site {
    docs: Arc<dyn Storage>,
    root: Arc<dyn Storage>,
    options: SiteOptions,
    pages: Box<dyn CacheBucket>,
}

impl Site {
    /// Create a site.
    ///
    /// `docs` is rooted at the docs directory, `root` at the project root
    /// holding the home and change log documents.
    #[must_use]
    pub fn new(
        docs: Arc<dyn Storage>,
        root: Arc<dyn Storage>,
        options: SiteOptions,
        cache: &dyn Cache,
    ) -> Self {
        Self {
            docs,
            root,
            options,
            pages: cache.bucket("pages"),
        }
    }

    /// Create a filesystem-backed site from configuration.
    ///
    /// The rendered page cache lives under the project directory when
    /// enabled and is wiped whenever `version` changes.
    #[must_use]
    pub fn from_config(config: &DocsConfig, version: &str) -> Self {
        let cache: Box<dyn Cache> = if config.cache_enabled {
            Box::new(FileCache::new(config.cache_dir(), version))
        } else {
            Box::new(NullCache)
        };
        Self::new(
            Arc::new(FsStorage::new(config.source_dir.clone())),
            Arc::new(FsStorage::new(config.root_dir.clone())),
            SiteOptions {
                suffix: config.suffix.clone(),
            },
            cache.as_ref(),
        )
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.options.suffix
    }

    fn resolver(&self) -> PageResolver<'_> {
        PageResolver::new(self.docs.as_ref(), &self.options.suffix)
    }

    /// Category names, in listing order.
    pub fn categories(&self) -> Result<Vec<String>, SiteError> {
        Ok(routes::categories(self.docs.as_ref())?)
    }

    /// Navigation tree of a category, built fresh.
    ///
    /// `category` is the raw, possibly percent-encoded route segment.
    pub fn navigation(&self, category: &str) -> Result<NavTree, SiteError> {
        let name = self.resolver().category(category)?;
        walk(self.docs.as_ref(), &name, &self.options.suffix).map_err(|e| {
            if e.is_not_found() {
                SiteError::CategoryNotFound(name)
            } else {
                SiteError::Storage(e)
            }
        })
    }

    /// Slug segments of every document in a category, sorted.
    pub fn routes(&self, category: &str) -> Result<Vec<Vec<String>>, SiteError> {
        let name = self.resolver().category(category)?;
        Ok(routes::routes_by_glob(
            self.docs.as_ref(),
            &name,
            &self.options.suffix,
        )?)
    }

    /// Render `/docs/{category}/{segments...}` from raw route parts.
    pub fn render_doc(&self, category: &str, raw_segments: &[&str]) -> Result<PageView, SiteError> {
        let page = self.resolver().resolve(category, raw_segments)?;
        let tree = walk(self.docs.as_ref(), &page.category, &self.options.suffix)?;
        let key = page.key();
        let (prev, next) = tree.neighbors(&key);

        let base_path = match key.rsplit_once('/') {
            Some((dir, _)) => format!("docs/{dir}"),
            None => "docs".to_owned(),
        };
        let mtime = self.docs.mtime(&page.source_path).unwrap_or(0.0);
        let (html, from_cache) = self.render_html(&key, &page.content, mtime, &base_path);

        Ok(PageView {
            prev: prev.map(PageLink::from_node),
            next: next.map(PageLink::from_node),
            menu: tree.to_items(),
            key: Some(key),
            ..view(page, html, mtime, from_cache, PageKind::Doc)
        })
    }

    /// Render the home page from the project's `README`.
    pub fn render_home(&self) -> Result<PageView, SiteError> {
        self.render_fixed(HOME_DOCUMENT, PageKind::Home)
    }

    /// Render the change log from the project's `CHANGELOG`.
    pub fn render_changelog(&self) -> Result<PageView, SiteError> {
        self.render_fixed(CHANGELOG_DOCUMENT, PageKind::Changelog)
    }

    fn render_fixed(&self, name: &str, kind: PageKind) -> Result<PageView, SiteError> {
        let page = resolve_document(self.root.as_ref(), name, &self.options.suffix)?;
        let mtime = self.root.mtime(&page.source_path).unwrap_or(0.0);
        let (html, from_cache) = self.render_html(&format!("_root/{name}"), &page.content, mtime, "");
        Ok(view(page, html, mtime, from_cache, kind))
    }

    /// Rendered HTML of a document, from the cache when its mtime matches.
    fn render_html(&self, cache_key: &str, content: &str, mtime: f64, base_path: &str) -> (String, bool) {
        let etag = mtime.to_string();
        if let Some(cached) = self.pages.get_json::<CachedHtml>(cache_key, &etag) {
            tracing::debug!(key = cache_key, "Page cache hit");
            return (cached.html, true);
        }

        let result = MarkdownRenderer::new()
            .with_base_path(base_path)
            .with_suffix(self.options.suffix.as_str())
            .with_processor(InteractiveCodeBlocks)
            .render_markdown(content);
        for warning in &result.warnings {
            tracing::warn!(key = cache_key, %warning, "Render warning");
        }

        self.pages.set_json(
            cache_key,
            &etag,
            &CachedHtml {
                html: result.html.clone(),
            },
        );
        (result.html, false)
    }
}

fn view(page: ResolvedPage, html: String, source_mtime: f64, from_cache: bool, kind: PageKind) -> PageView {
    let title = page
        .title
        .or_else(|| page.breadcrumb.last().cloned())
        .unwrap_or_default();
    PageView {
        kind,
        category: (!page.category.is_empty()).then_some(page.category),
        key: None,
        title,
        html,
        breadcrumb: page.breadcrumb,
        toc: page.toc,
        prev: None,
        next: None,
        menu: Vec::new(),
        source_mtime,
        from_cache,
    }
}

#[cfg(test)]
mod tests {
    use omn_cache::MemoryCache;
    use omn_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn site_with(docs: MockStorage, root: MockStorage, cache: &dyn Cache) -> Site {
        Site::new(Arc::new(docs), Arc::new(root), SiteOptions::default(), cache)
    }

    fn docs() -> MockStorage {
        MockStorage::new()
            .with_file("frontend/git.md", "# Git Basics\n\n## Setup\n\nSee [vim](./tools/vim.md).\n")
            .with_file("frontend/tools/vim.md", "# Vim\n")
            .with_file("frontend/vue.md", "Vue without title")
            .with_file("backend/go.md", "# Go")
            .with_mtime("frontend/git.md", 100.0)
    }

    fn site() -> Site {
        site_with(docs(), MockStorage::new(), &NullCache)
    }

    #[test]
    fn test_doc_href() {
        assert_eq!(doc_href("frontend/git"), "/docs/frontend/git");
        assert_eq!(doc_href("frontend/My Page"), "/docs/frontend/My%20Page");
        assert_eq!(doc_href("a/指南"), "/docs/a/%E6%8C%87%E5%8D%97");
    }

    #[test]
    fn test_encode_segment_survives_decoding() {
        for name in ["My Page", "100%", "a%41", "指南", "a\\b"] {
            let encoded = encode_segment(name);
            assert_eq!(crate::decode_segment(&encoded).as_deref(), Some(name));
        }
        assert_eq!(encode_segment("a\\b"), "a%5Cb");
    }

    #[test]
    fn test_render_doc() {
        let view = site().render_doc("frontend", &["git"]).unwrap();

        assert_eq!(view.kind, PageKind::Doc);
        assert_eq!(view.title, "Git Basics");
        assert_eq!(view.key.as_deref(), Some("frontend/git"));
        assert_eq!(view.category.as_deref(), Some("frontend"));
        assert_eq!(view.breadcrumb, vec!["frontend", "Git Basics"]);
        assert_eq!(view.toc.len(), 1);
        assert!(view.html.contains(r#"id="Setup""#));
        assert!(view.html.contains(r#"href="/docs/frontend/tools/vim""#));
        assert_eq!(view.source_mtime, 100.0);
        assert_eq!(view.menu.len(), 3);
    }

    #[test]
    fn test_prev_next_follow_menu_order() {
        let view = site().render_doc("frontend", &["tools", "vim"]).unwrap();

        assert_eq!(
            view.prev,
            Some(PageLink {
                label: "Git Basics".to_owned(),
                href: "/docs/frontend/git".to_owned()
            })
        );
        assert_eq!(view.next.map(|l| l.href), Some("/docs/frontend/vue".to_owned()));
    }

    #[test]
    fn test_title_falls_back_to_segment() {
        let view = site().render_doc("frontend", &["vue"]).unwrap();
        assert_eq!(view.title, "vue");
    }

    #[test]
    fn test_not_found_variants() {
        let site = site();
        assert!(matches!(
            site.render_doc("frontend", &["missing"]),
            Err(SiteError::PageNotFound(_))
        ));
        assert!(matches!(
            site.render_doc("nope", &["git"]),
            Err(SiteError::CategoryNotFound(_))
        ));
        assert!(matches!(site.navigation("nope"), Err(SiteError::CategoryNotFound(_))));
        assert!(matches!(site.routes("nope"), Err(SiteError::CategoryNotFound(_))));
    }

    #[test]
    fn test_categories_and_routes() {
        let site = site();
        assert_eq!(site.categories().unwrap(), vec!["backend", "frontend"]);
        assert_eq!(
            site.routes("frontend").unwrap(),
            vec![
                vec!["git".to_owned()],
                vec!["tools".to_owned(), "vim".to_owned()],
                vec!["vue".to_owned()],
            ]
        );
    }

    #[test]
    fn test_home_and_changelog() {
        let root = MockStorage::new()
            .with_file("README.md", "# Oh My Note\n\n[Git](docs/frontend/git.md)\n")
            .with_file("CHANGELOG.md", "## 1.0.0\n");
        let site = site_with(docs(), root, &NullCache);

        let home = site.render_home().unwrap();
        assert_eq!(home.kind, PageKind::Home);
        assert_eq!(home.title, "Oh My Note");
        assert_eq!(home.category, None);
        assert!(home.menu.is_empty());
        assert!(home.html.contains(r#"href="/docs/frontend/git""#));

        let changelog = site.render_changelog().unwrap();
        assert_eq!(changelog.title, "CHANGELOG");
        assert_eq!(changelog.toc[0].id, "1.0.0");
    }

    #[test]
    fn test_links_to_index_documents_resolve() {
        let docs = MockStorage::new()
            .with_file("frontend/git.md", "# Git\n\n[sub](./sub/index.md)\n")
            .with_file("frontend/sub/index.md", "# Sub\n");
        let site = site_with(docs, MockStorage::new(), &NullCache);

        let view = site.render_doc("frontend", &["git"]).unwrap();
        assert!(view.html.contains(r#"<a href="/docs/frontend/sub/index">sub</a>"#));
        assert_eq!(site.render_doc("frontend", &["sub", "index"]).unwrap().title, "Sub");
    }

    #[test]
    fn test_links_use_configured_suffix() {
        let docs = MockStorage::new()
            .with_file("frontend/git.mdx", "# Git\n\n[vim](./tools/vim.mdx#setup)\n")
            .with_file("frontend/tools/vim.mdx", "# Vim\n");
        let options = SiteOptions {
            suffix: ".mdx".to_owned(),
        };
        let site = Site::new(Arc::new(docs), Arc::new(MockStorage::new()), options, &NullCache);

        let view = site.render_doc("frontend", &["git"]).unwrap();
        assert!(view.html.contains(r#"href="/docs/frontend/tools/vim#setup""#));
        assert!(site.render_doc("frontend", &["tools", "vim"]).is_ok());
    }

    #[test]
    fn test_missing_home_is_not_found() {
        assert!(site().render_home().unwrap_err().is_not_found());
    }

    #[test]
    fn test_page_cache_keyed_by_mtime() {
        let cache = MemoryCache::default();
        let docs = Arc::new(docs());
        let site = Site::new(
            Arc::clone(&docs) as Arc<dyn Storage>,
            Arc::new(MockStorage::new()),
            SiteOptions::default(),
            &cache,
        );

        assert!(!site.render_doc("frontend", &["git"]).unwrap().from_cache);
        assert!(site.render_doc("frontend", &["git"]).unwrap().from_cache);

        docs.set_file("frontend/git.md", "# Git Basics\n\nChanged.\n");
        docs.set_mtime("frontend/git.md", 200.0);

        let view = site.render_doc("frontend", &["git"]).unwrap();
        assert!(!view.from_cache);
        assert!(view.html.contains("Changed."));
    }
}
