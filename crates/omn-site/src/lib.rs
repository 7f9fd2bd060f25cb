//! Documentation tree ingestion and page assembly for omn.
//!
//! - [`walk`] turns a category directory into a [`NavTree`]
//! - [`PageResolver`] maps `/docs/{category}/{slug...}` to a document, its
//!   breadcrumb, and its table of contents
//! - [`routes_by_glob`] and [`routes_by_walk`] enumerate every route of a
//!   category for static builds
//! - [`Site`] ties these to the renderer and the page cache
//! - [`render_page`] wraps a [`PageView`] in the page shell
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use omn_cache::NullCache;
//! use omn_site::{Site, SiteOptions};
//! use omn_storage::MockStorage;
//!
//! let docs = MockStorage::new().with_file("frontend/git.md", "# Git Basics\n\n## Setup\n");
//! let site = Site::new(
//!     Arc::new(docs),
//!     Arc::new(MockStorage::new()),
//!     SiteOptions::default(),
//!     &NullCache,
//! );
//!
//! let page = site.render_doc("frontend", &["git"])?;
//! assert_eq!(page.breadcrumb, vec!["frontend", "Git Basics"]);
//! assert_eq!(page.toc[0].id, "Setup");
//! # Ok::<(), omn_site::SiteError>(())
//! ```

mod error;
mod navigation;
mod resolver;
mod routes;
mod site;
mod template;
mod walker;

pub use error::SiteError;
pub use navigation::{NavItem, NavNode, NavTree};
pub use resolver::{PageResolver, ResolvedPage, decode_segment, resolve_document};
pub use routes::{categories, routes_by_glob, routes_by_walk, routes_from_tree};
pub use site::{
    CHANGELOG_DOCUMENT, HOME_DOCUMENT, PageKind, PageLink, PageView, Site, SiteOptions, doc_href,
    encode_segment,
};
pub use template::{ShellContext, render_not_found, render_page};
pub use walker::walk;
