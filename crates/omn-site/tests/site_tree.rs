//! End-to-end checks over a documentation tree on disk.

use std::fs;
use std::path::Path;

use omn_config::DocsConfig;
use omn_renderer::extract_headings;
use omn_site::{Site, SiteError, routes_by_walk};
use omn_storage::FsStorage;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

fn fixture() -> (TempDir, DocsConfig) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write(root, "README.md", "# Oh My Note\n\nWelcome.\n");
    write(root, "CHANGELOG.md", "# Changes\n\n## 0.1.0\n");
    write(
        root,
        "docs/frontend/git.md",
        "# Git Basics\n\n## Setup\n\n### Config File\n\n## Setup\n\n```js\nconsole.log(1)\n```\n",
    );
    write(root, "docs/frontend/tools/vim.md", "Plain notes.\n");
    write(root, "docs/frontend/tools/.DS_Store", "");
    write(root, "docs/frontend/My Page.md", "# My Page\n\n## Part One\n");
    write(root, "docs/backend/go.md", "# Go\n");
    write(root, "docs/backend/.drafts/wip.md", "# WIP\n");
    fs::create_dir_all(root.join("docs/empty")).unwrap();

    let config = DocsConfig {
        source_dir: root.join("docs"),
        root_dir: root.to_path_buf(),
        project_dir: root.join(".omn"),
        suffix: ".md".to_owned(),
        cache_enabled: true,
    };
    (tmp, config)
}

#[test]
fn every_route_resolves_and_strategies_agree() {
    let (_tmp, config) = fixture();
    let site = Site::from_config(&config, "test");
    let storage = FsStorage::new(config.source_dir.clone());

    let categories = site.categories().unwrap();
    assert_eq!(categories, vec!["backend", "empty", "frontend"]);

    let mut total = 0;
    for category in &categories {
        let routes = site.routes(category).unwrap();
        assert_eq!(routes, routes_by_walk(&storage, category, ".md").unwrap());

        for route in routes {
            let segments: Vec<&str> = route.iter().map(String::as_str).collect();
            let page = site.render_doc(category, &segments).unwrap();
            assert_eq!(page.breadcrumb.first(), Some(category));
            total += 1;
        }
    }
    assert_eq!(total, 4);
}

#[test]
fn rendered_heading_ids_match_toc() {
    let (_tmp, config) = fixture();
    let site = Site::from_config(&config, "test");

    let page = site.render_doc("frontend", &["git"]).unwrap();

    let ids: Vec<&str> = page.toc.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["Setup", "ConfigFile", "Setup-1"]);
    for heading in &page.toc {
        assert!(page.html.contains(&format!("id=\"{}\"", heading.id)));
    }
    let source = fs::read_to_string(config.source_dir.join("frontend/git.md")).unwrap();
    assert_eq!(page.toc, extract_headings(&source, &[2, 3]));
    assert!(page.html.contains("data-action=\"run\""));
}

#[test]
fn encoded_segments_and_fallback_breadcrumbs() {
    let (_tmp, config) = fixture();
    let site = Site::from_config(&config, "test");

    let page = site.render_doc("frontend", &["My%20Page"]).unwrap();
    assert_eq!(page.breadcrumb, vec!["frontend", "My Page"]);

    let page = site.render_doc("frontend", &["tools", "vim"]).unwrap();
    assert_eq!(page.breadcrumb, vec!["frontend", "tools", "vim"]);
    assert!(page.toc.is_empty());
}

#[test]
fn missing_routes_are_not_found() {
    let (_tmp, config) = fixture();
    let site = Site::from_config(&config, "test");

    assert!(matches!(
        site.render_doc("frontend", &["does-not-exist"]),
        Err(SiteError::PageNotFound(_))
    ));
    assert!(matches!(
        site.render_doc("nowhere", &["git"]),
        Err(SiteError::CategoryNotFound(_))
    ));
    assert!(site.render_doc("frontend", &["..", "..", "README"]).is_err());
    assert!(matches!(
        site.render_doc("backend", &[".drafts", "wip"]),
        Err(SiteError::PageNotFound(_))
    ));
}

#[test]
fn hidden_entries_stay_out_of_navigation() {
    let (_tmp, config) = fixture();
    let site = Site::from_config(&config, "test");

    let tree = site.navigation("backend").unwrap();
    assert_eq!(tree.leaf_count(), 1);
    assert!(site.navigation("empty").unwrap().first_leaf().is_none());
}

#[test]
fn second_render_comes_from_cache() {
    let (tmp, config) = fixture();
    let site = Site::from_config(&config, "test");

    assert!(!site.render_doc("backend", &["go"]).unwrap().from_cache);
    assert!(site.render_doc("backend", &["go"]).unwrap().from_cache);
    assert!(tmp.path().join(".omn/cache/pages/backend/go.entry").exists());

    let reopened = Site::from_config(&config, "next");
    assert!(!reopened.render_doc("backend", &["go"]).unwrap().from_cache);
}

#[test]
fn home_and_changelog() {
    let (_tmp, config) = fixture();
    let site = Site::from_config(&config, "test");

    assert_eq!(site.render_home().unwrap().title, "Oh My Note");
    assert_eq!(site.render_changelog().unwrap().toc[0].id, "0.1.0");
}
