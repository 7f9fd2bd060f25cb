//! Static site builder.
//!
//! Output layout mirrors the server routes:
//!
//! ```text
//! index.html                         home (README)
//! change-log/index.html              change log
//! docs/<category>/index.html         redirect to the first document
//! docs/<category>/<slug...>/index.html
//! 404.html
//! assets/omn.css, assets/omn.js
//! ```

use std::fmt::Write;
use std::path::{Path, PathBuf};

use omn_config::Config;
use omn_site::{
    PageView, ShellContext, Site, SiteError, doc_href, encode_segment, render_not_found,
    render_page,
};
use rayon::prelude::*;

/// URL prefix of the copied assets.
const ASSET_BASE: &str = "/assets";

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The docs root could not be listed or a category walk failed.
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Asset missing from the bundle: {0}")]
    MissingAsset(String),
}

/// Outcome of a build.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Pages written, redirects and the not-found page included.
    pub pages: usize,
    /// Pages that failed to render and were skipped.
    pub failed: usize,
    /// Asset files copied.
    pub assets: usize,
}

enum Job {
    Home,
    Changelog,
    Doc { category: String, route: Vec<String> },
}

impl Job {
    fn describe(&self) -> String {
        match self {
            Self::Home => "home".to_owned(),
            Self::Changelog => "change log".to_owned(),
            Self::Doc { category, route } => format!("{category}/{}", route.join("/")),
        }
    }

    fn output_path(&self, output_dir: &Path) -> PathBuf {
        match self {
            Self::Home => output_dir.join("index.html"),
            Self::Changelog => output_dir.join("change-log").join("index.html"),
            Self::Doc { category, route } => {
                let mut path = output_dir.join("docs").join(category);
                path.extend(route);
                path.join("index.html")
            }
        }
    }
}

/// Builds a static documentation site.
pub struct StaticSiteBuilder<'a> {
    site: &'a Site,
    config: &'a Config,
}

impl<'a> StaticSiteBuilder<'a> {
    #[must_use]
    pub fn new(site: &'a Site, config: &'a Config) -> Self {
        Self { site, config }
    }

    /// Render the whole site into `output_dir`.
    ///
    /// Documents render in parallel. A document that fails to render is
    /// logged and counted in [`BuildReport::failed`]; a docs root that
    /// can't be listed or a failed write aborts the build.
    pub fn build(&self, output_dir: &Path) -> Result<BuildReport, BuildError> {
        let categories = self.site.categories()?;
        let shell = ShellContext {
            site: &self.config.site,
            search: self.config.search.as_ref(),
            auth: self.config.auth.as_ref(),
            signed_in: false,
            categories: &categories,
            asset_base: ASSET_BASE,
        };

        let mut jobs = vec![Job::Home, Job::Changelog];
        let mut report = BuildReport::default();

        for category in &categories {
            let tree = self.site.navigation(&encode_segment(category))?;
            if let Some(first) = tree.first_leaf() {
                let path = output_dir.join("docs").join(category).join("index.html");
                write_file(&path, &redirect_page(&doc_href(first.key())))?;
                report.pages += 1;
            }
            for route in self.site.routes(&encode_segment(category))? {
                jobs.push(Job::Doc {
                    category: category.clone(),
                    route,
                });
            }
        }

        let results: Vec<Result<bool, BuildError>> = jobs
            .par_iter()
            .map(|job| self.build_page(job, &shell, output_dir))
            .collect();
        for result in results {
            if result? {
                report.pages += 1;
            } else {
                report.failed += 1;
            }
        }

        write_file(
            &output_dir.join("404.html"),
            &render_not_found("Page not found", &shell),
        )?;
        report.pages += 1;

        report.assets = copy_assets(&output_dir.join("assets"))?;

        tracing::info!(
            pages = report.pages,
            failed = report.failed,
            assets = report.assets,
            output = %output_dir.display(),
            "Static site built"
        );
        Ok(report)
    }

    /// Render and write one page. `Ok(false)` when it failed to render.
    fn build_page(&self, job: &Job, shell: &ShellContext<'_>, output_dir: &Path) -> Result<bool, BuildError> {
        match self.render(job) {
            Ok(view) => {
                write_file(&job.output_path(output_dir), &render_page(&view, shell))?;
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(page = %job.describe(), error = %err, "Skipping page");
                Ok(false)
            }
        }
    }

    fn render(&self, job: &Job) -> Result<PageView, SiteError> {
        match job {
            Job::Home => self.site.render_home(),
            Job::Changelog => self.site.render_changelog(),
            Job::Doc { category, route } => {
                let encoded: Vec<String> = route.iter().map(|s| encode_segment(s)).collect();
                let segments: Vec<&str> = encoded.iter().map(String::as_str).collect();
                self.site.render_doc(&encode_segment(category), &segments)
            }
        }
    }
}

fn redirect_page(href: &str) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(html, "<meta http-equiv=\"refresh\" content=\"0; url={href}\">").unwrap();
    writeln!(html, "<link rel=\"canonical\" href=\"{href}\">").unwrap();
    html.push_str("</head>\n<body>\n");
    writeln!(html, "<p><a href=\"{href}\">Continue</a></p>").unwrap();
    html.push_str("</body>\n</html>\n");
    html
}

fn copy_assets(dir: &Path) -> Result<usize, BuildError> {
    let paths = omn_assets::iter();
    for path in &paths {
        let content = omn_assets::get(path).ok_or_else(|| BuildError::MissingAsset(path.clone()))?;
        write_file(&dir.join(path), &content)?;
    }
    Ok(paths.len())
}

fn write_file(path: &Path, content: impl AsRef<[u8]>) -> Result<(), BuildError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    };
    write().map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })
}
