//! Configuration for the omn documentation site.
//!
//! Reads `omn.toml` with serde, searching the current directory and its
//! parents when no explicit path is given. Command-line overrides are applied
//! on top through [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` expands to the value of VAR and errors if it is unset
//! - `${VAR:-default}` falls back to `default` when VAR is unset
//!
//! Expanded fields: `server.host`, `search.app_id`, `search.api_key`,
//! `search.index_name` and `auth.url`.

mod expand;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Values from the command line that take precedence over the file.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override docs root directory.
    pub source_dir: Option<PathBuf>,
    /// Override page cache flag.
    pub cache_enabled: Option<bool>,
}

const CONFIG_FILENAME: &str = "omn.toml";
const PROJECT_DIRNAME: &str = ".omn";
const DEFAULT_SUFFIX: &str = ".md";
const DEFAULT_SESSION_COOKIE: &str = "omn_session";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    #[serde(default)]
    docs: DocsConfigRaw,
    /// Branding and header links.
    pub site: SiteConfig,
    /// Hosted search widget settings. Absent means no search box.
    pub search: Option<SearchConfig>,
    /// Sign-in provider settings. Absent means nobody can sign in.
    pub auth: Option<AuthConfig>,

    /// Docs settings with paths resolved against the config directory.
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path of the loaded file, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    suffix: Option<String>,
    cache_enabled: Option<bool>,
}

/// Resolved documentation layout.
#[derive(Debug, Default, Clone)]
pub struct DocsConfig {
    /// Root of the category directories (`<docsRoot>`).
    pub source_dir: PathBuf,
    /// Directory holding `README` and `CHANGELOG` documents.
    pub root_dir: PathBuf,
    /// Directory for generated data (`.omn/`).
    pub project_dir: PathBuf,
    /// Markdown file extension including the leading dot.
    pub suffix: String,
    /// Whether rendered pages are cached on disk.
    pub cache_enabled: bool,
}

impl DocsConfig {
    /// Cache directory path (`.omn/cache/`).
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.project_dir.join("cache")
    }

    /// Home page document.
    #[must_use]
    pub fn readme_path(&self) -> PathBuf {
        self.root_dir.join(format!("README{}", self.suffix))
    }

    /// Change log document.
    #[must_use]
    pub fn changelog_path(&self) -> PathBuf {
        self.root_dir.join(format!("CHANGELOG{}", self.suffix))
    }
}

/// A link in the site header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NavLink {
    pub title: String,
    pub path: String,
}

/// Branding and header navigation.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Name shown in the header and page titles.
    pub brand: String,
    /// Meta description.
    pub description: String,
    /// Header links, in display order.
    pub navigation: Vec<NavLink>,
    /// Repository link shown as an icon.
    pub github: Option<String>,
    /// Package registry link shown as an icon.
    pub npm: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            brand: "Oh-My-Note".to_owned(),
            description: "Notes and documentation".to_owned(),
            navigation: vec![NavLink {
                title: "CHANGELOG".to_owned(),
                path: "/change-log".to_owned(),
            }],
            github: None,
            npm: None,
        }
    }
}

/// Hosted search credentials. Passed through to the browser widget only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub app_id: String,
    pub api_key: String,
    pub index_name: String,
}

impl SearchConfig {
    /// Check every field is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.app_id, "search.app_id")?;
        require_non_empty(&self.api_key, "search.api_key")?;
        require_non_empty(&self.index_name, "search.index_name")?;
        Ok(())
    }
}

/// Supported sign-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Github,
    Google,
}

impl AuthProvider {
    /// Path segment and display id.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Google => "google",
        }
    }

    /// Button label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Github => "GitHub",
            Self::Google => "Google",
        }
    }
}

/// External authentication service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the auth service. Sign-in lives at `{url}/signin/{provider}`.
    pub url: String,
    /// Cookie whose presence marks a signed-in visitor.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    #[serde(default = "default_providers")]
    pub providers: Vec<AuthProvider>,
}

impl AuthConfig {
    /// Sign-in URL for a provider.
    #[must_use]
    pub fn signin_url(&self, provider: AuthProvider) -> String {
        format!("{}/signin/{}", self.url.trim_end_matches('/'), provider.id())
    }

    /// Sign-out URL.
    #[must_use]
    pub fn signout_url(&self) -> String {
        format!("{}/signout", self.url.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.url, "auth.url")?;
        require_http_url(&self.url, "auth.url")?;
        require_non_empty(&self.session_cookie, "auth.session_cookie")?;
        if self.providers.is_empty() {
            return Err(ConfigError::Validation(
                "auth.providers cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_session_cookie() -> String {
    DEFAULT_SESSION_COOKIE.to_owned()
}

fn default_providers() -> Vec<AuthProvider> {
    vec![AuthProvider::Github, AuthProvider::Google]
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// A `${VAR}` reference had no value.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration, then apply CLI overrides.
    ///
    /// With an explicit `config_path` the file must exist. Otherwise `omn.toml`
    /// is looked up from the working directory upwards, and defaults rooted at
    /// the working directory are used when none is found.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(found) = Self::discover_config() {
            Self::load_from_file(&found)?
        } else {
            Self::default_with_base(&std::env::current_dir().unwrap_or_default())
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.docs_resolved.cache_enabled = cache_enabled;
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Defaults with every path rooted at `base`.
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            site: SiteConfig::default(),
            search: None,
            auth: None,
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                root_dir: base.to_path_buf(),
                project_dir: base.join(PROJECT_DIRNAME),
                suffix: DEFAULT_SUFFIX.to_owned(),
                cache_enabled: true,
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate loaded values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        let suffix = &self.docs_resolved.suffix;
        if suffix.len() < 2 || !suffix.starts_with('.') || suffix.contains('/') {
            return Err(ConfigError::Validation(format!(
                "docs.suffix must look like \".md\", got {suffix:?}"
            )));
        }

        require_non_empty(&self.site.brand, "site.brand")?;

        if let Some(search) = &self.search {
            search.validate()?;
        }
        if let Some(auth) = &self.auth {
            auth.validate()?;
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(search) = &mut self.search {
            search.app_id = expand::expand_env(&search.app_id, "search.app_id")?;
            search.api_key = expand::expand_env(&search.api_key, "search.api_key")?;
            search.index_name = expand::expand_env(&search.index_name, "search.index_name")?;
        }

        if let Some(auth) = &mut self.auth {
            auth.url = expand::expand_env(&auth.url, "auth.url")?;
        }

        expand::expand_opt(&mut self.site.github, "site.github")?;
        expand::expand_opt(&mut self.site.npm, "site.npm")?;

        Ok(())
    }

    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs")),
            root_dir: config_dir.to_path_buf(),
            project_dir: config_dir.join(PROJECT_DIRNAME),
            suffix: self
                .docs
                .suffix
                .clone()
                .unwrap_or_else(|| DEFAULT_SUFFIX.to_owned()),
            cache_enabled: self.docs.cache_enabled.unwrap_or(true),
        };
    }
}
