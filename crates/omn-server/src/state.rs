//! Application state.
//!
//! Shared state for all request handlers.

use axum::http::{HeaderMap, header};
use omn_config::Config;
use omn_site::{ShellContext, Site};

/// URL prefix the shell loads `omn.css` and `omn.js` from.
pub(crate) const ASSET_BASE: &str = "/assets";

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Documentation site.
    pub(crate) site: Site,
    /// Loaded configuration.
    pub(crate) config: Config,
    /// Application version, part of every `ETag`.
    pub(crate) version: String,
}

impl AppState {
    /// Whether the request carries a non-empty session cookie.
    ///
    /// Only presence is checked: the cookie gates the search widget, nothing
    /// else, and is verified by the auth service itself.
    pub(crate) fn signed_in(&self, headers: &HeaderMap) -> bool {
        let Some(auth) = &self.config.auth else {
            return false;
        };
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .any(|(name, value)| name == auth.session_cookie && !value.is_empty())
    }

    /// Categories for the header, empty when the docs root can't be listed.
    pub(crate) fn categories(&self) -> Vec<String> {
        self.site.categories().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Failed to list categories");
            Vec::new()
        })
    }

    /// Shell context for one request.
    pub(crate) fn shell<'a>(&'a self, signed_in: bool, categories: &'a [String]) -> ShellContext<'a> {
        ShellContext {
            site: &self.config.site,
            search: self.config.search.as_ref(),
            auth: self.config.auth.as_ref(),
            signed_in,
            categories,
            asset_base: ASSET_BASE,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use axum::http::HeaderValue;
    use omn_cache::NullCache;
    use omn_config::{AuthConfig, AuthProvider};
    use omn_site::SiteOptions;
    use omn_storage::MockStorage;

    use super::*;

    fn state(auth: bool) -> AppState {
        let mut config = Config::default_with_base(Path::new("/project"));
        if auth {
            config.auth = Some(AuthConfig {
                url: "https://auth.example.com".to_owned(),
                session_cookie: "omn_session".to_owned(),
                providers: vec![AuthProvider::Github],
            });
        }
        AppState {
            site: Site::new(
                Arc::new(MockStorage::new().with_dir("frontend")),
                Arc::new(MockStorage::new()),
                SiteOptions::default(),
                &NullCache,
            ),
            config,
            version: "test".to_owned(),
        }
    }

    fn cookies(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_signed_in_with_session_cookie() {
        let state = state(true);
        assert!(state.signed_in(&cookies("theme=dark; omn_session=abc")));
        assert!(!state.signed_in(&cookies("omn_session=")));
        assert!(!state.signed_in(&cookies("other=abc")));
        assert!(!state.signed_in(&HeaderMap::new()));
    }

    #[test]
    fn test_never_signed_in_without_auth() {
        assert!(!state(false).signed_in(&cookies("omn_session=abc")));
    }

    #[test]
    fn test_categories() {
        assert_eq!(state(false).categories(), vec!["frontend".to_owned()]);
    }
}
