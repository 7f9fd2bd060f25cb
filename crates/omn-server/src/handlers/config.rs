//! Configuration API endpoint.
//!
//! Returns the client-side view of the configuration. Search settings are
//! only included for signed-in visitors, the same rule the shell applies.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use omn_config::{AuthConfig, NavLink, SearchConfig};
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/config.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigResponse {
    brand: String,
    description: String,
    navigation: Vec<NavLink>,
    categories: Vec<String>,
    signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<SearchResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth: Option<AuthResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    app_id: String,
    api_key: String,
    index_name: String,
}

impl From<&SearchConfig> for SearchResponse {
    fn from(search: &SearchConfig) -> Self {
        Self {
            app_id: search.app_id.clone(),
            api_key: search.api_key.clone(),
            index_name: search.index_name.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    providers: Vec<ProviderResponse>,
    signout_url: String,
}

#[derive(Serialize)]
struct ProviderResponse {
    id: &'static str,
    label: &'static str,
    url: String,
}

impl From<&AuthConfig> for AuthResponse {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            providers: auth
                .providers
                .iter()
                .map(|&provider| ProviderResponse {
                    id: provider.id(),
                    label: provider.label(),
                    url: auth.signin_url(provider),
                })
                .collect(),
            signout_url: auth.signout_url(),
        }
    }
}

/// Handle GET /api/config.
pub(crate) async fn get_config(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<ConfigResponse> {
    let signed_in = state.signed_in(&headers);
    let config = &state.config;
    Json(ConfigResponse {
        brand: config.site.brand.clone(),
        description: config.site.description.clone(),
        navigation: config.site.navigation.clone(),
        categories: state.categories(),
        signed_in,
        search: config
            .search
            .as_ref()
            .filter(|_| signed_in)
            .map(SearchResponse::from),
        auth: config.auth.as_ref().map(AuthResponse::from),
    })
}
