//! Security headers set on every response.

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::set_header::SetResponseHeaderLayer;

/// Content-Security-Policy header value.
///
/// Runnable snippets need `'unsafe-eval'`. The sandbox embed and its form
/// post go to codesandbox.io, and the search widget talks to Algolia.
const CSP: &str = "default-src 'self'; \
                   script-src 'self' 'unsafe-eval'; \
                   style-src 'self' 'unsafe-inline'; \
                   font-src 'self' data:; \
                   img-src 'self' data: https:; \
                   connect-src 'self' https://*.algolia.net https://*.algolianet.com; \
                   frame-src https://codesandbox.io; \
                   form-action 'self' https://codesandbox.io; \
                   frame-ancestors 'none'";

/// Header names and values, in the order the layers are stacked.
pub(crate) const SECURITY_HEADERS: [(&str, &str); 3] = [
    ("content-security-policy", CSP),
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
];

/// Layer that sets one static header, replacing any value a handler set.
pub(crate) fn header_layer(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_value() {
        assert!(CSP.contains("default-src 'self'"));
        assert!(CSP.contains("frame-src https://codesandbox.io"));
        assert!(CSP.contains("form-action 'self' https://codesandbox.io"));
        assert!(CSP.contains("frame-ancestors 'none'"));
    }

    #[test]
    fn test_headers_are_valid() {
        for (name, value) in SECURITY_HEADERS {
            assert!(HeaderName::from_lowercase(name.as_bytes()).is_ok(), "{name}");
            assert!(HeaderValue::from_str(value).is_ok(), "{name}");
        }
    }
}
