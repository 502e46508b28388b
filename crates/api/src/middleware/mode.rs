//! Partial-update vs full-navigation detection.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Header htmx sets on every request it issues.
pub const HX_REQUEST: &str = "hx-request";

/// Header htmx sets on boosted links and forms, which expect whole pages.
pub const HX_BOOSTED: &str = "hx-boosted";

/// How the response to a request should be shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// An htmx request swapping part of the page: answer with a fragment.
    Partial,
    /// An ordinary browser navigation: answer with a page or a redirect.
    Full,
}

impl RenderMode {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let is_htmx = headers
            .get(HX_REQUEST)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        if is_htmx && !headers.contains_key(HX_BOOSTED) {
            RenderMode::Partial
        } else {
            RenderMode::Full
        }
    }

    pub fn is_partial(self) -> bool {
        self == RenderMode::Partial
    }
}

impl<S> FromRequestParts<S> for RenderMode
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RenderMode::from_headers(&parts.headers))
    }
}
