//! The session cookie carrying the signed session token.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

use crate::config::ServerConfig;

/// Name of the cookie holding the session JWT.
pub const SESSION_COOKIE: &str = "taskboard_session";

/// Build the `Set-Cookie` value that starts a session.
pub fn session_cookie(token: &str, config: &ServerConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(Duration::seconds(config.jwt.expiry_secs()))
        .build()
}

/// Build the `Set-Cookie` value that ends a session.
pub fn clear_session_cookie(config: &ServerConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .build();
    cookie.make_removal();
    cookie
}

/// Find the session token in a request.
///
/// The session cookie wins; `Authorization: Bearer <jwt>` is accepted for
/// non-browser clients.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_owned());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
    })
}
