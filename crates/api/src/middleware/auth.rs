//! Session-based authentication extractor for Axum handlers.

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use taskboard_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::auth::session::token_from_headers;
use crate::error::AppError;
use crate::middleware::mode::RenderMode;
use crate::state::AppState;

/// Authenticated user extracted from the session cookie (or a Bearer token).
///
/// Every project and task handler takes this as a parameter; the id is the
/// owner scope passed down to the repositories:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Html<String>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     todo!()
/// }
/// ```
///
/// A missing, expired or forged token rejects with
/// [`AppError::Unauthenticated`], which redirects to the login page with the
/// requested path as `next`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = token_from_headers(&parts.headers)
            .and_then(|token| validate_token(&token, &state.config.jwt).ok());

        match claims {
            Some(claims) => Ok(AuthUser {
                user_id: claims.sub,
            }),
            None => Err(AppError::Unauthenticated {
                next: requested_path(parts),
                partial: RenderMode::from_headers(&parts.headers).is_partial(),
            }),
        }
    }
}

/// The path (and query) the client asked for, before any routing rewrites.
fn requested_path(parts: &Parts) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);
    uri.path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| uri.path().to_owned())
}
