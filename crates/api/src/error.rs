use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use taskboard_core::error::CoreError;

/// Path of the login page that unauthenticated requests are sent to.
pub const LOGIN_PATH: &str = "/accounts/login/";

/// Response header telling htmx to perform a full client-side navigation.
pub const HX_REDIRECT: &str = "hx-redirect";

/// Characters escaped in the `next` query value. Path separators stay
/// readable.
const NEXT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce short `text/plain` error bodies, or
/// a login redirect for unauthenticated requests.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `taskboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// No valid session; the client is sent to the login page.
    #[error("Authentication required for {next}")]
    Unauthenticated {
        /// Path to return to after logging in.
        next: String,
        /// Whether the request came from htmx (fragment swap).
        partial: bool,
    },

    /// The endpoint exists but not for this kind of request.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(&'static str),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::Template(err) => {
                tracing::error!(error = ?err, "Template rendering failed");
                internal()
            }
            AppError::Unauthenticated { next, partial } => {
                return login_redirect(next, *partial);
            }
            AppError::MethodNotAllowed(msg) => {
                (StatusCode::METHOD_NOT_ALLOWED, (*msg).to_string())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        (status, message).into_response()
    }
}

/// Build the login URL carrying `next` as the return path.
pub fn login_url(next: &str) -> String {
    format!(
        "{LOGIN_PATH}?next={}",
        utf8_percent_encode(next, NEXT_ENCODE_SET)
    )
}

/// Full navigation gets a `303`; htmx gets a `401` plus `HX-Redirect` so the
/// browser navigates instead of swapping the login page into a fragment.
fn login_redirect(next: &str, partial: bool) -> Response {
    let url = login_url(next);
    if partial {
        (
            StatusCode::UNAUTHORIZED,
            [(HX_REDIRECT, url)],
            "Authentication required",
        )
            .into_response()
    } else {
        (StatusCode::SEE_OTHER, [(LOCATION, url)]).into_response()
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
