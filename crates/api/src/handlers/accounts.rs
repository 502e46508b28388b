//! Handlers for `/accounts` (signup, login, logout, password change).
//!
//! Pages are plain forms; a successful login or signup sets the session cookie
//! and sends the browser on (`303`, or `HX-Redirect` for htmx requests).

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use cookie::Cookie;
use serde::Deserialize;
use taskboard_core::accounts::{
    normalize_email, safe_next_path, LoginForm, PasswordChangeForm, SignupForm,
    DEFAULT_LOGIN_REDIRECT, INVALID_CREDENTIALS_MESSAGE,
};
use taskboard_core::error::CoreError;
use taskboard_core::forms::{FormErrors, FormInput, NON_FIELD_ERRORS};
use taskboard_core::types::DbId;
use taskboard_db::models::user::CreateUser;
use taskboard_db::repositories::UserRepo;
use tera::Context;

use crate::auth::jwt::generate_session_token;
use crate::auth::password::{hash_password, verify_against_dummy, verify_password};
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::error::{AppError, AppResult, HX_REDIRECT, LOGIN_PATH};
use crate::middleware::auth::AuthUser;
use crate::middleware::mode::RenderMode;
use crate::render::{
    page_context, render_page, Templates, LOGIN_PAGE, PASSWORD_CHANGE_PAGE, SIGNUP_PAGE,
};
use crate::state::AppState;

const EMAIL_TAKEN_MESSAGE: &str = "A user with that email already exists.";
const WRONG_OLD_PASSWORD_MESSAGE: &str =
    "Your old password was entered incorrectly. Please enter it again.";

/// Query string of `GET /accounts/login/`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub next: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Send the client to `location`, attaching `cookie`.
fn redirect_with_cookie(mode: RenderMode, location: &str, cookie: Cookie<'static>) -> Response {
    let set_cookie = [(SET_COOKIE, cookie.to_string())];
    match mode {
        RenderMode::Partial => (
            StatusCode::OK,
            set_cookie,
            [(HX_REDIRECT, location.to_string())],
        )
            .into_response(),
        RenderMode::Full => (set_cookie, Redirect::to(location)).into_response(),
    }
}

/// Issue a session for `user_id` and redirect to `location`.
fn start_session(
    state: &AppState,
    mode: RenderMode,
    user_id: DbId,
    location: &str,
) -> AppResult<Response> {
    let token = generate_session_token(user_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let cookie = session_cookie(&token, &state.config);
    Ok(redirect_with_cookie(mode, location, cookie))
}

/// Re-render a page with its errors and `422`.
fn invalid_page(templates: &Templates, template: &str, context: &Context) -> AppResult<Response> {
    let page = render_page(templates, template, context)?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

fn login_context(email: &str, next: &str, errors: &FormErrors) -> Context {
    let mut context = page_context(false);
    context.insert("email", email);
    context.insert("next", next);
    context.insert("errors", errors);
    context
}

fn signup_context(email: &str, errors: &FormErrors) -> Context {
    let mut context = page_context(false);
    context.insert("email", email);
    context.insert("errors", errors);
    context
}

// ---------------------------------------------------------------------------
// Login / logout
// ---------------------------------------------------------------------------

/// GET /accounts/login/
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> AppResult<Response> {
    let next = query.next.as_deref().unwrap_or_default();
    let context = login_context("", next, &FormErrors::default());
    Ok(render_page(&state.templates, LOGIN_PAGE, &context)?.into_response())
}

/// POST /accounts/login/
///
/// Unknown email and wrong password produce the same error and take the
/// same time.
pub async fn login(
    State(state): State<AppState>,
    mode: RenderMode,
    Form(mut form): Form<LoginForm>,
) -> AppResult<Response> {
    form.email = normalize_email(&form.email);
    let email = form.email.clone();
    let next = form.next.clone().unwrap_or_default();

    if let Err(errors) = form.check() {
        let context = login_context(&email, &next, &errors);
        return invalid_page(&state.templates, LOGIN_PAGE, &context);
    }

    let user = UserRepo::find_by_email(&state.pool, &email).await?;
    let authenticated = match &user {
        Some(user) => verify_password(&form.password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?,
        None => {
            verify_against_dummy(&form.password);
            false
        }
    };

    let Some(user) = user.filter(|_| authenticated) else {
        tracing::info!(email = %email, "Failed login attempt");
        let errors = FormErrors::single(NON_FIELD_ERRORS, INVALID_CREDENTIALS_MESSAGE);
        let context = login_context(&email, &next, &errors);
        return invalid_page(&state.templates, LOGIN_PAGE, &context);
    };

    tracing::info!(user_id = user.id, "User logged in");
    start_session(&state, mode, user.id, safe_next_path(Some(&next)))
}

/// POST /accounts/logout/
pub async fn logout(State(state): State<AppState>, mode: RenderMode) -> Response {
    redirect_with_cookie(mode, LOGIN_PATH, clear_session_cookie(&state.config))
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

/// GET /accounts/signup/
pub async fn signup_page(State(state): State<AppState>) -> AppResult<Response> {
    let context = signup_context("", &FormErrors::default());
    Ok(render_page(&state.templates, SIGNUP_PAGE, &context)?.into_response())
}

/// POST /accounts/signup/
pub async fn signup(
    State(state): State<AppState>,
    mode: RenderMode,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    let email = normalize_email(&form.email);
    let form = SignupForm {
        email: email.clone(),
        ..form
    };

    let mut errors = form.check().err().unwrap_or_default();
    if !errors.contains("email") && UserRepo::find_by_email(&state.pool, &email).await?.is_some()
    {
        errors.add("email", EMAIL_TAKEN_MESSAGE);
    }
    if !errors.is_empty() {
        let context = signup_context(&email, &errors);
        return invalid_page(&state.templates, SIGNUP_PAGE, &context);
    }

    let password_hash = hash_password(&form.password1)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    // A concurrent signup for the same email trips `uq_users_email` (409).
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            password_hash,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "User signed up");

    start_session(&state, mode, user.id, DEFAULT_LOGIN_REDIRECT)
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

/// GET /accounts/password/change/
pub async fn password_change_page(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Response> {
    let context = page_context(true);
    Ok(render_page(&state.templates, PASSWORD_CHANGE_PAGE, &context)?.into_response())
}

/// POST /accounts/password/change/
pub async fn password_change(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Form(form): Form<PasswordChangeForm>,
) -> AppResult<Response> {
    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("Account no longer exists".into()))?;

    let mut errors = form.check().err().unwrap_or_default();
    if !errors.contains("old_password") {
        let matches = verify_password(&form.old_password, &account.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !matches {
            errors.add("old_password", WRONG_OLD_PASSWORD_MESSAGE);
        }
    }
    if !errors.is_empty() {
        let mut context = page_context(true);
        context.insert("errors", &errors);
        return invalid_page(&state.templates, PASSWORD_CHANGE_PAGE, &context);
    }

    let password_hash = hash_password(&form.new_password1)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, account.id, &password_hash).await?;
    tracing::info!(user_id = account.id, "Password changed");

    // Fresh session so the cookie lifetime restarts with the new password.
    start_session(&state, mode, account.id, DEFAULT_LOGIN_REDIRECT)
}
