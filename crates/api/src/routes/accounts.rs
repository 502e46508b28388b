use axum::routing::{get, post};
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// ```text
/// GET    /accounts/login/             -> login_page
/// POST   /accounts/login/             -> login
/// GET    /accounts/signup/            -> signup_page
/// POST   /accounts/signup/            -> signup
/// POST   /accounts/logout/            -> logout
/// GET    /accounts/password/change/   -> password_change_page
/// POST   /accounts/password/change/   -> password_change
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts/login/",
            get(accounts::login_page).post(accounts::login),
        )
        .route(
            "/accounts/signup/",
            get(accounts::signup_page).post(accounts::signup),
        )
        .route("/accounts/logout/", post(accounts::logout))
        .route(
            "/accounts/password/change/",
            get(accounts::password_change_page).post(accounts::password_change),
        )
}
