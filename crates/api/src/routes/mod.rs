pub mod accounts;
pub mod health;
pub mod project;
pub mod task;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;

use crate::render::PROJECTS_PATH;
use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                                           -> redirect to /projects/
///
/// /projects/                                  list
/// /projects/create/                           create (GET form, POST)
/// /projects/update/{id}/                      update (GET form, POST)
/// /projects/delete/{id}/                      delete (POST)
///
/// /projects/{project_id}/task/create/         create (GET form, POST)
/// /projects/task/update/{id}/                 update (GET form, POST)
/// /projects/task/completed/{id}/              toggle completion (POST, htmx)
/// /projects/task/priority/{id}/               adjust priority (POST, htmx)
/// /projects/task/delete/{id}/                 delete (POST)
///
/// /accounts/login/                            login (public)
/// /accounts/signup/                           signup (public)
/// /accounts/logout/                           logout (POST)
/// /accounts/password/change/                  password change (requires auth)
/// ```
///
/// Paths keep their trailing slash, so resources are mounted flat rather
/// than nested.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to(PROJECTS_PATH) }))
        .merge(project::router())
        .merge(task::router())
        .merge(accounts::router())
}
