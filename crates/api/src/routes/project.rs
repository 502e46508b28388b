//! Route definitions for projects.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// ```text
/// GET    /projects/                 -> list
/// GET    /projects/create/          -> create_form
/// POST   /projects/create/          -> create
/// GET    /projects/update/{id}/     -> update_form
/// POST   /projects/update/{id}/     -> update
/// POST   /projects/delete/{id}/     -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/", get(project::list))
        .route(
            "/projects/create/",
            get(project::create_form).post(project::create),
        )
        .route(
            "/projects/update/{id}/",
            get(project::update_form).post(project::update),
        )
        .route("/projects/delete/{id}/", post(project::delete))
}
