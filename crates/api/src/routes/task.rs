//! Route definitions for tasks.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::task;
use crate::state::AppState;

/// ```text
/// GET    /projects/{project_id}/task/create/   -> create_form
/// POST   /projects/{project_id}/task/create/   -> create
/// GET    /projects/task/update/{id}/           -> update_form
/// POST   /projects/task/update/{id}/           -> update
/// POST   /projects/task/completed/{id}/        -> toggle_completed
/// POST   /projects/task/priority/{id}/         -> adjust_priority
/// POST   /projects/task/delete/{id}/           -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/task/create/",
            get(task::create_form).post(task::create),
        )
        .route(
            "/projects/task/update/{id}/",
            get(task::update_form).post(task::update),
        )
        .route(
            "/projects/task/completed/{id}/",
            post(task::toggle_completed),
        )
        .route("/projects/task/priority/{id}/", post(task::adjust_priority))
        .route("/projects/task/delete/{id}/", post(task::delete))
}
