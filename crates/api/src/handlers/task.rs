//! Handlers for tasks.
//!
//! A task is owned through its project: every lookup joins the parent project
//! and filters on the authenticated owner.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Form;
use chrono::Utc;
use taskboard_core::error::CoreError;
use taskboard_core::forms::{FormErrors, FormInput};
use taskboard_core::tasks::{
    default_deadline, PriorityForm, TaskForm, PRIORITY_MAXIMUM_MESSAGE, PRIORITY_MINIMUM_MESSAGE,
};
use taskboard_core::types::DbId;
use taskboard_db::models::task::{CreateTask, UpdateTask};
use taskboard_db::repositories::{ProjectRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::project::load_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::mode::RenderMode;
use crate::render::{render_invalid, render_result, FormTarget, Fragment, Outcome};
use crate::state::AppState;

const PARTIAL_ONLY: &str = "This action is only available from the project page";

fn create_path(project_id: DbId) -> String {
    format!("/projects/{project_id}/task/create/")
}

fn update_path(id: DbId) -> String {
    format!("/projects/task/update/{id}/")
}

/// New tasks refresh the project's task list.
fn create_target(project_id: DbId) -> FormTarget {
    FormTarget::elsewhere(format!("#task-list-{project_id}"), "innerHTML")
}

fn require_partial(mode: RenderMode) -> AppResult<()> {
    if mode.is_partial() {
        Ok(())
    } else {
        Err(AppError::MethodNotAllowed(PARTIAL_ONLY))
    }
}

// ---------------------------------------------------------------------------
// Create / update
// ---------------------------------------------------------------------------

/// GET /projects/{project_id}/task/create/
pub async fn create_form(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Path(project_id): Path<DbId>,
) -> AppResult<Response> {
    ProjectRepo::find_owned(&state.pool, project_id, user.user_id)
        .await?
        .ok_or(CoreError::project_not_found(project_id))?;

    let today = Utc::now().date_naive();
    let form = TaskForm::new("", Some(default_deadline(today)));
    let fragment = Fragment::task_form(
        &create_path(project_id),
        &create_target(project_id),
        &form,
        &FormErrors::default(),
    );
    render_result(&state.templates, mode, Outcome::Fragment(fragment))
}

/// POST /projects/{project_id}/task/create/
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Path(project_id): Path<DbId>,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    ProjectRepo::find_owned(&state.pool, project_id, user.user_id)
        .await?
        .ok_or(CoreError::project_not_found(project_id))?;

    let form = form.normalized();
    if let Err(errors) = form.check() {
        let fragment = Fragment::task_form(
            &create_path(project_id),
            &create_target(project_id),
            &form,
            &errors,
        );
        return render_invalid(&state.templates, fragment);
    }

    let today = Utc::now().date_naive();
    let input = CreateTask {
        project_id,
        deadline: form.deadline().unwrap_or_else(|| default_deadline(today)),
        content: form.content,
    };
    // The insert is owner-scoped too; `None` means the project vanished.
    let task = TaskRepo::create(&state.pool, user.user_id, &input)
        .await?
        .ok_or(CoreError::project_not_found(project_id))?;
    tracing::info!(
        user_id = user.user_id,
        project_id,
        task_id = task.id,
        "Task created"
    );

    let project = load_project(&state.pool, project_id, user.user_id).await?;
    render_result(
        &state.templates,
        mode,
        Outcome::Fragment(Fragment::task_list(&project)),
    )
}

/// GET /projects/task/update/{id}/
pub async fn update_form(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let task = TaskRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or(CoreError::task_not_found(id))?;

    let form = TaskForm::new(task.content, Some(task.deadline));
    let fragment = Fragment::task_form(
        &update_path(id),
        &FormTarget::replace_self(),
        &form,
        &FormErrors::default(),
    );
    render_result(&state.templates, mode, Outcome::Fragment(fragment))
}

/// POST /projects/task/update/{id}/
///
/// A blank deadline keeps the stored one.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Path(id): Path<DbId>,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    TaskRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or(CoreError::task_not_found(id))?;

    let form = form.normalized();
    if let Err(errors) = form.check() {
        let fragment =
            Fragment::task_form(&update_path(id), &FormTarget::replace_self(), &form, &errors);
        return render_invalid(&state.templates, fragment);
    }

    let input = UpdateTask {
        deadline: form.deadline(),
        content: form.content,
    };
    let task = TaskRepo::update(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or(CoreError::task_not_found(id))?;
    tracing::info!(
        user_id = user.user_id,
        project_id = task.project_id,
        task_id = id,
        "Task updated"
    );

    render_result(&state.templates, mode, Outcome::Fragment(Fragment::task(&task)))
}

// ---------------------------------------------------------------------------
// In-place actions (htmx only)
// ---------------------------------------------------------------------------

/// POST /projects/task/completed/{id}/
pub async fn toggle_completed(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    require_partial(mode)?;

    let task = TaskRepo::toggle_completed(&state.pool, id, user.user_id)
        .await?
        .ok_or(CoreError::task_not_found(id))?;
    tracing::info!(
        user_id = user.user_id,
        task_id = id,
        status = ?task.status(),
        "Task completion toggled"
    );

    render_result(&state.templates, mode, Outcome::Empty)
}

/// POST /projects/task/priority/{id}/
///
/// `priority` carries a +1/-1 delta. The bounds are checked against the
/// stored value, then enforced again by the conditional update so that
/// concurrent adjustments cannot overshoot.
pub async fn adjust_priority(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Path(id): Path<DbId>,
    Form(form): Form<PriorityForm>,
) -> AppResult<Response> {
    require_partial(mode)?;

    let task = TaskRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or(CoreError::task_not_found(id))?;

    let delta = match form.check_against(task.priority) {
        Ok(delta) => delta,
        Err(errors) => {
            let project = load_project(&state.pool, task.project_id, user.user_id).await?;
            return render_invalid(&state.templates, Fragment::project(&project, &errors));
        }
    };

    let Some(updated) = TaskRepo::adjust_priority(&state.pool, id, user.user_id, delta).await?
    else {
        // Lost a race: another adjustment reached the bound first, or the
        // task was deleted in between.
        let current = TaskRepo::find_owned(&state.pool, id, user.user_id)
            .await?
            .ok_or(CoreError::task_not_found(id))?;
        let errors = form
            .check_against(current.priority)
            .err()
            .unwrap_or_else(|| FormErrors::single("priority", bound_message(delta)));
        let project = load_project(&state.pool, current.project_id, user.user_id).await?;
        return render_invalid(&state.templates, Fragment::project(&project, &errors));
    };
    tracing::info!(
        user_id = user.user_id,
        project_id = updated.project_id,
        task_id = id,
        priority = updated.priority,
        "Task priority adjusted"
    );

    let project = load_project(&state.pool, updated.project_id, user.user_id).await?;
    render_result(
        &state.templates,
        mode,
        Outcome::Fragment(Fragment::project(&project, &FormErrors::default())),
    )
}

fn bound_message(delta: i32) -> &'static str {
    if delta > 0 {
        PRIORITY_MAXIMUM_MESSAGE
    } else {
        PRIORITY_MINIMUM_MESSAGE
    }
}

/// POST /projects/task/delete/{id}/
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let deleted = TaskRepo::delete(&state.pool, id, user.user_id).await?;
    if !deleted {
        return Err(CoreError::task_not_found(id).into());
    }
    tracing::info!(user_id = user.user_id, task_id = id, "Task deleted");

    render_result(&state.templates, mode, Outcome::Empty)
}
