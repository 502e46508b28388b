//! Handlers for the `/projects` resource.
//!
//! Every handler is scoped to the authenticated owner; a project owned by
//! someone else is indistinguishable from a missing one.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Form;
use taskboard_core::error::CoreError;
use taskboard_core::forms::{FormErrors, FormInput};
use taskboard_core::projects::ProjectForm;
use taskboard_core::types::DbId;
use taskboard_db::models::project::{CreateProject, ProjectWithTasks, UpdateProject};
use taskboard_db::repositories::{ProjectRepo, TaskRepo};
use taskboard_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::mode::RenderMode;
use crate::render::{
    page_context, render_invalid, render_page, render_result, FormTarget, Fragment, Outcome,
    PROJECTS_PAGE,
};
use crate::state::AppState;

const CREATE_PATH: &str = "/projects/create/";

fn update_path(id: DbId) -> String {
    format!("/projects/update/{id}/")
}

/// New projects are appended to the list.
fn create_target() -> FormTarget {
    FormTarget::elsewhere("#project-list", "beforeend")
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// All projects of `owner_id` with their tasks, highest priority first.
pub(crate) async fn load_projects(
    pool: &DbPool,
    owner_id: DbId,
) -> AppResult<Vec<ProjectWithTasks>> {
    let projects = ProjectRepo::list_by_owner(pool, owner_id).await?;
    let tasks = TaskRepo::list_by_owner(pool, owner_id).await?;
    Ok(ProjectWithTasks::group(projects, tasks))
}

/// One owned project with its tasks, or `NotFound`.
pub(crate) async fn load_project(
    pool: &DbPool,
    id: DbId,
    owner_id: DbId,
) -> AppResult<ProjectWithTasks> {
    let project = ProjectRepo::find_owned(pool, id, owner_id)
        .await?
        .ok_or(CoreError::project_not_found(id))?;
    let tasks = TaskRepo::list_by_project(pool, id, owner_id).await?;
    Ok(ProjectWithTasks { project, tasks })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /projects/
///
/// The whole page for a navigation, the list fragment for htmx.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
) -> AppResult<Response> {
    let projects = load_projects(&state.pool, user.user_id).await?;

    match mode {
        RenderMode::Partial => render_result(
            &state.templates,
            mode,
            Outcome::Fragment(Fragment::project_list(&projects)),
        ),
        RenderMode::Full => {
            let mut context = page_context(true);
            context.insert("projects", &projects);
            Ok(render_page(&state.templates, PROJECTS_PAGE, &context)?.into_response())
        }
    }
}

/// GET /projects/create/
pub async fn create_form(
    State(state): State<AppState>,
    _user: AuthUser,
    mode: RenderMode,
) -> AppResult<Response> {
    let fragment = Fragment::project_form(
        CREATE_PATH,
        &create_target(),
        &ProjectForm::default(),
        &FormErrors::default(),
    );
    render_result(&state.templates, mode, Outcome::Fragment(fragment))
}

/// POST /projects/create/
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Form(form): Form<ProjectForm>,
) -> AppResult<Response> {
    let form = form.normalized();
    if let Err(errors) = form.check() {
        let fragment = Fragment::project_form(CREATE_PATH, &create_target(), &form, &errors);
        return render_invalid(&state.templates, fragment);
    }

    // A bare navigation POST must not pile up empty projects.
    if !mode.is_partial()
        && form.is_blank_submission()
        && state.config.empty_project_guard
        && ProjectRepo::has_empty_named(&state.pool, user.user_id).await?
    {
        tracing::debug!(user_id = user.user_id, "Empty project already exists, skipping create");
        return render_result(&state.templates, mode, Outcome::Empty);
    }

    let input = CreateProject {
        owner_id: user.user_id,
        name: form.cleaned_name(),
    };
    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.user_id, project_id = project.id, "Project created");

    let project = ProjectWithTasks {
        project,
        tasks: Vec::new(),
    };
    render_result(
        &state.templates,
        mode,
        Outcome::Fragment(Fragment::project(&project, &FormErrors::default())),
    )
}

/// GET /projects/update/{id}/
pub async fn update_form(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let project = ProjectRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or(CoreError::project_not_found(id))?;

    let fragment = Fragment::project_form(
        &update_path(id),
        &FormTarget::replace_self(),
        &ProjectForm::with_name(project.name),
        &FormErrors::default(),
    );
    render_result(&state.templates, mode, Outcome::Fragment(fragment))
}

/// POST /projects/update/{id}/
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Path(id): Path<DbId>,
    Form(form): Form<ProjectForm>,
) -> AppResult<Response> {
    ProjectRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or(CoreError::project_not_found(id))?;

    let form = form.normalized();
    if let Err(errors) = form.check() {
        let fragment =
            Fragment::project_form(&update_path(id), &FormTarget::replace_self(), &form, &errors);
        return render_invalid(&state.templates, fragment);
    }

    let input = UpdateProject {
        name: form.cleaned_name(),
    };
    let project = ProjectRepo::update(&state.pool, id, user.user_id, &input)
        .await?
        .ok_or(CoreError::project_not_found(id))?;
    tracing::info!(user_id = user.user_id, project_id = id, "Project renamed");

    render_result(
        &state.templates,
        mode,
        Outcome::Fragment(Fragment::project_title(&project)),
    )
}

/// POST /projects/delete/{id}/
///
/// Tasks go with the project through the foreign-key cascade.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    mode: RenderMode,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let deleted = ProjectRepo::delete(&state.pool, id, user.user_id).await?;
    if !deleted {
        return Err(CoreError::project_not_found(id).into());
    }
    tracing::info!(user_id = user.user_id, project_id = id, "Project deleted");

    render_result(&state.templates, mode, Outcome::Empty)
}
