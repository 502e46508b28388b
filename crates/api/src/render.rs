//! Template rendering and the fragment-vs-redirect response policy.
//!
//! Every project and task handler ends in [`render_result`]: an htmx request
//! gets the fragment (or an empty body), a full navigation gets a `303` back
//! to the project list. Invalid submissions go through [`render_invalid`]
//! instead and are answered with the re-rendered fragment and `422`.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Serialize;
use taskboard_core::forms::FormErrors;
use taskboard_core::projects::ProjectForm;
use taskboard_core::tasks::TaskForm;
use taskboard_db::models::project::{Project, ProjectWithTasks};
use taskboard_db::models::task::Task;
use tera::{Context, Tera};

use crate::error::AppResult;
use crate::middleware::mode::RenderMode;

/// Where full-navigation requests land after a successful operation.
pub const PROJECTS_PATH: &str = "/projects/";

const HX_RETARGET: &str = "hx-retarget";
const HX_RESWAP: &str = "hx-reswap";

// ---------------------------------------------------------------------------
// Template names
// ---------------------------------------------------------------------------

pub const BASE_PAGE: &str = "base.html";
pub const PROJECTS_PAGE: &str = "projects/index.html";
pub const LOGIN_PAGE: &str = "accounts/login.html";
pub const SIGNUP_PAGE: &str = "accounts/signup.html";
pub const PASSWORD_CHANGE_PAGE: &str = "accounts/password_change.html";

pub const PROJECT_FRAGMENT: &str = "fragments/project.html";
pub const PROJECT_LIST_FRAGMENT: &str = "fragments/project_list.html";
pub const PROJECT_TITLE_FRAGMENT: &str = "fragments/project_title.html";
pub const PROJECT_FORM_FRAGMENT: &str = "fragments/project_form.html";
pub const TASK_LIST_FRAGMENT: &str = "fragments/task_list.html";
pub const TASK_FRAGMENT: &str = "fragments/task.html";
pub const TASK_FORM_FRAGMENT: &str = "fragments/task_form.html";

/// All templates, compiled into the binary.
const SOURCES: [(&str, &str); 12] = [
    (BASE_PAGE, include_str!("../templates/base.html")),
    (PROJECTS_PAGE, include_str!("../templates/projects/index.html")),
    (LOGIN_PAGE, include_str!("../templates/accounts/login.html")),
    (SIGNUP_PAGE, include_str!("../templates/accounts/signup.html")),
    (
        PASSWORD_CHANGE_PAGE,
        include_str!("../templates/accounts/password_change.html"),
    ),
    (PROJECT_FRAGMENT, include_str!("../templates/fragments/project.html")),
    (
        PROJECT_LIST_FRAGMENT,
        include_str!("../templates/fragments/project_list.html"),
    ),
    (
        PROJECT_TITLE_FRAGMENT,
        include_str!("../templates/fragments/project_title.html"),
    ),
    (
        PROJECT_FORM_FRAGMENT,
        include_str!("../templates/fragments/project_form.html"),
    ),
    (TASK_LIST_FRAGMENT, include_str!("../templates/fragments/task_list.html")),
    (TASK_FRAGMENT, include_str!("../templates/fragments/task.html")),
    (TASK_FORM_FRAGMENT, include_str!("../templates/fragments/task_form.html")),
];

// ---------------------------------------------------------------------------
// Template registry
// ---------------------------------------------------------------------------

/// The compiled template set, built once at startup and shared via `AppState`.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Parse every template. Fails on the first syntax error.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_templates(SOURCES)?;
        Ok(Self { tera })
    }

    pub fn render(&self, template: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(template, context)
    }
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// A template name plus the context to render it with.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub template: &'static str,
    pub context: Context,
}

/// Where htmx swaps the response of a form submission.
#[derive(Debug, Clone, Serialize)]
pub struct FormTarget {
    pub selector: String,
    pub swap: &'static str,
}

impl FormTarget {
    /// The form replaces itself (edit in place).
    pub fn replace_self() -> Self {
        Self {
            selector: "this".into(),
            swap: "outerHTML",
        }
    }

    /// The response goes into `selector`; the form removes itself on success.
    pub fn elsewhere(selector: impl Into<String>, swap: &'static str) -> Self {
        Self {
            selector: selector.into(),
            swap,
        }
    }
}

/// Form values echoed back into a form fragment.
#[derive(Serialize)]
struct ProjectFormValues<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct TaskFormValues<'a> {
    content: &'a str,
    deadline: &'a str,
}

impl Fragment {
    fn new(template: &'static str) -> Self {
        Self {
            template,
            context: Context::new(),
        }
    }

    fn with<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.context.insert(key, value);
        self
    }

    /// One project with its tasks, plus any priority error to show inline.
    pub fn project(project: &ProjectWithTasks, errors: &FormErrors) -> Self {
        Self::new(PROJECT_FRAGMENT)
            .with("project", project)
            .with("errors", errors)
    }

    pub fn project_list(projects: &[ProjectWithTasks]) -> Self {
        Self::new(PROJECT_LIST_FRAGMENT)
            .with("projects", projects)
            .with("errors", &FormErrors::default())
    }

    pub fn project_title(project: &Project) -> Self {
        Self::new(PROJECT_TITLE_FRAGMENT).with("project", project)
    }

    /// The create/update project form posting to `action`.
    pub fn project_form(
        action: &str,
        target: &FormTarget,
        form: &ProjectForm,
        errors: &FormErrors,
    ) -> Self {
        let values = ProjectFormValues {
            name: form.name.as_deref().unwrap_or_default(),
        };
        Self::new(PROJECT_FORM_FRAGMENT)
            .with("action", action)
            .with("target", target)
            .with("form", &values)
            .with("errors", errors)
    }

    pub fn task_list(project: &ProjectWithTasks) -> Self {
        Self::new(TASK_LIST_FRAGMENT).with("project", project)
    }

    pub fn task(task: &Task) -> Self {
        Self::new(TASK_FRAGMENT).with("task", task)
    }

    /// The create/update task form posting to `action`.
    pub fn task_form(
        action: &str,
        target: &FormTarget,
        form: &TaskForm,
        errors: &FormErrors,
    ) -> Self {
        let values = TaskFormValues {
            content: &form.content,
            deadline: form.deadline_input(),
        };
        Self::new(TASK_FORM_FRAGMENT)
            .with("action", action)
            .with("target", target)
            .with("form", &values)
            .with("errors", errors)
    }

    fn is_form(&self) -> bool {
        matches!(self.template, PROJECT_FORM_FRAGMENT | TASK_FORM_FRAGMENT)
    }

    fn render(&self, templates: &Templates) -> AppResult<String> {
        Ok(templates.render(self.template, &self.context)?)
    }
}

/// What a successful operation produced for partial requests.
#[derive(Debug)]
pub enum Outcome {
    /// Swap in this fragment.
    Fragment(Fragment),
    /// Nothing to swap in (the element was removed or needs no refresh).
    Empty,
}

// ---------------------------------------------------------------------------
// Response policy
// ---------------------------------------------------------------------------

/// Shape a successful operation's response for the request's mode.
pub fn render_result(templates: &Templates, mode: RenderMode, outcome: Outcome) -> AppResult<Response> {
    match (mode, outcome) {
        (RenderMode::Partial, Outcome::Fragment(fragment)) => {
            Ok(Html(fragment.render(templates)?).into_response())
        }
        (RenderMode::Partial, Outcome::Empty) => Ok(StatusCode::OK.into_response()),
        (RenderMode::Full, _) => Ok(Redirect::to(PROJECTS_PATH).into_response()),
    }
}

/// Answer a failed validation with the re-rendered fragment and `422`.
///
/// A re-rendered form always replaces the form that was submitted, whatever
/// the form's success target is.
pub fn render_invalid(templates: &Templates, fragment: Fragment) -> AppResult<Response> {
    let html = fragment.render(templates)?;
    if fragment.is_form() {
        Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            [(HX_RETARGET, "this"), (HX_RESWAP, "outerHTML")],
            Html(html),
        )
            .into_response())
    } else {
        Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response())
    }
}

/// Base context every page extends: the header needs to know whether to show
/// the account links, and forms expect an `errors` map.
pub fn page_context(authenticated: bool) -> Context {
    let mut context = Context::new();
    context.insert("authenticated", &authenticated);
    context.insert("errors", &FormErrors::default());
    context
}

/// Render a whole page.
pub fn render_page(templates: &Templates, template: &str, context: &Context) -> AppResult<Html<String>> {
    Ok(Html(templates.render(template, context)?))
}
