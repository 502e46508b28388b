#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use taskboard_api::auth::jwt::{generate_session_token, JwtConfig};
use taskboard_api::auth::password::hash_password;
use taskboard_api::auth::session::SESSION_COOKIE;
use taskboard_api::config::ServerConfig;
use taskboard_api::render::Templates;
use taskboard_api::router::build_app_router;
use taskboard_api::state::AppState;
use taskboard_core::types::DbId;
use taskboard_db::models::project::CreateProject;
use taskboard_db::models::task::{CreateTask, Task};
use taskboard_db::models::user::CreateUser;
use taskboard_db::repositories::{ProjectRepo, TaskRepo, UserRepo};

/// Password given to every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "correct-horse-42";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        cookie_secure: false,
        empty_project_guard: true,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router, sharing `main.rs`'s middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        templates: Arc::new(Templates::new().unwrap()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and return its id.
pub async fn create_user(pool: &PgPool, email: &str) -> DbId {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

/// A `Cookie` header value carrying a valid session for `user_id`.
pub fn session_for(user_id: DbId) -> String {
    let token = generate_session_token(user_id, &test_config().jwt).unwrap();
    format!("{SESSION_COOKIE}={token}")
}

pub async fn create_project(pool: &PgPool, owner_id: DbId, name: &str) -> DbId {
    let input = CreateProject {
        owner_id,
        name: name.to_string(),
    };
    ProjectRepo::create(pool, &input).await.unwrap().id
}

pub async fn create_task(pool: &PgPool, owner_id: DbId, project_id: DbId, content: &str) -> Task {
    let input = CreateTask {
        project_id,
        content: content.to_string(),
        deadline: chrono::Utc::now().date_naive(),
    };
    TaskRepo::create(pool, owner_id, &input)
        .await
        .unwrap()
        .unwrap()
}

pub async fn set_priority(pool: &PgPool, task_id: DbId, priority: i32) {
    sqlx::query("UPDATE tasks SET priority = $2 WHERE id = $1")
        .bind(task_id)
        .bind(priority)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn fetch_task(pool: &PgPool, owner_id: DbId, task_id: DbId) -> Option<Task> {
    TaskRepo::find_owned(pool, task_id, owner_id).await.unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// How a request presents itself.
#[derive(Clone, Copy)]
pub enum Mode {
    /// Ordinary browser navigation.
    Full,
    /// htmx request (`HX-Request: true`).
    Partial,
}

/// Send one request through the router.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    mode: Mode,
    cookie: Option<&str>,
    form: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Mode::Partial = mode {
        builder = builder.header("HX-Request", "true");
    }
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match form {
        Some(form) => {
            builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Mode::Full, None, None).await
}

pub async fn get_as(app: Router, uri: &str, mode: Mode, cookie: &str) -> Response<Body> {
    send(app, Method::GET, uri, mode, Some(cookie), None).await
}

/// POST a url-encoded form (possibly empty) with a session.
pub async fn post_as(
    app: Router,
    uri: &str,
    mode: Mode,
    cookie: &str,
    form: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, mode, Some(cookie), Some(form)).await
}

/// POST a url-encoded form without a session.
pub async fn post_anonymous(app: Router, uri: &str, mode: Mode, form: &str) -> Response<Body> {
    send(app, Method::POST, uri, mode, None, Some(form)).await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a `303` to `location`.
pub fn assert_redirect(response: &Response<Body>, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], location);
}
