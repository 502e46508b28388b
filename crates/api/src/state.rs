use std::sync::Arc;

use crate::config::ServerConfig;
use crate::render::Templates;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: taskboard_db::DbPool,
    /// Server configuration (read by the auth extractor and handlers).
    pub config: Arc<ServerConfig>,
    /// Compiled page and fragment templates.
    pub templates: Arc<Templates>,
}
