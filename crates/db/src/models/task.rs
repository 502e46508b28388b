//! Task entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::tasks::TaskStatus;
use taskboard_core::types::{Date, DbId, Timestamp};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub content: String,
    pub priority: i32,
    pub completed: bool,
    pub deadline: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_completed(self.completed)
    }
}

/// DTO for creating a new task. The deadline is resolved by the caller.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: DbId,
    pub content: String,
    pub deadline: Date,
}

/// DTO for editing a task's content and, optionally, its deadline.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub content: String,
    /// `None` keeps the stored deadline.
    pub deadline: Option<Date>,
}
