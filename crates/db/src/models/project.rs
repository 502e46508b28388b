//! Project entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};

use crate::models::task::Task;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub owner_id: DbId,
    pub name: String,
}

/// DTO for renaming a project.
#[derive(Debug, Clone)]
pub struct UpdateProject {
    pub name: String,
}

/// A project together with its tasks, highest priority first.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithTasks {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<Task>,
}

impl ProjectWithTasks {
    /// Pair each project with its tasks.
    ///
    /// `tasks` must already be sorted by descending priority; the relative
    /// order is preserved per project.
    pub fn group(projects: Vec<Project>, tasks: Vec<Task>) -> Vec<Self> {
        let mut grouped: Vec<Self> = projects
            .into_iter()
            .map(|project| Self {
                project,
                tasks: Vec::new(),
            })
            .collect();

        for task in tasks {
            if let Some(entry) = grouped.iter_mut().find(|p| p.project.id == task.project_id) {
                entry.tasks.push(task);
            }
        }
        grouped
    }
}
