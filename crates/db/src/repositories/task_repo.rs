//! Repository for the `tasks` table.
//!
//! Tasks carry no owner column; every statement joins `projects` and filters
//! on `projects.owner_id`. Completion toggling and priority adjustment are
//! single `UPDATE` statements so concurrent requests cannot lose updates.

use sqlx::PgPool;
use taskboard_core::tasks::{MAX_PRIORITY, MIN_PRIORITY};
use taskboard_core::types::DbId;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list for statements against the bare `tasks` table.
const COLUMNS: &str = "id, project_id, content, priority, completed, deadline, created_at, updated_at";

/// Column list for statements where `tasks` is aliased as `t`.
const T_COLUMNS: &str = "t.id, t.project_id, t.content, t.priority, t.completed, t.deadline, \
                         t.created_at, t.updated_at";

/// Provides owner-scoped CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task into a project owned by `owner_id`.
    ///
    /// Returns `None` (and inserts nothing) if the project does not exist or
    /// belongs to someone else.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (project_id, content, deadline)
             SELECT p.id, $2, $3 FROM projects p
             WHERE p.id = $1 AND p.owner_id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.project_id)
            .bind(&input.content)
            .bind(input.deadline)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a task by ID if its project belongs to `owner_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {T_COLUMNS} FROM tasks t
             JOIN projects p ON p.id = t.project_id
             WHERE t.id = $1 AND p.owner_id = $2"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List the tasks of one project, highest priority first.
    ///
    /// Empty if the project is not owned by `owner_id`.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        owner_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {T_COLUMNS} FROM tasks t
             JOIN projects p ON p.id = t.project_id
             WHERE t.project_id = $1 AND p.owner_id = $2
             ORDER BY t.priority DESC, t.id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List every task across all projects of `owner_id`, highest priority first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {T_COLUMNS} FROM tasks t
             JOIN projects p ON p.id = t.project_id
             WHERE p.owner_id = $1
             ORDER BY t.priority DESC, t.id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update content and, when given, the deadline.
    ///
    /// Returns `None` if the task does not exist or is not owned.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks t SET
                content = $3,
                deadline = COALESCE($4, t.deadline)
             FROM projects p
             WHERE t.id = $1 AND p.id = t.project_id AND p.owner_id = $2
             RETURNING {T_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.content)
            .bind(input.deadline)
            .fetch_optional(pool)
            .await
    }

    /// Flip `completed` in place. Returns the updated row, or `None` if the
    /// task does not exist or is not owned.
    pub async fn toggle_completed(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks t SET completed = NOT t.completed
             FROM projects p
             WHERE t.id = $1 AND p.id = t.project_id AND p.owner_id = $2
             RETURNING {T_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Add `delta` to the stored priority if the result stays within
    /// [`MIN_PRIORITY`, `MAX_PRIORITY`].
    ///
    /// Returns `None` when the task is missing, not owned, or the change would
    /// leave the range; the stored value is untouched in all three cases.
    pub async fn adjust_priority(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        delta: i32,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks t SET priority = t.priority + $3
             FROM projects p
             WHERE t.id = $1 AND p.id = t.project_id AND p.owner_id = $2
               AND t.priority + $3 BETWEEN $4 AND $5
             RETURNING {T_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(delta)
            .bind(MIN_PRIORITY)
            .bind(MAX_PRIORITY)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task whose project belongs to `owner_id`. Returns `true` if a
    /// row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM tasks t USING projects p
             WHERE t.id = $1 AND p.id = t.project_id AND p.owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
