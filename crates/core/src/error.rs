use crate::types::DbId;

/// Domain-level errors shared by every crate in the workspace.
///
/// Form validation failures are not errors here: they travel as
/// [`FormErrors`](crate::forms::FormErrors) and are re-rendered.
///
/// `NotFound` is also returned when an entity exists but belongs to another
/// user, so callers cannot tell the two cases apart.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl CoreError {
    /// Shorthand for a `NotFound` on a `Project`.
    pub fn project_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Project",
            id,
        }
    }

    /// Shorthand for a `NotFound` on a `Task`.
    pub fn task_not_found(id: DbId) -> Self {
        CoreError::NotFound { entity: "Task", id }
    }
}
