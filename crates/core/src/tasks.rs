//! Task forms, priority bounds, and deadline defaults.

use chrono::Days;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::forms::{FormErrors, FormInput};
use crate::types::Date;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of task content in characters.
pub const MAX_TASK_CONTENT_LENGTH: usize = 100;

/// Lowest priority reachable through the adjustment endpoint.
pub const MIN_PRIORITY: i32 = 0;

/// Highest priority reachable through the adjustment endpoint.
pub const MAX_PRIORITY: i32 = 10;

/// Priority assigned to new tasks.
pub const DEFAULT_PRIORITY: i32 = 0;

pub const PRIORITY_MAXIMUM_MESSAGE: &str = "Priority is maximum";
pub const PRIORITY_MINIMUM_MESSAGE: &str = "Priority is minimum";
pub const PRIORITY_DELTA_MESSAGE: &str = "Priority change must be +1 or -1.";
pub const INVALID_DATE_MESSAGE: &str = "Enter a valid date.";

/// Wire format of deadlines, as submitted by HTML date inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Completion state
// ---------------------------------------------------------------------------

/// Completion state of a task. `toggle` flips it in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Done,
}

impl TaskStatus {
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            TaskStatus::Done
        } else {
            TaskStatus::Pending
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Pending,
        }
    }

    pub fn is_done(self) -> bool {
        self == TaskStatus::Done
    }
}

// ---------------------------------------------------------------------------
// Deadline
// ---------------------------------------------------------------------------

/// Deadline used when the form leaves it blank: the day after `today`.
pub fn default_deadline(today: Date) -> Date {
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

// ---------------------------------------------------------------------------
// Task form
// ---------------------------------------------------------------------------

/// Submitted task form (create and update of content/deadline).
///
/// `deadline` is kept as submitted so that an unparseable date is reported
/// on the form instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TaskForm {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Content is required and must be at most 100 characters."
    ))]
    pub content: String,

    #[serde(default)]
    pub deadline: Option<String>,
}

impl TaskForm {
    pub fn new(content: impl Into<String>, deadline: Option<Date>) -> Self {
        Self {
            content: content.into(),
            deadline: deadline.map(|d| d.format(DATE_FORMAT).to_string()),
        }
    }

    /// Trim surrounding whitespace before validation.
    pub fn normalized(self) -> Self {
        Self {
            content: self.content.trim().to_string(),
            deadline: self
                .deadline
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        }
    }

    /// The submitted deadline, `None` when blank or unparseable.
    pub fn deadline(&self) -> Option<Date> {
        let raw = self.deadline.as_deref()?.trim();
        Date::parse_from_str(raw, DATE_FORMAT).ok()
    }

    /// The deadline exactly as submitted, for echoing back into the form.
    pub fn deadline_input(&self) -> &str {
        self.deadline.as_deref().unwrap_or_default()
    }
}

impl FormInput for TaskForm {
    fn check_extra(&self, errors: &mut FormErrors) {
        let blank = self.deadline_input().trim().is_empty();
        if !blank && self.deadline().is_none() {
            errors.add("deadline", INVALID_DATE_MESSAGE);
        }
    }
}

// ---------------------------------------------------------------------------
// Priority adjustment
// ---------------------------------------------------------------------------

/// Submitted priority adjustment. `priority` carries the signed delta as
/// submitted.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PriorityForm {
    #[serde(default)]
    pub priority: Option<String>,
}

impl FormInput for PriorityForm {
    fn check_extra(&self, errors: &mut FormErrors) {
        if self.delta().is_none() {
            errors.add("priority", PRIORITY_DELTA_MESSAGE);
        }
    }
}

impl PriorityForm {
    pub fn new(delta: i32) -> Self {
        Self {
            priority: Some(delta.to_string()),
        }
    }

    /// The submitted delta, `None` unless it is exactly +1 or -1.
    pub fn delta(&self) -> Option<i32> {
        self.priority
            .as_deref()?
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|d| d.abs() == 1)
    }

    /// Validate the delta and check it against the persisted priority.
    ///
    /// Returns the delta to apply on success.
    pub fn check_against(&self, current: i32) -> Result<i32, FormErrors> {
        self.check()?;
        let delta = self
            .delta()
            .ok_or_else(|| FormErrors::single("priority", PRIORITY_DELTA_MESSAGE))?;
        check_priority_adjustment(current, delta)
            .map_err(|msg| FormErrors::single("priority", msg))?;
        Ok(delta)
    }
}

/// Check that applying `delta` keeps `current` within
/// [`MIN_PRIORITY`, `MAX_PRIORITY`]. Returns the resulting priority.
pub fn check_priority_adjustment(current: i32, delta: i32) -> Result<i32, String> {
    let next = current.saturating_add(delta);
    if delta > 0 && next > MAX_PRIORITY {
        return Err(PRIORITY_MAXIMUM_MESSAGE.to_string());
    }
    if delta < 0 && next < MIN_PRIORITY {
        return Err(PRIORITY_MINIMUM_MESSAGE.to_string());
    }
    Ok(next)
}
