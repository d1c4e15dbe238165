use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task is yet to be done.
    #[default]
    Pending,
    /// Task is done.
    Completed,
}

/// Rejects strings that are empty or only whitespace.
fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Request body for `POST /api/tasks`.
///
/// `title` is optional at the type level so that a missing title is reported
/// with the same message as a blank one.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Required, at most 200 characters.
    #[validate(length(max = 200))]
    pub title: Option<String>,

    /// An optional description for the task, at most 1000 characters.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Request body for `PUT /api/tasks/{id}`.
///
/// Only the fields present in the payload are applied. Unknown fields (such as
/// `id` or `owner_id` echoed back by a client) are ignored.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200), custom = "non_blank")]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// The user who created the task. Never changes.
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new pending task owned by `owner_id`.
    pub fn new(owner_id: Uuid, title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title,
            description,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the fields present in `patch` and bumps `updated_at`.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Response body for `DELETE /api/tasks/{id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedTask {
    pub id: Uuid,
}
