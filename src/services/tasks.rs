use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskPatch};
use crate::store::Store;

/// Task CRUD scoped to the calling owner.
///
/// For single-task operations existence is checked before ownership, so a
/// foreign task id answers `Forbidden` while an unknown id answers `NotFound`.
pub struct TaskService {
    store: Arc<dyn Store>,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        self.store.list_tasks(owner_id).await
    }

    pub async fn get(&self, owner_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
        self.owned_task(owner_id, task_id).await
    }

    pub async fn create(&self, owner_id: Uuid, input: TaskInput) -> Result<Task, AppError> {
        input.validate()?;
        let title = input
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Please add a title".into()))?;

        let task = Task::new(owner_id, title, input.description);
        self.store.insert_task(&task).await
    }

    /// Applies the fields present in the JSON `body`. The owner never changes.
    ///
    /// The body is only interpreted once the caller is known to own the task,
    /// so a non-owner gets `Forbidden` and an unknown id `NotFound` whatever
    /// the payload.
    pub async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        body: serde_json::Value,
    ) -> Result<Task, AppError> {
        let mut task = self.owned_task(owner_id, task_id).await?;
        let patch: TaskPatch = serde_json::from_value(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid task update: {}", e)))?;
        patch.validate()?;
        task.apply(patch);

        // Gone if a concurrent delete won the race.
        self.store
            .update_task(&task)
            .await?
            .ok_or_else(task_not_found)
    }

    pub async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> Result<Uuid, AppError> {
        self.owned_task(owner_id, task_id).await?;
        if !self.store.delete_task(task_id).await? {
            return Err(task_not_found());
        }
        Ok(task_id)
    }

    async fn owned_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
        let task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or_else(task_not_found)?;
        if task.owner_id != owner_id {
            log::warn!("User {} tried to access task {} they do not own", owner_id, task_id);
            return Err(AppError::Forbidden("User not authorized".into()));
        }
        Ok(task)
    }
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}
