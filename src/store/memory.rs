use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Result, Store, TaskRepository, UserRepository};
use crate::error::AppError;
use crate::models::{Task, User};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    tasks: Vec<Task>,
}

/// In-process store. Vectors keep insertion order, which gives listings in
/// creation order for free.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exists".into()));
        }
        inner.users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn list_tasks(&self, owner_id: Uuid) -> Result<Vec<Task>> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert_task(&self, task: &Task) -> Result<Task> {
        self.inner.write().await.tasks.push(task.clone());
        Ok(task.clone())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn update_task(&self, task: &Task) -> Result<Option<Task>> {
        let mut inner = self.inner.write().await;
        Ok(inner.tasks.iter_mut().find(|t| t.id == task.id).map(|stored| {
            stored.title = task.title.clone();
            stored.description = task.description.clone();
            stored.status = task.status;
            stored.updated_at = task.updated_at;
            stored.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        Ok(inner.tasks.len() != before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn close(&self) {}
}
