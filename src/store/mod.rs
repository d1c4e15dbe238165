//! Persistence for users and tasks.
//!
//! The services only see the [`Store`] trait. Two backends implement it:
//! [`PgStore`] for a real database and [`MemoryStore`] as a fallback for local
//! runs and tests. Each single-record write is atomic; there are no
//! multi-record transactions.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Task, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type Result<T> = std::result::Result<T, AppError>;

/// User persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `AppError::Conflict` if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<User>;

    /// Find a user by exact (case-sensitive) email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
}

/// Task persistence. Ownership rules live in the service, not here.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All tasks owned by `owner_id`, oldest first.
    async fn list_tasks(&self, owner_id: Uuid) -> Result<Vec<Task>>;

    async fn insert_task(&self, task: &Task) -> Result<Task>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>>;

    /// Overwrite the mutable fields of an existing task. `None` if it is gone.
    async fn update_task(&self, task: &Task) -> Result<Option<Task>>;

    /// Remove a task. Returns `false` if nothing was deleted.
    async fn delete_task(&self, id: Uuid) -> Result<bool>;
}

/// A complete storage backend with an explicit lifecycle.
#[async_trait]
pub trait Store: UserRepository + TaskRepository {
    /// Short backend name for logs and the health endpoint.
    fn kind(&self) -> &'static str;

    /// Release connections. Called once at shutdown.
    async fn close(&self);
}

/// Opens the backend selected by `config`.
///
/// Without a `DATABASE_URL` the process runs against an in-memory store whose
/// contents are lost on exit.
pub async fn connect(config: &Config) -> Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            log::info!("Connected to Postgres store");
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
