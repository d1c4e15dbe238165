use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{Result, Store, TaskRepository, UserRepository};
use crate::models::{Task, User};

const TASK_COLUMNS: &str = "id, owner_id, title, description, status, created_at, updated_at";

/// Postgres-backed store. Schema lives in `migrations/` and is applied on connect.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: &User) -> Result<User> {
        // The unique index on `email` turns a duplicate into AppError::Conflict.
        let stored = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, email, password_hash, created_at",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn list_tasks(&self, owner_id: Uuid) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE owner_id = $1 ORDER BY created_at ASC, id ASC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn insert_task(&self, task: &Task) -> Result<Task> {
        let sql = format!(
            "INSERT INTO tasks (id, owner_id, title, description, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            TASK_COLUMNS
        );
        let stored = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(task.owner_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_task(&self, task: &Task) -> Result<Option<Task>> {
        let sql = format!(
            "UPDATE tasks
             SET title = $2, description = $3, status = $4, updated_at = $5
             WHERE id = $1
             RETURNING {}",
            TASK_COLUMNS
        );
        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.updated_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
