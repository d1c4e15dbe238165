use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{DeletedTask, TaskInput},
    AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Lists the caller's tasks, oldest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid token.
/// - `500 Internal Server Error`: store failure.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list(user.id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the caller.
///
/// ## Request Body:
/// - `title`: required, non-blank, at most 200 characters.
/// - `description` (optional): at most 1000 characters.
///
/// The task starts out `pending`.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: missing title or invalid fields.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.create(user.id, task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `401 Unauthorized`: the task belongs to someone else.
/// - `404 Not Found`: no task with that id.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.get(user.id, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task the caller owns.
///
/// ## Request Body:
/// Any of `title`, `description`, `status` (`"pending"` or `"completed"`).
/// Absent fields keep their current value. The body is interpreted only after
/// the caller's ownership of the task is established; a body that is not JSON
/// at all is rejected with 400 up front.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: invalid field values.
/// - `401 Unauthorized`: the task belongs to someone else.
/// - `404 Not Found`: no task with that id.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    patch: web::Json<serde_json::Value>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .update(user.id, task_id.into_inner(), patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task the caller owns and echoes its id back.
///
/// ## Responses:
/// - `200 OK`: `{"id": "<task id>"}`.
/// - `401 Unauthorized`: the task belongs to someone else.
/// - `404 Not Found`: no task with that id.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let id = state.tasks.delete(user.id, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeletedTask { id }))
}
