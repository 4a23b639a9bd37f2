use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{auth::extractors::CurrentUser, error::AppError, state::AppState};

use super::dto::{CreateTaskRequest, TaskEnvelope, UpdateTaskRequest};
use super::repo::{self, NewTask, Task, UpdateTask};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/tasks/project/:projectId", get(tasks_by_project))
        .route("/tasks/user/:userId", get(tasks_by_user))
}

#[instrument(skip(state, current, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide a name for the task".into(),
        ));
    }
    if payload.pomodoro < 1 {
        return Err(AppError::Validation(
            "Set at least 1 pomodoro per task".into(),
        ));
    }

    let task = repo::create(
        &state.db,
        current.id,
        NewTask {
            name: payload.name.trim(),
            description: payload.description.as_deref(),
            pomodoro: payload.pomodoro,
            pomodoro_completed: payload.pomodoro_completed,
            completed: payload.completed,
            reference_project: payload.reference_project,
            completed_at: payload.completed_at,
        },
    )
    .await?;

    info!(task_id = %task.id, user_id = %current.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state, _current))]
pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskEnvelope>, AppError> {
    let task = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(Json(TaskEnvelope {
        status: "success",
        task,
    }))
}

#[instrument(skip(state, _current, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    if let Some(pomodoro) = payload.pomodoro {
        if pomodoro < 1 {
            return Err(AppError::Validation(
                "Set at least 1 pomodoro per task".into(),
            ));
        }
    }

    let task = repo::update(
        &state.db,
        id,
        UpdateTask {
            name: payload.name.as_deref(),
            description: payload.description.as_deref(),
            pomodoro: payload.pomodoro,
            pomodoro_completed: payload.pomodoro_completed,
            completed: payload.completed,
            reference_project: payload.reference_project,
            completed_at: payload.completed_at,
        },
    )
    .await?;

    match task {
        Some(task) => Ok(Json(task)),
        None => {
            error!(task_id = %id, "task update missed");
            Err(AppError::NotFound("Task not found".into()))
        }
    }
}

#[instrument(skip(state, _current))]
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repo::delete(&state.db, id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }
    info!(task_id = %id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, _current))]
pub async fn tasks_by_project(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = repo::list_by_project(&state.db, project_id).await?;
    Ok(Json(tasks))
}

#[instrument(skip(state, _current))]
pub async fn tasks_by_user(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(tasks))
}
