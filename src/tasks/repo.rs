use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub pomodoro: i32,
    pub pomodoro_completed: Option<i32>,
    pub completed: bool,
    pub reference_project: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
    pub completed_at: Option<OffsetDateTime>,
}

const TASK_COLUMNS: &str = "id, name, description, pomodoro, pomodoro_completed, completed, \
     reference_project, user_id, created_at, completed_at";

pub struct NewTask<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub pomodoro: i32,
    pub pomodoro_completed: Option<i32>,
    pub completed: bool,
    pub reference_project: Option<Uuid>,
    pub completed_at: Option<OffsetDateTime>,
}

#[derive(Default)]
pub struct UpdateTask<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub pomodoro: Option<i32>,
    pub pomodoro_completed: Option<i32>,
    pub completed: Option<bool>,
    pub reference_project: Option<Uuid>,
    pub completed_at: Option<OffsetDateTime>,
}

pub async fn create(db: &PgPool, user_id: Uuid, task: NewTask<'_>) -> sqlx::Result<Task> {
    sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks \
         (name, description, pomodoro, pomodoro_completed, completed, reference_project, \
          user_id, completed_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(task.name)
    .bind(task.description)
    .bind(task.pomodoro)
    .bind(task.pomodoro_completed)
    .bind(task.completed)
    .bind(task.reference_project)
    .bind(user_id)
    .bind(task.completed_at)
    .fetch_one(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Task>> {
    sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list_by_project(db: &PgPool, project_id: Uuid) -> sqlx::Result<Vec<Task>> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE reference_project = $1 ORDER BY created_at ASC"
    ))
    .bind(project_id)
    .fetch_all(db)
    .await
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Task>> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at ASC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Partial update; absent fields keep their current value.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    changes: UpdateTask<'_>,
) -> sqlx::Result<Option<Task>> {
    sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks \
         SET name = COALESCE($2, name), \
             description = COALESCE($3, description), \
             pomodoro = COALESCE($4, pomodoro), \
             pomodoro_completed = COALESCE($5, pomodoro_completed), \
             completed = COALESCE($6, completed), \
             reference_project = COALESCE($7, reference_project), \
             completed_at = COALESCE($8, completed_at) \
         WHERE id = $1 \
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(id)
    .bind(changes.name)
    .bind(changes.description)
    .bind(changes.pomodoro)
    .bind(changes.pomodoro_completed)
    .bind(changes.completed)
    .bind(changes.reference_project)
    .bind(changes.completed_at)
    .fetch_optional(db)
    .await
}

/// Update a task only if it belongs to the given project.
pub async fn update_in_project(
    db: &PgPool,
    project_id: Uuid,
    task_id: Uuid,
    changes: UpdateTask<'_>,
) -> sqlx::Result<Option<Task>> {
    sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks \
         SET name = COALESCE($3, name), \
             description = COALESCE($4, description), \
             pomodoro = COALESCE($5, pomodoro), \
             completed = COALESCE($6, completed) \
         WHERE id = $1 AND reference_project = $2 \
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(task_id)
    .bind(project_id)
    .bind(changes.name)
    .bind(changes.description)
    .bind(changes.pomodoro)
    .bind(changes.completed)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a task only if it belongs to the given project.
pub async fn delete_in_project(db: &PgPool, project_id: Uuid, task_id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND reference_project = $2")
        .bind(task_id)
        .bind(project_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
