use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub due_date: OffsetDateTime,
    pub owner: Uuid,
    pub contributors: Vec<Uuid>,
    pub created_at: OffsetDateTime,
}

const PROJECT_COLUMNS: &str =
    "id, name, description, image_cover, due_date, owner, contributors, created_at";

pub async fn create(
    db: &PgPool,
    owner: Uuid,
    name: &str,
    description: Option<&str>,
    image_cover: Option<&str>,
    due_date: Option<OffsetDateTime>,
    contributors: &[Uuid],
) -> sqlx::Result<Project> {
    sqlx::query_as::<_, Project>(&format!(
        "INSERT INTO projects (name, description, image_cover, due_date, owner, contributors) \
         VALUES ($1, $2, $3, COALESCE($4, now()), $5, $6) \
         RETURNING {PROJECT_COLUMNS}"
    ))
    .bind(name)
    .bind(description)
    .bind(image_cover)
    .bind(due_date)
    .bind(owner)
    .bind(contributors)
    .fetch_one(db)
    .await
}

pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Project>> {
    sqlx::query_as::<_, Project>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
    ))
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Project>> {
    sqlx::query_as::<_, Project>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn list_by_owner(db: &PgPool, owner: Uuid) -> sqlx::Result<Vec<Project>> {
    sqlx::query_as::<_, Project>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE owner = $1 ORDER BY created_at DESC"
    ))
    .bind(owner)
    .fetch_all(db)
    .await
}

/// Partial update; absent fields keep their current value.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    image_cover: Option<&str>,
    due_date: Option<OffsetDateTime>,
    contributors: Option<&[Uuid]>,
) -> sqlx::Result<Option<Project>> {
    sqlx::query_as::<_, Project>(&format!(
        "UPDATE projects \
         SET name = COALESCE($2, name), \
             description = COALESCE($3, description), \
             image_cover = COALESCE($4, image_cover), \
             due_date = COALESCE($5, due_date), \
             contributors = COALESCE($6, contributors) \
         WHERE id = $1 \
         RETURNING {PROJECT_COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(image_cover)
    .bind(due_date)
    .bind(contributors)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
