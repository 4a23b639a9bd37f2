use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    error::AppError,
    state::AppState,
    tasks::repo::{self as task_repo, NewTask, UpdateTask},
};

use super::dto::{
    AddProjectTaskRequest, CreateProjectRequest, Envelope, ListEnvelope, ProjectData,
    ProjectDetails, ProjectsData, UpdateProjectRequest, UpdateProjectTaskRequest,
};
use super::repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(get_project).patch(update_project).delete(delete_project),
        )
        .route("/projects/user/:userId", get(projects_by_user))
        .route("/projects/:id/tasks", post(add_task_to_project))
        .route(
            "/projects/:id/tasks/:taskId",
            patch(update_task_in_project).delete(delete_task_from_project),
        )
}

async fn project_details(
    state: &AppState,
    project: repo::Project,
) -> Result<ProjectDetails, AppError> {
    let tasks = task_repo::list_by_project(&state.db, project.id).await?;
    Ok(ProjectDetails { project, tasks })
}

#[instrument(skip(state, current, payload))]
pub async fn create_project(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Envelope<ProjectData<repo::Project>>>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide a name for the project".into(),
        ));
    }

    let project = repo::create(
        &state.db,
        current.id,
        payload.name.trim(),
        payload.description.as_deref(),
        payload.image_cover.as_deref(),
        payload.due_date,
        payload.contributors.as_deref().unwrap_or(&[]),
    )
    .await?;

    info!(project_id = %project.id, owner = %project.owner, "project created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope {
            status: "success",
            data: ProjectData { project },
        }),
    ))
}

#[instrument(skip(state, _current))]
pub async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
) -> Result<Json<ListEnvelope<ProjectsData>>, AppError> {
    let projects = repo::list_all(&state.db).await?;
    Ok(Json(ListEnvelope {
        status: "success",
        results: projects.len(),
        data: ProjectsData { projects },
    }))
}

#[instrument(skip(state, _current))]
pub async fn get_project(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<ProjectData<ProjectDetails>>>, AppError> {
    let project = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    let details = project_details(&state, project).await?;
    Ok(Json(Envelope {
        status: "success",
        data: ProjectData { project: details },
    }))
}

#[instrument(skip(state, _current))]
pub async fn projects_by_user(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ListEnvelope<ProjectsData>>, AppError> {
    let projects = repo::list_by_owner(&state.db, user_id).await?;
    Ok(Json(ListEnvelope {
        status: "success",
        results: projects.len(),
        data: ProjectsData { projects },
    }))
}

#[instrument(skip(state, _current, payload))]
pub async fn update_project(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<Envelope<ProjectData<repo::Project>>>, AppError> {
    let project = repo::update(
        &state.db,
        id,
        payload.name.as_deref(),
        payload.description.as_deref(),
        payload.image_cover.as_deref(),
        payload.due_date,
        payload.contributors.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    Ok(Json(Envelope {
        status: "success",
        data: ProjectData { project },
    }))
}

#[instrument(skip(state, _current))]
pub async fn delete_project(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repo::delete(&state.db, id).await? {
        return Err(AppError::NotFound("Project not found".into()));
    }
    info!(project_id = %id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current, payload))]
pub async fn add_task_to_project(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddProjectTaskRequest>,
) -> Result<Json<Envelope<ProjectData<ProjectDetails>>>, AppError> {
    let project = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    if payload.task_pomodoro < 1 {
        return Err(AppError::Validation(
            "Set at least 1 pomodoro per task".into(),
        ));
    }

    let task = task_repo::create(
        &state.db,
        current.id,
        NewTask {
            name: payload.task_name.trim(),
            description: payload.task_description.as_deref(),
            pomodoro: payload.task_pomodoro,
            pomodoro_completed: None,
            completed: false,
            reference_project: Some(project.id),
            completed_at: None,
        },
    )
    .await?;

    info!(project_id = %project.id, task_id = %task.id, "task added to project");
    let details = project_details(&state, project).await?;
    Ok(Json(Envelope {
        status: "success",
        data: ProjectData { project: details },
    }))
}

#[instrument(skip(state, _current, payload))]
pub async fn update_task_in_project(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateProjectTaskRequest>,
) -> Result<Json<Envelope<ProjectData<ProjectDetails>>>, AppError> {
    let updated = task_repo::update_in_project(
        &state.db,
        id,
        task_id,
        UpdateTask {
            name: payload.name.as_deref(),
            description: payload.description.as_deref(),
            pomodoro: payload.pomodoro,
            pomodoro_completed: None,
            completed: payload.completed,
            reference_project: None,
            completed_at: None,
        },
    )
    .await?;

    if updated.is_none() {
        error!(project_id = %id, task_id = %task_id, "project task update missed");
        return Err(AppError::NotFound("Project or Task not found".into()));
    }

    let project = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project or Task not found".into()))?;

    let details = project_details(&state, project).await?;
    Ok(Json(Envelope {
        status: "success",
        data: ProjectData { project: details },
    }))
}

#[instrument(skip(state, _current))]
pub async fn delete_task_from_project(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Envelope<ProjectData<ProjectDetails>>>, AppError> {
    let project = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    // Removing an already-detached task is a no-op, as in the original
    // board behavior.
    task_repo::delete_in_project(&state.db, id, task_id).await?;

    let details = project_details(&state, project).await?;
    Ok(Json(Envelope {
        status: "success",
        data: ProjectData { project: details },
    }))
}
