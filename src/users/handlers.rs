use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        extractors::{authorize, CurrentUser},
        handlers::is_valid_email,
        repo_types::{Role, User},
    },
    error::AppError,
    state::AppState,
};

use super::dto::{UpdateMeRequest, UserData, UserResponse, UsersData, UsersResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/updateMe", patch(update_me))
        .route("/users/deleteMe", delete(delete_me))
}

/// Admin-only listing of all active accounts.
#[instrument(skip(state, current))]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
) -> Result<Json<UsersResponse>, AppError> {
    authorize(&current, &[Role::Admin])?;

    let users = User::list_all(&state.db).await?;
    Ok(Json(UsersResponse {
        status: "success",
        results: users.len(),
        data: UsersData { users },
    }))
}

#[instrument(skip(state, current, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(mut payload): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if payload.password.is_some() || payload.password_confirm.is_some() {
        return Err(AppError::Validation(
            "This route is not for password updates. Please use /updateMyPassword.".into(),
        ));
    }

    if let Some(email) = payload.email.as_mut() {
        *email = email.trim().to_lowercase();
        if !is_valid_email(email) {
            warn!(email = %email, "invalid email");
            return Err(AppError::Validation("Please provide a valid email".into()));
        }
    }
    if let Some(username) = payload.username.as_mut() {
        *username = username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::Validation("Please provide an username".into()));
        }
    }

    let user = User::update_profile(
        &state.db,
        current.id,
        payload.username.as_deref(),
        payload.email.as_deref(),
    )
    .await
    .map_err(AppError::from_db)?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(UserResponse {
        status: "success",
        data: UserData { user },
    }))
}

/// Soft delete: the account stops authenticating but the row survives.
#[instrument(skip(state, current))]
pub async fn delete_me(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
) -> Result<StatusCode, AppError> {
    User::deactivate(&state.db, current.id).await?;
    info!(user_id = %current.id, "account deactivated");
    Ok(StatusCode::NO_CONTENT)
}
