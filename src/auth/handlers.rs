use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse,
            ResetPasswordRequest, SignupRequest, UpdatePasswordRequest,
        },
        extractors::CurrentUser,
        jwt::JwtKeys,
        password, reset,
        repo_types::User,
    },
    error::AppError,
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_new_password(password: &str, confirm: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::Validation("Password too short".into()));
    }
    if password != confirm {
        return Err(AppError::Validation("Passwords are not the same!".into()));
    }
    Ok(())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/signup", post(signup))
        .route("/users/login", post(login))
        .route("/users/forgotPassword", post(forgot_password))
        .route("/users/resetPassword/:token", patch(reset_password))
        .route("/users/updateMyPassword", patch(update_password))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() {
        return Err(AppError::Validation("Please provide an username".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Please provide a valid email".into()));
    }
    validate_new_password(&payload.password, &payload.password_confirm)?;

    let hash = password::hash(payload.password).await?;

    // The unique indexes are the source of truth for duplicates; a lost
    // pre-check race would still end up here as a 23505.
    let user = User::create(&state.db, &payload.username, &payload.email, &hash)
        .await
        .map_err(AppError::from_db)?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, username = %user.username, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            status: "success",
            token,
            user,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (email, plain) = match (payload.email.as_deref(), payload.password.as_deref()) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e.trim().to_lowercase(), p),
        _ => {
            return Err(AppError::Validation(
                "Please provide email and password".into(),
            ))
        }
    };

    // Unknown email and wrong password are deliberately indistinguishable.
    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Auth("Incorrect email or password".into()));
    };

    let ok = password::verify(plain.to_string(), user.password_hash.clone()).await?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Auth("Incorrect email or password".into()));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        status: "success",
        token,
        user,
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("There is no user with this email address".into()))?;

    let raw_secret = reset::generate_secret();
    let token_hash = reset::hash_secret(&raw_secret);
    let expires_at =
        OffsetDateTime::now_utc() + Duration::minutes(state.config.reset.token_ttl_minutes);

    User::set_reset_token(&state.db, user.id, &token_hash, expires_at).await?;

    let reset_url = format!(
        "{}/api/v1/users/resetPassword/{}",
        state.config.reset.public_base_url, raw_secret
    );
    let message = format!(
        "Forgot your password? Submit a PATCH request with your new password and \
         passwordConfirm to: {reset_url}.\nIf you didn't forget your password please \
         ignore this email."
    );

    if let Err(e) = state
        .mailer
        .send(
            &user.email,
            "Your password reset token (valid for 10 minutes)",
            &message,
        )
        .await
    {
        // A reset the user was never told about must not stay pending.
        error!(error = %e, user_id = %user.id, "reset email dispatch failed, rolling back");
        User::clear_reset_token(&state.db, user.id).await?;
        return Err(AppError::EmailDispatch);
    }

    info!(user_id = %user.id, "password reset email sent");
    Ok(Json(MessageResponse {
        status: "success",
        message: "Token sent to email!",
    }))
}

#[instrument(skip(state, token, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let token_hash = reset::hash_secret(&token);

    // Expired and unknown tokens fail identically.
    let user = User::find_by_reset_token(&state.db, &token_hash)
        .await?
        .ok_or(AppError::InvalidResetToken)?;

    validate_new_password(&payload.password, &payload.password_confirm)?;

    let hash = password::hash(payload.password).await?;
    let user = User::update_password(&state.db, user.id, &hash).await?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, "password reset completed");
    Ok(Json(AuthResponse {
        status: "success",
        token,
        user,
    }))
}

#[instrument(skip(state, current, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let ok = password::verify(payload.password_current, current.password_hash.clone()).await?;
    if !ok {
        warn!(user_id = %current.id, "wrong current password");
        return Err(AppError::Auth("Your current password is wrong".into()));
    }

    validate_new_password(&payload.password, &payload.password_confirm)?;

    let hash = password::hash(payload.password).await?;
    let user = User::update_password(&state.db, current.id, &hash).await?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, "password updated");
    Ok(Json(AuthResponse {
        status: "success",
        token,
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_accepts_plausible_addresses() {
        assert!(is_valid_email("ana@x.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
    }

    #[test]
    fn email_regex_rejects_malformed_addresses() {
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("ana@"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("ana@x"));
        assert!(!is_valid_email("ana @x.com"));
    }

    #[test]
    fn new_password_must_be_long_enough_and_match_confirm() {
        assert!(validate_new_password("secret123", "secret123").is_ok());
        assert!(matches!(
            validate_new_password("short", "short"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_new_password("secret123", "secret124"),
            Err(AppError::Validation(_))
        ));
    }
}
