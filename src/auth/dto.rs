use serde::{Deserialize, Serialize};

use crate::auth::repo_types::User;

/// Request body for signup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Request body for login. Fields are optional so a missing credential is
/// reported as a 400 instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub password_current: String,
    pub password: String,
    pub password_confirm: String,
}

/// Response returned after signup, login, password reset or update.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub status: &'static str,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::Role;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[test]
    fn signup_request_uses_camel_case_confirm_field() {
        let payload: SignupRequest = serde_json::from_str(
            r#"{"username":"ana","email":"ana@x.com","password":"secret123","passwordConfirm":"secret123"}"#,
        )
        .unwrap();
        assert_eq!(payload.password_confirm, "secret123");
    }

    #[test]
    fn auth_response_contains_token_but_no_password() {
        let response = AuthResponse {
            status: "success",
            token: "abc.def.ghi".into(),
            user: User {
                id: Uuid::new_v4(),
                username: "ana".into(),
                email: "ana@x.com".into(),
                role: Role::User,
                password_hash: "supersecret".into(),
                password_changed_at: None,
                password_reset_token: None,
                password_reset_expires: None,
                active: true,
                created_at: OffsetDateTime::now_utc(),
            },
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("abc.def.ghi"));
        assert!(json.contains("\"username\":\"ana\""));
        assert!(!json.contains("password"));
        assert!(!json.contains("supersecret"));
    }
}
