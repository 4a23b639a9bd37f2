use serde::{Deserialize, Serialize};

use crate::auth::repo_types::User;

/// Request body for profile updates. Password fields are present only so
/// the handler can refuse them with a pointer to /updateMyPassword.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsersData {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub status: &'static str,
    pub results: usize,
    pub data: UsersData,
}

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub status: &'static str,
    pub data: UserData,
}
