use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Account role. Closed set; anything else is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// User record in the database. Credential and reset fields never appear
/// in JSON responses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String, // stored lowercase
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub password_changed_at: Option<OffsetDateTime>,
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_expires: Option<OffsetDateTime>,
    pub active: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    /// True when the password was changed strictly after the token was
    /// issued. An account that never changed its password never rejects.
    pub fn password_changed_after(&self, token_iat: i64) -> bool {
        match self.password_changed_at {
            Some(changed_at) => changed_at.unix_timestamp() > token_iat,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn sample_user(password_changed_at: Option<OffsetDateTime>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "ana".into(),
            email: "ana@x.com".into(),
            role: Role::User,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            password_changed_at,
            password_reset_token: None,
            password_reset_expires: None,
            active: true,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn never_changed_password_never_rejects() {
        let user = sample_user(None);
        assert!(!user.password_changed_after(0));
        assert!(!user.password_changed_after(OffsetDateTime::now_utc().unix_timestamp()));
    }

    #[test]
    fn change_after_issue_rejects() {
        let now = OffsetDateTime::now_utc();
        let user = sample_user(Some(now));
        let issued_before_change = (now - Duration::hours(1)).unix_timestamp();
        assert!(user.password_changed_after(issued_before_change));
    }

    #[test]
    fn change_before_issue_does_not_reject() {
        let now = OffsetDateTime::now_utc();
        let user = sample_user(Some(now - Duration::hours(1)));
        assert!(!user.password_changed_after(now.unix_timestamp()));
    }

    #[test]
    fn serialized_user_hides_credential_fields() {
        let mut user = sample_user(Some(OffsetDateTime::now_utc()));
        user.password_reset_token = Some("deadbeef".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"username\":\"ana\""));
        assert!(!json.contains("password"));
        assert!(!json.contains("deadbeef"));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"admin\"").unwrap(),
            Role::Admin
        );
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }
}
