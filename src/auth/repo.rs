use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;

const USER_COLUMNS: &str = "id, username, email, role, password_hash, password_changed_at, \
     password_reset_token, password_reset_expires, active, created_at";

impl User {
    /// Find an active user by (lowercased) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND active"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Find an active user by id. Deactivated accounts are treated as gone
    /// so stale tokens stop working after deleteMe.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND active"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE active ORDER BY created_at ASC"
        ))
        .fetch_all(db)
        .await
    }

    /// Set a new password hash. Stamps `password_changed_at` one second in
    /// the past so a token issued in the same second as the change is still
    /// rejected, and clears any pending reset.
    pub async fn update_password(
        db: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET password_hash = $2, \
                 password_changed_at = now() - interval '1 second', \
                 password_reset_token = NULL, \
                 password_reset_expires = NULL \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Store a pending reset. A second request simply overwrites the first;
    /// only the newest secret verifies afterwards.
    pub async fn set_reset_token(
        db: &PgPool,
        id: Uuid,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE users \
             SET password_reset_token = $2, password_reset_expires = $3 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn clear_reset_token(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE users \
             SET password_reset_token = NULL, password_reset_expires = NULL \
             WHERE id = $1",
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Look up a pending, unexpired reset by hashed secret. Expired and
    /// unknown tokens are indistinguishable here: both return None.
    pub async fn find_by_reset_token(db: &PgPool, token_hash: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE password_reset_token = $1 \
               AND password_reset_expires > now() \
               AND active"
        ))
        .bind(token_hash)
        .fetch_optional(db)
        .await
    }

    /// Filtered profile update: only username and email are applied.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        username: Option<&str>,
        email: Option<&str>,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET username = COALESCE($2, username), \
                 email = COALESCE($3, email) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(username)
        .bind(email)
        .fetch_one(db)
        .await
    }

    pub async fn deactivate(db: &PgPool, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET active = FALSE WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
