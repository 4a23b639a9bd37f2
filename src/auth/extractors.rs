use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo_types::{Role, User};
use crate::error::AppError;
use crate::state::AppState;

/// Request guard used by every protected route. Verifies the bearer token,
/// resolves the account and checks the password-change marker; the resolved
/// account is handed to the handler.
///
/// Failure classes matter to clients: any bad credential is a 401, while a
/// fault while resolving the account (e.g. the database going away) is a
/// 500 and must not masquerade as an auth failure.
pub struct CurrentUser(pub User);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AppError::Auth("You are not logged in! Please log in to get access".into())
        })?;

        // Verification failures (bad signature, expiry, garbage input) are
        // authentication failures, never server errors.
        let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
            warn!(error = %e, "token verification failed");
            AppError::Auth("Invalid or expired token. Please log in again".into())
        })?;

        let user = User::find_by_id(&state.db, claims.sub)
            .await? // database fault -> 500, not 401
            .ok_or_else(|| {
                AppError::Auth("The user belonging to this token does no longer exist".into())
            })?;

        if user.password_changed_after(claims.iat as i64) {
            return Err(AppError::Auth(
                "User recently changed their password. Please log in again".into(),
            ));
        }

        Ok(CurrentUser(user))
    }
}

/// Role gate, composed after `CurrentUser` extraction.
pub fn authorize(user: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        warn!(user_id = %user.id, role = ?user.role, "authorization refused");
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[test]
    fn bearer_token_parses_well_formed_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_rejects_missing_or_other_schemes() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    fn user_with_role(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: "ana".into(),
            email: "ana@x.com".into(),
            role,
            password_hash: "hash".into(),
            password_changed_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            active: true,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn authorize_accepts_listed_role() {
        let admin = user_with_role(Role::Admin);
        assert!(authorize(&admin, &[Role::Admin]).is_ok());
        assert!(authorize(&admin, &[Role::User, Role::Admin]).is_ok());
    }

    #[test]
    fn authorize_refuses_unlisted_role() {
        let user = user_with_role(Role::User);
        let err = authorize(&user, &[Role::Admin]).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
