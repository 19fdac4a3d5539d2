use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::{error::ServiceError, models::User, repository::RepositoryState};

/// Session key holding the internal id of the logged-in user.
pub const SESSION_USER_KEY: &str = "current_user";

/// CurrentUser Extractor Result
///
/// The resolved caller identity for a request: `Some(user)` when the session is bound
/// to an existing account, `None` for an anonymous caller.
///
/// The extractor never rejects an anonymous caller. Authorization is decided by the
/// services, which receive this identity as an explicit argument and choose between
/// "unauthenticated" and "unauthorized" themselves.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

/// CurrentUser Extractor Implementation
///
/// 1. Dependency Resolution: pulls the Repository from the application state.
/// 2. Session Lookup: reads the bound user id from the tower-sessions session.
/// 3. DB Lookup: re-reads the user so a deleted account (or a changed role) takes
///    effect immediately instead of trusting stale session data.
///
/// Rejection: `ServiceError::Internal` when the session layer is missing or the
/// store/repository fails.
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);

        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ServiceError::Internal(format!("session unavailable: {}", msg)))?;

        let Some(user_id) = session.get::<i64>(SESSION_USER_KEY).await? else {
            return Ok(CurrentUser(None));
        };

        let user = repo.get_user(user_id).await?;
        if user.is_none() {
            tracing::warn!(user_id, "session bound to a user that no longer exists");
        }
        Ok(CurrentUser(user))
    }
}

/// Binds `user` to the session. The session id is cycled first so a pre-login
/// session id can't be reused after authentication.
pub async fn bind_session(session: &Session, user: &User) -> Result<(), ServiceError> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user.id).await?;
    Ok(())
}

/// Clears every value in the session and deletes it from the store.
pub async fn clear_session(session: &Session) -> Result<(), ServiceError> {
    session.flush().await?;
    Ok(())
}

/// Hashes a password with Argon2id and returns the PHC-format string stored in `users.password_hash`.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("failed to hash password: {}", e)))
}

/// Checks a plaintext password against a stored PHC hash.
/// A malformed stored hash is an internal error, a mismatch is `Ok(false)`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ServiceError::Internal(format!("invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
