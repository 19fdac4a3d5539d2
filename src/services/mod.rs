//! Service layer
//!
//! Services hold the application rules: who may do what, which lookups must
//! succeed, and how entities map to response views. Handlers resolve the caller
//! from the session and pass it in explicitly; services never read ambient state.

pub mod categories;
pub mod posts;
pub mod users;

pub use categories::CategoryService;
pub use posts::PostService;
pub use users::UserService;

use crate::{error::ServiceError, models::User};

/// The privileged post operations, each with its own error wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    CreatePost,
    EditPost,
    DeletePost,
}

impl AdminAction {
    fn unauthenticated(self) -> ServiceError {
        match self {
            Self::CreatePost => ServiceError::unauthenticated("Invalid user request", "No user in session"),
            Self::EditPost => ServiceError::unauthenticated("Login to edit post", "No user is in session"),
            Self::DeletePost => ServiceError::unauthenticated("Invalid user request", "No user in session"),
        }
    }

    fn unauthorized(self) -> ServiceError {
        let verb = match self {
            Self::CreatePost => "create a post",
            Self::EditPost => "edit this post",
            Self::DeletePost => "delete this post",
        };
        ServiceError::unauthorized(
            "Unauthorized user",
            format!("User doesn't have the right to {}!", verb),
        )
    }
}

/// Authorization guard shared by every post mutation.
///
/// - no caller: `Unauthenticated`
/// - caller without the admin role: `Unauthorized`
/// - admin caller: returned for use as the acting user
pub fn require_admin(caller: Option<&User>, action: AdminAction) -> Result<&User, ServiceError> {
    match caller {
        None => Err(action.unauthenticated()),
        Some(user) if !user.is_admin() => {
            tracing::debug!(user = %user.uuid, ?action, "non-admin attempted a privileged action");
            Err(action.unauthorized())
        }
        Some(user) => Ok(user),
    }
}
