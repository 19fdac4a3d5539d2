use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::ValidationErrors;

use crate::{repository::RepositoryError, response::ApiResponse};

/// ServiceError
///
/// The single failure type of every service operation. Each variant carries the
/// human-readable message and the secondary hint that end up in the error envelope.
/// The boundary maps variants to status codes in `IntoResponse`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No user is bound to the session.
    #[error("{message}")]
    Unauthenticated { message: String, hint: String },

    /// A user is bound but lacks the admin role.
    #[error("{message}")]
    Unauthorized { message: String, hint: String },

    /// A category or post identifier (or name) does not resolve.
    #[error("{message}")]
    NotFound { message: String, hint: String },

    /// Malformed input.
    #[error("{message}")]
    Validation { message: String, hint: String },

    /// The resource already exists (duplicate email at signup).
    #[error("{message}")]
    Conflict { message: String, hint: String },

    /// Wrong email or password. Deliberately does not say which.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Storage, session or hashing failure. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn unauthenticated(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn validation(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn conflict(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated { .. } | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Unauthorized { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn envelope(&self) -> ApiResponse<()> {
        match self {
            Self::Unauthenticated { message, hint }
            | Self::Unauthorized { message, hint }
            | Self::NotFound { message, hint }
            | Self::Validation { message, hint }
            | Self::Conflict { message, hint } => ApiResponse::failure(message, hint),
            Self::InvalidCredentials => {
                ApiResponse::failure("Invalid email or password", "Check your credentials and try again")
            }
            Self::Internal(_) => ApiResponse::failure("Something went wrong", "Please try again later"),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!("internal error: {}", detail);
        }
        (self.status_code(), Json(self.envelope())).into_response()
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(what) => {
                Self::conflict("Resource already exists", format!("{} is already taken", what))
            }
            RepositoryError::Database(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        // Flatten field errors into "field: message" pairs for the hint.
        let mut details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        details.sort();
        Self::validation("Invalid request payload", details.join("; "))
    }
}

impl From<tower_sessions::session::Error> for ServiceError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {}", err))
    }
}
