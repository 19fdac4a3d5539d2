use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message attached to every successful envelope.
pub const SUCCESS_MESSAGE: &str = "Request successful";

/// ApiResponse
///
/// The uniform envelope every endpoint returns. Success envelopes carry `data`;
/// error envelopes carry a human-readable `message` plus a secondary `hint`.
///
/// ```json
/// { "success": true,  "message": "Request successful", "data": { ... } }
/// { "success": false, "message": "No such post", "hint": "Post with uuid ... does not exist" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wraps a payload in a success envelope.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            data: Some(data),
            hint: None,
        }
    }
}

impl ApiResponse<()> {
    /// Builds an error envelope. `hint` is the secondary, more specific explanation.
    pub fn failure(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            hint: Some(hint.into()),
        }
    }
}

/// Enveloped
///
/// A status code paired with a success envelope. Handlers return this so the
/// status (created, accepted, ok) is chosen next to the operation it describes.
#[derive(Debug)]
pub struct Enveloped<T>(pub StatusCode, pub ApiResponse<T>);

impl<T> Enveloped<T> {
    pub fn ok(data: T) -> Self {
        Self(StatusCode::OK, ApiResponse::success(data))
    }

    pub fn created(data: T) -> Self {
        Self(StatusCode::CREATED, ApiResponse::success(data))
    }

    pub fn accepted(data: T) -> Self {
        Self(StatusCode::ACCEPTED, ApiResponse::success(data))
    }
}

impl<T: Serialize> IntoResponse for Enveloped<T> {
    fn into_response(self) -> Response {
        let Enveloped(status, body) = self;
        (status, Json(body)).into_response()
    }
}
