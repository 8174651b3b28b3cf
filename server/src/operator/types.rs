//! Operator types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

/// Operator making an admin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    pub id: Uuid,
}

/// Operator identification error.
#[derive(Debug, Error)]
pub enum OperatorError {
    /// No operator header on the request.
    #[error("Operator identification required")]
    Missing,

    /// Header present but not a UUID.
    #[error("Operator id must be a UUID")]
    Malformed,

    /// Operator not on the allowlist.
    #[error("Operator is not permitted to use the admin API")]
    NotAllowed,
}

impl IntoResponse for OperatorError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            Self::Missing => (StatusCode::UNAUTHORIZED, "operator_required"),
            Self::Malformed => (StatusCode::BAD_REQUEST, "invalid_operator"),
            Self::NotAllowed => (StatusCode::FORBIDDEN, "not_operator"),
        };
        (
            status,
            Json(serde_json::json!({"error": code, "message": self.to_string()})),
        )
            .into_response()
    }
}
