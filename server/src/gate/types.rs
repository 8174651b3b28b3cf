//! Confirmation Gate Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bulk::BulkAction;
use crate::drafts::DraftError;
use crate::queue::QueueError;

/// Action held back until it is explicitly confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingAction {
    /// Citizen chose a special-action reason on a draft.
    SelectReason { draft_id: Uuid, reason_id: String },
    Approve { record_id: Uuid },
    Reject { record_id: Uuid, reason: String },
    RequestInfo { record_id: Uuid, note: Option<String> },
    Delete { record_id: Uuid },
    Bulk {
        action: BulkAction,
        ids: Vec<Uuid>,
        note: Option<String>,
    },
}

/// A pending confirmation.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub token: Uuid,
    pub action: PendingAction,
    /// Operator that must confirm. `None` for citizen confirmations.
    pub operator_id: Option<Uuid>,
    pub summary: String,
    pub warning: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Returned with `202 Accepted` when an action needs confirmation.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ConfirmationResponse {
    pub token: Uuid,
    pub summary: String,
    pub warning: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl From<&Confirmation> for ConfirmationResponse {
    fn from(c: &Confirmation) -> Self {
        Self {
            token: c.token,
            summary: c.summary.clone(),
            warning: c.warning.clone(),
            expires_at: c.expires_at,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ResolveConfirmationRequest {
    /// `true` executes the action, `false` cancels it.
    pub confirm: bool,
}

/// Outcome of resolving a confirmation.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    Cancelled,
    Executed { result: serde_json::Value },
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Confirmation not found")]
    NotFound,

    #[error("Confirmation has expired")]
    Expired,

    #[error("Confirmation belongs to another caller")]
    WrongCaller,

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            Self::Draft(e) => return e.into_response(),
            Self::Queue(e) => return e.into_response(),
            Self::NotFound => (StatusCode::NOT_FOUND, "CONFIRMATION_NOT_FOUND"),
            Self::Expired => (StatusCode::GONE, "CONFIRMATION_EXPIRED"),
            Self::WrongCaller => (StatusCode::FORBIDDEN, "CONFIRMATION_FORBIDDEN"),
            Self::Encode(ref err) => {
                tracing::error!(error = %err, "Failed to encode confirmation result");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": code, "message": self.to_string() })),
        )
            .into_response()
    }
}
