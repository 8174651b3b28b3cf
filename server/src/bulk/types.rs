//! Bulk Action Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use natioid_common::ApplicationStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::queue::store::ItemResult;
use crate::queue::QueueFilter;

/// Action applied to every selected application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Approve,
    RequestInfo,
    /// Render the selection as CSV. Records are not modified.
    Export,
}

impl BulkAction {
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Approve => "Approve",
            Self::RequestInfo => "Request information for",
            Self::Export => "Export",
        }
    }

    pub const fn modifies_records(self) -> bool {
        !matches!(self, Self::Export)
    }
}

/// Which applications a bulk action targets.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Selection {
    /// Explicitly checked rows.
    Ids { ids: Vec<Uuid> },
    /// Every row on one page of the filtered listing.
    Page {
        #[serde(default)]
        filter: QueueFilter,
        page: usize,
    },
    /// Every row matching the filter, across all pages.
    Filtered {
        #[serde(default)]
        filter: QueueFilter,
    },
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct BulkRequest {
    pub action: BulkAction,
    pub selection: Selection,
    /// Note attached to information requests.
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// Per-application result of a bulk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct BulkOutcome {
    pub id: Uuid,
    pub applied: bool,
    /// Status after the action, when it was applied.
    pub status: Option<ApplicationStatus>,
    /// Why the application was skipped.
    pub reason: Option<String>,
}

impl BulkOutcome {
    pub fn from_item(id: Uuid, result: &ItemResult) -> Self {
        match result {
            Ok(record) => Self {
                id,
                applied: true,
                status: Some(record.status),
                reason: None,
            },
            Err(err) => Self {
                id,
                applied: false,
                status: None,
                reason: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct BulkResult {
    pub action: BulkAction,
    pub requested: usize,
    pub applied: usize,
    pub skipped: usize,
    pub outcomes: Vec<BulkOutcome>,
    /// CSV document for `export`.
    pub export: Option<String>,
}

impl BulkResult {
    pub fn new(action: BulkAction, outcomes: Vec<BulkOutcome>, export: Option<String>) -> Self {
        let applied = outcomes.iter().filter(|o| o.applied).count();
        Self {
            action,
            requested: outcomes.len(),
            applied,
            skipped: outcomes.len() - applied,
            outcomes,
            export,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BulkError {
    #[error("No applications selected")]
    EmptySelection,

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for BulkError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for BulkError {
    fn into_response(self) -> Response {
        let code = match self {
            Self::EmptySelection => "EMPTY_SELECTION",
            Self::Validation(_) => "VALIDATION_ERROR",
        };
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": code, "message": self.to_string() })),
        )
            .into_response()
    }
}
