//! Draft Types
//!
//! Wire and error types for the application wizard.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use natioid_common::{ApplicationType, DocumentType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::gate::ConfirmationResponse;

// ============================================================================
// Draft Model
// ============================================================================

/// Which side of the document an image shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImageSide {
    Front,
    Back,
}

/// Reference to a captured image held by the upload service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct ImageRef {
    #[validate(length(min = 1, max = 2048, message = "Image URI must be 1-2048 characters"))]
    pub uri: String,
    #[validate(length(min = 1, max = 255, message = "Filename must be 1-255 characters"))]
    pub filename: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DraftImages {
    pub front: Option<ImageRef>,
    pub back: Option<ImageRef>,
}

/// Step of the wizard the applicant should complete next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DraftStep {
    DocumentType,
    Images,
    Fields,
    Reason,
    Review,
}

/// In-progress application assembled across wizard steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApplicationDraft {
    pub id: Uuid,
    pub application_type: ApplicationType,
    pub document_type: Option<DocumentType>,
    pub images: DraftImages,
    pub fields: BTreeMap<String, String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// First problem that blocks submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("Select a document type")]
    MissingDocumentType,

    #[error("A photo of the front of the document is required")]
    MissingFrontImage,

    #[error("{label} is required")]
    MissingField {
        name: &'static str,
        label: &'static str,
    },

    #[error("Select a reason for this application")]
    MissingReason,
}

impl ValidationFailure {
    /// Step the applicant has to go back to.
    pub const fn step(&self) -> DraftStep {
        match self {
            Self::MissingDocumentType => DraftStep::DocumentType,
            Self::MissingFrontImage => DraftStep::Images,
            Self::MissingField { .. } => DraftStep::Fields,
            Self::MissingReason => DraftStep::Reason,
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateDraftRequest {
    pub application_type: ApplicationType,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SelectDocumentTypeRequest {
    pub document_type: DocumentType,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SetFieldsRequest {
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct SelectReasonRequest {
    #[validate(length(min = 1, max = 64))]
    pub reason_id: String,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DraftResponse {
    #[serde(flatten)]
    pub draft: ApplicationDraft,
    pub next_step: DraftStep,
}

impl From<ApplicationDraft> for DraftResponse {
    fn from(draft: ApplicationDraft) -> Self {
        Self {
            next_step: draft.next_step(),
            draft,
        }
    }
}

/// Result of choosing a reason.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SelectReasonResponse {
    Applied { draft: DraftResponse },
    ConfirmationRequired { confirmation: ConfirmationResponse },
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SubmitResponse {
    pub record_id: Uuid,
    pub tracking_code: String,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("Draft not found")]
    NotFound,

    #[error("Select a document type first")]
    DocumentTypeNotSelected,

    #[error("Unknown field for {document_type}: {name}")]
    UnknownField {
        document_type: DocumentType,
        name: String,
    },

    #[error("{0} applications do not take a reason")]
    ReasonNotApplicable(ApplicationType),

    #[error("Unknown reason: {0}")]
    UnknownReason(String),

    #[error("{0}")]
    Incomplete(ValidationFailure),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for DraftError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for DraftError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::NotFound => (StatusCode::NOT_FOUND, "DRAFT_NOT_FOUND"),
            Self::DocumentTypeNotSelected => (StatusCode::CONFLICT, "DOCUMENT_TYPE_NOT_SELECTED"),
            Self::UnknownField { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_FIELD"),
            Self::ReasonNotApplicable(_) => (StatusCode::BAD_REQUEST, "REASON_NOT_APPLICABLE"),
            Self::UnknownReason(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_REASON"),
            Self::Incomplete(_) => (StatusCode::UNPROCESSABLE_ENTITY, "DRAFT_INCOMPLETE"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        };

        let mut body = serde_json::json!({ "error": code, "message": self.to_string() });
        if let Self::Incomplete(failure) = &self {
            body["step"] = serde_json::json!(failure.step());
            if let ValidationFailure::MissingField { name, .. } = failure {
                body["field"] = serde_json::json!(name);
            }
        }

        (status, Json(body)).into_response()
    }
}
