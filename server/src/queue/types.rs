//! Review Queue Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use natioid_common::{ApplicationRecord, ApplicationStatus, ApplicationType, DocumentType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Filtering
// ============================================================================

/// Sort order of the queue listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Name,
}

/// Filters applied to the queue. All set filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QueueFilter {
    /// Case-insensitive substring of applicant name, record id or tracking code.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default)]
    pub application_type: Option<ApplicationType>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl QueueFilter {
    /// Whether `record` passes every filter that is set.
    pub fn matches(&self, record: &ApplicationRecord) -> bool {
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self
            .application_type
            .is_some_and(|t| t != record.application_type)
        {
            return false;
        }
        match self.q.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                record.applicant_name.to_lowercase().contains(&needle)
                    || record.id.to_string().contains(&needle)
                    || record.tracking_code.to_lowercase().contains(&needle)
            }
        }
    }
}

/// Query string of `GET /api/admin/applications`.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct ListApplicationsQuery {
    pub q: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub application_type: Option<ApplicationType>,
    #[serde(default)]
    pub sort: SortOrder,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: usize,
}

const fn default_page() -> usize {
    1
}

impl ListApplicationsQuery {
    pub fn filter(&self) -> QueueFilter {
        QueueFilter {
            q: self.q.clone(),
            status: self.status,
            application_type: self.application_type,
            sort: self.sort,
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct RejectRequest {
    #[validate(length(min = 1, max = 500, message = "Rejection reason must be 1-500 characters"))]
    pub reason: String,
}

#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct RequestInfoRequest {
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct RequestPaymentRequest {
    /// Fee in minor currency units.
    #[validate(range(min = 1, message = "Fee must be greater than zero"))]
    pub fee: u64,
}

// ============================================================================
// Response Types
// ============================================================================

/// Outstanding request for more information on a record.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct InfoRequest {
    pub note: Option<String>,
    pub requested_by: Option<Uuid>,
    pub requested_at: DateTime<Utc>,
}

/// Queue row.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ApplicationSummary {
    pub id: Uuid,
    pub tracking_code: String,
    pub applicant_name: String,
    pub application_type: ApplicationType,
    pub document_type: DocumentType,
    pub status: ApplicationStatus,
    pub info_requested: bool,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationSummary {
    pub fn new(r: &ApplicationRecord, info_requested: bool) -> Self {
        Self {
            id: r.id,
            tracking_code: r.tracking_code.clone(),
            applicant_name: r.applicant_name.clone(),
            application_type: r.application_type,
            document_type: r.document_type,
            status: r.status,
            info_requested,
            submitted_at: r.submitted_at,
            updated_at: r.updated_at,
        }
    }
}

/// Full record plus side-table state.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub record: ApplicationRecord,
    pub info_request: Option<InfoRequest>,
    /// Statuses the record can move to next.
    pub allowed_transitions: Vec<ApplicationStatus>,
}

/// Citizen-facing view of an application.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TrackingResponse {
    pub tracking_code: String,
    pub application_type: ApplicationType,
    pub document_type: DocumentType,
    pub status: ApplicationStatus,
    pub fee: Option<u64>,
    pub fee_paid_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    /// Present while the review team waits for more information.
    pub info_requested: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TrackingResponse {
    pub fn new(r: &ApplicationRecord, info: Option<&InfoRequest>) -> Self {
        Self {
            tracking_code: r.tracking_code.clone(),
            application_type: r.application_type,
            document_type: r.document_type,
            status: r.status,
            fee: r.fee,
            fee_paid_at: r.fee_paid_at,
            rejection_reason: r.rejection_reason.clone(),
            info_requested: info.map(|i| i.note.clone().unwrap_or_default()),
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PaginatedApplications {
    pub items: Vec<ApplicationSummary>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct QueueStats {
    pub pending: usize,
    pub under_review: usize,
    pub pending_payment: usize,
    pub approved: usize,
    pub rejected: usize,
    pub completed: usize,
    pub total: usize,
}

impl QueueStats {
    pub fn count(&mut self, status: ApplicationStatus) {
        let slot = match status {
            ApplicationStatus::Pending => &mut self.pending,
            ApplicationStatus::UnderReview => &mut self.under_review,
            ApplicationStatus::PendingPayment => &mut self.pending_payment,
            ApplicationStatus::Approved => &mut self.approved,
            ApplicationStatus::Rejected => &mut self.rejected,
            ApplicationStatus::Completed => &mut self.completed,
        };
        *slot += 1;
        self.total += 1;
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Application not found")]
    NotFound,

    #[error("Information has already been requested for this application")]
    InfoAlreadyRequested,

    #[error("Information cannot be requested while the application is {0}")]
    InfoNotAccepted(ApplicationStatus),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Rule(#[from] natioid_common::Error),
}

impl QueueError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InfoAlreadyRequested | Self::InfoNotAccepted(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Rule(
                natioid_common::Error::MissingRejectionReason | natioid_common::Error::InvalidFee,
            ) => StatusCode::BAD_REQUEST,
            Self::Rule(_) => StatusCode::CONFLICT,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "APPLICATION_NOT_FOUND",
            Self::InfoAlreadyRequested => "INFO_ALREADY_REQUESTED",
            Self::InfoNotAccepted(_) => "INFO_NOT_ACCEPTED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Rule(natioid_common::Error::InvalidTransition { .. }) => "INVALID_TRANSITION",
            Self::Rule(natioid_common::Error::PaymentOutstanding) => "PAYMENT_OUTSTANDING",
            Self::Rule(natioid_common::Error::NoPaymentDue) => "NO_PAYMENT_DUE",
            Self::Rule(_) => "VALIDATION_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for QueueError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for QueueError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(serde_json::json!({ "error": self.code(), "message": self.to_string() })),
        )
            .into_response()
    }
}
