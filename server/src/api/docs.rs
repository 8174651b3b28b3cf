//! OpenAPI document.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use super::{catalog, AppState};
use crate::{audit, bulk, drafts, gate, queue};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "NatioID API",
        description = "Identity-document applications: citizen wizard, tracking and operator review."
    ),
    components(schemas(
        natioid_common::DocumentType,
        natioid_common::FieldKind,
        natioid_common::ApplicationType,
        natioid_common::ApplicationStatus,
        natioid_common::ApplicationRecord,
        catalog::DocumentTypeInfo,
        catalog::FieldInfo,
        catalog::DocumentFields,
        catalog::ReasonInfo,
        catalog::ReasonList,
        drafts::types::ImageSide,
        drafts::types::ImageRef,
        drafts::types::DraftImages,
        drafts::types::DraftStep,
        drafts::types::ApplicationDraft,
        drafts::types::DraftResponse,
        drafts::types::CreateDraftRequest,
        drafts::types::SelectDocumentTypeRequest,
        drafts::types::SetFieldsRequest,
        drafts::types::SelectReasonRequest,
        drafts::types::SubmitResponse,
        queue::SortOrder,
        queue::QueueFilter,
        queue::types::RejectRequest,
        queue::types::RequestInfoRequest,
        queue::types::RequestPaymentRequest,
        queue::types::InfoRequest,
        queue::types::ApplicationSummary,
        queue::types::ApplicationDetail,
        queue::types::TrackingResponse,
        queue::types::PaginatedApplications,
        queue::types::QueueStats,
        bulk::BulkAction,
        bulk::Selection,
        bulk::BulkRequest,
        bulk::BulkOutcome,
        bulk::BulkResult,
        gate::ConfirmationResponse,
        gate::ResolveConfirmationRequest,
        audit::AuditEntry,
        audit::AuditLogPage,
    ))
)]
pub struct ApiDoc;

/// `GET /api/openapi.json`
pub fn router() -> Router<AppState> {
    Router::new().route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}
