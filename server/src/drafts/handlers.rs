//! Citizen-facing wizard handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::types::{
    CreateDraftRequest, DraftError, DraftResponse, ImageRef, ImageSide, SelectDocumentTypeRequest,
    SelectReasonRequest, SelectReasonResponse, SetFieldsRequest, SubmitResponse,
};
use crate::api::AppState;
use crate::gate::{ConfirmationResponse, PendingAction};
use crate::util::format_size;

/// POST /api/drafts
/// Start a new application.
#[tracing::instrument(skip(state))]
pub async fn create_draft(
    State(state): State<AppState>,
    Json(body): Json<CreateDraftRequest>,
) -> (StatusCode, Json<DraftResponse>) {
    let draft = state.drafts.create(body.application_type);
    tracing::info!(draft_id = %draft.id, application_type = %draft.application_type, "Draft created");
    (StatusCode::CREATED, Json(draft.into()))
}

/// GET /api/drafts/{id}
#[tracing::instrument(skip(state))]
pub async fn get_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<DraftResponse>, DraftError> {
    Ok(Json(state.drafts.get(draft_id)?.into()))
}

/// DELETE /api/drafts/{id}
/// Abandon the application.
#[tracing::instrument(skip(state))]
pub async fn discard_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<StatusCode, DraftError> {
    state.drafts.remove(draft_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/drafts/{id}/document-type
#[tracing::instrument(skip(state))]
pub async fn select_document_type(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(body): Json<SelectDocumentTypeRequest>,
) -> Result<Json<DraftResponse>, DraftError> {
    let draft = state.drafts.update(draft_id, |d| {
        d.select_document_type(body.document_type, Utc::now());
        Ok(())
    })?;
    Ok(Json(draft.into()))
}

/// PUT /api/drafts/{id}/images/{side}
#[tracing::instrument(skip(state, body))]
pub async fn put_image(
    State(state): State<AppState>,
    Path((draft_id, side)): Path<(Uuid, ImageSide)>,
    Json(body): Json<ImageRef>,
) -> Result<Json<DraftResponse>, DraftError> {
    body.validate()?;

    let max = state.config.max_image_size as u64;
    if body.size_bytes > max {
        return Err(DraftError::Validation(format!(
            "Image exceeds maximum size of {}",
            format_size(max)
        )));
    }

    let draft = state.drafts.update(draft_id, |d| {
        d.set_image(side, Some(body), Utc::now());
        Ok(())
    })?;
    Ok(Json(draft.into()))
}

/// DELETE /api/drafts/{id}/images/{side}
#[tracing::instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path((draft_id, side)): Path<(Uuid, ImageSide)>,
) -> Result<Json<DraftResponse>, DraftError> {
    let draft = state.drafts.update(draft_id, |d| {
        d.set_image(side, None, Utc::now());
        Ok(())
    })?;
    Ok(Json(draft.into()))
}

/// PATCH /api/drafts/{id}/fields
/// Merge field values for the selected document type.
#[tracing::instrument(skip(state, body))]
pub async fn set_fields(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(body): Json<SetFieldsRequest>,
) -> Result<Json<DraftResponse>, DraftError> {
    let draft = state
        .drafts
        .update(draft_id, |d| d.set_fields(body.fields, Utc::now()))?;
    Ok(Json(draft.into()))
}

/// PUT /api/drafts/{id}/reason
///
/// Ordinary reasons apply immediately. Special-action reasons return
/// `202 Accepted` with a confirmation token; the reason is applied only when
/// the token is confirmed.
#[tracing::instrument(skip(state))]
pub async fn select_reason(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(body): Json<SelectReasonRequest>,
) -> Result<(StatusCode, Json<SelectReasonResponse>), DraftError> {
    body.validate()?;

    let draft = state.drafts.get(draft_id)?;
    let option = draft.reason_option(&body.reason_id)?;

    if option.special_action {
        let confirmation = state.confirmations.request(
            PendingAction::SelectReason {
                draft_id,
                reason_id: option.id.to_string(),
            },
            None,
            format!("Select reason: {}", option.label),
            option.warning.map(str::to_string),
        );
        return Ok((
            StatusCode::ACCEPTED,
            Json(SelectReasonResponse::ConfirmationRequired {
                confirmation: ConfirmationResponse::from(&confirmation),
            }),
        ));
    }

    let draft = state
        .drafts
        .update(draft_id, |d| d.apply_reason(option.id, Utc::now()))?;
    Ok((
        StatusCode::OK,
        Json(SelectReasonResponse::Applied {
            draft: draft.into(),
        }),
    ))
}

/// POST /api/drafts/{id}/submit
/// Validate the draft and hand it to the review queue.
#[tracing::instrument(skip(state))]
pub async fn submit_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmitResponse>), DraftError> {
    let draft = state.drafts.take_complete(draft_id)?;
    let record = state.queue.submit(draft.into_submission()?).await;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            record_id: record.id,
            tracking_code: record.tracking_code,
        }),
    ))
}
