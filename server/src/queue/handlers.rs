//! Review queue handlers.
//!
//! Approve, reject, request-info and delete are confirmation-gated: the call
//! only validates the action and returns `202 Accepted` with a token. The
//! record changes when the token is confirmed through
//! `POST /api/admin/confirmations/{token}`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use natioid_common::StatusChange;
use uuid::Uuid;
use validator::Validate;

use super::types::{
    ApplicationDetail, ListApplicationsQuery, PaginatedApplications, QueueError, QueueStats,
    RejectRequest, RequestInfoRequest, RequestPaymentRequest, TrackingResponse,
};
use crate::api::AppState;
use crate::gate::{ConfirmationResponse, PendingAction};
use crate::operator::Operator;
use crate::util::format_fee;

type Gated = (StatusCode, Json<ConfirmationResponse>);

fn gate(
    state: &AppState,
    operator: Operator,
    action: PendingAction,
    summary: String,
    warning: Option<&str>,
) -> Gated {
    let confirmation =
        state
            .confirmations
            .request(action, Some(operator.id), summary, warning.map(str::to_string));
    (
        StatusCode::ACCEPTED,
        Json(ConfirmationResponse::from(&confirmation)),
    )
}

/// GET /api/admin/applications
/// Filtered, paginated queue listing.
#[tracing::instrument(skip(state))]
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ListApplicationsQuery>,
) -> Json<PaginatedApplications> {
    Json(state.queue.list(&query.filter(), query.page).await)
}

/// GET /api/admin/applications/stats
/// Record counts by status.
#[tracing::instrument(skip(state))]
pub async fn application_stats(State(state): State<AppState>) -> Json<QueueStats> {
    Json(state.queue.stats().await)
}

/// GET /api/admin/applications/{id}
#[tracing::instrument(skip(state))]
pub async fn get_application(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<ApplicationDetail>, QueueError> {
    Ok(Json(state.queue.get(record_id).await?))
}

/// POST /api/admin/applications/{id}/claim
/// Take a pending application into review.
#[tracing::instrument(skip(state))]
pub async fn claim_application(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<ApplicationDetail>, QueueError> {
    let detail = state
        .queue
        .transition(
            record_id,
            StatusChange::BeginReview {
                operator_id: operator.id,
            },
            Some(operator.id),
        )
        .await?;
    Ok(Json(detail))
}

/// POST /api/admin/applications/{id}/approve
#[tracing::instrument(skip(state))]
pub async fn approve_application(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(record_id): Path<Uuid>,
) -> Result<Gated, QueueError> {
    state
        .queue
        .check_transition(record_id, &StatusChange::Approve)
        .await?;
    let record = state.queue.get(record_id).await?.record;

    Ok(gate(
        &state,
        operator,
        PendingAction::Approve { record_id },
        format!("Approve application {} ({})", record.tracking_code, record.applicant_name),
        None,
    ))
}

/// POST /api/admin/applications/{id}/reject
#[tracing::instrument(skip(state))]
pub async fn reject_application(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(record_id): Path<Uuid>,
    Json(body): Json<RejectRequest>,
) -> Result<Gated, QueueError> {
    body.validate()?;
    let change = StatusChange::Reject {
        reason: body.reason.clone(),
    };
    state.queue.check_transition(record_id, &change).await?;
    let record = state.queue.get(record_id).await?.record;

    Ok(gate(
        &state,
        operator,
        PendingAction::Reject {
            record_id,
            reason: body.reason,
        },
        format!("Reject application {} ({})", record.tracking_code, record.applicant_name),
        Some("The applicant will have to submit a new application."),
    ))
}

/// POST /api/admin/applications/{id}/request-info
#[tracing::instrument(skip(state))]
pub async fn request_info(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(record_id): Path<Uuid>,
    Json(body): Json<RequestInfoRequest>,
) -> Result<Gated, QueueError> {
    body.validate()?;
    state.queue.check_request_info(record_id).await?;
    let record = state.queue.get(record_id).await?.record;

    Ok(gate(
        &state,
        operator,
        PendingAction::RequestInfo {
            record_id,
            note: body.note,
        },
        format!("Request more information for {}", record.tracking_code),
        Some("Information can only be requested once per application."),
    ))
}

/// POST /api/admin/applications/{id}/request-payment
#[tracing::instrument(skip(state))]
pub async fn request_payment(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(record_id): Path<Uuid>,
    Json(body): Json<RequestPaymentRequest>,
) -> Result<Json<ApplicationDetail>, QueueError> {
    body.validate()?;
    let detail = state
        .queue
        .transition(
            record_id,
            StatusChange::RequestPayment { fee: body.fee },
            Some(operator.id),
        )
        .await?;
    tracing::info!(record_id = %record_id, fee = %format_fee(body.fee), "Payment requested");
    Ok(Json(detail))
}

/// POST /api/admin/applications/{id}/complete
/// Mark an approved application as issued.
#[tracing::instrument(skip(state))]
pub async fn complete_application(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<ApplicationDetail>, QueueError> {
    let detail = state
        .queue
        .transition(record_id, StatusChange::Complete, Some(operator.id))
        .await?;
    Ok(Json(detail))
}

/// DELETE /api/admin/applications/{id}
#[tracing::instrument(skip(state))]
pub async fn delete_application(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(record_id): Path<Uuid>,
) -> Result<Gated, QueueError> {
    let record = state.queue.get(record_id).await?.record;

    Ok(gate(
        &state,
        operator,
        PendingAction::Delete { record_id },
        format!("Delete application {} ({})", record.tracking_code, record.applicant_name),
        Some("The application record will be permanently removed."),
    ))
}

/// GET /api/applications/track/{tracking_code}
/// Citizen status lookup.
#[tracing::instrument(skip(state))]
pub async fn track_application(
    State(state): State<AppState>,
    Path(tracking_code): Path<String>,
) -> Result<Json<TrackingResponse>, QueueError> {
    Ok(Json(state.queue.track(&tracking_code).await?))
}

/// POST /api/applications/track/{tracking_code}/payment
/// Citizen pays the outstanding fee; the application is approved.
#[tracing::instrument(skip(state))]
pub async fn pay_application(
    State(state): State<AppState>,
    Path(tracking_code): Path<String>,
) -> Result<Json<TrackingResponse>, QueueError> {
    Ok(Json(state.queue.record_payment(&tracking_code).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn gate_creates_a_token_for_the_operator() {
        let state = AppState::new(Config::default_for_test());
        let operator = Operator { id: Uuid::new_v4() };
        let (status, Json(response)) = gate(
            &state,
            operator,
            PendingAction::Approve {
                record_id: Uuid::new_v4(),
            },
            "Approve".into(),
            None,
        );
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(state.confirmations.len(), 1);
        assert!(state
            .confirmations
            .take(response.token, Some(operator.id), chrono::Utc::now())
            .is_ok());
    }
}
