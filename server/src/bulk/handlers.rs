//! Bulk action handlers.

use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use super::resolve_selection;
use super::types::{BulkError, BulkRequest};
use crate::api::AppState;
use crate::gate::{ConfirmationResponse, PendingAction};
use crate::operator::Operator;

/// POST /api/admin/applications/bulk
///
/// Resolves the selection now and returns `202 Accepted` with a
/// confirmation token. The action runs against exactly the resolved ids
/// once the token is confirmed.
#[tracing::instrument(skip(state, body))]
pub async fn bulk_action(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Json(body): Json<BulkRequest>,
) -> Result<(StatusCode, Json<ConfirmationResponse>), BulkError> {
    body.validate()?;

    let ids = resolve_selection(&state.queue, &body.selection).await;
    if ids.is_empty() {
        return Err(BulkError::EmptySelection);
    }

    let plural = if ids.len() == 1 { "" } else { "s" };
    let summary = format!("{} {} application{plural}", body.action.verb(), ids.len());
    let warning = body
        .action
        .modifies_records()
        .then(|| format!("This affects {} application{plural} at once.", ids.len()));

    let confirmation = state.confirmations.request(
        PendingAction::Bulk {
            action: body.action,
            ids,
            note: body.note,
        },
        Some(operator.id),
        summary,
        warning,
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(ConfirmationResponse::from(&confirmation)),
    ))
}
