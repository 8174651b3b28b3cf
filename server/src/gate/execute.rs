//! Execution of confirmed actions.

use chrono::Utc;
use natioid_common::StatusChange;

use super::types::{Confirmation, GateError, PendingAction};
use crate::api::AppState;
use crate::bulk;
use crate::drafts::types::DraftResponse;

/// Run a confirmed action and return its result as JSON.
///
/// The action is re-validated against current state; a record that changed
/// since the confirmation was requested fails with the usual domain error.
#[tracing::instrument(skip(state, confirmation), fields(token = %confirmation.token))]
pub async fn execute(
    state: &AppState,
    confirmation: Confirmation,
) -> Result<serde_json::Value, GateError> {
    let actor = confirmation.operator_id;

    let value = match confirmation.action {
        PendingAction::SelectReason {
            draft_id,
            reason_id,
        } => {
            let draft = state
                .drafts
                .update(draft_id, |d| d.apply_reason(&reason_id, Utc::now()))?;
            serde_json::to_value(DraftResponse::from(draft))?
        }
        PendingAction::Approve { record_id } => {
            let detail = state
                .queue
                .transition(record_id, StatusChange::Approve, actor)
                .await?;
            serde_json::to_value(detail)?
        }
        PendingAction::Reject { record_id, reason } => {
            let detail = state
                .queue
                .transition(record_id, StatusChange::Reject { reason }, actor)
                .await?;
            serde_json::to_value(detail)?
        }
        PendingAction::RequestInfo { record_id, note } => {
            let detail = state.queue.request_info(record_id, note, actor).await?;
            serde_json::to_value(detail)?
        }
        PendingAction::Delete { record_id } => {
            let record = state.queue.delete(record_id, actor).await?;
            serde_json::to_value(record)?
        }
        PendingAction::Bulk { action, ids, note } => {
            let result = bulk::run(&state.queue, action, &ids, note.as_deref(), actor).await;
            serde_json::to_value(result)?
        }
    };

    Ok(value)
}
