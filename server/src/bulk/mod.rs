//! Bulk Actions
//!
//! Apply one action to many queue rows at once. Every bulk action is held
//! behind the confirmation gate; it runs when the operator confirms.

pub mod export;
pub mod handlers;
pub mod types;

use axum::{routing::post, Router};
use natioid_common::StatusChange;
use uuid::Uuid;

use crate::api::AppState;
use crate::queue::{QueueError, ReviewQueue};

pub use types::{BulkAction, BulkError, BulkOutcome, BulkRequest, BulkResult, Selection};

/// Routes merged into `/api/admin/applications`.
pub fn router() -> Router<AppState> {
    Router::new().route("/bulk", post(handlers::bulk_action))
}

/// Turn a selection into a list of distinct record ids, first occurrence kept.
pub async fn resolve_selection(queue: &ReviewQueue, selection: &Selection) -> Vec<Uuid> {
    let ids = match selection {
        Selection::Ids { ids } => ids.clone(),
        Selection::Page { filter, page } => queue.page_ids(filter, *page).await,
        Selection::Filtered { filter } => queue.matching_ids(filter).await,
    };

    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Execute `action` on `ids`. Ids outside the list are never touched.
#[tracing::instrument(skip(queue, ids, note), fields(count = ids.len()))]
pub async fn run(
    queue: &ReviewQueue,
    action: BulkAction,
    ids: &[Uuid],
    note: Option<&str>,
    actor: Option<Uuid>,
) -> BulkResult {
    let result = match action {
        BulkAction::Approve => {
            let items = queue.transition_many(ids, &StatusChange::Approve, actor).await;
            let outcomes = items
                .iter()
                .map(|(id, result)| BulkOutcome::from_item(*id, result))
                .collect();
            BulkResult::new(action, outcomes, None)
        }
        BulkAction::RequestInfo => {
            let items = queue.request_info_many(ids, note, actor).await;
            let outcomes = items
                .iter()
                .map(|(id, result)| BulkOutcome::from_item(*id, result))
                .collect();
            BulkResult::new(action, outcomes, None)
        }
        BulkAction::Export => {
            let records = queue.records(ids).await;
            let outcomes = ids
                .iter()
                .map(|id| {
                    let found = records
                        .iter()
                        .find(|r| r.id == *id)
                        .cloned()
                        .ok_or(QueueError::NotFound);
                    BulkOutcome::from_item(*id, &found)
                })
                .collect();
            BulkResult::new(action, outcomes, Some(export::to_csv(&records)))
        }
    };

    tracing::info!(
        action = ?action,
        applied = result.applied,
        skipped = result.skipped,
        "Bulk action finished"
    );
    result
}
