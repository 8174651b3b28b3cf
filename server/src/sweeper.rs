//! Expiry sweeper for drafts and pending confirmations.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::api::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the background task that drops idle drafts and stale confirmations.
///
/// The first tick is consumed immediately so nothing is swept at startup.
pub fn spawn_expiry_task(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            sweep(&state, Utc::now());
        }
    })
}

/// Run one sweep. Returns `(drafts, confirmations)` removed.
#[tracing::instrument(skip(state))]
pub fn sweep(state: &AppState, now: DateTime<Utc>) -> (usize, usize) {
    let drafts = state.drafts.purge_expired(now);
    let confirmations = state.confirmations.purge_expired(now);
    if drafts + confirmations > 0 {
        tracing::info!(drafts, confirmations, "Expired entries swept");
    }
    (drafts, confirmations)
}
