//! Pending confirmation store.
//!
//! Tokens are single use: resolving a token removes it whether the action
//! is confirmed or cancelled.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::types::{Confirmation, GateError, PendingAction};
use crate::config::MAX_TTL_SECS;

#[derive(Debug)]
pub struct ConfirmationStore {
    pending: DashMap<Uuid, Confirmation>,
    ttl: Duration,
}

impl ConfirmationStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            pending: DashMap::new(),
            ttl: Duration::seconds(ttl_secs.clamp(1, MAX_TTL_SECS)),
        }
    }

    /// Hold `action` back until its token is resolved.
    pub fn request(
        &self,
        action: PendingAction,
        operator_id: Option<Uuid>,
        summary: impl Into<String>,
        warning: Option<String>,
    ) -> Confirmation {
        let now = Utc::now();
        let confirmation = Confirmation {
            token: Uuid::new_v4(),
            action,
            operator_id,
            summary: summary.into(),
            warning,
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.pending
            .insert(confirmation.token, confirmation.clone());
        tracing::debug!(token = %confirmation.token, summary = %confirmation.summary, "Confirmation requested");
        confirmation
    }

    /// Remove and return the confirmation for `token` if `caller` may resolve it.
    ///
    /// A token requested by an operator can only be taken by that operator;
    /// citizen tokens (`operator_id == None`) only by a citizen caller.
    pub fn take(
        &self,
        token: Uuid,
        caller: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Confirmation, GateError> {
        {
            let entry = self.pending.get(&token).ok_or(GateError::NotFound)?;
            if entry.operator_id != caller {
                return Err(GateError::WrongCaller);
            }
        }

        let (_, confirmation) = self.pending.remove(&token).ok_or(GateError::NotFound)?;
        if confirmation.expires_at <= now {
            return Err(GateError::Expired);
        }
        Ok(confirmation)
    }

    /// Drop every confirmation that expired before `now`.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, c| c.expires_at > now);
        before.saturating_sub(self.pending.len())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
