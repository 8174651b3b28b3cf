//! Audit Trail
//!
//! Append-only record of every change made to submitted applications.
//! Entries are kept in memory, newest last.

pub mod handlers;

use chrono::{DateTime, Utc};
use natioid_common::ApplicationStatus;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// One audited action.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AuditEntry {
    pub id: Uuid,
    /// Operator that performed the action. `None` for citizen actions.
    pub actor_id: Option<Uuid>,
    /// Dotted action name, e.g. `application.approve`.
    pub action: String,
    pub record_id: Option<Uuid>,
    pub from_status: Option<ApplicationStatus>,
    pub to_status: Option<ApplicationStatus>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(action: impl Into<String>, actor_id: Option<Uuid>, record_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::now_v7(),
            actor_id,
            action: action.into(),
            record_id,
            from_status: None,
            to_status: None,
            details: None,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn with_transition(mut self, from: ApplicationStatus, to: ApplicationStatus) -> Self {
        self.from_status = Some(from);
        self.to_status = Some(to);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Audit log query parameters.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct AuditLogParams {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: usize,
    /// Filter by action prefix (e.g., "application." for all record actions).
    pub action: Option<String>,
    /// Only entries about this record.
    pub record_id: Option<Uuid>,
}

const fn default_limit() -> usize {
    50
}

/// A page of audit entries, newest first.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuditLogPage {
    pub items: Vec<AuditEntry>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// In-memory audit log.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, entry: AuditEntry) {
        tracing::debug!(action = %entry.action, record_id = ?entry.record_id, "audit");
        self.entries.write().await.push(entry);
    }

    pub async fn append_all(&self, entries: Vec<AuditEntry>) {
        if entries.is_empty() {
            return;
        }
        self.entries.write().await.extend(entries);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Return a page of entries matching `params`, newest first.
    pub async fn list(&self, params: &AuditLogParams) -> AuditLogPage {
        let limit = params.limit.clamp(1, 100);
        let offset = params.offset;
        let entries = self.entries.read().await;

        let matching: Vec<&AuditEntry> = entries
            .iter()
            .rev()
            .filter(|e| {
                params
                    .action
                    .as_deref()
                    .is_none_or(|prefix| e.action.starts_with(prefix))
            })
            .filter(|e| params.record_id.is_none_or(|id| e.record_id == Some(id)))
            .collect();

        AuditLogPage {
            total: matching.len(),
            items: matching
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
            limit,
            offset,
        }
    }
}
