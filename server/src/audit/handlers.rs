//! Audit log handlers.

use axum::{
    extract::{Query, State},
    Json,
};

use super::{AuditLogPage, AuditLogParams};
use crate::api::AppState;

/// GET /api/admin/audit-log
/// Newest-first audit entries with optional action prefix and record filter.
#[tracing::instrument(skip(state))]
pub async fn get_audit_log(
    State(state): State<AppState>,
    Query(params): Query<AuditLogParams>,
) -> Json<AuditLogPage> {
    Json(state.audit.list(&params).await)
}
