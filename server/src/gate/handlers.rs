//! Confirmation handlers.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::execute::execute;
use super::types::{GateError, ResolveConfirmationRequest, Resolution};
use crate::api::AppState;
use crate::operator::Operator;

async fn resolve(
    state: &AppState,
    token: Uuid,
    caller: Option<Uuid>,
    confirm: bool,
) -> Result<Resolution, GateError> {
    let confirmation = state.confirmations.take(token, caller, Utc::now())?;

    if !confirm {
        tracing::info!(token = %token, summary = %confirmation.summary, "Confirmation declined");
        return Ok(Resolution::Cancelled);
    }

    tracing::info!(token = %token, summary = %confirmation.summary, "Confirmation accepted");
    let result = execute(state, confirmation).await?;
    Ok(Resolution::Executed { result })
}

/// POST /api/confirmations/{token}
/// Citizen answer to a special-reason confirmation.
#[tracing::instrument(skip(state))]
pub async fn resolve_citizen(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    Json(body): Json<ResolveConfirmationRequest>,
) -> Result<Json<Resolution>, GateError> {
    Ok(Json(resolve(&state, token, None, body.confirm).await?))
}

/// POST /api/admin/confirmations/{token}
/// Operator answer to a gated queue or bulk action.
#[tracing::instrument(skip(state))]
pub async fn resolve_operator(
    State(state): State<AppState>,
    Extension(operator): Extension<Operator>,
    Path(token): Path<Uuid>,
    Json(body): Json<ResolveConfirmationRequest>,
) -> Result<Json<Resolution>, GateError> {
    Ok(Json(resolve(&state, token, Some(operator.id), body.confirm).await?))
}
