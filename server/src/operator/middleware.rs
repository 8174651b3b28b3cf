//! Operator identification middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use super::types::{Operator, OperatorError};
use super::OPERATOR_HEADER;
use crate::api::AppState;

/// Middleware that requires a known operator on the request.
///
/// Inserts an [`Operator`] extension for downstream handlers.
#[tracing::instrument(skip(state, request, next))]
pub async fn require_operator(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, OperatorError> {
    let raw = request
        .headers()
        .get(OPERATOR_HEADER)
        .ok_or(OperatorError::Missing)?
        .to_str()
        .map_err(|_| OperatorError::Malformed)?;

    let id = Uuid::parse_str(raw.trim()).map_err(|_| OperatorError::Malformed)?;

    if !state.config.is_operator_allowed(id) {
        tracing::warn!(operator_id = %id, "Rejected operator not on allowlist");
        return Err(OperatorError::NotAllowed);
    }

    request.extensions_mut().insert(Operator { id });

    Ok(next.run(request).await)
}
