//! Confirmation Gate
//!
//! Consequential actions are split in two: the first call validates and
//! returns a short-lived token, the second call confirms or declines it.
//! Declining changes nothing. A token resolves at most once.

mod execute;
pub mod handlers;
pub mod store;
pub mod types;

use axum::{routing::post, Router};

use crate::api::AppState;

pub use store::ConfirmationStore;
pub use types::{
    Confirmation, ConfirmationResponse, GateError, PendingAction, Resolution,
    ResolveConfirmationRequest,
};

/// Citizen route mounted under `/api/confirmations`.
pub fn public_router() -> Router<AppState> {
    Router::new().route("/{token}", post(handlers::resolve_citizen))
}

/// Operator route mounted under `/api/admin/confirmations`.
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/{token}", post(handlers::resolve_operator))
}
