//! Review Queue
//!
//! Operator-facing list of submitted applications with search, filters,
//! pagination and guarded status transitions.

pub mod handlers;
pub mod seed;
pub mod store;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

pub use store::{NewApplication, ReviewQueue};
pub use types::{QueueError, QueueFilter, SortOrder};

/// Operator routes mounted under `/api/admin/applications`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_applications))
        .route("/stats", get(handlers::application_stats))
        .route(
            "/{id}",
            get(handlers::get_application).delete(handlers::delete_application),
        )
        .route("/{id}/claim", post(handlers::claim_application))
        .route("/{id}/approve", post(handlers::approve_application))
        .route("/{id}/reject", post(handlers::reject_application))
        .route("/{id}/request-info", post(handlers::request_info))
        .route("/{id}/request-payment", post(handlers::request_payment))
        .route("/{id}/complete", post(handlers::complete_application))
}

/// Citizen routes mounted under `/api/applications`.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/track/{tracking_code}", get(handlers::track_application))
        .route("/track/{tracking_code}/payment", post(handlers::pay_application))
}
