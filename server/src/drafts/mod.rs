//! Application Drafts
//!
//! The citizen wizard builds an application step by step: document type,
//! images, field values, reason. Drafts live on the server, keyed by id,
//! until they are submitted to the review queue or discarded.

mod draft;
pub mod handlers;
pub mod store;
pub mod types;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::api::AppState;

pub use store::DraftStore;
pub use types::{ApplicationDraft, DraftError, DraftStep, ValidationFailure};

/// Routes mounted under `/api/drafts`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_draft))
        .route(
            "/{id}",
            get(handlers::get_draft).delete(handlers::discard_draft),
        )
        .route("/{id}/document-type", put(handlers::select_document_type))
        .route(
            "/{id}/images/{side}",
            put(handlers::put_image).delete(handlers::delete_image),
        )
        .route("/{id}/fields", axum::routing::patch(handlers::set_fields))
        .route("/{id}/reason", put(handlers::select_reason))
        .route("/{id}/submit", post(handlers::submit_draft))
}
