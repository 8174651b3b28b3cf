//! API Router and Application State
//!
//! Central routing configuration and shared state.

pub mod catalog;
pub mod docs;

use axum::{
    extract::DefaultBodyLimit, extract::State, middleware::from_fn_with_state, routing::get, Json,
    Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    audit::{self, AuditLog},
    bulk,
    config::Config,
    drafts::{self, DraftStore},
    gate::{self, ConfirmationStore},
    operator::require_operator,
    queue::{self, seed, ReviewQueue},
};

/// JSON bodies only carry image references, never image data.
const MAX_BODY_SIZE: usize = 256 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// In-progress citizen applications
    pub drafts: Arc<DraftStore>,
    /// Submitted applications under review
    pub queue: Arc<ReviewQueue>,
    /// Actions waiting for confirmation
    pub confirmations: Arc<ConfirmationStore>,
    /// Record of queue mutations
    pub audit: Arc<AuditLog>,
}

impl AppState {
    /// Create new application state, seeding the demo records when enabled.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let audit = Arc::new(AuditLog::new());
        let records = if config.seed_fixtures {
            seed::fixtures(Utc::now())
        } else {
            Vec::new()
        };
        let queue = ReviewQueue::with_records(audit.clone(), config.queue_page_size, records);

        Self {
            drafts: Arc::new(DraftStore::new(config.draft_ttl_secs)),
            queue: Arc::new(queue),
            confirmations: Arc::new(ConfirmationStore::new(config.confirmation_ttl_secs)),
            audit,
            config: Arc::new(config),
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Operator routes, attributed via the X-Operator-Id header
    let admin_routes = Router::new()
        .nest(
            "/applications",
            queue::admin_router().merge(bulk::router()),
        )
        .nest("/confirmations", gate::admin_router())
        .route("/audit-log", get(audit::handlers::get_audit_log))
        .layer(from_fn_with_state(state.clone(), require_operator));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Catalog
        .route("/api/document-types", get(catalog::list_document_types))
        .route(
            "/api/document-types/{document_type}/fields",
            get(catalog::document_fields),
        )
        .route(
            "/api/application-types/{application_type}/reasons",
            get(catalog::application_reasons),
        )
        // Citizen wizard and tracking
        .nest("/api/drafts", drafts::router())
        .nest("/api/applications", queue::public_router())
        .nest("/api/confirmations", gate::public_router())
        // Operators
        .nest("/api/admin", admin_routes)
        // API documentation
        .merge(docs::router())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Applications in the review queue
    applications: usize,
    /// Drafts in progress
    drafts: usize,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        applications: state.queue.stats().await.total,
        drafts: state.drafts.len(),
    })
}
