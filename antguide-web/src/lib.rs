//! antguide-web library - HTTP service for the AntGuide community site
//!
//! Species encyclopedia, nuptial flight log, vendor directory, forum, and
//! the species-suggestion moderation workflow, served as a JSON API.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod auth;
pub mod compare;
pub mod images;
pub mod suggestions;

use compare::CompareTray;
use images::ImageResolver;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// External image resolution chain
    pub images: Arc<ImageResolver>,
    /// Per-user species compare tray (in-memory, not persisted)
    pub compare: CompareTray,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, images: ImageResolver) -> Self {
        Self {
            db,
            images: Arc::new(images),
            compare: CompareTray::default(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health_check))
        .route("/api/species", get(api::species_list))
        .route("/api/species/:slug", get(api::species_detail))
        .route("/api/species/:slug/bookmark", post(api::toggle_bookmark))
        .route("/api/species/:slug/compare", post(api::add_to_compare))
        .route("/api/compare", get(api::compare_list))
        .route("/api/compare/clear", post(api::clear_compare))
        .route("/api/flights", get(api::flights_list).post(api::flights_add))
        .route("/api/vendors", get(api::vendors_list))
        .route("/api/forum", get(api::forum_index))
        .route("/api/forum/:slug", get(api::forum_section_detail))
        .route("/api/forum/:slug/threads", post(api::forum_thread_create))
        .route(
            "/api/threads/:id",
            get(api::forum_thread_detail).post(api::forum_post_create),
        )
        .route(
            "/api/suggestions",
            post(api::suggestion_submit).get(api::suggestion_list),
        )
        .route("/api/suggestions/:id/review", post(api::suggestion_review))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
