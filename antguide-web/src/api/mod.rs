//! JSON API handlers
//!
//! Thin adapters over the queries and core operations; each handler maps the
//! common error taxonomy onto an HTTP status via [`ApiError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use antguide_common::Error;

mod flights;
mod forum;
mod health;
mod species;
mod suggestions;
mod vendors;

pub use flights::{flights_add, flights_list};
pub use forum::{
    forum_index, forum_post_create, forum_section_detail, forum_thread_create,
    forum_thread_detail,
};
pub use health::health_check;
pub use species::{
    add_to_compare, clear_compare, compare_list, species_detail, species_list, toggle_bookmark,
};
pub use suggestions::{suggestion_list, suggestion_review, suggestion_submit};
pub use vendors::vendors_list;

/// HTTP adapter for the common error taxonomy
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Authorization(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidState(_) | Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::Internal(_) => {
                error!(error = %self.0, "Internal error while handling request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}
