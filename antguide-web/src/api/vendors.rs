//! Vendor directory endpoint

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;

use antguide_common::db::models::Vendor;
use antguide_common::Error;

use crate::api::ApiError;
use crate::AppState;

/// GET /api/vendors
///
/// Vendors grouped by category, categories and vendors alphabetical.
pub async fn vendors_list(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Vec<Vendor>>>, ApiError> {
    let vendors: Vec<Vendor> =
        sqlx::query_as("SELECT * FROM vendors ORDER BY category, name")
            .fetch_all(&state.db)
            .await
            .map_err(Error::Database)?;

    let mut categories: BTreeMap<String, Vec<Vendor>> = BTreeMap::new();
    for vendor in vendors {
        categories.entry(vendor.category.clone()).or_default().push(vendor);
    }

    Ok(Json(categories))
}
