//! Species catalog endpoints: listing with filters, detail view with
//! external image fallback, bookmarks, and the compare tray.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use antguide_common::db::models::{ForumThread, NuptialFlight, Species, SpeciesCare, Vendor};
use antguide_common::Error;

use crate::api::ApiError;
use crate::auth::Requester;
use crate::AppState;

/// Filter parameters for the species list
#[derive(Debug, Deserialize)]
pub struct SpeciesQuery {
    /// Substring match against genus, species, and common name
    pub q: Option<String>,
    pub difficulty: Option<String>,
    pub region: Option<String>,
    pub founding_mode: Option<String>,
    pub diapause: Option<String>,
}

/// GET /api/species
pub async fn species_list(
    State(state): State<AppState>,
    Query(query): Query<SpeciesQuery>,
) -> Result<Json<Vec<Species>>, ApiError> {
    let mut sql = String::from("SELECT * FROM species WHERE 1=1");
    let mut binds: Vec<String> = Vec::new();

    if let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) {
        sql.push_str(" AND (genus LIKE ? OR species LIKE ? OR common_name LIKE ?)");
        let pattern = format!("%{}%", q);
        binds.push(pattern.clone());
        binds.push(pattern.clone());
        binds.push(pattern);
    }
    for (column, value) in [
        ("difficulty", &query.difficulty),
        ("region", &query.region),
        ("founding_mode", &query.founding_mode),
        ("diapause", &query.diapause),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            sql.push_str(&format!(" AND {} = ?", column));
            binds.push(value.to_string());
        }
    }
    sql.push_str(" ORDER BY genus, species");

    let mut fetch = sqlx::query_as::<_, Species>(&sql);
    for bind in &binds {
        fetch = fetch.bind(bind);
    }
    let species = fetch.fetch_all(&state.db).await.map_err(Error::Database)?;

    Ok(Json(species))
}

/// Species detail view
#[derive(Debug, Serialize)]
pub struct SpeciesDetailResponse {
    pub species: Species,
    pub care: Option<SpeciesCare>,
    pub flights: Vec<NuptialFlight>,
    pub threads: Vec<ForumThread>,
    pub vendors: Vec<Vendor>,
    pub is_bookmarked: bool,
    pub in_compare: bool,
    /// Externally resolved fallback photo; null when the species has a
    /// curated thumbnail or when both external sources miss
    pub external_image_url: Option<String>,
}

/// GET /api/species/:slug
pub async fn species_detail(
    State(state): State<AppState>,
    requester: Option<Requester>,
    Path(slug): Path<String>,
) -> Result<Json<SpeciesDetailResponse>, ApiError> {
    let species = fetch_species(&state, &slug).await?;

    let care: Option<SpeciesCare> =
        sqlx::query_as("SELECT * FROM species_care WHERE species_id = ?")
            .bind(species.id)
            .fetch_optional(&state.db)
            .await
            .map_err(Error::Database)?;

    let flights: Vec<NuptialFlight> = sqlx::query_as(
        "SELECT * FROM nuptial_flights WHERE species_id = ?
         ORDER BY date DESC, created_at DESC LIMIT 5",
    )
    .bind(species.id)
    .fetch_all(&state.db)
    .await
    .map_err(Error::Database)?;

    let threads: Vec<ForumThread> = sqlx::query_as(
        "SELECT * FROM forum_threads WHERE species_id = ?
         ORDER BY updated_at DESC LIMIT 5",
    )
    .bind(species.id)
    .fetch_all(&state.db)
    .await
    .map_err(Error::Database)?;

    let vendors: Vec<Vendor> = sqlx::query_as(
        "SELECT v.* FROM vendors v
         JOIN vendor_species vs ON vs.vendor_id = v.id
         WHERE vs.species_id = ? ORDER BY v.name",
    )
    .bind(species.id)
    .fetch_all(&state.db)
    .await
    .map_err(Error::Database)?;

    let (is_bookmarked, in_compare) = match &requester {
        Some(requester) => {
            let bookmark: Option<i64> = sqlx::query_scalar(
                "SELECT id FROM species_bookmarks WHERE user_id = ? AND species_id = ?",
            )
            .bind(requester.id)
            .bind(species.id)
            .fetch_optional(&state.db)
            .await
            .map_err(Error::Database)?;
            (
                bookmark.is_some(),
                state.compare.contains(requester.id, species.id),
            )
        }
        None => (false, false),
    };

    // Curated thumbnail wins; only species without one go out to the
    // external chain, and a miss simply renders without an image.
    let external_image_url = if species.thumbnail.is_none() {
        state.images.resolve(&species.genus, &species.species).await
    } else {
        None
    };

    Ok(Json(SpeciesDetailResponse {
        species,
        care,
        flights,
        threads,
        vendors,
        is_bookmarked,
        in_compare,
        external_image_url,
    }))
}

#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub species_id: i64,
    pub bookmarked: bool,
}

/// POST /api/species/:slug/bookmark
///
/// Toggles bookmark membership for the requester.
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    requester: Requester,
    Path(slug): Path<String>,
) -> Result<Json<BookmarkResponse>, ApiError> {
    let species = fetch_species(&state, &slug).await?;

    let existing: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM species_bookmarks WHERE user_id = ? AND species_id = ?",
    )
    .bind(requester.id)
    .bind(species.id)
    .fetch_optional(&state.db)
    .await
    .map_err(Error::Database)?;

    let bookmarked = match existing {
        Some(id) => {
            sqlx::query("DELETE FROM species_bookmarks WHERE id = ?")
                .bind(id)
                .execute(&state.db)
                .await
                .map_err(Error::Database)?;
            false
        }
        None => {
            sqlx::query(
                "INSERT INTO species_bookmarks (user_id, species_id, created_at)
                 VALUES (?, ?, ?)",
            )
            .bind(requester.id)
            .bind(species.id)
            .bind(Utc::now())
            .execute(&state.db)
            .await
            .map_err(Error::Database)?;
            true
        }
    };

    Ok(Json(BookmarkResponse {
        species_id: species.id,
        bookmarked,
    }))
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub species: Vec<Species>,
}

/// POST /api/species/:slug/compare
pub async fn add_to_compare(
    State(state): State<AppState>,
    requester: Requester,
    Path(slug): Path<String>,
) -> Result<Json<CompareResponse>, ApiError> {
    let species = fetch_species(&state, &slug).await?;
    state.compare.add(requester.id, species.id);
    compare_species(&state, &requester).await.map(Json)
}

/// GET /api/compare
pub async fn compare_list(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<CompareResponse>, ApiError> {
    compare_species(&state, &requester).await.map(Json)
}

/// POST /api/compare/clear
pub async fn clear_compare(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<CompareResponse>, ApiError> {
    state.compare.clear(requester.id);
    Ok(Json(CompareResponse {
        species: Vec::new(),
    }))
}

async fn compare_species(
    state: &AppState,
    requester: &Requester,
) -> Result<CompareResponse, ApiError> {
    let ids = state.compare.list(requester.id);
    let mut species = Vec::with_capacity(ids.len());
    for id in ids {
        let found: Option<Species> = sqlx::query_as("SELECT * FROM species WHERE id = ?")
            .bind(id)
            .fetch_optional(&state.db)
            .await
            .map_err(Error::Database)?;
        // Tray entries can outlive the species row; skip the dangling ones
        if let Some(found) = found {
            species.push(found);
        }
    }
    Ok(CompareResponse { species })
}

async fn fetch_species(state: &AppState, slug: &str) -> Result<Species, ApiError> {
    let species: Option<Species> = sqlx::query_as("SELECT * FROM species WHERE slug = ?")
        .bind(slug)
        .fetch_optional(&state.db)
        .await
        .map_err(Error::Database)?;
    species.ok_or_else(|| ApiError(Error::NotFound(format!("species '{}'", slug))))
}
