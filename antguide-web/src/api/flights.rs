//! Nuptial flight sighting endpoints

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use antguide_common::db::models::NuptialFlight;
use antguide_common::Error;

use crate::api::ApiError;
use crate::auth::Requester;
use crate::AppState;

const DEFAULT_LIMIT: i64 = 500;
const MAX_LIMIT: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct FlightQuery {
    /// Filter by species id
    pub species: Option<i64>,
    /// Substring filter against the free-text region
    pub region: Option<String>,
    pub limit: Option<i64>,
}

/// One sighting row for the map and table views
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct FlightRow {
    pub id: i64,
    pub species_id: i64,
    pub species_name: String,
    pub species_slug: String,
    pub date: NaiveDate,
    pub location_name: String,
    pub region: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Username of the reporter; null for anonymous or deleted accounts
    pub reporter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FlightListResponse {
    pub results: Vec<FlightRow>,
}

/// GET /api/flights
pub async fn flights_list(
    State(state): State<AppState>,
    Query(query): Query<FlightQuery>,
) -> Result<Json<FlightListResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let mut sql = String::from(
        "SELECT f.id, f.species_id,
                TRIM(s.genus || ' ' || s.species) AS species_name,
                s.slug AS species_slug,
                f.date, f.location_name, f.region, f.latitude, f.longitude,
                u.username AS reporter
         FROM nuptial_flights f
         JOIN species s ON s.id = f.species_id
         LEFT JOIN users u ON u.id = f.user_id
         WHERE 1=1",
    );
    let mut binds: Vec<String> = Vec::new();

    if let Some(species_id) = query.species {
        sql.push_str(" AND f.species_id = ?");
        binds.push(species_id.to_string());
    }
    if let Some(region) = query.region.as_deref().filter(|r| !r.is_empty()) {
        sql.push_str(" AND f.region LIKE ?");
        binds.push(format!("%{}%", region));
    }
    sql.push_str(" ORDER BY f.date DESC, f.created_at DESC LIMIT ?");

    let mut fetch = sqlx::query_as::<_, FlightRow>(&sql);
    for bind in &binds {
        fetch = fetch.bind(bind);
    }
    let results = fetch
        .bind(limit)
        .fetch_all(&state.db)
        .await
        .map_err(Error::Database)?;

    Ok(Json(FlightListResponse { results }))
}

#[derive(Debug, Deserialize)]
pub struct NewFlight {
    pub species_id: i64,
    pub location_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub notes: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// POST /api/flights
pub async fn flights_add(
    State(state): State<AppState>,
    requester: Requester,
    Json(new_flight): Json<NewFlight>,
) -> Result<Json<NuptialFlight>, ApiError> {
    if new_flight.location_name.trim().is_empty() {
        return Err(ApiError(Error::Validation(
            "location name is required".to_string(),
        )));
    }

    let species_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM species WHERE id = ?")
        .bind(new_flight.species_id)
        .fetch_optional(&state.db)
        .await
        .map_err(Error::Database)?;
    if species_exists.is_none() {
        return Err(ApiError(Error::NotFound(format!(
            "species {}",
            new_flight.species_id
        ))));
    }

    let flight: NuptialFlight = sqlx::query_as(
        "INSERT INTO nuptial_flights
            (species_id, user_id, location_name, latitude, longitude,
             date, region, notes, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(new_flight.species_id)
    .bind(requester.id)
    .bind(new_flight.location_name.trim())
    .bind(new_flight.latitude)
    .bind(new_flight.longitude)
    .bind(new_flight.date)
    .bind(&new_flight.region)
    .bind(&new_flight.notes)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await
    .map_err(Error::Database)?;

    Ok(Json(flight))
}
