//! Demo content seeding
//!
//! Populates an empty database with starter species, sightings, vendors, and
//! forum threads so a fresh install is never blank. Invoked explicitly once
//! at startup, never from request handling.

use crate::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

/// Seed starter content when the species catalog is empty.
///
/// Idempotent: returns without touching the database when any species row
/// exists. All inserts run in one transaction so a partial seed can never be
/// observed.
pub async fn seed_demo_content(pool: &SqlitePool) -> Result<()> {
    let species_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM species")
        .fetch_one(pool)
        .await?;
    if species_count > 0 {
        return Ok(());
    }

    info!("Empty catalog detected, seeding demo content");

    let now = Utc::now();
    let today = now.date_naive();
    let mut tx = pool.begin().await?;

    // Demo user for the sample forum threads
    let demo_user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, email, is_moderator, created_at)
         VALUES (?, ?, 0, ?) RETURNING id",
    )
    .bind("demo_keeper")
    .bind("demo@example.com")
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    // Core starter species that show up on the homepage and flight map
    let starters: &[(&str, &str, &str, &str, &str, &str, &str, &str)] = &[
        ("lasius-niger", "Lasius", "niger", "Black garden ant", "easy", "temperate", "claustral", "required"),
        ("formica-fusca", "Formica", "fusca", "Silky field ant", "medium", "temperate", "claustral", "required"),
        ("camponotus-pennsylvanicus", "Camponotus", "pennsylvanicus", "Black carpenter ant", "medium", "temperate", "claustral", "required"),
        ("solenopsis-invicta", "Solenopsis", "invicta", "Red imported fire ant", "hard", "tropical", "claustral", "none"),
        ("messor-barbarus", "Messor", "barbarus", "Barbarian harvester ant", "medium", "mediterranean", "claustral", "light"),
        ("tetramorium-immigrans", "Tetramorium", "immigrans", "Pavement ant", "easy", "temperate", "claustral", "required"),
    ];

    let mut species_ids = Vec::with_capacity(starters.len());
    for (slug, genus, species, common_name, difficulty, region, founding_mode, diapause) in starters
    {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO species
                (slug, genus, species, common_name, difficulty, region,
                 founding_mode, diapause, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(slug)
        .bind(genus)
        .bind(species)
        .bind(common_name)
        .bind(difficulty)
        .bind(region)
        .bind(founding_mode)
        .bind(diapause)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        species_ids.push(id);
    }

    // A few nuptial flight sightings tied to the starter species
    let flights: &[(usize, &str, &str, f64, f64)] = &[
        (0, "Backyard light trap", "Seattle, WA, USA", 47.6062, -122.3321),
        (1, "Forest clearing", "Bavaria, Germany", 48.7904, 11.4979),
        (2, "Rotting log near trail", "Appalachian foothills, USA", 35.7596, -79.0193),
        (3, "Suburban lawn after rain", "Austin, TX, USA", 30.2672, -97.7431),
    ];
    for (species_idx, location_name, region, latitude, longitude) in flights {
        sqlx::query(
            "INSERT INTO nuptial_flights
                (species_id, user_id, location_name, latitude, longitude,
                 date, region, notes, created_at)
             VALUES (?, NULL, ?, ?, ?, ?, ?, '', ?)",
        )
        .bind(species_ids[*species_idx])
        .bind(location_name)
        .bind(latitude)
        .bind(longitude)
        .bind(today)
        .bind(region)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    // Vendor list so the vendors page is never empty
    let vendors: &[(&str, &str, &str, &str, &str)] = &[
        (
            "Rainforest Ant Supplies",
            "formicarium",
            "Glass and acrylic formicariums with naturalistic hydration systems.",
            "https://example.com/rainforest-ants",
            "North America & Europe",
        ),
        (
            "Precision Heat & Nesting",
            "heating",
            "Heat mats, cables, and smart thermostats tuned for ant rooms.",
            "https://example.com/ant-heating",
            "Global",
        ),
        (
            "Microscope & Scout Tools",
            "tools",
            "Loupes, microscopes, aspirators, and gentle collection tools.",
            "https://example.com/ant-tools",
            "Global",
        ),
        (
            "Ethical Queen Collective",
            "queens",
            "Network of licensed breeders with locality data and paperwork.",
            "https://example.com/ethical-queens",
            "Regional - laws vary, check your local regulations.",
        ),
    ];
    for (name, category, description, url, region) in vendors {
        sqlx::query(
            "INSERT INTO vendors (name, category, description, url, region, is_trusted)
             VALUES (?, ?, ?, ?, ?, 1)",
        )
        .bind(name)
        .bind(category)
        .bind(description)
        .bind(url)
        .bind(region)
        .execute(&mut *tx)
        .await?;
    }

    // Forum sections and a couple of starter threads
    let getting_started_id: i64 = sqlx::query_scalar(
        "INSERT INTO forum_sections (name, slug, description)
         VALUES (?, ?, ?) RETURNING id",
    )
    .bind("Getting started")
    .bind("getting-started")
    .bind("Beginner questions, first queens, and basic care.")
    .fetch_one(&mut *tx)
    .await?;

    let journals_id: i64 = sqlx::query_scalar(
        "INSERT INTO forum_sections (name, slug, description)
         VALUES (?, ?, ?) RETURNING id",
    )
    .bind("Species journals")
    .bind("species-journals")
    .bind("Long-term journals following specific colonies.")
    .fetch_one(&mut *tx)
    .await?;

    let threads: &[(i64, usize, &str)] = &[
        (getting_started_id, 0, "First Lasius niger queen - what now?"),
        (journals_id, 2, "Carpenter ant founding log - year one"),
        (journals_id, 4, "Seed-mix experiments with Messor barbarus"),
    ];
    for (section_id, species_idx, title) in threads {
        sqlx::query(
            "INSERT INTO forum_threads
                (section_id, species_id, title, author_id, is_locked,
                 created_at, updated_at)
             VALUES (?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(section_id)
        .bind(species_ids[*species_idx])
        .bind(title)
        .bind(demo_user_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!("Seeded {} starter species", starters.len());

    Ok(())
}
