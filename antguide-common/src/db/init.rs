//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up
//! idempotently. Safe to call on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Writers wait out short lock contention instead of failing immediately;
    // concurrent suggestion reviews rely on this
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema creation (idempotent - safe to call multiple times)
    create_users_table(&pool).await?;
    create_species_table(&pool).await?;
    create_species_care_table(&pool).await?;
    create_vendors_table(&pool).await?;
    create_vendor_species_table(&pool).await?;
    create_nuptial_flights_table(&pool).await?;
    create_forum_sections_table(&pool).await?;
    create_forum_threads_table(&pool).await?;
    create_forum_posts_table(&pool).await?;
    create_species_bookmarks_table(&pool).await?;
    create_species_suggestions_table(&pool).await?;

    Ok(pool)
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL DEFAULT '',
            is_moderator INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_species_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS species (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            slug TEXT NOT NULL UNIQUE,
            genus TEXT NOT NULL,
            species TEXT NOT NULL DEFAULT '',
            common_name TEXT NOT NULL DEFAULT '',
            difficulty TEXT NOT NULL,
            region TEXT NOT NULL,
            founding_mode TEXT NOT NULL,
            diapause TEXT NOT NULL,
            thumbnail TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_species_care_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS species_care (
            species_id INTEGER PRIMARY KEY
                REFERENCES species(id) ON DELETE CASCADE,
            temperature_min_c INTEGER NOT NULL,
            temperature_max_c INTEGER NOT NULL,
            humidity_min INTEGER NOT NULL,
            humidity_max INTEGER NOT NULL,
            diapause_notes TEXT NOT NULL DEFAULT '',
            founding_setup TEXT NOT NULL DEFAULT '',
            small_colony_setup TEXT NOT NULL DEFAULT '',
            medium_colony_setup TEXT NOT NULL DEFAULT '',
            large_colony_setup TEXT NOT NULL DEFAULT '',
            diet TEXT NOT NULL DEFAULT '',
            common_issues TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_vendors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS vendors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            url TEXT NOT NULL DEFAULT '',
            region TEXT NOT NULL DEFAULT '',
            is_trusted INTEGER NOT NULL DEFAULT 1
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_vendor_species_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS vendor_species (
            vendor_id INTEGER NOT NULL
                REFERENCES vendors(id) ON DELETE CASCADE,
            species_id INTEGER NOT NULL
                REFERENCES species(id) ON DELETE CASCADE,
            UNIQUE(vendor_id, species_id)
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_nuptial_flights_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS nuptial_flights (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            species_id INTEGER NOT NULL
                REFERENCES species(id) ON DELETE CASCADE,
            user_id INTEGER
                REFERENCES users(id) ON DELETE SET NULL,
            location_name TEXT NOT NULL,
            latitude REAL,
            longitude REAL,
            date TEXT NOT NULL,
            region TEXT NOT NULL DEFAULT '',
            notes TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_forum_sections_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS forum_sections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_forum_threads_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS forum_threads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            section_id INTEGER NOT NULL
                REFERENCES forum_sections(id) ON DELETE CASCADE,
            species_id INTEGER
                REFERENCES species(id) ON DELETE SET NULL,
            title TEXT NOT NULL,
            author_id INTEGER NOT NULL
                REFERENCES users(id) ON DELETE CASCADE,
            is_locked INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_forum_posts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS forum_posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            thread_id INTEGER NOT NULL
                REFERENCES forum_threads(id) ON DELETE CASCADE,
            author_id INTEGER NOT NULL
                REFERENCES users(id) ON DELETE CASCADE,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_species_bookmarks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS species_bookmarks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL
                REFERENCES users(id) ON DELETE CASCADE,
            species_id INTEGER NOT NULL
                REFERENCES species(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            UNIQUE(user_id, species_id)
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_species_suggestions_table(pool: &SqlitePool) -> Result<()> {
    // user_id, species_id, and reviewer_id go NULL on user/species deletion;
    // the suggestion record itself must survive
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS species_suggestions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER
                REFERENCES users(id) ON DELETE SET NULL,
            species_id INTEGER
                REFERENCES species(id) ON DELETE SET NULL,
            proposed_genus TEXT NOT NULL,
            proposed_species TEXT NOT NULL DEFAULT '',
            proposed_common_name TEXT NOT NULL DEFAULT '',
            care_notes TEXT NOT NULL,
            reason TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            reviewer_id INTEGER
                REFERENCES users(id) ON DELETE SET NULL,
            reviewed_at TEXT,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}
