//! Discussion forum endpoints

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use antguide_common::db::models::{ForumPost, ForumSection, ForumThread};
use antguide_common::Error;

use crate::api::ApiError;
use crate::auth::Requester;
use crate::AppState;

/// GET /api/forum
pub async fn forum_index(
    State(state): State<AppState>,
) -> Result<Json<Vec<ForumSection>>, ApiError> {
    let sections: Vec<ForumSection> =
        sqlx::query_as("SELECT * FROM forum_sections ORDER BY name")
            .fetch_all(&state.db)
            .await
            .map_err(Error::Database)?;
    Ok(Json(sections))
}

#[derive(Debug, Serialize)]
pub struct SectionDetailResponse {
    pub section: ForumSection,
    pub threads: Vec<ForumThread>,
}

/// GET /api/forum/:slug
pub async fn forum_section_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<SectionDetailResponse>, ApiError> {
    let section = fetch_section(&state, &slug).await?;

    let threads: Vec<ForumThread> = sqlx::query_as(
        "SELECT * FROM forum_threads WHERE section_id = ? ORDER BY updated_at DESC",
    )
    .bind(section.id)
    .fetch_all(&state.db)
    .await
    .map_err(Error::Database)?;

    Ok(Json(SectionDetailResponse { section, threads }))
}

#[derive(Debug, Deserialize)]
pub struct NewThread {
    pub title: String,
    /// Content of the opening post
    pub content: String,
    pub species_id: Option<i64>,
}

/// POST /api/forum/:slug/threads
///
/// Creates the thread and its opening post atomically.
pub async fn forum_thread_create(
    State(state): State<AppState>,
    requester: Requester,
    Path(slug): Path<String>,
    Json(new_thread): Json<NewThread>,
) -> Result<Json<ForumThread>, ApiError> {
    if new_thread.title.trim().is_empty() {
        return Err(ApiError(Error::Validation("title is required".to_string())));
    }
    if new_thread.content.trim().is_empty() {
        return Err(ApiError(Error::Validation(
            "an opening post is required".to_string(),
        )));
    }

    let section = fetch_section(&state, &slug).await?;
    let now = Utc::now();

    let mut tx = state.db.begin().await.map_err(Error::Database)?;

    let thread: ForumThread = sqlx::query_as(
        "INSERT INTO forum_threads
            (section_id, species_id, title, author_id, is_locked, created_at, updated_at)
         VALUES (?, ?, ?, ?, 0, ?, ?)
         RETURNING *",
    )
    .bind(section.id)
    .bind(new_thread.species_id)
    .bind(new_thread.title.trim())
    .bind(requester.id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(Error::Database)?;

    sqlx::query(
        "INSERT INTO forum_posts (thread_id, author_id, content, created_at)
         VALUES (?, ?, ?, ?)",
    )
    .bind(thread.id)
    .bind(requester.id)
    .bind(&new_thread.content)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(Error::Database)?;

    tx.commit().await.map_err(Error::Database)?;

    Ok(Json(thread))
}

#[derive(Debug, Serialize)]
pub struct ThreadDetailResponse {
    pub thread: ForumThread,
    pub posts: Vec<ForumPost>,
}

/// GET /api/threads/:id
pub async fn forum_thread_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ThreadDetailResponse>, ApiError> {
    let thread = fetch_thread(&state, id).await?;

    let posts: Vec<ForumPost> = sqlx::query_as(
        "SELECT * FROM forum_posts WHERE thread_id = ? ORDER BY created_at, id",
    )
    .bind(thread.id)
    .fetch_all(&state.db)
    .await
    .map_err(Error::Database)?;

    Ok(Json(ThreadDetailResponse { thread, posts }))
}

#[derive(Debug, Deserialize)]
pub struct NewPost {
    pub content: String,
}

/// POST /api/threads/:id
pub async fn forum_post_create(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<i64>,
    Json(new_post): Json<NewPost>,
) -> Result<Json<ForumPost>, ApiError> {
    if new_post.content.trim().is_empty() {
        return Err(ApiError(Error::Validation(
            "post content is required".to_string(),
        )));
    }

    let thread = fetch_thread(&state, id).await?;
    if thread.is_locked {
        return Err(ApiError(Error::InvalidState(format!(
            "thread {} is locked",
            thread.id
        ))));
    }

    let now = Utc::now();
    let mut tx = state.db.begin().await.map_err(Error::Database)?;

    let post: ForumPost = sqlx::query_as(
        "INSERT INTO forum_posts (thread_id, author_id, content, created_at)
         VALUES (?, ?, ?, ?)
         RETURNING *",
    )
    .bind(thread.id)
    .bind(requester.id)
    .bind(&new_post.content)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(Error::Database)?;

    // A reply bumps the thread in section listings
    sqlx::query("UPDATE forum_threads SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(thread.id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

    tx.commit().await.map_err(Error::Database)?;

    Ok(Json(post))
}

async fn fetch_section(state: &AppState, slug: &str) -> Result<ForumSection, ApiError> {
    let section: Option<ForumSection> =
        sqlx::query_as("SELECT * FROM forum_sections WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&state.db)
            .await
            .map_err(Error::Database)?;
    section.ok_or_else(|| ApiError(Error::NotFound(format!("forum section '{}'", slug))))
}

async fn fetch_thread(state: &AppState, id: i64) -> Result<ForumThread, ApiError> {
    let thread: Option<ForumThread> =
        sqlx::query_as("SELECT * FROM forum_threads WHERE id = ?")
            .bind(id)
            .fetch_optional(&state.db)
            .await
            .map_err(Error::Database)?;
    thread.ok_or_else(|| ApiError(Error::NotFound(format!("thread {}", id))))
}
