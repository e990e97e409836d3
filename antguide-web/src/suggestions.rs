//! Species suggestion moderation workflow
//!
//! A suggestion is submitted by any authenticated keeper, sits in `pending`
//! state, and is decided exactly once by a moderator. Approving a suggestion
//! that is not tied to an existing species materializes a new catalog entry
//! and links it back onto the suggestion; the whole decision commits or rolls
//! back as one transaction.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use antguide_common::db::models::{SpeciesSuggestion, SuggestionStatus};
use antguide_common::{Error, Result};

use crate::auth::Requester;

/// Moderator decision on a pending suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

/// Proposed fields for a new or amended species record
#[derive(Debug, Clone, Deserialize)]
pub struct NewSuggestion {
    pub genus: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub common_name: String,
    pub care_notes: String,
    pub reason: String,
}

/// Submit a suggestion for moderator review.
///
/// `species_id` links a pre-existing species being amended; `None` proposes
/// a brand-new species. The catalog itself is never touched here.
pub async fn submit(
    pool: &SqlitePool,
    requester: &Requester,
    species_id: Option<i64>,
    proposal: NewSuggestion,
) -> Result<SpeciesSuggestion> {
    if proposal.genus.trim().is_empty() {
        return Err(Error::Validation("proposed genus is required".to_string()));
    }
    if proposal.care_notes.trim().is_empty() {
        return Err(Error::Validation("care notes are required".to_string()));
    }
    if proposal.reason.trim().is_empty() {
        return Err(Error::Validation("a reason is required".to_string()));
    }

    if let Some(id) = species_id {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM species WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(Error::NotFound(format!("species {}", id)));
        }
    }

    let suggestion: SpeciesSuggestion = sqlx::query_as(
        "INSERT INTO species_suggestions
            (user_id, species_id, proposed_genus, proposed_species,
             proposed_common_name, care_notes, reason, status, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, 'pending', ?)
         RETURNING *",
    )
    .bind(requester.id)
    .bind(species_id)
    .bind(proposal.genus.trim())
    .bind(proposal.species.trim())
    .bind(proposal.common_name.trim())
    .bind(&proposal.care_notes)
    .bind(&proposal.reason)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    info!(
        suggestion_id = suggestion.id,
        submitter = %requester.username,
        genus = %suggestion.proposed_genus,
        "Suggestion submitted"
    );

    Ok(suggestion)
}

/// List suggestions for moderator review, newest first.
pub async fn list_pending(
    pool: &SqlitePool,
    requester: &Requester,
) -> Result<Vec<SpeciesSuggestion>> {
    require_moderator(requester)?;

    let suggestions = sqlx::query_as(
        "SELECT * FROM species_suggestions ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(suggestions)
}

/// Apply a moderator decision to a pending suggestion.
///
/// The status flip is a guarded update (`WHERE status = 'pending'`) issued as
/// the first statement of the transaction, so of two concurrent reviews of
/// the same suggestion exactly one commits and the other sees `InvalidState`.
/// Approving a suggestion with no linked species creates the species inside
/// the same transaction; a slug collision aborts the whole review with
/// `Conflict`, leaving the suggestion pending.
pub async fn review(
    pool: &SqlitePool,
    requester: &Requester,
    suggestion_id: i64,
    decision: Decision,
) -> Result<SpeciesSuggestion> {
    require_moderator(requester)?;

    let status = match decision {
        Decision::Approve => SuggestionStatus::Approved,
        Decision::Reject => SuggestionStatus::Rejected,
    };
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    // Write first: takes the database write lock up front, and the guard
    // makes re-review (or the loser of a race) a no-op we can reject.
    let flipped = sqlx::query(
        "UPDATE species_suggestions
         SET status = ?, reviewer_id = ?, reviewed_at = ?
         WHERE id = ? AND status = 'pending'",
    )
    .bind(status)
    .bind(requester.id)
    .bind(now)
    .bind(suggestion_id)
    .execute(&mut *tx)
    .await?;

    if flipped.rows_affected() == 0 {
        let current: Option<SuggestionStatus> =
            sqlx::query_scalar("SELECT status FROM species_suggestions WHERE id = ?")
                .bind(suggestion_id)
                .fetch_optional(&mut *tx)
                .await?;
        return match current {
            None => Err(Error::NotFound(format!("suggestion {}", suggestion_id))),
            Some(current) => Err(Error::InvalidState(format!(
                "suggestion {} has already been {:?}",
                suggestion_id,
                current
            ))),
        };
    }

    let suggestion: SpeciesSuggestion =
        sqlx::query_as("SELECT * FROM species_suggestions WHERE id = ?")
            .bind(suggestion_id)
            .fetch_one(&mut *tx)
            .await?;

    if decision == Decision::Approve && suggestion.species_id.is_none() {
        let slug = species_slug(&suggestion.proposed_genus, &suggestion.proposed_species);

        let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM species WHERE slug = ?")
            .bind(&slug)
            .fetch_optional(&mut *tx)
            .await?;
        if taken.is_some() {
            // Rolls back the status flip too; the suggestion stays pending
            // for manual disambiguation.
            return Err(Error::Conflict(format!(
                "species slug '{}' already exists",
                slug
            )));
        }

        let species_id: i64 = sqlx::query_scalar(
            "INSERT INTO species
                (slug, genus, species, common_name, difficulty, region,
                 founding_mode, diapause, created_at, updated_at)
             VALUES (?, ?, ?, ?, 'medium', 'temperate', 'claustral', 'required', ?, ?)
             RETURNING id",
        )
        .bind(&slug)
        .bind(&suggestion.proposed_genus)
        .bind(&suggestion.proposed_species)
        .bind(&suggestion.proposed_common_name)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE species_suggestions SET species_id = ? WHERE id = ?")
            .bind(species_id)
            .bind(suggestion_id)
            .execute(&mut *tx)
            .await?;

        info!(
            suggestion_id,
            species_id,
            slug = %slug,
            "Approved suggestion materialized a new species"
        );
    }

    tx.commit().await?;

    info!(
        suggestion_id,
        reviewer = %requester.username,
        decision = ?decision,
        "Suggestion reviewed"
    );

    let suggestion = sqlx::query_as("SELECT * FROM species_suggestions WHERE id = ?")
        .bind(suggestion_id)
        .fetch_one(pool)
        .await?;

    Ok(suggestion)
}

fn require_moderator(requester: &Requester) -> Result<()> {
    if requester.is_moderator {
        Ok(())
    } else {
        Err(Error::Authorization(format!(
            "{} is not a moderator",
            requester.username
        )))
    }
}

/// Deterministic slug for a species synthesized from proposed fields
fn species_slug(genus: &str, species: &str) -> String {
    format!("{}-{}", genus.to_lowercase(), species.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_lowercased_and_joined() {
        assert_eq!(species_slug("Pheidole", "pallidula"), "pheidole-pallidula");
        assert_eq!(species_slug("MESSOR", "Barbarus"), "messor-barbarus");
    }

    #[test]
    fn decision_deserializes_lowercase() {
        let decision: Decision = serde_json::from_str("\"approve\"").unwrap();
        assert_eq!(decision, Decision::Approve);
        let decision: Decision = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(decision, Decision::Reject);
    }
}
