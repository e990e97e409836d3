//! Database models
//!
//! Typed rows for the AntGuide tables plus the category enums used by the
//! species catalog and the suggestion workflow. Enums are stored as
//! snake_case TEXT.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Keeper difficulty rating for a species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Native climate region of a species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Region {
    Temperate,
    Tropical,
    Desert,
    Mediterranean,
    Other,
}

/// How a queen founds her colony
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum FoundingMode {
    Claustral,
    SemiClaustral,
    Parasitic,
    Dependent,
}

/// Winter diapause requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Diapause {
    Required,
    Light,
    None,
}

/// Lifecycle state of a species suggestion
///
/// Pending is initial; approved and rejected are terminal. The only
/// transitions are pending -> approved and pending -> rejected, each applied
/// exactly once by `review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_moderator: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Species {
    pub id: i64,
    pub slug: String,
    pub genus: String,
    pub species: String,
    pub common_name: String,
    pub difficulty: Difficulty,
    pub region: Region,
    pub founding_mode: FoundingMode,
    pub diapause: Diapause,
    /// Path of a curated (operator-uploaded) photo, when one exists
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Species {
    /// Scientific binomial, e.g. "Lasius niger"
    pub fn scientific_name(&self) -> String {
        format!("{} {}", self.genus, self.species).trim().to_string()
    }

    /// Common name with binomial in parentheses when a common name exists
    pub fn display_name(&self) -> String {
        if self.common_name.is_empty() {
            self.scientific_name()
        } else {
            format!("{} ({})", self.common_name, self.scientific_name())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SpeciesCare {
    pub species_id: i64,
    pub temperature_min_c: i64,
    pub temperature_max_c: i64,
    /// Relative humidity as a percentage
    pub humidity_min: i64,
    pub humidity_max: i64,
    pub diapause_notes: String,
    pub founding_setup: String,
    pub small_colony_setup: String,
    pub medium_colony_setup: String,
    pub large_colony_setup: String,
    pub diet: String,
    pub common_issues: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub url: String,
    pub region: String,
    pub is_trusted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NuptialFlight {
    pub id: i64,
    pub species_id: i64,
    /// Reporting user; kept when the account is deleted
    pub user_id: Option<i64>,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: NaiveDate,
    pub region: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ForumSection {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ForumThread {
    pub id: i64,
    pub section_id: i64,
    pub species_id: Option<i64>,
    pub title: String,
    pub author_id: i64,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ForumPost {
    pub id: i64,
    pub thread_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SpeciesBookmark {
    pub id: i64,
    pub user_id: i64,
    pub species_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A user-submitted proposal to add or amend a species record
///
/// `species_id` links the pre-existing species being amended, or the species
/// materialized on approval of a new-species proposal. `user_id` and
/// `reviewer_id` survive account deletion as NULL.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SpeciesSuggestion {
    pub id: i64,
    pub user_id: Option<i64>,
    pub species_id: Option<i64>,
    pub proposed_genus: String,
    pub proposed_species: String,
    pub proposed_common_name: String,
    pub care_notes: String,
    pub reason: String,
    pub status: SuggestionStatus,
    pub reviewer_id: Option<i64>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_common_name() {
        let species = Species {
            id: 1,
            slug: "lasius-niger".to_string(),
            genus: "Lasius".to_string(),
            species: "niger".to_string(),
            common_name: "Black garden ant".to_string(),
            difficulty: Difficulty::Easy,
            region: Region::Temperate,
            founding_mode: FoundingMode::Claustral,
            diapause: Diapause::Required,
            thumbnail: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(species.display_name(), "Black garden ant (Lasius niger)");

        let bare = Species {
            common_name: String::new(),
            ..species
        };
        assert_eq!(bare.display_name(), "Lasius niger");
    }

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&FoundingMode::SemiClaustral).unwrap(),
            "\"semi_claustral\""
        );
        assert_eq!(
            serde_json::to_string(&SuggestionStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
