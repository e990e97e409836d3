//! Wikipedia page-summary client (secondary image source)

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

pub(crate) const WIKIPEDIA_SUMMARY_BASE: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = "AntGuide/0.1.0 (https://example.com)";

/// Client for the Wikipedia REST page-summary endpoint
pub struct WikipediaClient {
    http: reqwest::Client,
    base_url: String,
}

impl WikipediaClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Look up the page thumbnail for a species binomial. Any failure is a
    /// miss, never an error.
    pub async fn find_thumbnail(&self, genus: &str, species: &str) -> Option<String> {
        let title = page_title(genus, species);

        // Appending as a path segment percent-encodes the title
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| debug!(error = %e, "Bad Wikipedia base URL"))
            .ok()?;
        url.path_segments_mut().ok()?.push(&title);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| debug!(title = %title, error = %e, "Wikipedia request failed"))
            .ok()?;

        if !response.status().is_success() {
            debug!(title = %title, status = %response.status(), "Wikipedia returned non-success");
            return None;
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| debug!(title = %title, error = %e, "Wikipedia response was not JSON"))
            .ok()?;

        let source = data.get("thumbnail")?.get("source")?.as_str()?;
        if source.to_lowercase().starts_with("http") {
            Some(source.to_string())
        } else {
            None
        }
    }
}

/// Build a page title like "Camponotus_pennsylvanicus"
fn page_title(genus: &str, species: &str) -> String {
    format!("{}_{}", capitalize(genus), species.to_lowercase())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_capitalizes_genus_and_lowercases_species() {
        assert_eq!(page_title("camponotus", "PENNSYLVANICUS"), "Camponotus_pennsylvanicus");
        assert_eq!(page_title("Lasius", "niger"), "Lasius_niger");
    }

    #[test]
    fn title_survives_empty_parts() {
        assert_eq!(page_title("", "niger"), "_niger");
    }
}
