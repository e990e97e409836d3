//! AntWeb API client (primary image source)

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

pub(crate) const ANTWEB_API_BASE: &str = "https://www.antweb.org/api/v2/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Accepted image file extensions, compared case-insensitively
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

/// A qualifying URL must come from the expected host
const HOST_MARKER: &str = "antweb";

/// Client for the AntWeb biodiversity image catalog
pub struct AntwebClient {
    http: reqwest::Client,
    base_url: String,
}

impl AntwebClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Ask AntWeb for one image-bearing record and pull the first qualifying
    /// image URL out of the response. Any failure is a miss, never an error.
    pub async fn find_image(&self, genus: &str, species: &str) -> Option<String> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("genus", genus),
                ("species", species),
                ("img", "true"),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|e| debug!(genus, species, error = %e, "AntWeb request failed"))
            .ok()?;

        if !response.status().is_success() {
            debug!(genus, species, status = %response.status(), "AntWeb returned non-success");
            return None;
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| debug!(genus, species, error = %e, "AntWeb response was not JSON"))
            .ok()?;

        find_image_url(&data)
    }
}

/// Depth-first search of an arbitrarily nested JSON value for the first
/// string that looks like an AntWeb image URL. Object values are visited in
/// document order, then array elements in order, so the result is
/// deterministic for a given response body.
pub(crate) fn find_image_url(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map.values().find_map(find_image_url),
        Value::Array(items) => items.iter().find_map(find_image_url),
        Value::String(s) if is_antweb_image_url(s) => Some(s.clone()),
        _ => None,
    }
}

fn is_antweb_image_url(candidate: &str) -> bool {
    let lower = candidate.to_lowercase();
    lower.starts_with("http")
        && IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        && lower.contains(HOST_MARKER)
}
