//! External species image resolution
//!
//! Best-effort enrichment for species without a curated photo: ask the
//! AntWeb catalog first, fall back to the Wikipedia page summary, and give
//! up quietly. Every transport, status, or parse failure downgrades to "no
//! image"; this chain must never fail a page render.

mod antweb;
mod wikipedia;

pub use antweb::AntwebClient;
pub use wikipedia::WikipediaClient;

/// Ordered external lookup chain for a representative species photo
pub struct ImageResolver {
    antweb: AntwebClient,
    wikipedia: WikipediaClient,
}

impl ImageResolver {
    /// Resolver against the production endpoints
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            antweb: AntwebClient::new(antweb::ANTWEB_API_BASE)?,
            wikipedia: WikipediaClient::new(wikipedia::WIKIPEDIA_SUMMARY_BASE)?,
        })
    }

    /// Resolver against custom endpoints (tests point this at stub servers)
    pub fn with_endpoints(
        antweb_base: &str,
        wikipedia_base: &str,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            antweb: AntwebClient::new(antweb_base)?,
            wikipedia: WikipediaClient::new(wikipedia_base)?,
        })
    }

    /// Find a representative photo URL for a species.
    ///
    /// Callers invoke this only when no curated thumbnail exists. Returns
    /// `None` without any network call when genus or species is blank; the
    /// secondary source is consulted only after the primary yields nothing.
    pub async fn resolve(&self, genus: &str, species: &str) -> Option<String> {
        let genus = genus.trim();
        let species = species.trim();
        if genus.is_empty() || species.is_empty() {
            return None;
        }

        if let Some(url) = self.antweb.find_image(genus, species).await {
            return Some(url);
        }

        self.wikipedia.find_thumbnail(genus, species).await
    }
}
