//! Catalog provider client.
//!
//! Fetches catalog pages shaped as `{"metas": [...]}` and rewrites each
//! item's poster URL to point at this service's overlay endpoint, so the
//! consumer sees badged posters without knowing the compositor exists.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ServiceError;

/// One catalog entry. Fields beyond the ones this service touches are
/// preserved verbatim through the flatten map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Catalog page wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub metas: Vec<CatalogItem>,
}

/// Client for the upstream catalog provider.
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Fetch one catalog page, e.g. `movie/top`.
    pub async fn fetch_catalog(
        &self,
        content_type: &str,
        catalog_id: &str,
    ) -> Result<CatalogResponse, ServiceError> {
        let url = format!(
            "{}/catalog/{}/{}.json",
            self.base_url, content_type, catalog_id
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Catalog fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "Catalog returned status {}",
                response.status()
            )));
        }

        response
            .json::<CatalogResponse>()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Invalid catalog response: {}", e)))
    }
}

/// Build an overlay URL for a poster and its rating.
///
/// Both values are URL-encoded; position stays at the top-left default.
pub fn overlay_url(public_base_url: &str, poster_url: &str, rating: &str) -> String {
    format!(
        "{}/overlay?posterUrl={}&rating={}&position=top-left",
        public_base_url,
        urlencoding::encode(poster_url),
        urlencoding::encode(rating)
    )
}

/// Rewrite an item's poster to the overlay endpoint when a rating is known.
///
/// Items without a poster or without a rating pass through untouched.
pub fn rewrite_poster(item: &mut CatalogItem, public_base_url: &str, rating: Option<&str>) {
    match (&item.poster, rating) {
        (Some(poster), Some(rating)) => {
            item.poster = Some(overlay_url(public_base_url, poster, rating));
        }
        (Some(_), None) => {
            warn!(item_id = %item.id, "No rating available, keeping original poster");
        }
        (None, _) => {}
    }
}
