//! Ratings provider client.
//!
//! Looks up rating data for an IMDb id. The provider signals "no data"
//! in-band with `"Response": "False"` and per-field `"N/A"` sentinels; both
//! map to `None` here so only transport and decode problems become errors.

use serde::Deserialize;
use tracing::debug;

use crate::error::ServiceError;

#[derive(Debug, Deserialize)]
struct RatingLookup {
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    imdb_votes: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Response")]
    response: Option<String>,
}

/// Rating data for one title, with the provider's `"N/A"` sentinels
/// already normalized to `None`.
#[derive(Debug, Clone)]
pub struct RatingDetails {
    pub rating: Option<String>,
    pub votes: Option<String>,
    pub plot: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
}

/// Client for the upstream ratings provider.
#[derive(Clone)]
pub struct RatingsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RatingsClient {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Look up the full rating record for an IMDb id.
    ///
    /// Returns `Ok(None)` when the provider has no record for the title.
    pub async fn fetch_details(
        &self,
        imdb_id: &str,
    ) -> Result<Option<RatingDetails>, ServiceError> {
        let url = format!("{}/?i={}&apikey={}", self.base_url, imdb_id, self.api_key);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Ratings fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "Ratings provider returned status {}",
                response.status()
            )));
        }

        let lookup = response
            .json::<RatingLookup>()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Invalid ratings response: {}", e)))?;

        Ok(extract_details(lookup, imdb_id))
    }

    /// Look up just the rating string for an IMDb id.
    ///
    /// Returns `Ok(None)` when the title is unknown or unrated.
    pub async fn fetch_rating(&self, imdb_id: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.fetch_details(imdb_id).await?.and_then(|d| d.rating))
    }
}

fn extract_details(lookup: RatingLookup, imdb_id: &str) -> Option<RatingDetails> {
    if lookup.response.as_deref() == Some("False") {
        debug!(imdb_id, "Ratings provider has no record for title");
        return None;
    }

    let details = RatingDetails {
        rating: clean_field(lookup.imdb_rating),
        votes: clean_field(lookup.imdb_votes),
        plot: clean_field(lookup.plot),
        director: clean_field(lookup.director),
        actors: clean_field(lookup.actors),
    };

    if details.rating.is_none() {
        debug!(imdb_id, "Title exists but has no rating");
    }

    Some(details)
}

/// Normalize the provider's `"N/A"` sentinel and empty strings to `None`.
fn clean_field(value: Option<String>) -> Option<String> {
    value.filter(|v| v != "N/A" && !v.is_empty())
}
