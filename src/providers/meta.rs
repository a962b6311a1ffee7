//! Meta provider client.
//!
//! Fetches a title's metadata document shaped as `{"meta": {...}}` and
//! enriches its name and description with rating data: the rating lands in
//! the title as `(IMDb: 8.5)` and the description grows a rating block with
//! votes, director, and cast. Titles the ratings provider does not know
//! pass through unmodified.

use serde::{Deserialize, Serialize};

use super::ratings::RatingDetails;
use crate::error::ServiceError;

/// One metadata document. Fields beyond the ones this service touches are
/// preserved verbatim through the flatten map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaItem {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MetaItem {
    /// IMDb id for the title: an explicit `imdbId` field wins, otherwise an
    /// `id` with the `tt` prefix is used as-is.
    pub fn imdb_id(&self) -> Option<&str> {
        if let Some(explicit) = self.extra.get("imdbId").and_then(|v| v.as_str()) {
            return Some(explicit);
        }
        if self.id.starts_with("tt") {
            return Some(&self.id);
        }
        None
    }
}

/// Meta document wrapper. `meta` is null when the title is unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaResponse {
    pub meta: Option<MetaItem>,
}

/// Client for the upstream metadata provider.
#[derive(Clone)]
pub struct MetaClient {
    client: reqwest::Client,
    base_url: String,
}

impl MetaClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Fetch one metadata document, e.g. `movie/tt0111161`.
    pub async fn fetch_meta(
        &self,
        content_type: &str,
        meta_id: &str,
    ) -> Result<MetaResponse, ServiceError> {
        let url = format!("{}/meta/{}/{}.json", self.base_url, content_type, meta_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Meta fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream(format!(
                "Meta provider returned status {}",
                response.status()
            )));
        }

        response
            .json::<MetaResponse>()
            .await
            .map_err(|e| ServiceError::Upstream(format!("Invalid meta response: {}", e)))
    }
}

/// Fold rating details into a metadata item.
///
/// Does nothing when the title has no rating. The extended description
/// block is only added when the item already has a description and the
/// rating record carries a plot, so sparse records stay sparse.
pub fn enrich_with_rating(item: &mut MetaItem, details: &RatingDetails) {
    let rating = match &details.rating {
        Some(rating) => rating,
        None => return,
    };

    item.name = format!("{} (IMDb: {})", item.name, rating);

    if details.plot.is_none() {
        return;
    }
    let description = match item.description.as_mut() {
        Some(description) => description,
        None => return,
    };

    match &details.votes {
        Some(votes) => {
            description.push_str(&format!("\n\nIMDb: {}/10 ({} votes)", rating, votes));
        }
        None => {
            description.push_str(&format!("\n\nIMDb: {}/10", rating));
        }
    }

    if let Some(director) = &details.director {
        if !description.contains(director.as_str()) {
            description.push_str(&format!("\nDirector: {}", director));
        }
    }

    if let Some(actors) = &details.actors {
        if !description.contains(actors.as_str()) {
            description.push_str(&format!("\nStars: {}", actors));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, description: Option<&str>) -> MetaItem {
        MetaItem {
            id: id.to_string(),
            name: name.to_string(),
            description: description.map(String::from),
            extra: serde_json::Map::new(),
        }
    }

    fn details(
        rating: Option<&str>,
        votes: Option<&str>,
        plot: Option<&str>,
        director: Option<&str>,
        actors: Option<&str>,
    ) -> RatingDetails {
        RatingDetails {
            rating: rating.map(String::from),
            votes: votes.map(String::from),
            plot: plot.map(String::from),
            director: director.map(String::from),
            actors: actors.map(String::from),
        }
    }

    #[test]
    fn test_meta_response_deserialization() {
        let json = r#"{"meta": {"id": "tt0111161", "name": "The Shawshank Redemption",
                       "description": "Two imprisoned men...", "type": "movie"}}"#;
        let parsed: MetaResponse = serde_json::from_str(json).unwrap();
        let meta = parsed.meta.unwrap();
        assert_eq!(meta.id, "tt0111161");
        assert_eq!(
            meta.extra.get("type").and_then(|v| v.as_str()),
            Some("movie")
        );
    }

    #[test]
    fn test_meta_response_null_meta() {
        let parsed: MetaResponse = serde_json::from_str(r#"{"meta": null}"#).unwrap();
        assert!(parsed.meta.is_none());
    }

    #[test]
    fn test_imdb_id_from_tt_prefixed_id() {
        assert_eq!(item("tt0111161", "X", None).imdb_id(), Some("tt0111161"));
        assert_eq!(item("local:123", "X", None).imdb_id(), None);
    }

    #[test]
    fn test_imdb_id_explicit_field_wins() {
        let mut meta = item("local:123", "X", None);
        meta.extra.insert(
            "imdbId".to_string(),
            serde_json::Value::String("tt0068646".to_string()),
        );
        assert_eq!(meta.imdb_id(), Some("tt0068646"));
    }

    #[test]
    fn test_enrich_appends_rating_to_name() {
        let mut meta = item("tt1", "The Godfather", None);
        enrich_with_rating(&mut meta, &details(Some("9.2"), None, None, None, None));
        assert_eq!(meta.name, "The Godfather (IMDb: 9.2)");
    }

    #[test]
    fn test_enrich_without_rating_is_noop() {
        let mut meta = item("tt1", "Obscure Title", Some("A film."));
        enrich_with_rating(&mut meta, &details(None, None, Some("Plot"), None, None));
        assert_eq!(meta.name, "Obscure Title");
        assert_eq!(meta.description.as_deref(), Some("A film."));
    }

    #[test]
    fn test_enrich_full_description_block() {
        let mut meta = item("tt1", "The Godfather", Some("An aging patriarch."));
        enrich_with_rating(
            &mut meta,
            &details(
                Some("9.2"),
                Some("1,900,000"),
                Some("An aging patriarch..."),
                Some("Francis Ford Coppola"),
                Some("Marlon Brando, Al Pacino"),
            ),
        );

        let description = meta.description.unwrap();
        assert!(description.contains("IMDb: 9.2/10 (1,900,000 votes)"));
        assert!(description.contains("Director: Francis Ford Coppola"));
        assert!(description.contains("Stars: Marlon Brando, Al Pacino"));
    }

    #[test]
    fn test_enrich_skips_director_already_in_description() {
        let mut meta = item(
            "tt1",
            "The Godfather",
            Some("Directed by Francis Ford Coppola."),
        );
        enrich_with_rating(
            &mut meta,
            &details(
                Some("9.2"),
                Some("1,900,000"),
                Some("Plot"),
                Some("Francis Ford Coppola"),
                None,
            ),
        );

        let description = meta.description.unwrap();
        assert!(!description.contains("Director: Francis Ford Coppola"));
        assert!(description.contains("IMDb: 9.2/10"));
    }

    #[test]
    fn test_enrich_rating_block_without_votes() {
        let mut meta = item("tt1", "X", Some("A film."));
        enrich_with_rating(&mut meta, &details(Some("7.0"), None, Some("Plot"), None, None));
        assert_eq!(
            meta.description.as_deref(),
            Some("A film.\n\nIMDb: 7.0/10")
        );
    }

    #[test]
    fn test_enrich_without_plot_keeps_description() {
        // The description block needs a plot in the rating record
        let mut meta = item("tt1", "X", Some("A film."));
        enrich_with_rating(&mut meta, &details(Some("7.0"), Some("1000"), None, None, None));
        assert_eq!(meta.name, "X (IMDb: 7.0)");
        assert_eq!(meta.description.as_deref(), Some("A film."));
    }

    #[test]
    fn test_extra_fields_round_trip() {
        let json = r#"{"id": "tt1", "name": "X", "releaseInfo": "1972",
                       "genres": ["Crime", "Drama"]}"#;
        let meta: MetaItem = serde_json::from_str(json).unwrap();
        let out = serde_json::to_value(&meta).unwrap();
        assert_eq!(out["releaseInfo"], "1972");
        assert_eq!(out["genres"][1], "Drama");
    }
}
