//! Overlay pipeline entry point.
//!
//! Runs the full fetch, compose, encode sequence for one request and
//! returns the PNG bytes for the response body.

use tracing::debug;

use super::compositor::{compose, encode_png};
use super::error::OverlayError;
use super::fetcher::PosterFetcher;
use super::params::OverlayParams;

/// Content type of every successful overlay response. The output is always
/// PNG regardless of the source format.
pub const CONTENT_TYPE_PNG: &str = "image/png";
/// Cache directive attached to successful overlay responses.
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=86400";

/// Renders rating badges onto remote posters.
#[derive(Clone)]
pub struct OverlayProcessor {
    fetcher: PosterFetcher,
}

impl OverlayProcessor {
    pub fn new() -> Result<Self, OverlayError> {
        Ok(Self {
            fetcher: PosterFetcher::new()?,
        })
    }

    /// Fetch the poster, draw the badge, and encode the result as PNG.
    pub async fn render(&self, params: &OverlayParams) -> Result<Vec<u8>, OverlayError> {
        let poster = self.fetcher.fetch(&params.poster_url).await?;
        debug!(
            width = poster.width(),
            height = poster.height(),
            position = params.position.as_str(),
            "Poster fetched, compositing badge"
        );

        let composed = compose(&poster, &params.rating, params.position)?;
        encode_png(&composed)
    }
}
