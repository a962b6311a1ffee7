//! Poster image fetcher.
//!
//! Fetches the source poster over HTTP and decodes it at its native pixel
//! dimensions. Every request fetches fresh; composited results are never
//! reused, so there is nothing to cache here.
//!
//! A single failed fetch fails the whole request. No retry, no timeout
//! beyond the HTTP client's defaults.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use super::error::OverlayError;

/// Fetcher for poster images.
#[derive(Clone)]
pub struct PosterFetcher {
    http_client: reqwest::Client,
}

impl PosterFetcher {
    /// Create a new poster fetcher.
    ///
    /// # Errors
    ///
    /// Returns `OverlayError::ImageLoad` if the HTTP client cannot be created
    /// (e.g., TLS configuration issues, system resource exhaustion).
    pub fn new() -> Result<Self, OverlayError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| OverlayError::ImageLoad(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    /// Fetch and decode a poster image from an absolute HTTP(S) URL.
    ///
    /// # Errors
    ///
    /// Returns `OverlayError::ImageLoad` if:
    /// - The URL does not use http:// or https://
    /// - The network fetch fails or returns a non-success status
    /// - The response bytes cannot be decoded as an image
    pub async fn fetch(&self, url: &str) -> Result<DynamicImage, OverlayError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(OverlayError::ImageLoad(format!(
                "Unsupported poster URL scheme: {}",
                url
            )));
        }

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| OverlayError::ImageLoad(format!("HTTP fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(OverlayError::ImageLoad(format!(
                "HTTP request failed with status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| OverlayError::ImageLoad(format!("Failed to read HTTP body: {}", e)))?;

        let format = detect_image_format(&bytes, url)?;

        image::load(Cursor::new(bytes), format)
            .map_err(|e| OverlayError::ImageLoad(format!("Failed to decode image: {}", e)))
    }
}

/// Detect image format from bytes or URL extension.
fn detect_image_format(data: &[u8], path: &str) -> Result<ImageFormat, OverlayError> {
    // Try to detect from magic bytes first
    if let Ok(format) = image::guess_format(data) {
        return Ok(format);
    }

    // Fall back to extension (query string stripped)
    let path = path.split('?').next().unwrap_or(path);
    let ext = path
        .rsplit('.')
        .next()
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "gif" => Ok(ImageFormat::Gif),
        "webp" => Ok(ImageFormat::WebP),
        _ => Err(OverlayError::ImageLoad(format!(
            "Unsupported image format: {}",
            ext
        ))),
    }
}
