//! Overlay error types.
//!
//! Defines errors that can occur while rendering a rating badge onto a poster.

use std::fmt;

/// Errors that can occur during overlay processing.
///
/// All three kinds are terminal for the current request; nothing is retried.
#[derive(Debug)]
pub enum OverlayError {
    /// Request is missing required parameters (detected before any I/O)
    InvalidRequest(String),

    /// Source poster unreachable, returned a non-success status, or the
    /// bytes could not be decoded as an image
    ImageLoad(String),

    /// Failed to encode the composed raster to PNG
    Encode(String),
}

impl OverlayError {
    /// HTTP status code this error maps to.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::ImageLoad(_) | Self::Encode(_) => 500,
        }
    }

    /// Stable error kind label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::ImageLoad(_) => "image_load",
            Self::Encode(_) => "encode",
        }
    }

    /// Plain-text body sent to the caller.
    ///
    /// Invalid requests get a fixed message; processing failures expose a
    /// generic message plus the cause string.
    pub fn caller_message(&self) -> String {
        match self {
            Self::InvalidRequest(_) => "Missing required parameters".to_string(),
            Self::ImageLoad(cause) | Self::Encode(cause) => {
                format!("Error processing image: {}", cause)
            }
        }
    }
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest(msg) => write!(f, "Invalid overlay request: {}", msg),
            Self::ImageLoad(msg) => write!(f, "Failed to load poster image: {}", msg),
            Self::Encode(msg) => write!(f, "Failed to encode output image: {}", msg),
        }
    }
}

impl std::error::Error for OverlayError {}
