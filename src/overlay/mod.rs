//! Poster badge overlay.
//!
//! Fetches a remote poster image, draws a semi-transparent rating badge in a
//! corner, and encodes the result as PNG. The poster keeps its native
//! dimensions; the badge scales its width with the poster.

pub mod badge;
pub mod compositor;
pub mod error;
pub mod fetcher;
pub mod params;
pub mod processor;
mod text;

pub use badge::{BadgeGeometry, ImageDimensions};
pub use error::OverlayError;
pub use fetcher::PosterFetcher;
pub use params::{BadgePosition, OverlayParams};
pub use processor::{OverlayProcessor, CACHE_CONTROL_VALUE, CONTENT_TYPE_PNG};
