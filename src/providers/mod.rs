//! Upstream provider clients.
//!
//! The catalog provider supplies poster metadata, the meta provider
//! supplies per-title documents, and the ratings provider supplies rating
//! records keyed by IMDb id. All are plain JSON-over-HTTP clients with no
//! retry logic. Failures map to `ServiceError::Upstream` and the caller
//! decides how to degrade.

pub mod catalog;
pub mod meta;
pub mod ratings;

pub use catalog::{CatalogClient, CatalogItem, CatalogResponse};
pub use meta::{MetaClient, MetaItem, MetaResponse};
pub use ratings::{RatingDetails, RatingsClient};
