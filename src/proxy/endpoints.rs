// Endpoint handlers - build complete responses for every route the
// service exposes. The ProxyHttp impl writes them to the session.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

use crate::config::Config;
use crate::metrics::Metrics;
use crate::overlay::{OverlayParams, OverlayProcessor, CACHE_CONTROL_VALUE, CONTENT_TYPE_PNG};
use crate::providers::catalog::rewrite_poster;
use crate::providers::meta::enrich_with_rating;
use crate::providers::{CatalogClient, CatalogResponse, MetaClient, MetaResponse, RatingsClient};

/// A fully materialized response ready to be written to the session.
pub struct EndpointResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub cache_control: Option<&'static str>,
    pub body: Bytes,
}

impl EndpointResponse {
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            cache_control: None,
            body: Bytes::from(value.to_string()),
        }
    }

    pub fn text(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "text/plain",
            cache_control: None,
            body: Bytes::from(body),
        }
    }

    pub fn png(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: CONTENT_TYPE_PNG,
            cache_control: Some(CACHE_CONTROL_VALUE),
            body: Bytes::from(body),
        }
    }
}

/// `GET /health`
pub fn handle_health(start_time: Instant) -> EndpointResponse {
    EndpointResponse::json(
        200,
        serde_json::json!({
            "status": "healthy",
            "uptime_seconds": start_time.elapsed().as_secs(),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// `GET /metrics`
pub fn handle_metrics(metrics: &Metrics) -> EndpointResponse {
    EndpointResponse {
        status: 200,
        content_type: "text/plain; version=0.0.4",
        cache_control: None,
        body: Bytes::from(metrics.export_prometheus()),
    }
}

/// `GET /manifest.json`
pub fn handle_manifest() -> EndpointResponse {
    EndpointResponse::json(
        200,
        serde_json::json!({
            "id": "org.shirushi.posterbadges",
            "version": env!("CARGO_PKG_VERSION"),
            "name": "Shirushi Poster Badges",
            "description": "Catalogs with rating badges drawn onto the posters",
            "resources": ["catalog", "meta"],
            "types": ["movie", "series"],
            "idPrefixes": ["tt"],
            "catalogs": [
                {"type": "movie", "id": "top", "name": "Top Movies"},
                {"type": "series", "id": "top", "name": "Top Series"}
            ]
        }),
    )
}

/// Fallback for unknown routes.
pub fn handle_not_found(path: &str) -> EndpointResponse {
    EndpointResponse::json(
        404,
        serde_json::json!({
            "error": "Not Found",
            "path": path,
            "status": 404
        }),
    )
}

/// `GET /overlay?posterUrl=&rating=&position=`
pub async fn handle_overlay(
    processor: &OverlayProcessor,
    query_params: &HashMap<String, String>,
    metrics: &Arc<Metrics>,
) -> EndpointResponse {
    let params = match OverlayParams::from_query(query_params) {
        Ok(params) => params,
        Err(e) => {
            warn!(error = %e, "Overlay request rejected");
            metrics.increment_overlay_failure(e.kind());
            return EndpointResponse::text(e.http_status(), e.caller_message());
        }
    };

    let render_start = Instant::now();
    match processor.render(&params).await {
        Ok(png_bytes) => {
            metrics.record_overlay_duration_us(render_start.elapsed().as_micros() as u64);
            EndpointResponse::png(png_bytes)
        }
        Err(e) => {
            error!(
                error = %e,
                poster_url = %params.poster_url,
                "Overlay render failed"
            );
            metrics.increment_overlay_failure(e.kind());
            EndpointResponse::text(e.http_status(), e.caller_message())
        }
    }
}

/// `GET /catalog/{type}/{id}.json`
///
/// Upstream catalog failures degrade to an empty catalog rather than an
/// error status, so consumers always get a well-formed page.
pub async fn handle_catalog(
    catalog: &CatalogClient,
    ratings: &RatingsClient,
    config: &Arc<Config>,
    content_type: &str,
    catalog_id: &str,
    metrics: &Arc<Metrics>,
) -> EndpointResponse {
    let mut page = match catalog.fetch_catalog(content_type, catalog_id).await {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, content_type, catalog_id, "Catalog fetch failed, serving empty page");
            metrics.increment_upstream_failure("catalog");
            return provider_json(&CatalogResponse { metas: Vec::new() });
        }
    };

    for item in &mut page.metas {
        if item.poster.is_none() {
            continue;
        }

        let rating = match ratings.fetch_rating(&item.id).await {
            Ok(rating) => rating,
            Err(e) => {
                warn!(error = %e, item_id = %item.id, "Rating lookup failed");
                metrics.increment_upstream_failure("ratings");
                None
            }
        };

        rewrite_poster(item, &config.server.public_base_url, rating.as_deref());
    }

    provider_json(&page)
}

/// `GET /meta/{type}/{id}.json`
///
/// Upstream meta failures degrade to `{"meta": null}`; a failed rating
/// lookup serves the meta document unenriched.
pub async fn handle_meta(
    meta: &MetaClient,
    ratings: &RatingsClient,
    content_type: &str,
    meta_id: &str,
    metrics: &Arc<Metrics>,
) -> EndpointResponse {
    let mut document = match meta.fetch_meta(content_type, meta_id).await {
        Ok(document) => document,
        Err(e) => {
            warn!(error = %e, content_type, meta_id, "Meta fetch failed, serving null meta");
            metrics.increment_upstream_failure("meta");
            return provider_json(&MetaResponse { meta: None });
        }
    };

    if let Some(item) = document.meta.as_mut() {
        if let Some(imdb_id) = item.imdb_id().map(String::from) {
            match ratings.fetch_details(&imdb_id).await {
                Ok(Some(details)) => enrich_with_rating(item, &details),
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, imdb_id = %imdb_id, "Rating lookup failed");
                    metrics.increment_upstream_failure("ratings");
                }
            }
        }
    }

    provider_json(&document)
}

fn provider_json<T: serde::Serialize>(value: &T) -> EndpointResponse {
    match serde_json::to_string(value) {
        Ok(body) => EndpointResponse {
            status: 200,
            content_type: "application/json",
            cache_control: None,
            body: Bytes::from(body),
        },
        Err(e) => {
            error!(error = %e, "Response serialization failed");
            EndpointResponse::json(
                500,
                serde_json::json!({"error": "Internal Server Error", "status": 500}),
            )
        }
    }
}
