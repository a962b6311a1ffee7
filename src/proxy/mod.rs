// Proxy module - Pingora ProxyHttp implementation
// Routes every request to an internal handler; nothing is forwarded upstream

use async_trait::async_trait;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_core::Result;
use pingora_http::ResponseHeader;
use pingora_proxy::{ProxyHttp, Session};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::ServiceError;
use crate::metrics::Metrics;
use crate::overlay::OverlayProcessor;
use crate::pipeline::RequestContext;
use crate::providers::{CatalogClient, MetaClient, RatingsClient};

pub mod endpoints;
pub mod helpers;

use endpoints::EndpointResponse;

/// ShirushiProxy implements the Pingora ProxyHttp trait
/// Every route is terminated in request_filter; upstream_peer is unreachable
pub struct ShirushiProxy {
    config: Arc<Config>,
    processor: OverlayProcessor,
    catalog: CatalogClient,
    meta: MetaClient,
    ratings: RatingsClient,
    metrics: Arc<Metrics>,
    /// Service start time (for uptime calculation in /health endpoint)
    start_time: Instant,
}

impl ShirushiProxy {
    /// Create a new ShirushiProxy instance from configuration
    pub fn new(config: Config) -> std::result::Result<Self, ServiceError> {
        let processor =
            OverlayProcessor::new().map_err(|e| ServiceError::Internal(e.to_string()))?;

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            ServiceError::Internal(format!("Failed to create HTTP client: {}", e))
        })?;

        let catalog = CatalogClient::new(http_client.clone(), config.catalog.base_url.clone());
        let meta = MetaClient::new(http_client.clone(), config.catalog.base_url.clone());
        let ratings = RatingsClient::new(
            http_client,
            config.ratings.base_url.clone(),
            config.ratings.api_key.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            processor,
            catalog,
            meta,
            ratings,
            metrics: Arc::new(Metrics::new()),
            start_time: Instant::now(),
        })
    }

    /// Get a reference to the metrics instance
    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Write a materialized response to the session
    async fn write_response(
        &self,
        session: &mut Session,
        ctx: &RequestContext,
        response: EndpointResponse,
    ) -> Result<()> {
        let mut header = ResponseHeader::build(response.status, None)?;
        header.insert_header("Content-Type", response.content_type)?;
        header.insert_header("Content-Length", response.body.len().to_string())?;
        header.insert_header("Access-Control-Allow-Origin", "*")?;
        header.insert_header("X-Request-ID", ctx.request_id())?;
        if let Some(cache_control) = response.cache_control {
            header.insert_header("Cache-Control", cache_control)?;
        }

        session
            .write_response_header(Box::new(header), false)
            .await?;
        session
            .write_response_body(Some(response.body), true)
            .await?;

        self.metrics.increment_status_count(response.status);

        Ok(())
    }

    /// Handle a CORS preflight request (204, no body)
    async fn write_preflight(&self, session: &mut Session, ctx: &RequestContext) -> Result<()> {
        let mut header = ResponseHeader::build(204, None)?;
        header.insert_header("Access-Control-Allow-Origin", "*")?;
        header.insert_header("Access-Control-Allow-Methods", "GET, OPTIONS")?;
        header.insert_header("Access-Control-Allow-Headers", "*")?;
        header.insert_header("X-Request-ID", ctx.request_id())?;

        session.write_response_header(Box::new(header), true).await?;

        self.metrics.increment_status_count(204);

        Ok(())
    }
}

#[async_trait]
impl ProxyHttp for ShirushiProxy {
    type CTX = RequestContext;

    /// Create a new request context for each incoming request
    fn new_ctx(&self) -> Self::CTX {
        RequestContext::new()
    }

    /// Never reached: request_filter terminates every route
    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        Err(pingora_core::Error::explain(
            pingora_core::ErrorType::InternalError,
            "All routes are handled internally, no upstream exists",
        ))
    }

    /// Route and fully handle every incoming request
    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let req = session.req_header();
        let path = req.uri.path().to_string();
        let method = req.method.to_string();
        let query_params = helpers::extract_query_params(req);

        ctx.set_route(method.clone(), path.clone());
        self.metrics.increment_request_count();

        if method == "OPTIONS" {
            self.write_preflight(session, ctx).await?;
            return Ok(true);
        }

        // GET-only surface; other methods fall through to 404
        if method != "GET" {
            self.metrics.increment_endpoint_count("not_found");
            self.write_response(session, ctx, endpoints::handle_not_found(&path))
                .await?;
            return Ok(true);
        }

        let response = match path.as_str() {
            "/overlay" => {
                self.metrics.increment_endpoint_count("overlay");
                endpoints::handle_overlay(&self.processor, &query_params, &self.metrics).await
            }
            "/health" => {
                self.metrics.increment_endpoint_count("health");
                endpoints::handle_health(self.start_time)
            }
            "/metrics" => {
                self.metrics.increment_endpoint_count("metrics");
                endpoints::handle_metrics(&self.metrics)
            }
            "/manifest.json" => {
                self.metrics.increment_endpoint_count("manifest");
                endpoints::handle_manifest()
            }
            _ => {
                if let Some((content_type, catalog_id)) = helpers::parse_catalog_path(&path) {
                    self.metrics.increment_endpoint_count("catalog");
                    endpoints::handle_catalog(
                        &self.catalog,
                        &self.ratings,
                        &self.config,
                        &content_type,
                        &catalog_id,
                        &self.metrics,
                    )
                    .await
                } else if let Some((content_type, meta_id)) = helpers::parse_meta_path(&path) {
                    self.metrics.increment_endpoint_count("meta");
                    endpoints::handle_meta(
                        &self.meta,
                        &self.ratings,
                        &content_type,
                        &meta_id,
                        &self.metrics,
                    )
                    .await
                } else {
                    self.metrics.increment_endpoint_count("not_found");
                    endpoints::handle_not_found(&path)
                }
            }
        };

        self.write_response(session, ctx, response).await?;

        Ok(true) // Short-circuit (response already sent)
    }

    /// Log request completion
    async fn logging(
        &self,
        session: &mut Session,
        _e: Option<&pingora_core::Error>,
        ctx: &mut Self::CTX,
    ) {
        let status_code = session
            .response_written()
            .map(|resp| resp.status.as_u16())
            .unwrap_or(500);

        tracing::info!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            status_code = status_code,
            duration_ms = ctx.elapsed_ms() as u64,
            "Request completed"
        );
    }
}
