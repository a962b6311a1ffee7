// Request pipeline module - per-request context carried through the proxy callbacks

use std::time::{Instant, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Request context that holds all information about an HTTP request
/// as it flows through the proxy callbacks
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: String,
    path: String,
    timestamp: u64,
    started_at: Instant,
}

impl RequestContext {
    /// Create a new RequestContext
    /// Automatically generates a unique request ID (UUID v4) and captures current timestamp
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method: String::new(),
            path: String::new(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            started_at: Instant::now(),
        }
    }

    /// Record the method and path once the request header is available
    pub fn set_route(&mut self, method: impl Into<String>, path: impl Into<String>) {
        self.method = method.into();
        self.path = path.into();
    }

    /// Get the unique request ID
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Get the HTTP method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the request timestamp (Unix epoch seconds)
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Elapsed wall-clock time since the context was created
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
