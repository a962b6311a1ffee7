// Error types module

use std::fmt;

/// Centralized error type for the service
///
/// Categorizes errors into 3 main types for better debugging,
/// monitoring, and appropriate HTTP status code mapping.
#[derive(Debug, Clone)]
pub enum ServiceError {
    /// Configuration errors (invalid YAML, missing env vars, etc.)
    Config(String),

    /// Upstream collaborator errors (catalog or ratings provider unreachable,
    /// malformed response, etc.)
    Upstream(String),

    /// Internal service errors (resource exhaustion, unexpected errors)
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ServiceError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}
