// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub ratings: RatingsConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (e.g., "0.0.0.0")
    #[serde(default = "default_address")]
    pub address: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally reachable base URL, used when rewriting catalog poster
    /// URLs to point back at the /overlay endpoint
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

/// Upstream catalog provider (Cinemeta-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
}

/// Upstream ratings provider (OMDB-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingsConfig {
    pub base_url: String,
    pub api_key: String,
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_base_url() -> String {
    format!("http://localhost:{}", default_port())
}

impl Config {
    /// Parse configuration from YAML, substituting `${VAR_NAME}` references
    /// with environment variable values.
    ///
    /// All referenced environment variables must be set; a missing variable
    /// is a hard error so that secrets (like the ratings API key) never
    /// silently resolve to an empty string.
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        // Now perform the substitution (we know all vars exist)
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap() // Safe because we checked above
        });

        let config: Config = serde_yaml::from_str(&substituted).map_err(|e| e.to_string())?;

        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }

        for (name, url) in [
            ("server.public_base_url", &self.server.public_base_url),
            ("catalog.base_url", &self.catalog.base_url),
            ("ratings.base_url", &self.ratings.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!(
                    "{} must start with http:// or https://, got '{}'",
                    name, url
                ));
            }
            if url.ends_with('/') {
                return Err(format!(
                    "{} must not have a trailing slash, got '{}'",
                    name, url
                ));
            }
        }

        if self.ratings.api_key.is_empty() {
            return Err("ratings.api_key cannot be empty".to_string());
        }

        Ok(())
    }
}
