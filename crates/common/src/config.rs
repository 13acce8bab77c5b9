//! Application configuration.

use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Paid-featuring configuration.
    #[serde(default)]
    pub featuring: FeaturingConfig,
    /// Search index configuration.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: Url,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Paid-featuring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturingConfig {
    /// How many days a confirmed payment keeps a listing featured.
    #[serde(default = "default_featured_days")]
    pub duration_days: i64,
}

impl Default for FeaturingConfig {
    fn default() -> Self {
        Self {
            duration_days: default_featured_days(),
        }
    }
}

/// Search index configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchConfig {
    /// Meilisearch host URL, if search mirroring is enabled.
    #[serde(default)]
    pub meilisearch_url: Option<String>,
    /// Meilisearch API key (optional, for authenticated access).
    #[serde(default)]
    pub meilisearch_api_key: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_featured_days() -> i64 {
    7
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `VITRINE_ENV`)
    /// 3. Environment variables with `VITRINE_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("VITRINE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("VITRINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("VITRINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_featuring_defaults() {
        let featuring = FeaturingConfig::default();
        assert_eq!(featuring.duration_days, 7);
    }

    #[test]
    fn test_search_defaults() {
        let search = SearchConfig::default();
        assert!(search.meilisearch_url.is_none());
        assert!(search.meilisearch_api_key.is_none());
    }
}
