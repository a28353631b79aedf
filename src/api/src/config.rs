//! Configuration for the race viewer.

use serde::{Deserialize, Serialize};

/// Upstream racing API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the North America endpoints
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Retries on transport failure (0 disables)
    #[serde(default)]
    pub retries: u32,
}

fn default_api_url() -> String {
    "https://api.theracingapi.com/v1/north-america".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            username: None,
            password: None,
            timeout: default_timeout(),
            retries: 0,
        }
    }
}

/// Fetch memoization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time box in seconds (0 disables caching)
    #[serde(default = "default_ttl")]
    pub ttl: u64,
}

fn default_ttl() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: default_ttl() }
    }
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Placeholder for cells that cannot be resolved
    #[serde(default = "default_sentinel")]
    pub sentinel: String,
}

fn default_sentinel() -> String {
    "N/A".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            sentinel: default_sentinel(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Racing Post scraper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Requests per minute
    #[serde(default = "default_rpm")]
    pub rpm: u32,
}

fn default_rpm() -> u32 {
    30
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self { rpm: default_rpm() }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional `config` file and the environment
    pub fn load() -> anyhow::Result<Self> {
        // Secrets may live in a local .env file
        let _ = dotenvy::dotenv();

        Self::load_with(config::Environment::with_prefix("RACING"))
    }

    /// Layer `env` over the defaults and the optional `config` file.
    ///
    /// Values stay strings until deserialized, so a password like `007123`
    /// keeps its leading zero; numeric fields are parsed per field.
    fn load_with(env: config::Environment) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            // RACING_API_USERNAME, RACING_CACHE_TTL, ...
            .add_source(env.separator("_"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.url, "https://api.theracingapi.com/v1/north-america");
        assert_eq!(config.api.timeout, 10);
        assert_eq!(config.api.retries, 0);
        assert!(config.api.username.is_none());
        assert_eq!(config.cache.ttl, 300);
        assert_eq!(config.display.sentinel, "N/A");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"api": {"username": "user"}, "cache": {"ttl": 0}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.api.username.as_deref(), Some("user"));
        assert!(config.api.password.is_none());
        assert_eq!(config.api.timeout, 10);
        assert_eq!(config.cache.ttl, 0);
        assert_eq!(config.display.sentinel, "N/A");
    }

    fn env_from(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("RACING").source(Some(map))
    }

    #[test]
    fn test_numeric_looking_secrets_stay_verbatim() {
        let env = env_from(&[
            ("RACING_API_USERNAME", "1e5"),
            ("RACING_API_PASSWORD", "007123"),
        ]);
        let config = AppConfig::load_with(env).unwrap();

        assert_eq!(config.api.username.as_deref(), Some("1e5"));
        assert_eq!(config.api.password.as_deref(), Some("007123"));
    }

    #[test]
    fn test_numeric_fields_parse_from_env() {
        let env = env_from(&[
            ("RACING_API_TIMEOUT", "3"),
            ("RACING_CACHE_TTL", "0"),
            ("RACING_SERVER_PORT", "9090"),
            ("RACING_DISPLAY_SENTINEL", "-"),
        ]);
        let config = AppConfig::load_with(env).unwrap();

        assert_eq!(config.api.timeout, 3);
        assert_eq!(config.cache.ttl, 0);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.display.sentinel, "-");
        assert_eq!(config.api.url, "https://api.theracingapi.com/v1/north-america");
    }

    #[test]
    fn test_load_reads_process_env() {
        // The only test that touches the process environment
        std::env::set_var("RACING_API_USERNAME", "user");
        std::env::set_var("RACING_API_PASSWORD", "007123");

        let config = AppConfig::load().unwrap();

        std::env::remove_var("RACING_API_USERNAME");
        std::env::remove_var("RACING_API_PASSWORD");
        assert_eq!(config.api.username.as_deref(), Some("user"));
        assert_eq!(config.api.password.as_deref(), Some("007123"));
    }
}
