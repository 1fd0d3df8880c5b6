//! Configuration management for the Callscribe toolkit

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Audio list backend configuration
    pub backend: BackendConfig,

    /// External ticketing service configuration
    pub tickets: TicketApiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Audio list backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the REST backend
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// External ticketing service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketApiConfig {
    /// Base URL of the ticketing API
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default page size for ticket searches
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

const fn default_page_limit() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Config {
    /// Load configuration from environment and files
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("CALLSCRIBE").separator("_"))
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        // Base URLs come from the environment when set, service defaults otherwise
        let backend_url = std::env::var("CALLSCRIBE_BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let tickets_url = std::env::var("CALLSCRIBE_TICKETS_URL")
            .unwrap_or_else(|_| "http://localhost:8088".to_string());

        Self {
            backend: BackendConfig {
                url: backend_url,
                timeout_secs: default_timeout_secs(),
                connect_timeout_secs: default_connect_timeout_secs(),
            },
            tickets: TicketApiConfig {
                url: tickets_url,
                timeout_secs: default_timeout_secs(),
                page_limit: default_page_limit(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}
