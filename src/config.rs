//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! the service identity, relay limits, lead webhook timeouts, logging format,
//! and default paths. `AppConfig` is the root configuration struct containing all settings.

use serde::Deserialize;
use std::path::Path;

// =============================================================================
// Service Identity
// =============================================================================

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "voice-cr-ws";

// =============================================================================
// Relay Limits
// =============================================================================

/// Largest inbound WebSocket message accepted on the relay socket (64 KiB)
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Timeout for the lead webhook POST, in milliseconds
pub const DEFAULT_LEAD_WEBHOOK_TIMEOUT_MS: u64 = 2000;

/// Extra time allowed on shutdown for lead deliveries beyond the webhook timeout
pub const LEAD_DRAIN_MARGIN_MS: u64 = 500;

/// Drain window for in-flight connections on shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default listen address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "voice_cr_ws=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Relay socket and lead forwarding settings
    #[serde(default)]
    pub relay: RelayConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Maximum size of a single inbound WebSocket message
    #[serde(default = "RelayConfig::default_max_message_bytes")]
    pub max_message_bytes: usize,
    /// Backend endpoint receiving confirmed leads. Leads are only logged when unset.
    pub lead_webhook_url: Option<String>,
    /// Timeout for the lead webhook request
    #[serde(default = "RelayConfig::default_lead_webhook_timeout_ms")]
    pub lead_webhook_timeout_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: Self::default_max_message_bytes(),
            lead_webhook_url: None,
            lead_webhook_timeout_ms: Self::default_lead_webhook_timeout_ms(),
        }
    }
}

impl RelayConfig {
    fn default_max_message_bytes() -> usize {
        DEFAULT_MAX_MESSAGE_BYTES
    }

    fn default_lead_webhook_timeout_ms() -> u64 {
        DEFAULT_LEAD_WEBHOOK_TIMEOUT_MS
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load the file at `path`, or fall back to built-in defaults when the
    /// default path is absent. An explicitly given path must exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with_fallback(path.as_ref(), Path::new(DEFAULT_CONFIG_PATH))
    }

    fn load_with_fallback(path: &Path, default_path: &Path) -> Result<Self, ConfigError> {
        if path == default_path && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply command-line listen overrides and validate the result.
    pub fn apply_overrides(
        &mut self,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = host {
            self.http.host = host;
        }
        if let Some(port) = port {
            self.http.port = port;
        }
        self.validate()
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation(
                "http.port must be non-zero".to_string(),
            ));
        }

        if self.relay.max_message_bytes == 0 {
            return Err(ConfigError::Validation(
                "relay.max_message_bytes must be greater than zero".to_string(),
            ));
        }

        if self.relay.lead_webhook_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "relay.lead_webhook_timeout_ms must be greater than zero".to_string(),
            ));
        }

        if let Some(url) = &self.relay.lead_webhook_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "relay.lead_webhook_url must be an http(s) URL, got '{}'",
                    url
                )));
            }
        }

        match self.logging.format.to_ascii_lowercase().as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
