/// Configuration for the air quality viewer.
///
/// Loaded once at startup from an optional `aqmon.toml`, with `.env` /
/// environment variables overriding the service URLs. Every field has a
/// working default so the crate runs with no configuration at all
/// against a local backend.

use std::time::Duration;

use serde::Deserialize;

/// Environment override for the prediction backend base URL.
pub const ENV_BACKEND_URL: &str = "AQMON_BACKEND_URL";
/// Environment override for the geocoder base URL.
pub const ENV_GEOCODER_URL: &str = "AQMON_GEOCODER_URL";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the prediction / health advice backend.
    pub backend_url: String,
    /// Base URL of the Nominatim-style geocoding service.
    pub geocoder_url: String,
    /// Per-request timeout, seconds. Expiry is treated as a failed fetch.
    pub request_timeout_secs: u64,
    /// Grid resolution (degrees between points) requested at startup.
    pub grid_resolution: u32,
    /// Minimum log level: debug | info | warn | error.
    pub log_level: String,
    /// Optional log file path.
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: "http://127.0.0.1:5000".to_string(),
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            request_timeout_secs: 15,
            grid_resolution: 5,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    Io(std::io::Error),
    /// The config file could not be parsed as TOML.
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Config read error: {}", e),
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist, then apply `.env` / environment overrides.
    pub fn load(path: &str) -> Result<Config, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(ConfigError::Parse)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        dotenv::dotenv().ok();
        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            self.backend_url = url;
        }
        if let Ok(url) = std::env::var(ENV_GEOCODER_URL) {
            self.geocoder_url = url;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Initialize the global logger from this configuration.
    pub fn init_logging(&self) {
        crate::logging::init_logger(
            crate::logging::LogLevel::from_name(&self.log_level),
            self.log_file.as_deref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.grid_resolution, 5);
        assert!(config.backend_url.starts_with("http://"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            backend_url = "http://aq.example.net"
            request_timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.backend_url, "http://aq.example.net");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.grid_resolution, 5);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        let result: Result<Config, _> = toml::from_str("backend_url = [1, 2]");
        assert!(result.is_err());
    }
}
