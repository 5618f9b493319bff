use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "CWA_API_KEY";

const DEFAULT_ENDPOINT: &str = "https://opendata.cwa.gov.tw/api/v1/rest/datastore/F-D0047-089";
const DEFAULT_LOCATION: &str = "臺北市";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a single-line summary of all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `config.toml`
    #[serde(skip, default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Forecast provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// HTTP front end settings
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// CWA open data authorization key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Forecast datastore endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Location name as it appears in the forecast payload
    #[serde(default = "default_location_name")]
    pub location_name: String,

    /// Upstream request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How long a fetched payload is reused; 0 disables caching
    #[serde(default = "default_cache_minutes")]
    pub cache_minutes: u32,

    /// Offset of the forecast's local time zone, used to decide what "today" is
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_location_name() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_cache_minutes() -> u32 {
    30
}

fn default_utc_offset_hours() -> i32 {
    8
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            location_name: default_location_name(),
            timeout_secs: default_timeout_secs(),
            cache_minutes: default_cache_minutes(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl WeatherConfig {
    /// Check if an API key is present (and not a placeholder)
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty() && !k.starts_with("YOUR_"))
    }

    /// Local time zone of the forecast. Out-of-range offsets fall back to UTC.
    pub fn utc_offset(&self) -> FixedOffset {
        if !(-14..=14).contains(&self.utc_offset_hours) {
            return Utc.fix();
        }
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    /// Today's date in the forecast's local time zone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset()).date_naive()
    }
}

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
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tianqi")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, creating a default
    /// file if it doesn't exist. `CWA_API_KEY` overrides the stored key.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load configuration from an explicit file path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let mut config: Config =
            toml::from_str(&contents).context("Failed to parse config file")?;
        if let Some(parent) = path.parent() {
            config.config_dir = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors; warnings
    /// are logged.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Replace the API key when an override value is present and non-empty
    pub fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.weather.api_key = Some(key);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.endpoint, "weather.endpoint", &mut result);

        if self.weather.location_name.trim().is_empty() {
            result.add_error("weather.location_name", "Location name must not be empty");
        }

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        } else if self.weather.timeout_secs > 120 {
            result.add_warning(
                "weather.timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        if self.weather.cache_minutes == 0 {
            result.add_warning("weather.cache_minutes", "Forecast caching disabled (0 minutes)");
        }

        if !(-14..=14).contains(&self.weather.utc_offset_hours) {
            result.add_error(
                "weather.utc_offset_hours",
                format!(
                    "Offset must be between -14 and 14, got {}",
                    self.weather.utc_offset_hours
                ),
            );
        }

        if !self.weather.has_api_key() {
            result.add_warning(
                "weather.api_key",
                format!("API key not configured - set {} to enable forecasts", API_KEY_ENV),
            );
        }

        if self.server.port == 0 {
            result.add_error("server.port", "Port cannot be 0");
        }

        if self.server.host.trim().is_empty() {
            result.add_error("server.host", "Host must not be empty");
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to an explicit file path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("tianqi");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_missing_api_key_is_warning() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut config = Config::default();
        config.weather.endpoint = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.endpoint"));
    }

    #[test]
    fn test_invalid_endpoint_scheme() {
        let mut config = Config::default();
        config.weather.endpoint = "ftp://opendata.cwa.gov.tw/data".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout_and_port() {
        let mut config = Config::default();
        config.weather.timeout_secs = 0;
        config.server.port = 0;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "weather.timeout_secs"));
        assert!(result.errors.iter().any(|e| e.field == "server.port"));
    }

    #[test]
    fn test_out_of_range_offset() {
        let mut config = Config::default();
        config.weather.utc_offset_hours = 20;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "weather.utc_offset_hours"));
        assert_eq!(config.weather.utc_offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_api_key_override() {
        let mut config = Config::default();
        config.apply_api_key_override(Some("   ".to_string()));
        assert!(!config.weather.has_api_key());

        config.apply_api_key_override(Some("CWA-1234".to_string()));
        assert_eq!(config.weather.api_key.as_deref(), Some("CWA-1234"));
        assert!(config.weather.has_api_key());
    }

    #[test]
    fn test_placeholder_key_is_not_configured() {
        let mut config = Config::default();
        config.weather.api_key = Some("YOUR_CWA_KEY".to_string());
        assert!(!config.weather.has_api_key());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.weather.location_name, "臺北市");
        assert_eq!(config.config_dir, dir.path());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather]\ntimeout_secs = 5\n\n[server]\nport = 9000\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.timeout_secs, 5);
        assert_eq!(config.weather.cache_minutes, 30);
        assert_eq!(config.server.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.weather.api_key = Some("secret".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.weather.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
