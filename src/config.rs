//! Configuration management for `ClimateWatch`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ClimateWatchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `ClimateWatch` backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateWatchConfig {
    /// Live weather provider settings
    pub weather: WeatherConfig,
    /// Geocoding provider settings
    pub geocoding: GeocodingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// HTTP server settings
    pub server: ServerConfig,
}

/// Live weather provider (OpenWeatherMap current weather) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key; without it every lookup falls back to synthesis
    pub api_key: Option<String>,
    /// Base URL for the current weather endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Base URL of the OpenWeatherMap direct geocoding API
    pub openweather_url: String,
    /// Base URL of the Nominatim search API
    pub nominatim_url: String,
    /// User agent sent to Nominatim (its usage policy requires one)
    pub user_agent: String,
    /// Maximum number of matches requested per provider
    pub result_limit: u32,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Directory of the built frontend served for non-API paths
    pub static_dir: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_timeout() -> u32 {
    8
}

fn default_openweather_geo_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    format!("ClimateWatch/{}", crate::VERSION)
}

fn default_result_limit() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            openweather_url: default_openweather_geo_url(),
            nominatim_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            result_limit: default_result_limit(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl ClimateWatchConfig {
    /// Load configuration from the default file location and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // CLIMATEWATCH_WEATHER__API_KEY -> weather.api_key
        builder = builder.add_source(
            Environment::with_prefix("CLIMATEWATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ClimateWatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("climatewatch").join("config.toml"))
    }

    /// Apply default values to zero or empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self
            .weather
            .api_key
            .as_ref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.weather.api_key = None;
        }
        if self.geocoding.openweather_url.is_empty() {
            self.geocoding.openweather_url = default_openweather_geo_url();
        }
        if self.geocoding.nominatim_url.is_empty() {
            self.geocoding.nominatim_url = default_nominatim_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.geocoding.result_limit == 0 {
            self.geocoding.result_limit = default_result_limit();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // The key is optional: without it the annotator always synthesizes.
        if let Some(api_key) = &self.weather.api_key {
            if api_key.len() < 8 {
                return Err(ClimateWatchError::config(
                    "Weather API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }

            if api_key.len() > 100 {
                return Err(ClimateWatchError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(1..=60).contains(&self.weather.timeout_seconds) {
            return Err(
                ClimateWatchError::config("Weather API timeout must be between 1 and 60 seconds")
                    .into(),
            );
        }

        if !(1..=60).contains(&self.geocoding.timeout_seconds) {
            return Err(ClimateWatchError::config(
                "Geocoding timeout must be between 1 and 60 seconds",
            )
            .into());
        }

        if !(1..=50).contains(&self.geocoding.result_limit) {
            return Err(ClimateWatchError::config(
                "Geocoding result limit must be between 1 and 50",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ClimateWatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ClimateWatchError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (label, url) in [
            ("Weather API base URL", &self.weather.base_url),
            ("OpenWeatherMap geocoding URL", &self.geocoding.openweather_url),
            ("Nominatim URL", &self.geocoding.nominatim_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClimateWatchError::config(format!(
                    "{label} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClimateWatchConfig::default();
        assert_eq!(
            config.weather.base_url,
            "https://api.openweathermap.org/data/2.5"
        );
        assert_eq!(config.weather.timeout_seconds, 8);
        assert_eq!(config.geocoding.result_limit, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server.port, 3000);
        assert!(config.weather.api_key.is_none());
        assert!(config.geocoding.user_agent.starts_with("ClimateWatch/"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ClimateWatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = ClimateWatchConfig::default();
        config.weather.api_key = Some("short".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let mut config = ClimateWatchConfig::default();
        config.weather.api_key = Some("   ".to_string());
        config.apply_defaults();
        assert!(config.weather.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = ClimateWatchConfig::default();
        config.logging.level = "verbose".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = ClimateWatchConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[test]
    fn test_config_validation_url_scheme() {
        let mut config = ClimateWatchConfig::default();
        config.geocoding.nominatim_url = "ftp://nominatim.example".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Nominatim URL"));
    }

    #[test]
    fn test_apply_defaults_fills_zero_values() {
        let mut config = ClimateWatchConfig::default();
        config.weather.timeout_seconds = 0;
        config.geocoding.result_limit = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.weather.timeout_seconds, 8);
        assert_eq!(config.geocoding.result_limit, 10);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("climatewatch-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8088\n\n[geocoding]\nresult_limit = 5\n",
        )
        .unwrap();

        let config = ClimateWatchConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.geocoding.result_limit, 5);
        assert_eq!(config.weather.timeout_seconds, 8);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = ClimateWatchConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("climatewatch"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
