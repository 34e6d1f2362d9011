//! Configuration management for the `MedAccess` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AccessError;
use crate::classifier::{
    AccessibilityClassifier, DiagnosticsMode, Thresholds, default_direct_m,
    default_med_from_stop_m, default_stop_m,
};
use crate::geometry::IndexStrategy;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `MedAccess` service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Dataset locations
    #[serde(default)]
    pub data: DataConfig,
    /// Classification thresholds in meters
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Classifier behaviour
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    /// Directory served for paths no route matches (map client build)
    #[serde(default)]
    pub static_dir: Option<String>,
}

/// Dataset file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Sports facilities GeoJSON
    #[serde(default = "default_sports_path")]
    pub sports_path: String,
    /// Medical facilities GeoJSON
    #[serde(default = "default_medical_path")]
    pub medical_path: String,
    /// Transit stops GeoJSON
    #[serde(default = "default_stops_path")]
    pub stops_path: String,
}

/// Classifier settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Whether stop distances are computed for green results
    #[serde(default)]
    pub diagnostics: DiagnosticsMode,
    /// Nearest-point search strategy
    #[serde(default)]
    pub index: IndexStrategy,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u32 {
    10
}

fn default_sports_path() -> String {
    "data/processed/sport_all.geojson".to_string()
}

fn default_medical_path() -> String {
    "data/processed/med_all.geojson".to_string()
}

fn default_stops_path() -> String {
    "data/processed/transport_stops.geojson".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            static_dir: None,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            sports_path: default_sports_path(),
            medical_path: default_medical_path(),
            stops_path: default_stops_path(),
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

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            thresholds: Thresholds::default(),
            classifier: ClassifierConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AccessConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
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

        // Environment overrides, e.g. MEDACCESS_THRESHOLDS__DIRECT_M=300
        builder = builder.add_source(
            Environment::with_prefix("MEDACCESS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AccessConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("medaccess").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.data.sports_path.is_empty() {
            self.data.sports_path = default_sports_path();
        }
        if self.data.medical_path.is_empty() {
            self.data.medical_path = default_medical_path();
        }
        if self.data.stops_path.is_empty() {
            self.data.stops_path = default_stops_path();
        }
        if self.thresholds.direct_m == 0.0 {
            self.thresholds.direct_m = default_direct_m();
        }
        if self.thresholds.stop_m == 0.0 {
            self.thresholds.stop_m = default_stop_m();
        }
        if self.thresholds.med_from_stop_m == 0.0 {
            self.thresholds.med_from_stop_m = default_med_from_stop_m();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Classifier built from the thresholds and classifier sections
    #[must_use]
    pub fn classifier(&self) -> AccessibilityClassifier {
        AccessibilityClassifier::new(self.thresholds, self.classifier.diagnostics)
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AccessError::config("Server port cannot be 0").into());
        }

        if self.server.request_timeout_seconds > 300 {
            return Err(
                AccessError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AccessError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AccessError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AccessConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.request_timeout_seconds, 10);
        assert_eq!(config.thresholds.direct_m, 250.0);
        assert_eq!(config.thresholds.stop_m, 500.0);
        assert_eq!(config.thresholds.med_from_stop_m, 500.0);
        assert_eq!(config.classifier.diagnostics, DiagnosticsMode::ShortCircuit);
        assert_eq!(config.classifier.index, IndexStrategy::RTree);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AccessConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AccessConfig::default();
        config.server.request_timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_negative_threshold() {
        let mut config = AccessConfig::default();
        config.thresholds.med_from_stop_m = -1.0;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("med_from_stop_m"));
    }

    #[test]
    fn test_apply_defaults_repairs_zero_values() {
        let mut config = AccessConfig::default();
        config.thresholds.direct_m = 0.0;
        config.server.request_timeout_seconds = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.thresholds.direct_m, 250.0);
        assert_eq!(config.server.request_timeout_seconds, 10);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("medaccess-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[thresholds]
direct_m = 300.0

[classifier]
diagnostics = "full"
index = "linear"
"#
        )
        .unwrap();

        let config = AccessConfig::load_from_path(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();
        let config = config.unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.thresholds.direct_m, 300.0);
        assert_eq!(config.thresholds.stop_m, 500.0);
        assert_eq!(config.classifier.diagnostics, DiagnosticsMode::Full);
        assert_eq!(config.classifier.index, IndexStrategy::Linear);
        assert_eq!(config.data.sports_path, "data/processed/sport_all.geojson");
    }

    #[test]
    fn test_environment_overrides() {
        // Keys not asserted by the other loading tests, which share the process environment
        // SAFETY: no other test reads or writes these variables
        unsafe {
            std::env::set_var("MEDACCESS_THRESHOLDS__MED_FROM_STOP_M", "450");
            std::env::set_var("MEDACCESS_LOGGING__LEVEL", "debug");
        }

        let missing = std::env::temp_dir().join("medaccess-no-such-config.toml");
        let config = AccessConfig::load_from_path(Some(missing));

        unsafe {
            std::env::remove_var("MEDACCESS_THRESHOLDS__MED_FROM_STOP_M");
            std::env::remove_var("MEDACCESS_LOGGING__LEVEL");
        }

        let config = config.unwrap();
        assert_eq!(config.thresholds.med_from_stop_m, 450.0);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.thresholds.direct_m, 250.0);
    }

    #[test]
    fn test_classifier_uses_configured_thresholds() {
        let mut config = AccessConfig::default();
        config.thresholds.direct_m = 123.0;
        config.classifier.diagnostics = DiagnosticsMode::Full;
        let classifier = config.classifier();
        assert_eq!(classifier.thresholds().direct_m, 123.0);
        assert_eq!(classifier.diagnostics(), DiagnosticsMode::Full);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AccessConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("medaccess"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
