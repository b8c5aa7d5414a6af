//! Configuration schema types
//!
//! This module defines the configuration structure for nivex. The root
//! [`NivexConfig`] maps directly to the TOML file.

use crate::config::secret::{secret_string, SecretString};
use crate::domain::{Destination, PeriodKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Main nivex configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NivexConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Upstream satellite catalog settings
    pub upstream: UpstreamConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Earth Engine API settings
    #[serde(default)]
    pub earthengine: EarthEngineConfig,

    /// Google Drive API settings
    #[serde(default)]
    pub drive: DriveConfig,

    /// Google API credentials
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NivexConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.upstream.validate()?;
        self.export.validate()?;
        self.earthengine.validate()?;
        self.auth.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Upstream satellite catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Catalog collection holding the source imagery
    /// (e.g. "projects/earthengine-public/assets/MODIS/061/MOD10A1")
    pub collection: String,

    /// Oldest period eligible for export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_period: Option<PeriodKey>,
}

impl UpstreamConfig {
    fn validate(&self) -> Result<(), String> {
        if self.collection.trim().is_empty() {
            return Err("upstream.collection cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Enabled destinations ("gee", "gdrive")
    pub destinations: Vec<Destination>,

    /// Artifact name prefix; artifacts are named `{prefix}_{YYYY-MM}`
    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,

    /// Periods to export; empty means the previous calendar month
    #[serde(default)]
    pub periods: Vec<PeriodKey>,

    /// Earth Engine asset folder exports are written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gee_asset_folder: Option<String>,

    /// Google Drive folder exports are written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_folder: Option<String>,

    /// Seconds to sleep between status-polling sweeps
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Export scale in meters
    #[serde(default = "default_scale_m")]
    pub scale_m: u32,

    /// Maximum number of pixels per export
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.destinations.is_empty() {
            return Err("export.destinations cannot be empty".to_string());
        }
        let unique: HashSet<Destination> = self.destinations.iter().copied().collect();
        if unique.len() != self.destinations.len() {
            return Err("export.destinations contains duplicates".to_string());
        }
        if self.destinations.contains(&Destination::EarthEngine)
            && self
                .gee_asset_folder
                .as_deref()
                .unwrap_or("")
                .trim()
                .is_empty()
        {
            return Err(
                "export.gee_asset_folder is required when 'gee' is an enabled destination"
                    .to_string(),
            );
        }
        if self.destinations.contains(&Destination::Drive)
            && self.drive_folder.as_deref().unwrap_or("").trim().is_empty()
        {
            return Err(
                "export.drive_folder is required when 'gdrive' is an enabled destination"
                    .to_string(),
            );
        }
        if self.poll_interval_secs == 0 {
            return Err("export.poll_interval_secs must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Earth Engine API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarthEngineConfig {
    /// Base URL of the Earth Engine REST API
    #[serde(default = "default_earthengine_endpoint")]
    pub endpoint: String,

    /// Google Cloud project used for export submissions
    #[serde(default)]
    pub project: String,
}

impl Default for EarthEngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_earthengine_endpoint(),
            project: String::new(),
        }
    }
}

impl EarthEngineConfig {
    fn validate(&self) -> Result<(), String> {
        if self.project.trim().is_empty() {
            return Err("earthengine.project cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Google Drive API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Base URL of the Drive REST API
    #[serde(default = "default_drive_endpoint")]
    pub endpoint: String,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            endpoint: default_drive_endpoint(),
        }
    }
}

/// Google API credentials
///
/// One bearer token covers both APIs; how it is obtained (service account,
/// gcloud, workload identity) is outside nivex's scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// OAuth2 bearer token for the Google APIs
    pub access_token: SecretString,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token: secret_string(String::new()),
        }
    }
}

impl AuthConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;
        if self.access_token.expose_secret().is_empty() {
            return Err("auth.access_token cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_image_prefix() -> String {
    "MOD10A1_SCI_CCI".to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_scale_m() -> u32 {
    500
}

fn default_max_pixels() -> u64 {
    100_000_000
}

fn default_earthengine_endpoint() -> String {
    "https://earthengine.googleapis.com/v1/".to_string()
}

fn default_drive_endpoint() -> String {
    "https://www.googleapis.com/drive/v3/".to_string()
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
