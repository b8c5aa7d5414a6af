//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::NivexConfig;
use super::secret::secret_string;
use crate::domain::errors::NivexError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into NivexConfig
/// 4. Applies environment variable overrides (NIVEX_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use nivex::config::loader::load_config;
///
/// let config = load_config("nivex.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<NivexConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(NivexError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        NivexError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: NivexConfig = toml::from_str(&contents)
        .map_err(|e| NivexError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config.validate().map_err(|e| {
        NivexError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| NivexError::Configuration(e.to_string()))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(NivexError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the NIVEX_* prefix
///
/// Environment variables follow the pattern: NIVEX_<SECTION>_<KEY>
/// For example: NIVEX_EARTHENGINE_PROJECT, NIVEX_AUTH_ACCESS_TOKEN
fn apply_env_overrides(config: &mut NivexConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("NIVEX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Upstream overrides
    if let Ok(val) = std::env::var("NIVEX_UPSTREAM_COLLECTION") {
        config.upstream.collection = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("NIVEX_EXPORT_IMAGE_PREFIX") {
        config.export.image_prefix = val;
    }
    if let Ok(val) = std::env::var("NIVEX_EXPORT_POLL_INTERVAL_SECS") {
        if let Ok(interval) = val.parse() {
            config.export.poll_interval_secs = interval;
        }
    }
    if let Ok(val) = std::env::var("NIVEX_EXPORT_GEE_ASSET_FOLDER") {
        config.export.gee_asset_folder = Some(val);
    }
    if let Ok(val) = std::env::var("NIVEX_EXPORT_DRIVE_FOLDER") {
        config.export.drive_folder = Some(val);
    }

    // Earth Engine overrides
    if let Ok(val) = std::env::var("NIVEX_EARTHENGINE_ENDPOINT") {
        config.earthengine.endpoint = val;
    }
    if let Ok(val) = std::env::var("NIVEX_EARTHENGINE_PROJECT") {
        config.earthengine.project = val;
    }

    // Auth overrides
    if let Ok(val) = std::env::var("NIVEX_AUTH_ACCESS_TOKEN") {
        config.auth.access_token = secret_string(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("NIVEX_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("NIVEX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
