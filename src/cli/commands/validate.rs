//! Validate-config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(path = %config_path, "Validating configuration");

        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid: {config_path}");
                println!("  Destinations: {:?}", config.export.destinations);
                println!("  Upstream collection: {}", config.upstream.collection);
                println!("  Image prefix: {}", config.export.image_prefix);
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Configuration validation failed");
                eprintln!("Configuration is invalid: {e}");
                Ok(2)
            }
        }
    }
}
