//! Init command implementation
//!
//! Writes a starter configuration file with commented defaults.

use clap::Args;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# nivex configuration

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

[upstream]
# Catalog collection holding the source imagery
collection = "projects/earthengine-public/assets/MODIS/061/MOD10A1"
# Oldest period eligible for export
min_period = "2000-03-01"

[export]
# Enabled destinations: "gee" (Earth Engine assets), "gdrive" (Google Drive)
destinations = ["gee", "gdrive"]
# Artifacts are named {image_prefix}_{YYYY-MM}
image_prefix = "MOD10A1_SCI_CCI"
# Periods to export; leave empty to export the previous calendar month
periods = []
gee_asset_folder = "projects/my-project/assets/snow-exports"
drive_folder = "snow-exports"
# Seconds between status-polling sweeps
poll_interval_secs = 30

[earthengine]
project = "my-project"

[auth]
# OAuth2 bearer token; substituted from the environment at load time
access_token = "${NIVEX_ACCESS_TOKEN}"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output path for the configuration file
    #[arg(short, long, default_value = "nivex.toml")]
    pub output: String,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let path = Path::new(&self.output);

        if path.exists() && !self.force {
            eprintln!(
                "Configuration file already exists: {} (use --force to overwrite)",
                self.output
            );
            return Ok(2);
        }

        std::fs::write(path, CONFIG_TEMPLATE)?;
        tracing::info!(path = %self.output, "Wrote configuration template");
        println!("Created {}", self.output);
        println!("Edit it, export NIVEX_ACCESS_TOKEN, then run: nivex validate-config");

        Ok(0)
    }
}
