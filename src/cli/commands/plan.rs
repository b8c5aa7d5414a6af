//! Plan command implementation
//!
//! Computes and prints the reconciled export plan - what would be exported
//! where - without creating or submitting any job.

use super::apply_overrides;
use crate::config::load_config;
use crate::core::export::ExportCoordinator;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Override periods to plan for (comma-separated YYYY-MM-01 keys)
    #[arg(long)]
    pub periods: Option<String>,

    /// Override enabled destinations (comma-separated: gee, gdrive)
    #[arg(long)]
    pub destinations: Option<String>,
}

impl PlanArgs {
    /// Execute the plan command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting plan command");

        let mut config = load_config(config_path)?;
        apply_overrides(&mut config, self.periods.as_deref(), self.destinations.as_deref())?;

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        // The shutdown channel is unused by planning; the coordinator only
        // consumes it while tracking.
        let (_tx, rx) = watch::channel(false);
        let coordinator = match ExportCoordinator::from_config(config, rx) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize: {e}");
                return Ok(4);
            }
        };

        let (plan, tasks) = coordinator.plan().await?;
        println!("{}", plan.describe());
        if !tasks.is_empty() {
            println!("Pre-resolved tasks:");
            for task in &tasks {
                println!("  |- {}", task);
            }
        }

        Ok(0)
    }
}
