//! Export command implementation
//!
//! Runs the full pipeline: load configuration, reconcile, submit the
//! remote export jobs, poll them to quiescence, then print and log the
//! run report.

use super::apply_overrides;
use crate::config::load_config;
use crate::core::export::ExportCoordinator;
use crate::reporting::{render_report, ReportContext};
use chrono::Local;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - compute and print the plan without submitting jobs
    #[arg(long)]
    pub dry_run: bool,

    /// Override periods to export (comma-separated YYYY-MM-01 keys)
    #[arg(long)]
    pub periods: Option<String>,

    /// Override enabled destinations (comma-separated: gee, gdrive)
    #[arg(long)]
    pub destinations: Option<String>,

    /// Override the status poll interval in seconds
    #[arg(long)]
    pub poll_interval: Option<u64>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");
        let started_at = Local::now();

        let mut config = load_config(config_path)?;
        apply_overrides(&mut config, self.periods.as_deref(), self.destinations.as_deref())?;
        if let Some(interval) = self.poll_interval {
            tracing::info!(poll_interval_secs = interval, "Overriding poll interval from CLI");
            config.export.poll_interval_secs = interval;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2); // Configuration error exit code
        }

        let coordinator = match ExportCoordinator::from_config(config.clone(), shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        // Dry run: print the plan, touch nothing
        if self.dry_run {
            tracing::info!("Dry run mode enabled - no jobs will be submitted");
            let (plan, tasks) = coordinator.plan().await?;
            println!("{}", plan.describe());
            for task in &tasks {
                println!("  |- {}", task);
            }
            return Ok(0);
        }

        // Confirmation prompt (unless --yes)
        if !self.yes {
            println!("Export configuration:");
            println!("  Destinations: {:?}", config.export.destinations);
            println!(
                "  Periods: {}",
                if config.export.periods.is_empty() {
                    "previous month".to_string()
                } else {
                    format!("{:?}", config.export.periods)
                }
            );
            println!("  Poll interval: {}s", config.export.poll_interval_secs);
            println!();
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        let summary = match coordinator.execute().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        // Render and print the run report
        let context = ReportContext::from_run(&summary, &config, started_at);
        match render_report(&context) {
            Ok(report) => {
                println!();
                println!("{report}");
                tracing::info!("\n{}", report);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to render run report");
                println!();
                println!("{}", summary.summary);
            }
        }

        let exit_code = if summary.interrupted {
            println!("Export interrupted gracefully; pending jobs keep running remotely.");
            tracing::info!("Export interrupted by user signal");
            130 // SIGINT exit code
        } else if summary.is_successful() {
            0
        } else {
            1 // Partial success
        };

        Ok(exit_code)
    }
}
