// Nivex - Snow Raster Export Orchestration Tool
// Copyright (c) 2025 Nivex Contributors
// Licensed under the MIT License

//! # Nivex - snow raster export orchestration
//!
//! Nivex automates the periodic export of computed monthly snow/cloud cover
//! rasters to two independent storage destinations - an Earth Engine asset
//! folder and a Google Drive folder - tracking each export as an
//! asynchronous remote job.
//!
//! ## Overview
//!
//! Each run:
//! - **Reconciles** the requested months against what the upstream catalog
//!   can provide and what each destination already holds, producing a
//!   minimal per-destination work plan
//! - **Submits** one remote export job per missing artifact
//! - **Tracks** all jobs with round-robin status polling until every task
//!   reaches a terminal state, tolerating transient status-query faults up
//!   to a bounded retry budget
//! - **Reports** a per-task, per-destination summary for downstream
//!   delivery
//!
//! ## Architecture
//!
//! Nivex follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (status taxonomy, reconciliation, tracking)
//! - [`adapters`] - External integrations (Earth Engine, Google Drive)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`reporting`] - Run report rendering
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nivex::config::load_config;
//! use nivex::core::export::ExportCoordinator;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("nivex.toml")?;
//!
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!     let coordinator = ExportCoordinator::from_config(config, shutdown_rx)?;
//!
//!     let summary = coordinator.execute().await?;
//!     println!("{}", summary.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Nivex uses the [`domain::NivexError`] type for all errors. Faults inside
//! one export task (submission rejected, status endpoint flaking) are
//! contained in that task and never abort the batch; only construction and
//! configuration errors fail fast.
//!
//! ## Logging
//!
//! Nivex uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export");
//! warn!(period = "2024-02-01", "Period unavailable upstream");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod reporting;
