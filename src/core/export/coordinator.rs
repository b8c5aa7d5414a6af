//! Export coordinator - main orchestrator for one export run
//!
//! This module drives the whole workflow: gather upstream availability and
//! per-destination inventories, reconcile them into a plan, create one
//! remote job per to-save entry, then submit and poll everything to
//! quiescence through the tracker. Each run recomputes the plan from
//! freshly supplied inventories; nothing persists across runs.

use crate::adapters::traits::{AvailabilitySource, DestinationInventory, JobLauncher};
use crate::config::NivexConfig;
use crate::core::export::plan::{ExportPlan, PlanReconciler};
use crate::core::export::summary::RunSummary;
use crate::core::export::task::{ExportTask, JobState};
use crate::core::export::tracker::ExportTracker;
use crate::core::status::RawStatus;
use crate::domain::{Destination, PeriodKey, Result};
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Export coordinator
///
/// Owns the run-scoped collaborators and the shutdown signal. Construct it
/// with [`ExportCoordinator::new`] for explicit collaborators (tests), or
/// [`ExportCoordinator::from_config`] to wire up the REST adapters.
pub struct ExportCoordinator {
    config: NivexConfig,
    availability: Arc<dyn AvailabilitySource>,
    inventories: BTreeMap<Destination, Arc<dyn DestinationInventory>>,
    launcher: Arc<dyn JobLauncher>,
    shutdown: watch::Receiver<bool>,
}

impl ExportCoordinator {
    /// Creates a coordinator with explicit collaborators
    pub fn new(
        config: NivexConfig,
        availability: Arc<dyn AvailabilitySource>,
        inventories: Vec<Arc<dyn DestinationInventory>>,
        launcher: Arc<dyn JobLauncher>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let inventories = inventories
            .into_iter()
            .map(|inv| (inv.destination(), inv))
            .collect();
        Self {
            config,
            availability,
            inventories,
            launcher,
            shutdown,
        }
    }

    /// Creates a coordinator wired to the Earth Engine and Drive adapters
    pub fn from_config(config: NivexConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        use crate::adapters::drive::{DriveClient, DriveInventory};
        use crate::adapters::earthengine::{
            CatalogAvailability, EarthEngineClient, EarthEngineInventory, EarthEngineLauncher,
        };

        let ee_client = Arc::new(EarthEngineClient::new(&config.earthengine, &config.auth)?);

        let availability: Arc<dyn AvailabilitySource> = Arc::new(CatalogAvailability::new(
            ee_client.clone(),
            config.upstream.collection.clone(),
            config.upstream.min_period,
        ));

        let mut inventories: Vec<Arc<dyn DestinationInventory>> = Vec::new();
        for target in &config.export.destinations {
            match target {
                Destination::EarthEngine => {
                    inventories.push(Arc::new(EarthEngineInventory::new(
                        ee_client.clone(),
                        config.export.gee_asset_folder.clone().unwrap_or_default(),
                        config.export.image_prefix.clone(),
                    )));
                }
                Destination::Drive => {
                    let drive_client = Arc::new(DriveClient::new(&config.drive, &config.auth)?);
                    inventories.push(Arc::new(DriveInventory::new(
                        drive_client,
                        config.export.drive_folder.clone().unwrap_or_default(),
                        config.export.image_prefix.clone(),
                    )));
                }
            }
        }

        let launcher: Arc<dyn JobLauncher> =
            Arc::new(EarthEngineLauncher::from_config(ee_client, &config));

        Ok(Self::new(
            config,
            availability,
            inventories,
            launcher,
            shutdown,
        ))
    }

    /// The periods this run should export
    ///
    /// Configured periods win; with none configured the previous calendar
    /// month is exported, matching the scheduled monthly run.
    fn requested_periods(&self) -> Vec<PeriodKey> {
        if self.config.export.periods.is_empty() {
            vec![PeriodKey::previous(Utc::now().date_naive())]
        } else {
            self.config.export.periods.clone()
        }
    }

    /// Computes the export plan without creating or submitting any job
    ///
    /// This is the read-only half of the run, shared by `export --dry-run`
    /// and the `plan` command.
    pub async fn plan(&self) -> Result<(ExportPlan, Vec<ExportTask>)> {
        let requested = self.requested_periods();

        tracing::debug!("Checking upstream availability");
        let available: HashSet<PeriodKey> = self
            .availability
            .available_periods()
            .await?
            .into_iter()
            .collect();
        tracing::debug!(count = available.len(), "Upstream periods available");

        let mut existing = BTreeMap::new();
        for (&target, inventory) in &self.inventories {
            tracing::debug!(target = %target, "Checking for images already saved");
            let periods: HashSet<PeriodKey> =
                inventory.existing_periods().await?.into_iter().collect();
            tracing::debug!(target = %target, count = periods.len(), "Existing images found");
            existing.insert(target, periods);
        }

        let reconciler = PlanReconciler::new(self.config.export.image_prefix.clone());
        Ok(reconciler.reconcile(requested, &available, &existing))
    }

    /// Executes the full export run
    ///
    /// A job-creation failure records a `FAILED_TO_CREATE` task and the run
    /// continues; no single task can abort the batch.
    pub async fn execute(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        tracing::info!("Starting export run");

        let (plan, mut tasks) = self.plan().await?;
        tracing::info!("\n{}", plan.describe());

        if plan.is_empty() {
            tracing::info!("No new images to save");
            let tracker = ExportTracker::with_tasks(tasks);
            return Ok(RunSummary {
                plan,
                summary: tracker.summary(),
                records: tracker.records(),
                duration: start_time.elapsed(),
                interrupted: false,
            });
        }

        let prefix = &self.config.export.image_prefix;
        for (&target, periods) in &plan.to_save {
            for period in periods {
                let image = period.image_name(prefix);
                tracing::debug!(target = %target, image = %image, "Creating export job");
                match self.launcher.create_job(period, &image, target).await {
                    Ok(job) => {
                        tasks.push(ExportTask::new(
                            image,
                            *period,
                            target,
                            RawStatus::created(),
                            JobState::Submitted(job),
                        ));
                    }
                    Err(e) => {
                        tracing::error!(
                            target = %target,
                            image = %image,
                            error = %e,
                            "Failed to create export job"
                        );
                        tasks.push(
                            ExportTask::new(
                                image,
                                *period,
                                target,
                                RawStatus::failed_to_create(),
                                JobState::NoJob,
                            )
                            .with_error(e.to_string()),
                        );
                    }
                }
            }
        }

        let mut tracker = ExportTracker::with_tasks(tasks);

        let start_summary = tracker.start_all().await;
        tracing::debug!(summary = %start_summary, "Start export results");

        let poll_interval = Duration::from_secs(self.config.export.poll_interval_secs);
        let summary = tracker.track(poll_interval, self.shutdown.clone()).await;
        tracing::debug!(summary = %summary, "Track export results");

        let run_summary = RunSummary {
            plan,
            summary,
            records: tracker.records(),
            duration: start_time.elapsed(),
            interrupted: *self.shutdown.borrow(),
        };
        run_summary.log_summary();

        Ok(run_summary)
    }
}
