//! Collaborator abstraction traits
//!
//! This module defines the narrow interfaces the export engine consumes.
//! Concrete implementations live in the sibling adapter modules; tests
//! substitute in-memory fakes.

use crate::domain::{Destination, JobError, PeriodKey, Result};
use crate::core::status::RawStatus;
use async_trait::async_trait;

/// Handle to one submitted (or submittable) remote export job
///
/// Supplied by the remote-execution collaborator per unit of work. The
/// owning export task is the only caller; faults from either operation are
/// contained there and never abort the batch.
#[async_trait]
pub trait RemoteJob: Send + Sync {
    /// Submit the job to the provider
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Submission`] if the provider rejects the job.
    async fn start(&self) -> std::result::Result<(), JobError>;

    /// Query the provider for the job's current raw status
    ///
    /// # Errors
    ///
    /// Returns [`JobError::StatusQuery`] if the status cannot be determined.
    async fn query_status(&self) -> std::result::Result<RawStatus, JobError>;
}

/// Source of the periods the upstream catalog has complete data for
///
/// Only periods reported here are eligible for export; everything else is
/// excluded from the plan as unavailable.
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Periods with complete upstream source data, newest first
    async fn available_periods(&self) -> Result<Vec<PeriodKey>>;
}

/// Inventory of artifacts already materialized at one destination
#[async_trait]
pub trait DestinationInventory: Send + Sync {
    /// The destination this inventory describes
    fn destination(&self) -> Destination;

    /// Periods already present at the destination
    ///
    /// Derived by extracting and validating a trailing `YYYY-MM` token from
    /// each artifact name and normalizing to a period key.
    async fn existing_periods(&self) -> Result<Vec<PeriodKey>>;
}

/// Factory for remote export jobs
///
/// One job is created per `(period, destination)` pair in the to-save plan.
/// A creation failure is not fatal to the batch: the caller records a
/// failed-to-create task and moves on.
#[async_trait]
pub trait JobLauncher: Send + Sync {
    /// Create (but do not start) an export job for one artifact
    async fn create_job(
        &self,
        period: &PeriodKey,
        image: &str,
        target: Destination,
    ) -> Result<Box<dyn RemoteJob>>;
}
