//! Export task - one period exported to one destination
//!
//! An [`ExportTask`] owns the lifecycle of a single unit of work: the raw
//! provider status, its canonical category, the last error, and a bounded
//! retry counter for status-query faults. Raw status assignment is the
//! single mutation point and always re-derives the category, so the two can
//! never drift.

use crate::adapters::traits::RemoteJob;
use crate::core::status::{RawStatus, StatusCategory, MAX_STATUS_QUERY_FAILURES};
use crate::domain::{Destination, PeriodKey};
use std::fmt;

/// Ownership state of the remote job behind a task
///
/// "No work needed" (plan-time exclusion, failed creation) and "submission
/// exists" are distinct states, not a null check.
pub enum JobState {
    /// No submission was ever created for this task
    NoJob,
    /// A remote job handle, exclusively owned by this task
    Submitted(Box<dyn RemoteJob>),
}

impl JobState {
    pub fn is_none(&self) -> bool {
        matches!(self, JobState::NoJob)
    }
}

impl fmt::Debug for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::NoJob => write!(f, "NoJob"),
            JobState::Submitted(_) => write!(f, "Submitted(..)"),
        }
    }
}

/// The export of one period to one destination
#[derive(Debug)]
pub struct ExportTask {
    image: String,
    period: PeriodKey,
    target: Destination,
    raw_status: RawStatus,
    category: StatusCategory,
    job: JobState,
    error: Option<String>,
    status_query_failures: u32,
}

impl ExportTask {
    /// Creates a task with an initial raw status
    ///
    /// Invalid targets and raw statuses cannot reach this point: both are
    /// validated at their own construction sites.
    pub fn new(
        image: impl Into<String>,
        period: PeriodKey,
        target: Destination,
        initial_status: RawStatus,
        job: JobState,
    ) -> Self {
        let category = initial_status.category();
        Self {
            image: image.into(),
            period,
            target,
            raw_status: initial_status,
            category,
            job,
            error: None,
            status_query_failures: 0,
        }
    }

    /// Attaches an error description, builder-style
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn period(&self) -> PeriodKey {
        self.period
    }

    pub fn target(&self) -> Destination {
        self.target
    }

    pub fn raw_status(&self) -> &RawStatus {
        &self.raw_status
    }

    pub fn category(&self) -> StatusCategory {
        self.category
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status_query_failures(&self) -> u32 {
        self.status_query_failures
    }

    /// Single mutation point: the category is always re-derived
    fn set_raw_status(&mut self, status: RawStatus) {
        self.category = status.category();
        self.raw_status = status;
    }

    /// Attempts to submit the task's job
    ///
    /// - No job owned and not yet started: transitions to the terminal
    ///   `NO_TASK_CREATED` sentinel.
    /// - No job owned otherwise, or already past `NOT_STARTED`: no-op.
    /// - Job owned and `NOT_STARTED`: submits; success moves the raw status
    ///   to `STARTED`, a submission fault moves it to `FAILED_TO_START` and
    ///   records the error. The fault never propagates past this boundary.
    pub async fn start(&mut self) -> &RawStatus {
        let job = match &self.job {
            JobState::NoJob => {
                tracing::warn!(
                    image = %self.image,
                    target = %self.target,
                    "No job to run for task"
                );
                if self.category == StatusCategory::NotStarted {
                    self.set_raw_status(RawStatus::no_task_created());
                }
                return &self.raw_status;
            }
            JobState::Submitted(job) => job,
        };

        if self.category != StatusCategory::NotStarted {
            return &self.raw_status;
        }

        let outcome = job.start().await;
        match outcome {
            Ok(()) => {
                self.set_raw_status(RawStatus::started());
            }
            Err(e) => {
                tracing::error!(
                    image = %self.image,
                    target = %self.target,
                    error = %e,
                    "Failed to start export task"
                );
                self.set_raw_status(RawStatus::failed_to_start());
                self.error = Some(e.to_string());
            }
        }
        &self.raw_status
    }

    /// Queries the job for its current status
    ///
    /// Returns the (possibly unchanged) raw status. A query fault increments
    /// the failure counter and leaves the status untouched; once the counter
    /// reaches [`MAX_STATUS_QUERY_FAILURES`] the task transitions to the
    /// terminal `FAILED_TO_GET_STATUS` state without invoking the job again.
    /// A successful query resets the counter and clears the error.
    pub async fn query_status(&mut self) -> &RawStatus {
        let outcome = match &self.job {
            JobState::NoJob => return &self.raw_status,
            JobState::Submitted(job) => {
                if self.status_query_failures >= MAX_STATUS_QUERY_FAILURES
                    && self.raw_status != RawStatus::failed_to_get_status()
                {
                    None
                } else if matches!(
                    self.category,
                    StatusCategory::Pending | StatusCategory::NotStarted
                ) {
                    Some(job.query_status().await)
                } else {
                    // Terminal; nothing to query
                    return &self.raw_status;
                }
            }
        };

        match outcome {
            None => {
                tracing::error!(
                    image = %self.image,
                    target = %self.target,
                    failures = self.status_query_failures,
                    "Giving up on status queries for task"
                );
                self.set_raw_status(RawStatus::failed_to_get_status());
            }
            Some(Ok(status)) => {
                self.set_raw_status(status);
                self.status_query_failures = 0;
                self.error = None;
            }
            Some(Err(e)) => {
                self.status_query_failures += 1;
                self.error = Some(e.to_string());
                tracing::error!(
                    image = %self.image,
                    target = %self.target,
                    failures = self.status_query_failures,
                    error = %e,
                    "Status query failed"
                );
            }
        }
        &self.raw_status
    }
}

impl fmt::Display for ExportTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(image={}, target={}, status={})",
            self.image, self.target, self.raw_status
        )
    }
}
