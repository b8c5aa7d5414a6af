//! Export tracker - submits and polls a batch of export tasks
//!
//! The tracker owns the ordered task list. Tracking is a synchronous
//! round-robin sweep over all tasks with a fixed sleep between passes: the
//! total polling overhead is bounded by sweeps × interval regardless of
//! task count, and no task is starved. One flaky task never blocks the
//! rest — every fault is contained inside the task itself.

use crate::core::export::summary::{StatusSummary, TaskRecord};
use crate::core::export::task::ExportTask;
use crate::core::status::StatusCategory;
use std::time::Duration;
use tokio::sync::watch;

/// Ordered collection of export tasks with submission and polling sweeps
#[derive(Debug, Default)]
pub struct ExportTracker {
    tasks: Vec<ExportTask>,
}

impl ExportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<ExportTask>) -> Self {
        Self { tasks }
    }

    pub fn add_task(&mut self, task: ExportTask) {
        self.tasks.push(task);
    }

    pub fn tasks(&self) -> &[ExportTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Category counts over all tasks
    pub fn summary(&self) -> StatusSummary {
        StatusSummary::from_categories(self.tasks.iter().map(ExportTask::category))
    }

    /// Ordered per-task records for reporting
    pub fn records(&self) -> Vec<TaskRecord> {
        self.tasks.iter().map(TaskRecord::from_task).collect()
    }

    /// Submits every task still in `NOT_STARTED`; everything else is skipped
    ///
    /// Returns the post-start summary.
    pub async fn start_all(&mut self) -> StatusSummary {
        tracing::debug!("Starting export tasks");

        let mut skipped = 0usize;
        for task in self.tasks.iter_mut() {
            if task.category() == StatusCategory::NotStarted {
                task.start().await;
            } else {
                skipped += 1;
                tracing::info!(
                    image = %task.image(),
                    target = %task.target(),
                    status = %task.raw_status(),
                    "Skipping task"
                );
            }
        }

        tracing::info!(
            started = self.tasks.len() - skipped,
            skipped,
            "Export tasks started"
        );
        self.summary()
    }

    /// Polls all tasks to quiescence
    ///
    /// Sweeps the full task list, sleeping `poll_interval` between passes,
    /// until no task remains pollable. A shutdown signal on `shutdown` stops
    /// the loop early; pending tasks keep their last observed status.
    ///
    /// Returns the final category counts.
    pub async fn track(
        &mut self,
        poll_interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> StatusSummary {
        tracing::debug!(
            tasks = self.tasks.len(),
            poll_interval_secs = poll_interval.as_secs(),
            "Tracking export tasks"
        );

        let mut finished = vec![false; self.tasks.len()];
        loop {
            let mut still_running = false;
            for (i, task) in self.tasks.iter_mut().enumerate() {
                if finished[i] {
                    continue;
                }
                if !task.category().is_pollable() {
                    finished[i] = true;
                    continue;
                }

                task.query_status().await;
                let category = task.category();
                if category.is_pollable() {
                    still_running = true;
                } else if category.is_finished() {
                    tracing::info!(
                        image = %task.image(),
                        target = %task.target(),
                        status = %task.raw_status(),
                        "Task finished"
                    );
                    finished[i] = true;
                } else {
                    tracing::warn!(
                        image = %task.image(),
                        target = %task.target(),
                        status = %task.raw_status(),
                        "Task finished with unexpected status"
                    );
                    finished[i] = true;
                }
            }

            if !still_running {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::warn!("Shutdown signal received, stopping task tracking");
                        break;
                    }
                }
            }
        }

        self.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::traits::RemoteJob;
    use crate::core::export::task::JobState;
    use crate::core::status::RawStatus;
    use crate::domain::{Destination, JobError, PeriodKey};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct ScriptedJob {
        start_ok: bool,
        statuses: Mutex<VecDeque<Result<&'static str, &'static str>>>,
        query_count: Arc<AtomicUsize>,
    }

    impl ScriptedJob {
        fn new(start_ok: bool, statuses: Vec<Result<&'static str, &'static str>>) -> Self {
            Self {
                start_ok,
                statuses: Mutex::new(statuses.into()),
                query_count: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn counted(
            start_ok: bool,
            statuses: Vec<Result<&'static str, &'static str>>,
        ) -> (Self, Arc<AtomicUsize>) {
            let job = Self::new(start_ok, statuses);
            let count = job.query_count.clone();
            (job, count)
        }
    }

    #[async_trait]
    impl RemoteJob for ScriptedJob {
        async fn start(&self) -> Result<(), JobError> {
            if self.start_ok {
                Ok(())
            } else {
                Err(JobError::Submission("rejected".to_string()))
            }
        }

        async fn query_status(&self) -> Result<RawStatus, JobError> {
            self.query_count.fetch_add(1, Ordering::SeqCst);
            let next = self
                .statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok("COMPLETED"));
            match next {
                Ok(s) => Ok(RawStatus::new(s).unwrap()),
                Err(e) => Err(JobError::StatusQuery(e.to_string())),
            }
        }
    }

    fn task(
        image: &str,
        target: Destination,
        status: RawStatus,
        job: JobState,
    ) -> ExportTask {
        ExportTask::new(image, PeriodKey::new(2024, 1).unwrap(), target, status, job)
    }

    fn no_shutdown() -> (watch::Sender<bool>, watch::Receiver<bool>) {
        watch::channel(false)
    }

    #[tokio::test]
    async fn test_start_all_submits_only_not_started() {
        let mut tracker = ExportTracker::new();
        tracker.add_task(task(
            "a",
            Destination::EarthEngine,
            RawStatus::created(),
            JobState::Submitted(Box::new(ScriptedJob::new(true, vec![]))),
        ));
        tracker.add_task(task(
            "b",
            Destination::Drive,
            RawStatus::already_exists(),
            JobState::NoJob,
        ));

        let summary = tracker.start_all().await;
        assert_eq!(summary.count(StatusCategory::Pending), 1);
        assert_eq!(summary.count(StatusCategory::Excluded), 1);
        assert_eq!(tracker.tasks()[0].raw_status().as_str(), "STARTED");
        assert_eq!(tracker.tasks()[1].raw_status().as_str(), "ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_start_failure_does_not_abort_batch() {
        let mut tracker = ExportTracker::new();
        tracker.add_task(task(
            "a",
            Destination::EarthEngine,
            RawStatus::created(),
            JobState::Submitted(Box::new(ScriptedJob::new(false, vec![]))),
        ));
        tracker.add_task(task(
            "b",
            Destination::EarthEngine,
            RawStatus::created(),
            JobState::Submitted(Box::new(ScriptedJob::new(true, vec![]))),
        ));

        let summary = tracker.start_all().await;
        assert_eq!(summary.count(StatusCategory::Failed), 1);
        assert_eq!(summary.count(StatusCategory::Pending), 1);
    }

    #[tokio::test]
    async fn test_track_runs_to_quiescence() {
        let mut tracker = ExportTracker::new();
        tracker.add_task(task(
            "slow",
            Destination::EarthEngine,
            RawStatus::started(),
            JobState::Submitted(Box::new(ScriptedJob::new(
                true,
                vec![Ok("RUNNING"), Ok("RUNNING"), Ok("COMPLETED")],
            ))),
        ));
        tracker.add_task(task(
            "fast",
            Destination::Drive,
            RawStatus::started(),
            JobState::Submitted(Box::new(ScriptedJob::new(true, vec![Ok("FAILED")]))),
        ));

        let (_tx, rx) = no_shutdown();
        let summary = tracker.track(Duration::from_millis(1), rx).await;

        assert_eq!(summary.count(StatusCategory::Completed), 1);
        assert_eq!(summary.count(StatusCategory::Failed), 1);
        assert_eq!(summary.count(StatusCategory::Pending), 0);
    }

    #[tokio::test]
    async fn test_track_skips_tasks_already_terminal() {
        let (job, count) = ScriptedJob::counted(true, vec![Ok("RUNNING")]);
        let mut tracker = ExportTracker::new();
        tracker.add_task(task(
            "failed-at-start",
            Destination::EarthEngine,
            RawStatus::failed_to_start(),
            JobState::Submitted(Box::new(job)),
        ));

        let (_tx, rx) = no_shutdown();
        let summary = tracker.track(Duration::from_millis(1), rx).await;

        // Task was in SKIP before tracking began, so it is never polled
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(summary.count(StatusCategory::Failed), 1);
    }

    #[tokio::test]
    async fn test_track_writes_off_flaky_task_after_budget() {
        let (job, count) = ScriptedJob::counted(
            true,
            vec![Err("x"), Err("y"), Err("z"), Err("w"), Err("v")],
        );
        let mut tracker = ExportTracker::new();
        tracker.add_task(task(
            "flaky",
            Destination::EarthEngine,
            RawStatus::started(),
            JobState::Submitted(Box::new(job)),
        ));

        let (_tx, rx) = no_shutdown();
        let summary = tracker.track(Duration::from_millis(1), rx).await;

        // 3 failed queries, then the budget check trips without a 4th call
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(summary.count(StatusCategory::Unknown), 1);
    }

    #[tokio::test]
    async fn test_track_terminates_with_unrecognized_terminal_status() {
        let mut tracker = ExportTracker::new();
        tracker.add_task(task(
            "odd",
            Destination::Drive,
            RawStatus::started(),
            JobState::Submitted(Box::new(ScriptedJob::new(true, vec![Ok("CANCELLING")]))),
        ));

        let (_tx, rx) = no_shutdown();
        let summary = tracker.track(Duration::from_millis(1), rx).await;

        assert_eq!(summary.count(StatusCategory::Other), 1);
    }

    #[tokio::test]
    async fn test_track_stops_on_shutdown_signal() {
        let (tx, rx) = watch::channel(false);
        let mut tracker = ExportTracker::new();
        // A job that never resolves
        tracker.add_task(task(
            "stuck",
            Destination::EarthEngine,
            RawStatus::started(),
            JobState::Submitted(Box::new(ScriptedJob::new(
                true,
                vec![Ok("RUNNING"); 10_000],
            ))),
        ));

        let handle = tokio::spawn(async move {
            tracker.track(Duration::from_secs(60), rx).await
        });
        tx.send(true).expect("tracker should still be listening");

        let summary = handle.await.expect("tracker task panicked");
        assert_eq!(summary.count(StatusCategory::Pending), 1);
    }

    #[tokio::test]
    async fn test_empty_tracker_returns_immediately() {
        let mut tracker = ExportTracker::new();
        let (_tx, rx) = no_shutdown();
        let summary = tracker.track(Duration::from_secs(60), rx).await;
        assert!(summary.is_empty());
    }

    #[tokio::test]
    async fn test_records_preserve_insertion_order() {
        let mut tracker = ExportTracker::new();
        for name in ["one", "two", "three"] {
            tracker.add_task(task(
                name,
                Destination::EarthEngine,
                RawStatus::already_exists(),
                JobState::NoJob,
            ));
        }
        let records = tracker.records();
        let names: Vec<&str> = records.iter().map(|r| r.image.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }
}
