//! Export summaries and reporting records
//!
//! This module defines the structures the engine hands to downstream
//! rendering: category counts, ordered per-task records, and the run-level
//! summary combining both with the reconciled plan.

use crate::core::export::plan::ExportPlan;
use crate::core::export::task::ExportTask;
use crate::core::status::StatusCategory;
use crate::domain::Destination;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Count of tasks per canonical status category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSummary {
    counts: BTreeMap<StatusCategory, usize>,
}

impl StatusSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a summary from an iterator of categories
    pub fn from_categories(categories: impl IntoIterator<Item = StatusCategory>) -> Self {
        let mut counts = BTreeMap::new();
        for category in categories {
            *counts.entry(category).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, category: StatusCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &BTreeMap<StatusCategory, usize> {
        &self.counts
    }
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return write!(f, "No export tasks");
        }
        let mut first = true;
        for (category, count) in &self.counts {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{category}: {count}")?;
            first = false;
        }
        Ok(())
    }
}

/// One task's final state, for downstream rendering
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub image: String,
    pub target: Destination,
    pub status: String,
    pub category: StatusCategory,
    pub error: Option<String>,
}

impl TaskRecord {
    pub fn from_task(task: &ExportTask) -> Self {
        Self {
            image: task.image().to_string(),
            target: task.target(),
            status: task.raw_status().as_str().to_string(),
            category: task.category(),
            error: task.error().map(str::to_string),
        }
    }
}

impl fmt::Display for TaskRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.image, self.status)?;
        if let Some(error) = &self.error {
            write!(f, " - {error}")?;
        }
        Ok(())
    }
}

/// Summary of one complete export run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The reconciled plan the run executed
    pub plan: ExportPlan,
    /// Final category counts across all tasks
    pub summary: StatusSummary,
    /// Ordered per-task records (insertion order)
    pub records: Vec<TaskRecord>,
    /// Wall-clock duration of the run
    pub duration: Duration,
    /// True when tracking was cut short by a shutdown signal
    pub interrupted: bool,
}

impl RunSummary {
    /// Records for one destination, in insertion order
    pub fn records_for(&self, target: Destination) -> Vec<&TaskRecord> {
        self.records.iter().filter(|r| r.target == target).collect()
    }

    /// Category counts for one destination
    pub fn summary_for(&self, target: Destination) -> StatusSummary {
        StatusSummary::from_categories(
            self.records
                .iter()
                .filter(|r| r.target == target)
                .map(|r| r.category),
        )
    }

    /// Number of exports that completed on the provider side
    pub fn completed_count(&self) -> usize {
        self.summary.count(StatusCategory::Completed)
    }

    /// True when no task failed or was written off as unknown
    pub fn is_successful(&self) -> bool {
        self.summary.count(StatusCategory::Failed) == 0
            && self.summary.count(StatusCategory::Unknown) == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_tasks = self.summary.total(),
            completed = self.completed_count(),
            failed = self.summary.count(StatusCategory::Failed),
            unknown = self.summary.count(StatusCategory::Unknown),
            excluded = self.summary.count(StatusCategory::Excluded),
            duration_secs = self.duration.as_secs(),
            interrupted = self.interrupted,
            "Export run finished"
        );
        for record in &self.records {
            tracing::info!(
                image = %record.image,
                target = %record.target,
                status = %record.status,
                error = record.error.as_deref().unwrap_or(""),
                "Task result"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_summary_counts() {
        let summary = StatusSummary::from_categories([
            StatusCategory::Completed,
            StatusCategory::Completed,
            StatusCategory::Failed,
        ]);
        assert_eq!(summary.count(StatusCategory::Completed), 2);
        assert_eq!(summary.count(StatusCategory::Failed), 1);
        assert_eq!(summary.count(StatusCategory::Pending), 0);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_status_summary_display() {
        let summary = StatusSummary::from_categories([
            StatusCategory::Completed,
            StatusCategory::Excluded,
        ]);
        let text = summary.to_string();
        assert!(text.contains("COMPLETED: 1"));
        assert!(text.contains("EXCLUDED: 1"));

        assert_eq!(StatusSummary::new().to_string(), "No export tasks");
    }

    #[test]
    fn test_run_summary_success() {
        let plan = ExportPlan {
            requested: vec![],
            excluded: vec![],
            final_plan: vec![],
            to_save: Default::default(),
        };
        let summary = RunSummary {
            plan,
            summary: StatusSummary::from_categories([StatusCategory::Completed]),
            records: vec![],
            duration: Duration::from_secs(1),
            interrupted: false,
        };
        assert!(summary.is_successful());
        assert_eq!(summary.completed_count(), 1);
    }

    #[test]
    fn test_run_summary_per_destination() {
        let plan = ExportPlan {
            requested: vec![],
            excluded: vec![],
            final_plan: vec![],
            to_save: Default::default(),
        };
        let records = vec![
            TaskRecord {
                image: "a".into(),
                target: Destination::EarthEngine,
                status: "COMPLETED".into(),
                category: StatusCategory::Completed,
                error: None,
            },
            TaskRecord {
                image: "b".into(),
                target: Destination::Drive,
                status: "FAILED".into(),
                category: StatusCategory::Failed,
                error: Some("boom".into()),
            },
        ];
        let summary = RunSummary {
            plan,
            summary: StatusSummary::from_categories([
                StatusCategory::Completed,
                StatusCategory::Failed,
            ]),
            records,
            duration: Duration::from_secs(0),
            interrupted: false,
        };

        assert_eq!(summary.records_for(Destination::EarthEngine).len(), 1);
        assert_eq!(
            summary
                .summary_for(Destination::Drive)
                .count(StatusCategory::Failed),
            1
        );
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_task_record_display() {
        let record = TaskRecord {
            image: "SNOW_2024-01".into(),
            target: Destination::Drive,
            status: "FAILED_TO_START".into(),
            category: StatusCategory::Failed,
            error: Some("quota".into()),
        };
        assert_eq!(record.to_string(), "SNOW_2024-01: FAILED_TO_START - quota");
    }
}
