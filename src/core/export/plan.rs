//! Export plan reconciliation
//!
//! Given the requested periods, the periods the upstream catalog actually
//! has complete data for, and each destination's existing inventory, the
//! reconciler computes the minimal per-destination work plan. Upstream
//! unavailability is a global veto; already-existing artifacts are excluded
//! per destination and recorded immediately as terminal tasks, since no
//! work is needed for them.

use crate::core::export::task::{ExportTask, JobState};
use crate::core::status::RawStatus;
use crate::domain::{Destination, PeriodKey};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Why a period was excluded from a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// The upstream catalog has no complete data for the period
    Unavailable,
    /// The artifact already exists at the given destination
    AlreadyExists(Destination),
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::Unavailable => write!(f, "IMAGE_UNAVAILABLE"),
            ExclusionReason::AlreadyExists(target) => {
                write!(f, "ALREADY_EXISTS ({target})")
            }
        }
    }
}

/// One excluded period with its reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exclusion {
    pub period: PeriodKey,
    pub reason: ExclusionReason,
}

/// The reconciled export plan
#[derive(Debug, Clone)]
pub struct ExportPlan {
    /// Periods the caller asked for, in request order
    pub requested: Vec<PeriodKey>,
    /// Excluded periods with reasons, in discovery order
    pub excluded: Vec<Exclusion>,
    /// Requested minus upstream-unavailable, order-preserving
    pub final_plan: Vec<PeriodKey>,
    /// Per destination, the subset of `final_plan` not already present there
    pub to_save: BTreeMap<Destination, Vec<PeriodKey>>,
}

impl ExportPlan {
    /// Periods to save at one destination (empty for unknown destinations)
    pub fn to_save_for(&self, target: Destination) -> &[PeriodKey] {
        self.to_save.get(&target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when nothing survived reconciliation
    pub fn is_empty(&self) -> bool {
        self.final_plan.is_empty()
    }

    /// Exclusions caused by upstream unavailability
    pub fn unavailable(&self) -> Vec<PeriodKey> {
        self.excluded
            .iter()
            .filter(|e| e.reason == ExclusionReason::Unavailable)
            .map(|e| e.period)
            .collect()
    }

    /// Multi-line human-readable rendering of the plan
    pub fn describe(&self) -> String {
        let mut out = String::from("EXPORT PLAN:\nTo export:\n");
        if self.final_plan.is_empty() {
            out.push_str("  - No images to export\n");
        } else {
            for period in &self.final_plan {
                out.push_str(&format!("  |- {period}\n"));
            }
        }
        if !self.excluded.is_empty() {
            out.push_str("Excluded:\n");
            for exclusion in &self.excluded {
                out.push_str(&format!("  |- {}: {}\n", exclusion.period, exclusion.reason));
            }
        }
        out
    }
}

/// Computes export plans from requested, available and existing period sets
#[derive(Debug, Clone)]
pub struct PlanReconciler {
    image_prefix: String,
}

impl PlanReconciler {
    pub fn new(image_prefix: impl Into<String>) -> Self {
        Self {
            image_prefix: image_prefix.into(),
        }
    }

    /// Reconciles the requested periods against availability and inventories
    ///
    /// Returns the plan plus one terminal `ALREADY_EXISTS` task per artifact
    /// that needs no work. The destinations present in `existing` are the
    /// enabled ones; each gets its own to-save list.
    ///
    /// An empty `available` set is a normal outcome: the final plan is empty
    /// and zero tasks are created.
    pub fn reconcile(
        &self,
        requested: Vec<PeriodKey>,
        available: &HashSet<PeriodKey>,
        existing: &BTreeMap<Destination, HashSet<PeriodKey>>,
    ) -> (ExportPlan, Vec<ExportTask>) {
        tracing::info!(periods = ?requested.iter().map(ToString::to_string).collect::<Vec<_>>(), "Periods to save");

        // Upstream unavailability vetoes a period everywhere, even if a
        // destination coincidentally has an artifact for it.
        let mut excluded: Vec<Exclusion> = Vec::new();
        for period in &requested {
            if !available.contains(period) {
                excluded.push(Exclusion {
                    period: *period,
                    reason: ExclusionReason::Unavailable,
                });
            }
        }

        let unavailable: HashSet<PeriodKey> =
            excluded.iter().map(|e| e.period).collect();
        let final_plan: Vec<PeriodKey> = requested
            .iter()
            .filter(|p| !unavailable.contains(*p))
            .copied()
            .collect();

        if !excluded.is_empty() {
            tracing::warn!(
                periods = ?excluded.iter().map(|e| e.period.to_string()).collect::<Vec<_>>(),
                "Periods unavailable or incomplete upstream"
            );
        }

        let mut tasks = Vec::new();
        let mut to_save = BTreeMap::new();
        for (&target, existing_periods) in existing {
            let mut target_plan = Vec::new();
            let mut already_saved = Vec::new();
            for period in &final_plan {
                if existing_periods.contains(period) {
                    already_saved.push(*period);
                    excluded.push(Exclusion {
                        period: *period,
                        reason: ExclusionReason::AlreadyExists(target),
                    });
                    tasks.push(ExportTask::new(
                        period.image_name(&self.image_prefix),
                        *period,
                        target,
                        RawStatus::already_exists(),
                        JobState::NoJob,
                    ));
                } else {
                    target_plan.push(*period);
                }
            }

            if !already_saved.is_empty() {
                tracing::info!(
                    target = %target,
                    periods = ?already_saved.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "Periods already saved at destination"
                );
            }
            tracing::info!(
                target = %target,
                periods = ?target_plan.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "Pending periods to save at destination"
            );

            to_save.insert(target, target_plan);
        }

        let plan = ExportPlan {
            requested,
            excluded,
            final_plan,
            to_save,
        };
        (plan, tasks)
    }
}
