//! Status taxonomy for remote export jobs
//!
//! The provider reports many distinct raw status strings; this module
//! partitions them into a small set of canonical categories the engine acts
//! on. Classification is a pure, total lookup: every accepted raw status
//! belongs to exactly one category, and a valid-but-unmapped status falls
//! through to [`StatusCategory::Other`] instead of erroring.

use serde::Serialize;
use std::fmt;

/// Consecutive status-query failures tolerated before a task is written off
pub const MAX_STATUS_QUERY_FAILURES: u32 = 3;

/// Raw status vocabulary
///
/// Provider-reported values plus the sentinels the engine assigns itself
/// (plan-time exclusions, submission failures, exhausted status queries).
pub mod raw {
    pub const EXCLUDED: &str = "EXCLUDED";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";

    pub const PLANNED: &str = "PLANNED";
    pub const CREATED: &str = "CREATED";
    pub const UNSUBMITTED: &str = "UNSUBMITTED";

    pub const SUBMITTED: &str = "SUBMITTED";
    pub const PENDING: &str = "PENDING";
    pub const STARTED: &str = "STARTED";
    pub const READY: &str = "READY";
    pub const RUNNING: &str = "RUNNING";

    pub const COMPLETED: &str = "COMPLETED";
    pub const FINISHED: &str = "FINISHED";
    pub const CANCELLED: &str = "CANCELLED";

    pub const FAILED: &str = "FAILED";
    pub const FAILED_TO_CREATE: &str = "FAILED_TO_CREATE";
    pub const FAILED_TO_START: &str = "FAILED_TO_START";

    pub const FAILED_TO_GET_STATUS: &str = "FAILED_TO_GET_STATUS";
    pub const UNKNOWN: &str = "UNKNOWN";

    pub const NO_TASK_CREATED: &str = "NO_TASK_CREATED";
}

/// Canonical status category of an export task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StatusCategory {
    /// The work was never going to be submitted (already satisfied, skipped)
    Excluded,
    /// Planned or created, submission not yet attempted
    NotStarted,
    /// Submitted and not yet resolved
    Pending,
    /// Succeeded or was cancelled; no further action
    Completed,
    /// Submission or execution failed
    Failed,
    /// Status could not be determined after exhausting retries
    Unknown,
    /// Catch-all for statuses not explicitly classified
    Other,
}

impl StatusCategory {
    /// All categories, in summary/reporting order
    pub const ALL: [StatusCategory; 7] = [
        StatusCategory::Excluded,
        StatusCategory::NotStarted,
        StatusCategory::Pending,
        StatusCategory::Completed,
        StatusCategory::Failed,
        StatusCategory::Unknown,
        StatusCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCategory::Excluded => "EXCLUDED",
            StatusCategory::NotStarted => "NOT_STARTED",
            StatusCategory::Pending => "PENDING",
            StatusCategory::Completed => "COMPLETED",
            StatusCategory::Failed => "FAILED",
            StatusCategory::Unknown => "UNKNOWN",
            StatusCategory::Other => "OTHER",
        }
    }

    /// Tasks in these categories are never polled or re-submitted
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            StatusCategory::Excluded
                | StatusCategory::Completed
                | StatusCategory::Failed
                | StatusCategory::Unknown
                | StatusCategory::Other
        )
    }

    /// Tasks in these categories are queried during tracking sweeps
    pub fn is_pollable(&self) -> bool {
        matches!(self, StatusCategory::Pending)
    }

    /// The job finished on the provider side (success, cancel or failure)
    pub fn is_finished(&self) -> bool {
        matches!(self, StatusCategory::Completed | StatusCategory::Failed)
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A provider status string, validated at construction
///
/// Accepted values are non-empty `[A-Z0-9_]` tokens; input is uppercased
/// first, so `"running"` and `"RUNNING"` are the same status. Anything else
/// fails construction — classification itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RawStatus(String);

impl RawStatus {
    /// Creates a raw status from a provider-reported string
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into().to_uppercase();
        if value.is_empty() {
            return Err("Raw status cannot be empty".to_string());
        }
        if !value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
        {
            return Err(format!("Invalid raw status: {value}"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical category of this status under the taxonomy
    pub fn category(&self) -> StatusCategory {
        classify(self)
    }

    // Engine-assigned sentinels. Infallible by construction.

    pub fn planned() -> Self {
        Self(raw::PLANNED.to_string())
    }

    pub fn created() -> Self {
        Self(raw::CREATED.to_string())
    }

    pub fn started() -> Self {
        Self(raw::STARTED.to_string())
    }

    pub fn already_exists() -> Self {
        Self(raw::ALREADY_EXISTS.to_string())
    }

    pub fn failed_to_create() -> Self {
        Self(raw::FAILED_TO_CREATE.to_string())
    }

    pub fn failed_to_start() -> Self {
        Self(raw::FAILED_TO_START.to_string())
    }

    pub fn failed_to_get_status() -> Self {
        Self(raw::FAILED_TO_GET_STATUS.to_string())
    }

    pub fn no_task_created() -> Self {
        Self(raw::NO_TASK_CREATED.to_string())
    }
}

impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classifies a raw status into its canonical category
///
/// Total over all accepted raw statuses: known vocabulary maps to its
/// category, anything else maps to [`StatusCategory::Other`].
pub fn classify(status: &RawStatus) -> StatusCategory {
    match status.as_str() {
        raw::EXCLUDED | raw::ALREADY_EXISTS => StatusCategory::Excluded,
        raw::PLANNED | raw::CREATED | raw::UNSUBMITTED => StatusCategory::NotStarted,
        raw::SUBMITTED | raw::PENDING | raw::STARTED | raw::READY | raw::RUNNING => {
            StatusCategory::Pending
        }
        raw::COMPLETED | raw::FINISHED | raw::CANCELLED => StatusCategory::Completed,
        raw::FAILED | raw::FAILED_TO_CREATE | raw::FAILED_TO_START => StatusCategory::Failed,
        raw::FAILED_TO_GET_STATUS | raw::UNKNOWN => StatusCategory::Unknown,
        _ => StatusCategory::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(raw::EXCLUDED, StatusCategory::Excluded)]
    #[test_case(raw::ALREADY_EXISTS, StatusCategory::Excluded)]
    #[test_case(raw::PLANNED, StatusCategory::NotStarted)]
    #[test_case(raw::CREATED, StatusCategory::NotStarted)]
    #[test_case(raw::UNSUBMITTED, StatusCategory::NotStarted)]
    #[test_case(raw::SUBMITTED, StatusCategory::Pending)]
    #[test_case(raw::PENDING, StatusCategory::Pending)]
    #[test_case(raw::STARTED, StatusCategory::Pending)]
    #[test_case(raw::READY, StatusCategory::Pending)]
    #[test_case(raw::RUNNING, StatusCategory::Pending)]
    #[test_case(raw::COMPLETED, StatusCategory::Completed)]
    #[test_case(raw::FINISHED, StatusCategory::Completed)]
    #[test_case(raw::CANCELLED, StatusCategory::Completed)]
    #[test_case(raw::FAILED, StatusCategory::Failed)]
    #[test_case(raw::FAILED_TO_CREATE, StatusCategory::Failed)]
    #[test_case(raw::FAILED_TO_START, StatusCategory::Failed)]
    #[test_case(raw::FAILED_TO_GET_STATUS, StatusCategory::Unknown)]
    #[test_case(raw::UNKNOWN, StatusCategory::Unknown)]
    #[test_case(raw::NO_TASK_CREATED, StatusCategory::Other)]
    fn test_classification_table(status: &str, expected: StatusCategory) {
        let raw = RawStatus::new(status).unwrap();
        assert_eq!(classify(&raw), expected);
    }

    #[test]
    fn test_unmapped_status_defaults_to_other() {
        let raw = RawStatus::new("CANCELLING").unwrap();
        assert_eq!(classify(&raw), StatusCategory::Other);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let raw = RawStatus::new("RUNNING").unwrap();
        assert_eq!(classify(&raw), classify(&raw));
    }

    #[test]
    fn test_raw_status_uppercases_input() {
        let raw = RawStatus::new("running").unwrap();
        assert_eq!(raw.as_str(), "RUNNING");
        assert_eq!(raw.category(), StatusCategory::Pending);
    }

    #[test]
    fn test_raw_status_rejects_invalid_values() {
        assert!(RawStatus::new("").is_err());
        assert!(RawStatus::new("NOT A STATUS").is_err());
        assert!(RawStatus::new("status!").is_err());
    }

    #[test]
    fn test_skip_group() {
        // SKIP = EXCLUDED ∪ COMPLETED ∪ FAILED ∪ UNKNOWN ∪ OTHER
        assert!(StatusCategory::Excluded.is_skip());
        assert!(StatusCategory::Completed.is_skip());
        assert!(StatusCategory::Failed.is_skip());
        assert!(StatusCategory::Unknown.is_skip());
        assert!(StatusCategory::Other.is_skip());
        assert!(!StatusCategory::NotStarted.is_skip());
        assert!(!StatusCategory::Pending.is_skip());
    }

    #[test]
    fn test_pollable_group() {
        assert!(StatusCategory::Pending.is_pollable());
        for category in StatusCategory::ALL {
            if category != StatusCategory::Pending {
                assert!(!category.is_pollable(), "{category} must not be pollable");
            }
        }
    }

    #[test]
    fn test_every_category_is_skip_or_active() {
        for category in StatusCategory::ALL {
            let active = category.is_pollable() || category == StatusCategory::NotStarted;
            assert_ne!(category.is_skip(), active, "{category} must be exactly one");
        }
    }

    #[test]
    fn test_sentinel_constructors_match_vocabulary() {
        assert_eq!(RawStatus::started().as_str(), raw::STARTED);
        assert_eq!(RawStatus::already_exists().category(), StatusCategory::Excluded);
        assert_eq!(RawStatus::failed_to_create().category(), StatusCategory::Failed);
        assert_eq!(
            RawStatus::failed_to_get_status().category(),
            StatusCategory::Unknown
        );
        assert_eq!(RawStatus::no_task_created().category(), StatusCategory::Other);
    }
}
