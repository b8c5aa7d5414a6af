//! Report rendering
//!
//! Renders the end-of-run report handed to the delivery collaborator
//! (email, chat, stdout). The template is embedded so the binary stays
//! self-contained.

use crate::config::NivexConfig;
use crate::core::export::RunSummary;
use crate::domain::{Destination, NivexError, Result};
use chrono::{DateTime, Local};
use handlebars::Handlebars;
use serde::Serialize;
use std::time::Duration;

const REPORT_TEMPLATE: &str = include_str!("templates/report.hbs");

/// Per-destination section of the report
#[derive(Debug, Clone, Serialize)]
pub struct DestinationSection {
    pub name: String,
    pub underline: String,
    pub path: String,
    pub results: Vec<String>,
    pub summary: String,
}

/// Template context for the run report
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub status: String,
    pub start_time: String,
    pub duration: String,
    pub results_summary: String,
    pub plan: Vec<String>,
    pub excluded: Vec<String>,
    pub destinations: Vec<DestinationSection>,
}

impl ReportContext {
    /// Builds the report context from a finished run
    pub fn from_run(
        run: &RunSummary,
        config: &NivexConfig,
        started_at: DateTime<Local>,
    ) -> Self {
        let prefix = &config.export.image_prefix;

        let completed = run.completed_count();
        let attempted = run
            .records
            .iter()
            .any(|record| record.status != "ALREADY_EXISTS");
        let status = if run.interrupted {
            "Interrupted - shutdown signal received".to_string()
        } else if completed > 0 {
            format!("Completed - {completed} images exported")
        } else if attempted {
            "Completed - with errors".to_string()
        } else {
            "Completed - No new images to export".to_string()
        };

        let plan = run
            .plan
            .final_plan
            .iter()
            .map(|period| period.image_name(prefix))
            .collect();
        let excluded = run
            .plan
            .excluded
            .iter()
            .map(|exclusion| {
                format!("{}: {}", exclusion.period.image_name(prefix), exclusion.reason)
            })
            .collect();

        let destinations = config
            .export
            .destinations
            .iter()
            .map(|&target| {
                let path = match target {
                    Destination::EarthEngine => config.export.gee_asset_folder.clone(),
                    Destination::Drive => config.export.drive_folder.clone(),
                }
                .unwrap_or_else(|| "Disabled".to_string());

                let results: Vec<String> = run
                    .records_for(target)
                    .iter()
                    .map(|record| record.to_string())
                    .collect();
                let summary = if results.is_empty() {
                    String::new()
                } else {
                    run.summary_for(target).to_string()
                };

                let name = format!("{} exports", target.label());
                let underline = "-".repeat(name.len());
                DestinationSection {
                    name,
                    underline,
                    path,
                    results,
                    summary,
                }
            })
            .collect();

        Self {
            status,
            start_time: started_at.format("%Y-%m-%d %H:%M:%S (%A)").to_string(),
            duration: format_duration(run.duration),
            results_summary: run.summary.to_string(),
            plan,
            excluded,
            destinations,
        }
    }
}

/// Renders the report to plain text
pub fn render_report(context: &ReportContext) -> Result<String> {
    let handlebars = Handlebars::new();
    handlebars
        .render_template(REPORT_TEMPLATE, context)
        .map_err(|e| NivexError::Report(e.to_string()))
}

/// Formats a duration as `1h 23m 45s`, dropping leading zero components
fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        secret_string, ApplicationConfig, AuthConfig, DriveConfig, EarthEngineConfig,
        ExportConfig, LoggingConfig, UpstreamConfig,
    };
    use crate::core::export::plan::{Exclusion, ExclusionReason, ExportPlan};
    use crate::core::export::{StatusSummary, TaskRecord};
    use crate::core::status::StatusCategory;
    use crate::domain::PeriodKey;
    use std::collections::BTreeMap;

    fn config() -> NivexConfig {
        NivexConfig {
            application: ApplicationConfig::default(),
            upstream: UpstreamConfig {
                collection: "projects/catalog/assets/MOD10A1".to_string(),
                min_period: None,
            },
            export: ExportConfig {
                destinations: vec![Destination::EarthEngine, Destination::Drive],
                image_prefix: "SNOW".to_string(),
                periods: vec![],
                gee_asset_folder: Some("projects/x/assets/exports".to_string()),
                drive_folder: Some("snow-exports".to_string()),
                poll_interval_secs: 30,
                scale_m: 500,
                max_pixels: 100_000_000,
            },
            earthengine: EarthEngineConfig::default(),
            drive: DriveConfig::default(),
            auth: AuthConfig {
                access_token: secret_string("t".to_string()),
            },
            logging: LoggingConfig::default(),
        }
    }

    fn run() -> RunSummary {
        let period = PeriodKey::new(2024, 1).unwrap();
        let missing = PeriodKey::new(2024, 2).unwrap();
        RunSummary {
            plan: ExportPlan {
                requested: vec![period, missing],
                excluded: vec![Exclusion {
                    period: missing,
                    reason: ExclusionReason::Unavailable,
                }],
                final_plan: vec![period],
                to_save: BTreeMap::new(),
            },
            summary: StatusSummary::from_categories([
                StatusCategory::Completed,
                StatusCategory::Failed,
            ]),
            records: vec![
                TaskRecord {
                    image: "SNOW_2024-01".to_string(),
                    target: Destination::EarthEngine,
                    status: "COMPLETED".to_string(),
                    category: StatusCategory::Completed,
                    error: None,
                },
                TaskRecord {
                    image: "SNOW_2024-01".to_string(),
                    target: Destination::Drive,
                    status: "FAILED".to_string(),
                    category: StatusCategory::Failed,
                    error: Some("quota".to_string()),
                },
            ],
            duration: Duration::from_secs(95),
            interrupted: false,
        }
    }

    #[test]
    fn test_context_status_lines() {
        let context = ReportContext::from_run(&run(), &config(), Local::now());
        assert_eq!(context.status, "Completed - 1 images exported");
        assert_eq!(context.duration, "1m 35s");
        assert_eq!(context.plan, vec!["SNOW_2024-01".to_string()]);
        assert_eq!(
            context.excluded,
            vec!["SNOW_2024-02: IMAGE_UNAVAILABLE".to_string()]
        );
    }

    #[test]
    fn test_context_no_new_images() {
        let mut run = run();
        run.summary = StatusSummary::from_categories([StatusCategory::Excluded]);
        run.records = vec![TaskRecord {
            image: "SNOW_2024-01".to_string(),
            target: Destination::Drive,
            status: "ALREADY_EXISTS".to_string(),
            category: StatusCategory::Excluded,
            error: None,
        }];
        let context = ReportContext::from_run(&run, &config(), Local::now());
        assert_eq!(context.status, "Completed - No new images to export");
    }

    #[test]
    fn test_render_report_contains_sections() {
        let context = ReportContext::from_run(&run(), &config(), Local::now());
        let report = render_report(&context).unwrap();

        assert!(report.contains("Snow Export Report"));
        assert!(report.contains("Earth Engine exports"));
        assert!(report.contains("Google Drive exports"));
        assert!(report.contains("SNOW_2024-01: COMPLETED"));
        assert!(report.contains("SNOW_2024-01: FAILED - quota"));
        assert!(report.contains("IMAGE_UNAVAILABLE"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
