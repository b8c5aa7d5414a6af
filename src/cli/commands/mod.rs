//! CLI command implementations

pub mod export;
pub mod init;
pub mod plan;
pub mod validate;

use crate::config::NivexConfig;
use crate::domain::{Destination, PeriodKey};

/// Applies shared CLI overrides to a loaded configuration
///
/// Used by both `export` and `plan`: comma-separated periods and
/// destinations replace their configured counterparts.
pub(crate) fn apply_overrides(
    config: &mut NivexConfig,
    periods: Option<&str>,
    destinations: Option<&str>,
) -> anyhow::Result<()> {
    if let Some(periods) = periods {
        let parsed: Result<Vec<PeriodKey>, String> = periods
            .split(',')
            .map(|s| s.trim().parse::<PeriodKey>())
            .collect();
        let parsed = parsed.map_err(|e| anyhow::anyhow!(e))?;
        tracing::info!(periods = ?parsed.iter().map(ToString::to_string).collect::<Vec<_>>(), "Overriding periods from CLI");
        config.export.periods = parsed;
    }

    if let Some(destinations) = destinations {
        let parsed: Result<Vec<Destination>, String> = destinations
            .split(',')
            .map(|s| s.trim().parse::<Destination>())
            .collect();
        let parsed = parsed.map_err(|e| anyhow::anyhow!(e))?;
        tracing::info!(destinations = ?parsed, "Overriding destinations from CLI");
        config.export.destinations = parsed;
    }

    Ok(())
}
