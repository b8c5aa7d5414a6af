//! Domain models and types for nivex.
//!
//! This module contains the core domain types and business rules shared by
//! the export engine and its adapters.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Period keys** ([`PeriodKey`]) — the calendar-month identity every
//!   reconciliation and inventory operation works on
//! - **Destinations** ([`Destination`]) — the two supported export targets
//! - **Error types** ([`NivexError`], [`JobError`], [`EarthEngineError`],
//!   [`DriveError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Invalid values fail at construction rather than deep inside the engine:
//!
//! ```rust
//! use nivex::domain::{Destination, PeriodKey};
//! use std::str::FromStr;
//!
//! // Only "gee" and "gdrive" are destinations
//! assert!(Destination::from_str("s3").is_err());
//!
//! // Period keys must be the first day of a month
//! assert!(PeriodKey::from_str("2024-03-15").is_err());
//! ```

pub mod destination;
pub mod errors;
pub mod period;
pub mod result;

// Re-export commonly used types for convenience
pub use destination::Destination;
pub use errors::{DriveError, EarthEngineError, JobError, NivexError};
pub use period::{periods_from_names, PeriodKey};
pub use result::Result;
