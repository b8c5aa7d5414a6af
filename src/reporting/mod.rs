//! Run report rendering
//!
//! Produces the plain-text report for a finished export run. Delivery
//! (email, chat) is an external collaborator concern; the rendered string
//! is the interface.

pub mod render;

pub use render::{render_report, ReportContext};
