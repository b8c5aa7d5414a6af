//! Earth Engine adapter
//!
//! REST client plus the concrete collaborator implementations backed by it:
//! the asset-folder inventory, the upstream catalog availability source,
//! and the export job launcher (which serves both destinations, since Drive
//! exports are also Earth Engine batch jobs).

pub mod client;
pub mod inventory;
pub mod jobs;
pub mod models;

pub use client::EarthEngineClient;
pub use inventory::{CatalogAvailability, EarthEngineInventory};
pub use jobs::{EarthEngineJob, EarthEngineLauncher};
