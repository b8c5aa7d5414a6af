//! Google Drive adapter
//!
//! REST client and destination inventory for the Drive export folder.

pub mod client;
pub mod inventory;
pub mod models;

pub use client::DriveClient;
pub use inventory::DriveInventory;
