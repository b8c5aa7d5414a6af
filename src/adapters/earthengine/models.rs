//! Earth Engine REST API models
//!
//! Request and response types for the subset of the Earth Engine v1 API
//! nivex uses: asset listing, image export submission, and operation
//! status queries.

use serde::{Deserialize, Serialize};

/// Response from `{parent}:listAssets`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssetsResponse {
    #[serde(default)]
    pub assets: Vec<AssetInfo>,
    pub next_page_token: Option<String>,
}

/// One asset in a listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    /// Fully-qualified asset name (e.g. `projects/x/assets/folder/image`)
    pub name: String,

    /// Asset type (`IMAGE`, `FOLDER`, `IMAGE_COLLECTION`, ...)
    #[serde(rename = "type", default)]
    pub asset_type: String,

    /// Acquisition start time, RFC 3339
    #[serde(default)]
    pub start_time: Option<String>,
}

impl AssetInfo {
    /// The asset name with its path stripped
    pub fn base_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn is_image(&self) -> bool {
        self.asset_type.eq_ignore_ascii_case("IMAGE")
    }
}

/// A long-running export operation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub metadata: OperationMetadata,
    #[serde(default)]
    pub done: bool,
    pub error: Option<OperationError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMetadata {
    /// Provider-reported state (`PENDING`, `RUNNING`, `COMPLETED`, ...)
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub message: String,
}

/// Request body for `projects/{project}/image:export`
///
/// Exactly one of `asset_export_options` / `file_export_options` is set,
/// selecting the destination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportImageRequest {
    /// Reference to the computed image to export
    pub expression: String,

    /// Human-readable task description (the artifact name)
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_export_options: Option<AssetExportOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_export_options: Option<FileExportOptions>,

    /// Export scale in meters
    pub scale: u32,

    pub max_pixels: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetExportOptions {
    pub earth_engine_destination: EarthEngineDestination,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthEngineDestination {
    /// Fully-qualified destination asset name
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileExportOptions {
    pub file_format: String,
    pub drive_destination: DriveDestination,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveDestination {
    pub folder: String,
    pub filename_prefix: String,
}
