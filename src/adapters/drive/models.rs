//! Google Drive REST API models

use serde::Deserialize;

/// Response from `files` listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    pub next_page_token: Option<String>,
}

/// One file in a Drive listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

impl DriveFile {
    /// File name with a raster extension stripped, if present
    ///
    /// Drive exports land as `{image}.tif`; inventories compare on the
    /// bare artifact name.
    pub fn base_name(&self) -> &str {
        self.name
            .strip_suffix(".tif")
            .or_else(|| self.name.strip_suffix(".tiff"))
            .unwrap_or(&self.name)
    }
}
