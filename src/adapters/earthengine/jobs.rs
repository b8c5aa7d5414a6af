//! Remote job handle and launcher backed by Earth Engine exports
//!
//! Both destinations are served by Earth Engine batch exports: `toAsset`
//! for the asset folder, `toDrive` for the Drive folder. The launcher
//! builds the request; the job submits it lazily on `start()` and tracks
//! the resulting operation.

use super::client::EarthEngineClient;
use super::models::{
    AssetExportOptions, DriveDestination, EarthEngineDestination, ExportImageRequest,
    FileExportOptions,
};
use crate::adapters::traits::{JobLauncher, RemoteJob};
use crate::config::NivexConfig;
use crate::core::status::RawStatus;
use crate::domain::{Destination, JobError, PeriodKey, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One Earth Engine export, submitted on `start()`
pub struct EarthEngineJob {
    client: Arc<EarthEngineClient>,
    request: ExportImageRequest,
    operation: Mutex<Option<String>>,
}

impl EarthEngineJob {
    pub fn new(client: Arc<EarthEngineClient>, request: ExportImageRequest) -> Self {
        Self {
            client,
            request,
            operation: Mutex::new(None),
        }
    }
}

#[async_trait]
impl RemoteJob for EarthEngineJob {
    async fn start(&self) -> std::result::Result<(), JobError> {
        let mut operation = self.operation.lock().await;
        if operation.is_some() {
            return Ok(());
        }
        let name = self
            .client
            .export_image(&self.request)
            .await
            .map_err(|e| JobError::Submission(e.to_string()))?;
        *operation = Some(name);
        Ok(())
    }

    async fn query_status(&self) -> std::result::Result<RawStatus, JobError> {
        let operation = self.operation.lock().await.clone();
        match operation {
            None => Err(JobError::StatusQuery(
                "Export job has not been submitted".to_string(),
            )),
            Some(name) => self
                .client
                .operation_state(&name)
                .await
                .map_err(|e| JobError::StatusQuery(e.to_string())),
        }
    }
}

/// Creates Earth Engine export jobs for either destination
pub struct EarthEngineLauncher {
    client: Arc<EarthEngineClient>,
    asset_folder: String,
    drive_folder: String,
    scale_m: u32,
    max_pixels: u64,
}

impl EarthEngineLauncher {
    pub fn new(
        client: Arc<EarthEngineClient>,
        asset_folder: impl Into<String>,
        drive_folder: impl Into<String>,
        scale_m: u32,
        max_pixels: u64,
    ) -> Self {
        Self {
            client,
            asset_folder: asset_folder.into(),
            drive_folder: drive_folder.into(),
            scale_m,
            max_pixels,
        }
    }

    pub fn from_config(client: Arc<EarthEngineClient>, config: &NivexConfig) -> Self {
        Self::new(
            client,
            config.export.gee_asset_folder.clone().unwrap_or_default(),
            config.export.drive_folder.clone().unwrap_or_default(),
            config.export.scale_m,
            config.export.max_pixels,
        )
    }
}

#[async_trait]
impl JobLauncher for EarthEngineLauncher {
    async fn create_job(
        &self,
        period: &PeriodKey,
        image: &str,
        target: Destination,
    ) -> Result<Box<dyn RemoteJob>> {
        tracing::debug!(period = %period, image = %image, target = %target, "Building export request");

        let mut request = ExportImageRequest {
            expression: image.to_string(),
            description: image.to_string(),
            asset_export_options: None,
            file_export_options: None,
            scale: self.scale_m,
            max_pixels: self.max_pixels,
        };
        match target {
            Destination::EarthEngine => {
                request.asset_export_options = Some(AssetExportOptions {
                    earth_engine_destination: EarthEngineDestination {
                        name: format!("{}/{}", self.asset_folder, image),
                    },
                });
            }
            Destination::Drive => {
                request.file_export_options = Some(FileExportOptions {
                    file_format: "GEO_TIFF".to_string(),
                    drive_destination: DriveDestination {
                        folder: self.drive_folder.clone(),
                        filename_prefix: image.to_string(),
                    },
                });
            }
        }

        Ok(Box::new(EarthEngineJob::new(self.client.clone(), request)))
    }
}
