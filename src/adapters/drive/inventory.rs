//! Google Drive destination inventory

use super::client::DriveClient;
use crate::adapters::traits::DestinationInventory;
use crate::domain::{periods_from_names, Destination, PeriodKey, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Inventory of artifacts already saved to the Drive export folder
pub struct DriveInventory {
    client: Arc<DriveClient>,
    folder: String,
    image_prefix: String,
}

impl DriveInventory {
    pub fn new(
        client: Arc<DriveClient>,
        folder: impl Into<String>,
        image_prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            folder: folder.into(),
            image_prefix: image_prefix.into(),
        }
    }
}

#[async_trait]
impl DestinationInventory for DriveInventory {
    fn destination(&self) -> Destination {
        Destination::Drive
    }

    async fn existing_periods(&self) -> Result<Vec<PeriodKey>> {
        tracing::debug!(folder = %self.folder, "Checking for images already saved to Google Drive");

        let files = self.client.list_files(&self.folder).await?;
        let names: Vec<String> = files
            .iter()
            .map(|file| file.base_name().to_string())
            .collect();

        let periods = periods_from_names(&names, &self.image_prefix);
        tracing::debug!(
            total = periods.len(),
            newest = periods.first().map(ToString::to_string).unwrap_or_default(),
            oldest = periods.last().map(ToString::to_string).unwrap_or_default(),
            "Images saved in Google Drive folder"
        );
        Ok(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, AuthConfig, DriveConfig};

    #[tokio::test]
    async fn test_drive_inventory_normalizes_names() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/files")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"files": [
                    {"id": "1", "name": "SNOW_2024-01.tif"},
                    {"id": "2", "name": "SNOW_2023-12.tiff"},
                    {"id": "3", "name": "notes.txt"}
                ]}"#,
            )
            .create_async()
            .await;

        let config = DriveConfig {
            endpoint: server.url(),
        };
        let auth = AuthConfig {
            access_token: secret_string("test-token".to_string()),
        };
        let client = Arc::new(DriveClient::new(&config, &auth).unwrap());
        let inventory = DriveInventory::new(client, "snow-exports", "SNOW");

        let periods = inventory.existing_periods().await.unwrap();
        assert_eq!(
            periods,
            vec![
                PeriodKey::new(2024, 1).unwrap(),
                PeriodKey::new(2023, 12).unwrap(),
            ]
        );
    }
}
