//! Earth Engine asset inventory and upstream catalog availability
//!
//! Two read-only views over asset listings: the destination inventory of
//! already-exported artifacts, and the availability of complete source
//! months in the upstream satellite catalog.

use super::client::EarthEngineClient;
use crate::adapters::traits::{AvailabilitySource, DestinationInventory};
use crate::domain::{periods_from_names, Destination, PeriodKey, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Inventory of artifacts already saved to the Earth Engine asset folder
pub struct EarthEngineInventory {
    client: Arc<EarthEngineClient>,
    folder: String,
    image_prefix: String,
}

impl EarthEngineInventory {
    pub fn new(
        client: Arc<EarthEngineClient>,
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
impl DestinationInventory for EarthEngineInventory {
    fn destination(&self) -> Destination {
        Destination::EarthEngine
    }

    async fn existing_periods(&self) -> Result<Vec<PeriodKey>> {
        tracing::debug!(folder = %self.folder, "Checking for images already saved to Earth Engine");

        let assets = self.client.list_assets(&self.folder).await?;
        let names: Vec<String> = assets
            .iter()
            .filter(|asset| asset.is_image())
            .map(|asset| asset.base_name().to_string())
            .collect();

        let periods = periods_from_names(&names, &self.image_prefix);
        tracing::debug!(
            total = periods.len(),
            newest = periods.first().map(ToString::to_string).unwrap_or_default(),
            oldest = periods.last().map(ToString::to_string).unwrap_or_default(),
            "Images saved in Earth Engine asset folder"
        );
        Ok(periods)
    }
}

/// Months with complete source data in the upstream catalog
///
/// A month counts as complete when the catalog holds an image for every day
/// of it. The current month is always dropped (it cannot be complete yet),
/// as is anything older than the configured minimum period.
pub struct CatalogAvailability {
    client: Arc<EarthEngineClient>,
    collection: String,
    min_period: Option<PeriodKey>,
}

impl CatalogAvailability {
    pub fn new(
        client: Arc<EarthEngineClient>,
        collection: impl Into<String>,
        min_period: Option<PeriodKey>,
    ) -> Self {
        Self {
            client,
            collection: collection.into(),
            min_period,
        }
    }
}

#[async_trait]
impl AvailabilitySource for CatalogAvailability {
    async fn available_periods(&self) -> Result<Vec<PeriodKey>> {
        tracing::debug!(collection = %self.collection, "Reading upstream catalog");

        let assets = self.client.list_assets(&self.collection).await?;

        // Distinct observation days per month
        let mut days_per_month: BTreeMap<PeriodKey, HashSet<NaiveDate>> = BTreeMap::new();
        for asset in assets.iter().filter(|asset| asset.is_image()) {
            let Some(start_time) = &asset.start_time else {
                continue;
            };
            let Ok(timestamp) = chrono::DateTime::parse_from_rfc3339(start_time) else {
                tracing::warn!(
                    asset = %asset.name,
                    start_time = %start_time,
                    "Skipping asset with unparseable start time"
                );
                continue;
            };
            let date = timestamp.date_naive();
            days_per_month
                .entry(PeriodKey::containing(date))
                .or_default()
                .insert(date);
        }

        let current_month = PeriodKey::containing(Utc::now().date_naive());
        let mut periods: Vec<PeriodKey> = days_per_month
            .into_iter()
            .filter(|(period, days)| {
                if *period == current_month {
                    return false;
                }
                if let Some(min) = self.min_period {
                    if *period < min {
                        return false;
                    }
                }
                days.len() as u32 >= period.days_in_month()
            })
            .map(|(period, _)| period)
            .collect();
        periods.sort_unstable_by(|a, b| b.cmp(a));

        tracing::debug!(
            total = periods.len(),
            last_complete = periods.first().map(ToString::to_string).unwrap_or_default(),
            "Complete months available upstream"
        );
        Ok(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, AuthConfig, EarthEngineConfig};

    fn client_for(server_url: &str) -> Arc<EarthEngineClient> {
        let config = EarthEngineConfig {
            endpoint: server_url.to_string(),
            project: "snow-project".to_string(),
        };
        let auth = AuthConfig {
            access_token: secret_string("test-token".to_string()),
        };
        Arc::new(EarthEngineClient::new(&config, &auth).unwrap())
    }

    #[tokio::test]
    async fn test_inventory_extracts_and_filters_periods() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects/x/assets/exports:listAssets")
            .with_status(200)
            .with_body(
                r#"{"assets": [
                    {"name": "projects/x/assets/exports/SNOW_2024-01", "type": "IMAGE"},
                    {"name": "projects/x/assets/exports/SNOW_2024-02", "type": "IMAGE"},
                    {"name": "projects/x/assets/exports/OTHER_2024-03", "type": "IMAGE"},
                    {"name": "projects/x/assets/exports/subfolder", "type": "FOLDER"}
                ]}"#,
            )
            .create_async()
            .await;

        let inventory =
            EarthEngineInventory::new(client_for(&server.url()), "projects/x/assets/exports", "SNOW");
        let periods = inventory.existing_periods().await.unwrap();

        assert_eq!(
            periods,
            vec![
                PeriodKey::new(2024, 2).unwrap(),
                PeriodKey::new(2024, 1).unwrap(),
            ]
        );
    }

    #[tokio::test]
    async fn test_availability_requires_complete_months() {
        // January 2023 fully covered, February missing a day
        let mut assets = Vec::new();
        for day in 1..=31 {
            assets.push(format!(
                r#"{{"name": "c/img_2023_01_{day:02}", "type": "IMAGE",
                    "startTime": "2023-01-{day:02}T00:00:00Z"}}"#
            ));
        }
        for day in 1..=27 {
            assets.push(format!(
                r#"{{"name": "c/img_2023_02_{day:02}", "type": "IMAGE",
                    "startTime": "2023-02-{day:02}T00:00:00Z"}}"#
            ));
        }
        let body = format!(r#"{{"assets": [{}]}}"#, assets.join(","));

        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects/catalog/assets/MOD10A1:listAssets")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let availability = CatalogAvailability::new(
            client_for(&server.url()),
            "projects/catalog/assets/MOD10A1",
            None,
        );
        let periods = availability.available_periods().await.unwrap();

        assert_eq!(periods, vec![PeriodKey::new(2023, 1).unwrap()]);
    }

    #[tokio::test]
    async fn test_availability_respects_min_period() {
        let mut assets = Vec::new();
        for day in 1..=31 {
            assets.push(format!(
                r#"{{"name": "c/img_1999_01_{day:02}", "type": "IMAGE",
                    "startTime": "1999-01-{day:02}T00:00:00Z"}}"#
            ));
        }
        let body = format!(r#"{{"assets": [{}]}}"#, assets.join(","));

        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects/catalog/assets/MOD10A1:listAssets")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let availability = CatalogAvailability::new(
            client_for(&server.url()),
            "projects/catalog/assets/MOD10A1",
            Some(PeriodKey::new(2000, 3).unwrap()),
        );
        let periods = availability.available_periods().await.unwrap();
        assert!(periods.is_empty());
    }
}
