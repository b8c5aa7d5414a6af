//! Earth Engine REST client
//!
//! Thin client over the Earth Engine v1 API covering the three calls the
//! engine needs: listing assets (inventories and the upstream catalog),
//! submitting image exports, and querying export operation state.

use super::models::{ExportImageRequest, ListAssetsResponse, Operation};
use crate::config::{AuthConfig, EarthEngineConfig, SecretString};
use crate::core::status::RawStatus;
use crate::domain::{EarthEngineError, Result};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Earth Engine API client
pub struct EarthEngineClient {
    http: reqwest::Client,
    endpoint: Url,
    project: String,
    access_token: SecretString,
}

impl EarthEngineClient {
    /// Creates a client from configuration
    pub fn new(config: &EarthEngineConfig, auth: &AuthConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EarthEngineError::ConnectionFailed(e.to_string()))?;

        // A trailing slash keeps Url::join from eating the last path segment
        let mut endpoint = config.endpoint.clone();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            crate::domain::NivexError::Configuration(format!(
                "Invalid Earth Engine endpoint '{}': {}",
                config.endpoint, e
            ))
        })?;

        Ok(Self {
            http,
            endpoint,
            project: config.project.clone(),
            access_token: auth.access_token.clone(),
        })
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| EarthEngineError::InvalidResponse(format!("Bad URL '{path}': {e}")).into())
    }

    /// Lists the child assets of a folder or image collection
    ///
    /// Follows `nextPageToken` pagination until exhausted.
    pub async fn list_assets(&self, parent: &str) -> Result<Vec<super::models::AssetInfo>> {
        let mut assets = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = self.url(&format!("{parent}:listAssets"))?;
            let mut request = self
                .http
                .get(url)
                .bearer_auth(self.access_token.expose_secret());
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| EarthEngineError::ConnectionFailed(e.to_string()))?;
            let response = check_status(response).await?;

            let page: ListAssetsResponse = response
                .json()
                .await
                .map_err(|e| EarthEngineError::InvalidResponse(e.to_string()))?;

            assets.extend(page.assets);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(parent = %parent, count = assets.len(), "Listed Earth Engine assets");
        Ok(assets)
    }

    /// Submits an image export and returns the operation name
    pub async fn export_image(&self, request: &ExportImageRequest) -> Result<String> {
        let url = self.url(&format!("projects/{}/image:export", self.project))?;
        let response = self
            .http
            .post(url)
            .bearer_auth(self.access_token.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| EarthEngineError::ConnectionFailed(e.to_string()))?;
        let response = check_status(response).await?;

        let operation: Operation = response
            .json()
            .await
            .map_err(|e| EarthEngineError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            description = %request.description,
            operation = %operation.name,
            "Submitted Earth Engine export"
        );
        Ok(operation.name)
    }

    /// Queries an export operation and maps it to a raw status
    ///
    /// The provider-reported state string is passed through as-is; the
    /// status taxonomy decides what it means. Operations that report `done`
    /// without a state fall back to `COMPLETED`/`FAILED`.
    pub async fn operation_state(&self, operation_name: &str) -> Result<RawStatus> {
        let url = self.url(operation_name)?;
        let response = self
            .http
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| EarthEngineError::ConnectionFailed(e.to_string()))?;
        let response = check_status(response).await?;

        let operation: Operation = response
            .json()
            .await
            .map_err(|e| EarthEngineError::InvalidResponse(e.to_string()))?;

        let state = if !operation.metadata.state.is_empty() {
            operation.metadata.state.clone()
        } else if operation.error.is_some() {
            "FAILED".to_string()
        } else if operation.done {
            "COMPLETED".to_string()
        } else {
            "PENDING".to_string()
        };

        RawStatus::new(state)
            .map_err(|e| EarthEngineError::InvalidResponse(format!("Bad operation state: {e}")).into())
    }
}

/// Maps HTTP error responses to domain errors
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    let error = match status.as_u16() {
        401 | 403 => EarthEngineError::AuthenticationFailed(message),
        404 => EarthEngineError::AssetNotFound(message),
        code if (400..500).contains(&code) => EarthEngineError::ClientError {
            status: code,
            message,
        },
        code => EarthEngineError::ServerError {
            status: code,
            message,
        },
    };
    Err(error.into())
}
