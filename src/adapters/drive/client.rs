//! Google Drive REST client
//!
//! Covers the single call the engine needs from Drive: listing the files in
//! the export folder, so the inventory can tell which months are already
//! materialized there.

use super::models::{DriveFile, FileListResponse};
use crate::config::{AuthConfig, DriveConfig, SecretString};
use crate::domain::{DriveError, Result};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: u32 = 1000;

/// Google Drive API client
pub struct DriveClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: SecretString,
}

impl DriveClient {
    /// Creates a client from configuration
    pub fn new(config: &DriveConfig, auth: &AuthConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DriveError::ConnectionFailed(e.to_string()))?;

        let mut endpoint = config.endpoint.clone();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            crate::domain::NivexError::Configuration(format!(
                "Invalid Drive endpoint '{}': {}",
                config.endpoint, e
            ))
        })?;

        Ok(Self {
            http,
            endpoint,
            access_token: auth.access_token.clone(),
        })
    }

    /// Lists the non-trashed files inside a folder
    ///
    /// Follows `nextPageToken` pagination until exhausted.
    pub async fn list_files(&self, folder: &str) -> Result<Vec<DriveFile>> {
        let url = self
            .endpoint
            .join("files")
            .map_err(|e| DriveError::InvalidResponse(e.to_string()))?;
        let query = format!("'{folder}' in parents and trashed = false");

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .http
                .get(url.clone())
                .bearer_auth(self.access_token.expose_secret())
                .query(&[
                    ("q", query.as_str()),
                    ("fields", "nextPageToken, files(id, name)"),
                ])
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| DriveError::ConnectionFailed(e.to_string()))?;
            let response = check_status(response).await?;

            let page: FileListResponse = response
                .json()
                .await
                .map_err(|e| DriveError::InvalidResponse(e.to_string()))?;

            files.extend(page.files);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(folder = %folder, count = files.len(), "Listed Drive files");
        Ok(files)
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
        404 => DriveError::FolderNotFound(message),
        code if (400..500).contains(&code) => DriveError::ClientError {
            status: code,
            message,
        },
        code => DriveError::ServerError {
            status: code,
            message,
        },
    };
    Err(error.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn client_for(server_url: &str) -> DriveClient {
        let config = DriveConfig {
            endpoint: server_url.to_string(),
        };
        let auth = AuthConfig {
            access_token: secret_string("test-token".to_string()),
        };
        DriveClient::new(&config, &auth).unwrap()
    }

    #[tokio::test]
    async fn test_list_files() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/files")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded(
                    "q".into(),
                    "'snow-exports' in parents and trashed = false".into(),
                ),
                mockito::Matcher::UrlEncoded("pageSize".into(), "1000".into()),
            ]))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(r#"{"files": [{"id": "1", "name": "SNOW_2024-01.tif"}]}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let files = client.list_files("snow-exports").await.unwrap();

        mock.assert_async().await;
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].base_name(), "SNOW_2024-01");
    }

    #[tokio::test]
    async fn test_list_files_folder_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/files")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let result = client.list_files("missing").await;
        assert!(matches!(
            result,
            Err(crate::domain::NivexError::Drive(DriveError::FolderNotFound(_)))
        ));
    }
}
