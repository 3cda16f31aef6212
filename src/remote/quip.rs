//! Quip Automation API client.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::error::ClientError;
use super::http_client::{HttpTimeouts, build_http_client};
use super::payload::{decode_document, decode_folder, error_message};
use super::{ExportResponse, RemoteClient};
use crate::model::{DocumentNode, ExportFormat, FolderNode};

/// Connection settings for [`QuipClient`].
///
/// Passed in explicitly; the access token never lives in process-global state.
#[derive(Clone)]
pub struct ClientConfig {
    /// API base URL, e.g. `https://platform.quip.com`.
    pub base_url: String,
    /// Personal access token sent as a bearer token.
    pub access_token: String,
    /// HTTP timeouts for API requests.
    pub timeouts: HttpTimeouts,
}

impl ClientConfig {
    /// Creates a config with default timeouts.
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            timeouts: HttpTimeouts::default(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

/// [`RemoteClient`] backed by the Quip REST API.
///
/// Metadata endpoints:
/// - `GET {base}/1/folders/{id}`
/// - `GET {base}/1/threads/{id}`
///
/// Export endpoint: `GET {base}/1/threads/{id}/export/{format}`.
#[derive(Clone)]
pub struct QuipClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl fmt::Debug for QuipClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuipClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl QuipClient {
    /// Creates a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] when the base URL is not an
    /// http(s) URL, and [`ClientError::Build`] when reqwest construction fails.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let parsed = Url::parse(&config.base_url).map_err(|_| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ClientError::InvalidBaseUrl {
                url: config.base_url,
            });
        }

        let client =
            build_http_client(config.timeouts).map_err(|source| ClientError::Build { source })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token,
        })
    }

    /// Returns the normalized API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/1/{path}", self.base_url)
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, ClientError> {
        self.client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ClientError::request(url, e))
    }

    /// GETs a metadata endpoint and returns the body of a successful response.
    async fn get_metadata(&self, id: &str, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.send(url).await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::request(url, e))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "metadata request failed");
            return Err(match error_message(&body) {
                Some(message) => ClientError::api(id, message),
                None => ClientError::http_status(url, status.as_u16()),
            });
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl RemoteClient for QuipClient {
    #[instrument(skip(self))]
    async fn get_folder(&self, folder_id: &str) -> Result<FolderNode, ClientError> {
        let url = self.endpoint(&format!("folders/{folder_id}"));
        let body = self.get_metadata(folder_id, &url).await?;
        decode_folder(folder_id, &url, &body)
    }

    #[instrument(skip(self))]
    async fn get_document(&self, document_id: &str) -> Result<DocumentNode, ClientError> {
        let url = self.endpoint(&format!("threads/{document_id}"));
        let body = self.get_metadata(document_id, &url).await?;
        decode_document(document_id, &url, &body)
    }

    #[instrument(skip(self))]
    async fn export_document(
        &self,
        document_id: &str,
        format: ExportFormat,
    ) -> Result<ExportResponse, ClientError> {
        let url = self.endpoint(&format!(
            "threads/{document_id}/export/{}",
            format.endpoint_segment()
        ));
        let response = self.send(&url).await?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            // Body of a failed export is an error page; the caller only needs the status.
            return Ok(ExportResponse {
                status,
                body: Vec::new(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::request(&url, e))?;
        Ok(ExportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
