//! Attachment downloads.
//!
//! Attachment URLs are fetched without the API bearer token: they are
//! pre-signed or public blob URLs, and forwarding the token to an arbitrary
//! host would leak it.

use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::AttachmentError;
use crate::remote::{ClientError, HttpTimeouts, build_http_client};

/// Unauthenticated HTTP downloader for attachment blobs.
#[derive(Debug, Clone)]
pub struct AttachmentFetcher {
    client: Client,
}

impl AttachmentFetcher {
    /// Creates a fetcher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] when the HTTP client cannot be built.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, ClientError> {
        let client = build_http_client(timeouts).map_err(|source| ClientError::Build { source })?;
        Ok(Self { client })
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Downloads `url` to `dest`, overwriting it.
    ///
    /// Failures are logged and reported as `false`; they never propagate.
    /// The parent directory must already exist.
    pub async fn fetch(&self, url: &str, dest: &Path) -> bool {
        match self.try_fetch(url, dest).await {
            Ok(_) => true,
            Err(error) => {
                warn!(error = %error, "failed to download attachment");
                false
            }
        }
    }

    /// Downloads `url` to `dest`, returning the number of bytes written.
    ///
    /// A partially written file is removed when the body stream fails.
    ///
    /// # Errors
    ///
    /// Returns an [`AttachmentError`] for an invalid URL, a transport
    /// failure, a non-success status, or a filesystem error.
    #[instrument(skip(self, dest), fields(dest = %dest.display()))]
    pub async fn try_fetch(&self, url: &str, dest: &Path) -> Result<u64, AttachmentError> {
        let parsed = Url::parse(url).map_err(|_| AttachmentError::InvalidUrl {
            url: url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AttachmentError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|source| AttachmentError::Network {
                url: url.to_string(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(AttachmentError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let mut file = File::create(dest).await.map_err(|source| AttachmentError::Io {
            path: dest.to_path_buf(),
            source,
        })?;

        let stream_result = stream_to_file(&mut file, response, url, dest).await;
        if stream_result.is_err() {
            debug!(path = %dest.display(), "cleaning up partial attachment after error");
            drop(file);
            let _ = tokio::fs::remove_file(dest).await;
        }
        let bytes_written = stream_result?;

        debug!(bytes = bytes_written, "attachment written");
        Ok(bytes_written)
    }
}

async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    dest: &Path,
) -> Result<u64, AttachmentError> {
    let io_error = |source| AttachmentError::Io {
        path: dest.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|source| AttachmentError::Network {
            url: url.to_string(),
            source,
        })?;
        writer.write_all(&chunk).await.map_err(io_error)?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(io_error)?;
    Ok(bytes_written)
}
