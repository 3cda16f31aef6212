//! Remote document store client.
//!
//! The export engine talks to the store only through the [`RemoteClient`]
//! trait. [`QuipClient`] is the production implementation over the Quip REST
//! API; tests substitute an in-memory store.
//!
//! # Architecture
//!
//! - [`RemoteClient`] - async trait with the three calls the engine needs
//! - [`QuipClient`] - reqwest implementation with bearer authentication
//! - `payload` - decoding layer from loosely-typed JSON into [`crate::model`]
//! - [`ClientError`] - transport, status, API and decoding failures

mod error;
pub mod http_client;
mod payload;
mod quip;

pub use error::ClientError;
pub use http_client::{CONNECT_TIMEOUT_SECS, HttpTimeouts, READ_TIMEOUT_SECS};
pub use quip::{ClientConfig, QuipClient};

pub(crate) use http_client::build_http_client;

use async_trait::async_trait;

use crate::model::{DocumentNode, ExportFormat, FolderNode};

/// Raw result of an export request.
///
/// A non-success status is a value here, not an error: the exporter decides
/// whether to fall back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    /// HTTP status code of the export request.
    pub status: u16,
    /// Exported bytes (empty when the status is not a success).
    pub body: Vec<u8>,
}

impl ExportResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Operations the export engine needs from the remote store.
///
/// Implementations must be shareable across tasks (`Send + Sync`) because the
/// session holds them behind an `Arc`.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Fetches folder metadata and its classified children.
    async fn get_folder(&self, folder_id: &str) -> Result<FolderNode, ClientError>;

    /// Fetches document metadata, fallback markup and attachment references.
    async fn get_document(&self, document_id: &str) -> Result<DocumentNode, ClientError>;

    /// Requests an authenticated export of a document in `format`.
    async fn export_document(
        &self,
        document_id: &str,
        format: ExportFormat,
    ) -> Result<ExportResponse, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_response_success_range() {
        let response = |status| ExportResponse {
            status,
            body: Vec::new(),
        };
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(302).is_success());
        assert!(!response(404).is_success());
        assert!(!response(500).is_success());
    }
}
