//! Error types for the remote API client.

use thiserror::Error;

/// Errors returned by [`RemoteClient`](super::RemoteClient) implementations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Build {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// The configured API base URL is not a valid URL.
    #[error("invalid API base URL: {url}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        url: String,
    },

    /// Network-level failure (DNS, connection refused, TLS, body read).
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The request URL.
        url: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The request timed out.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The request URL.
        url: String,
    },

    /// Non-success status without a decodable error payload.
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The request URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The API answered with an error payload.
    #[error("API error for {id}: {message}")]
    Api {
        /// The folder or document id that was requested.
        id: String,
        /// Error text reported by the API.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("undecodable response from {url}: {source}")]
    Decode {
        /// The request URL.
        url: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Creates a network or timeout error from a reqwest error.
    pub fn request(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an API error payload error.
    pub fn api(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_api_display() {
        let error = ClientError::api("ABC123", "Not Found");
        let msg = error.to_string();
        assert!(msg.contains("ABC123"), "Expected id in: {msg}");
        assert!(msg.contains("Not Found"), "Expected message in: {msg}");
    }

    #[test]
    fn test_client_error_http_status_display() {
        let error = ClientError::http_status("https://platform.quip.com/1/folders/x", 503);
        let msg = error.to_string();
        assert!(msg.contains("503"), "Expected status in: {msg}");
        assert!(msg.contains("/1/folders/x"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_client_error_decode_display() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = ClientError::decode("https://platform.quip.com/1/threads/t", source);
        assert!(error.to_string().starts_with("undecodable response"));
    }
}
