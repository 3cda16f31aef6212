//! Error taxonomy for an export run.
//!
//! Errors are contained at the smallest enclosing node: attachment, then
//! document, then folder. Only [`SessionError`] ever reaches the caller of
//! [`ExportSession::run`](super::ExportSession::run).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::remote::ClientError;

/// Fatal errors that abort a session before any traversal.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The root share link could not be resolved to a folder id.
    #[error(transparent)]
    InvalidLink(#[from] LinkError),

    /// The output root could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputRoot {
        /// The output root.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The attachment HTTP client could not be constructed.
    #[error("cannot construct attachment client: {0}")]
    Client(#[from] ClientError),
}

/// Errors from [`resolve`](super::link::resolve).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkError {
    /// The text is not a URL.
    #[error("invalid link '{link}': {reason}\n  Suggestion: paste the full folder link, e.g. https://quip.com/AbCdEf123456")]
    Malformed {
        /// The link as given.
        link: String,
        /// Parser message.
        reason: String,
    },

    /// The URL path has no segment to use as the entity id.
    #[error("link '{link}' has no folder id in its path")]
    MissingEntityId {
        /// The link as given.
        link: String,
    },
}

/// Kind of remote node, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A folder.
    Folder,
    /// A document.
    Document,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Folder => "folder",
            Self::Document => "document",
        })
    }
}

/// Per-node failures. Logged and counted; never propagated past the node.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Metadata fetch failed or returned an error payload.
    #[error("error accessing {kind} {id}: {source}")]
    Fetch {
        /// Folder or document.
        kind: NodeKind,
        /// The node id.
        id: String,
        /// The client failure.
        #[source]
        source: ClientError,
    },

    /// A folder lists one of its own ancestors as a child.
    #[error("folder {id} is already being exported higher up this path; skipping")]
    CycleDetected {
        /// The repeated folder id.
        id: String,
    },

    /// Neither the primary export nor fallback markup was available.
    #[error("no export available for document {id}: {reason}")]
    FormatUnavailable {
        /// The document id.
        id: String,
        /// Why the primary export failed.
        reason: String,
    },

    /// Writing a file or creating a directory failed.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path being written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl NodeError {
    /// Creates a fetch error.
    pub fn fetch(kind: NodeKind, id: impl Into<String>, source: ClientError) -> Self {
        Self::Fetch {
            kind,
            id: id.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures downloading one attachment.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// The attachment URL is not a valid absolute URL.
    #[error("invalid attachment URL: {url}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// Network-level failure.
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The attachment URL.
        url: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The attachment URL.
        url: String,
        /// The status code.
        status: u16,
    },

    /// Writing the destination file failed.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
