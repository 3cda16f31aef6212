//! Quip Export Core Library
//!
//! Mirrors a Quip folder tree onto the local filesystem: every folder becomes
//! a directory, every document a `.docx` file (or `.html` when the export
//! endpoint refuses), and every document's attachments land in a sibling
//! `<title>_attachments` directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`export`] - traversal engine, export strategy, throttling, session
//! - [`remote`] - remote store trait and the Quip REST client
//! - [`model`] - decoded folder, document and attachment entities

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod export;
pub mod model;
pub mod remote;
#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use export::{
    ExportConfig, ExportSession, ExportStats, ExportSummary, SessionError, SessionOutcome,
    SessionReport, resolve_link, sanitize,
};
pub use model::{AttachmentRef, ChildRef, DocumentNode, ExportFormat, FolderNode};
pub use remote::{ClientConfig, ClientError, HttpTimeouts, QuipClient, RemoteClient};
