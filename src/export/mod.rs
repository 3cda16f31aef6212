//! Folder-tree export engine.
//!
//! Mirrors a remote folder and its descendants into a local directory tree:
//! one directory per folder, one `.docx` (or fallback `.html`) file per
//! document, and one `<title>_attachments` directory per document with
//! downloadable attachments.
//!
//! # Architecture
//!
//! - [`ExportSession`] - resolves the share link, owns the output root and
//!   shared state, and reports the outcome
//! - [`FolderWalker`] - depth-first traversal, one throttled dispatch per child
//! - [`DocumentExporter`] - primary export with fallback, then attachments
//! - [`AttachmentFetcher`] - unauthenticated streaming download of one blob
//! - [`Throttler`] - global minimum interval between dispatches
//! - [`sanitize()`] / [`resolve_link`] - pure helpers for titles and links
//!
//! Failures are contained at the smallest enclosing node. Only link
//! resolution and output-root creation can fail a session.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use quip_export_core::export::{ExportConfig, ExportSession};
//! use quip_export_core::remote::{ClientConfig, QuipClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = QuipClient::new(ClientConfig::new("https://platform.quip.com", "token"))?;
//! let session = ExportSession::new(ExportConfig::new("./quip_export"), Arc::new(client))?;
//! let report = session.run("https://quip.com/AbCdEf123456").await?;
//! println!("visited {} items", report.items_visited());
//! # Ok(())
//! # }
//! ```

mod attachment;
pub mod constants;
mod context;
mod document;
mod error;
mod link;
mod paths;
mod sanitize;
mod session;
mod stats;
mod throttle;
mod walker;

pub use attachment::AttachmentFetcher;
pub use context::ExportContext;
pub use document::{DocumentExporter, DocumentOutcome};
pub use error::{AttachmentError, LinkError, NodeError, NodeKind, SessionError};
pub use link::{ResolvedLink, resolve as resolve_link};
pub use paths::WrittenPaths;
pub use sanitize::{RESERVED_CHARS, path_component, sanitize};
pub use session::{ExportConfig, ExportSession, SessionOutcome, SessionReport};
pub use stats::{ExportStats, ExportSummary};
pub use throttle::Throttler;
pub use walker::{FolderOutcome, FolderWalker};
