//! Top-level export orchestration.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tracing::{info, instrument};

use super::attachment::AttachmentFetcher;
use super::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_THROTTLE_INTERVAL};
use super::context::ExportContext;
use super::error::SessionError;
use super::link::resolve;
use super::stats::{ExportStats, ExportSummary};
use super::throttle::Throttler;
use super::walker::{FolderOutcome, FolderWalker};
use crate::remote::{HttpTimeouts, RemoteClient};

/// Settings for one export session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Directory the root folder is mirrored into.
    pub output_root: PathBuf,
    /// Minimum spacing between child dispatches; zero disables throttling.
    pub throttle_interval: Duration,
    /// Timeouts for attachment downloads.
    pub http_timeouts: HttpTimeouts,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl ExportConfig {
    /// Creates a config with the default throttle interval and timeouts.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
            http_timeouts: HttpTimeouts::default(),
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The whole tree was traversed (individual nodes may have been skipped).
    Completed,
    /// The interrupt flag stopped the traversal; the tree on disk is partial.
    Interrupted,
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Folder id taken from the share link.
    pub root_id: String,
    /// The output root.
    pub output_root: PathBuf,
    /// Outcome of the root folder's walk.
    pub root_folder: FolderOutcome,
    /// Completed or interrupted.
    pub outcome: SessionOutcome,
    /// Counters at the end of the run.
    pub summary: ExportSummary,
    /// Total time spent throttled.
    pub throttled: Duration,
}

impl SessionReport {
    /// Folder children dispatched during the run.
    #[must_use]
    pub fn items_visited(&self) -> usize {
        self.summary.items_visited
    }

    /// Returns true when the run was interrupted.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.outcome == SessionOutcome::Interrupted
    }
}

/// Owns the remote client, output root and shared traversal state.
#[derive(Debug)]
pub struct ExportSession {
    config: ExportConfig,
    ctx: ExportContext,
}

impl ExportSession {
    /// Creates a session with its own attachment HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Client`] when the attachment client cannot be
    /// built.
    pub fn new(config: ExportConfig, client: Arc<dyn RemoteClient>) -> Result<Self, SessionError> {
        let fetcher = AttachmentFetcher::new(config.http_timeouts)?;
        Ok(Self::with_fetcher(config, client, fetcher))
    }

    /// Creates a session with an explicit attachment fetcher.
    #[must_use]
    pub fn with_fetcher(
        config: ExportConfig,
        client: Arc<dyn RemoteClient>,
        fetcher: AttachmentFetcher,
    ) -> Self {
        let throttler = Throttler::new(config.throttle_interval);
        let ctx = ExportContext::new(client, fetcher, throttler);
        Self { config, ctx }
    }

    /// Flag that stops the traversal before its next child or attachment.
    ///
    /// The binary sets it from a Ctrl+C listener.
    #[must_use]
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        self.ctx.interrupt_handle()
    }

    /// Live counters, for progress display.
    #[must_use]
    pub fn stats(&self) -> Arc<ExportStats> {
        Arc::clone(self.ctx.stats())
    }

    /// The session's configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Resolves `root_link` and mirrors that folder into the output root.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidLink`] when the link has no folder id
    /// and [`SessionError::OutputRoot`] when the output root cannot be
    /// created. Nothing is traversed in either case. Failures of individual
    /// folders, documents and attachments are logged and counted instead.
    #[instrument(skip(self), fields(output_root = %self.config.output_root.display()))]
    pub async fn run(&self, root_link: &str) -> Result<SessionReport, SessionError> {
        let link = resolve(root_link)?;
        let output_root = &self.config.output_root;

        tokio::fs::create_dir_all(output_root)
            .await
            .map_err(|source| SessionError::OutputRoot {
                path: output_root.clone(),
                source,
            })?;

        info!("Starting extraction from folder ID: {}", link.entity_id);
        let shown_root = std::path::absolute(output_root).unwrap_or_else(|_| output_root.clone());
        info!("Files will be saved to: {}", shown_root.display());

        let walker = FolderWalker::new(self.ctx.clone());
        let root_folder = walker.walk(&link.entity_id, output_root, 0).await;

        let outcome = if self.ctx.is_interrupted() {
            info!("Extraction was interrupted. Partial data may have been extracted.");
            SessionOutcome::Interrupted
        } else {
            info!("Extraction completed.");
            SessionOutcome::Completed
        };

        Ok(SessionReport {
            root_id: link.entity_id,
            output_root: output_root.clone(),
            root_folder,
            outcome,
            summary: self.ctx.stats().snapshot(),
            throttled: self.ctx.throttler().cumulative_delay(),
        })
    }
}
