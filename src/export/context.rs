//! Shared state for one traversal.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::attachment::AttachmentFetcher;
use super::paths::WrittenPaths;
use super::stats::ExportStats;
use super::throttle::Throttler;
use crate::remote::RemoteClient;

/// Handles shared by the walker and the document exporter.
///
/// Cloning is cheap: every field is reference-counted, so clones observe the
/// same throttle timestamp, counters and interrupt flag.
#[derive(Clone)]
pub struct ExportContext {
    client: Arc<dyn RemoteClient>,
    fetcher: AttachmentFetcher,
    throttler: Arc<Throttler>,
    stats: Arc<ExportStats>,
    written: Arc<WrittenPaths>,
    interrupted: Arc<AtomicBool>,
}

impl fmt::Debug for ExportContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportContext")
            .field("throttler", &self.throttler)
            .field("stats", &self.stats)
            .field("interrupted", &self.is_interrupted())
            .finish_non_exhaustive()
    }
}

impl ExportContext {
    /// Creates a context with fresh counters and a cleared interrupt flag.
    #[must_use]
    pub fn new(
        client: Arc<dyn RemoteClient>,
        fetcher: AttachmentFetcher,
        throttler: Throttler,
    ) -> Self {
        Self {
            client,
            fetcher,
            throttler: Arc::new(throttler),
            stats: Arc::new(ExportStats::new()),
            written: Arc::new(WrittenPaths::new()),
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The remote store.
    #[must_use]
    pub fn client(&self) -> &dyn RemoteClient {
        self.client.as_ref()
    }

    /// The attachment downloader.
    #[must_use]
    pub fn fetcher(&self) -> &AttachmentFetcher {
        &self.fetcher
    }

    /// The throttler shared by every folder.
    #[must_use]
    pub fn throttler(&self) -> &Throttler {
        &self.throttler
    }

    /// Running counters.
    #[must_use]
    pub fn stats(&self) -> &Arc<ExportStats> {
        &self.stats
    }

    /// Paths written so far.
    #[must_use]
    pub fn written(&self) -> &WrittenPaths {
        &self.written
    }

    /// Flag that stops the traversal before its next child or attachment.
    #[must_use]
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    /// Returns true once the interrupt flag has been set.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}

/// Log prefix for a node at `depth`.
pub(crate) fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
