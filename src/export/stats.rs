//! Running counters for an export session.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Atomic counters updated by the walker and the document exporter.
///
/// Shared behind an `Arc` so the progress spinner can read them while the
/// traversal runs.
#[derive(Debug, Default)]
pub struct ExportStats {
    items_visited: AtomicUsize,
    folders_exported: AtomicUsize,
    folders_skipped: AtomicUsize,
    documents_exported: AtomicUsize,
    documents_fallback: AtomicUsize,
    documents_skipped: AtomicUsize,
    documents_without_output: AtomicUsize,
    attachments_downloaded: AtomicUsize,
    attachments_failed: AtomicUsize,
}

/// Point-in-time copy of [`ExportStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Folder children dispatched (documents and sub-folders).
    pub items_visited: usize,
    /// Folders whose directory was created.
    pub folders_exported: usize,
    /// Folders skipped on fetch failure or cycle.
    pub folders_skipped: usize,
    /// Documents written in the primary format.
    pub documents_exported: usize,
    /// Documents written from fallback markup.
    pub documents_fallback: usize,
    /// Documents whose metadata could not be fetched.
    pub documents_skipped: usize,
    /// Documents with neither an export nor fallback markup.
    pub documents_without_output: usize,
    /// Attachments written to disk.
    pub attachments_downloaded: usize,
    /// Attachments that failed or had no URL.
    pub attachments_failed: usize,
}

impl ExportSummary {
    /// Documents that produced a file, in either format.
    #[must_use]
    pub fn documents_written(&self) -> usize {
        self.documents_exported + self.documents_fallback
    }
}

impl ExportStats {
    /// Creates a tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of children dispatched so far.
    #[must_use]
    pub fn items_visited(&self) -> usize {
        self.items_visited.load(Ordering::SeqCst)
    }

    /// Returns the number of documents written in either format.
    #[must_use]
    pub fn documents_written(&self) -> usize {
        self.documents_exported.load(Ordering::SeqCst)
            + self.documents_fallback.load(Ordering::SeqCst)
    }

    /// Returns the number of attachments written.
    #[must_use]
    pub fn attachments_downloaded(&self) -> usize {
        self.attachments_downloaded.load(Ordering::SeqCst)
    }

    /// Copies every counter.
    #[must_use]
    pub fn snapshot(&self) -> ExportSummary {
        ExportSummary {
            items_visited: self.items_visited(),
            folders_exported: self.folders_exported.load(Ordering::SeqCst),
            folders_skipped: self.folders_skipped.load(Ordering::SeqCst),
            documents_exported: self.documents_exported.load(Ordering::SeqCst),
            documents_fallback: self.documents_fallback.load(Ordering::SeqCst),
            documents_skipped: self.documents_skipped.load(Ordering::SeqCst),
            documents_without_output: self.documents_without_output.load(Ordering::SeqCst),
            attachments_downloaded: self.attachments_downloaded(),
            attachments_failed: self.attachments_failed.load(Ordering::SeqCst),
        }
    }

    pub(crate) fn increment_items_visited(&self) {
        self.items_visited.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_folders_exported(&self) {
        self.folders_exported.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_folders_skipped(&self) {
        self.folders_skipped.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_documents_exported(&self) {
        self.documents_exported.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_documents_fallback(&self) {
        self.documents_fallback.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_documents_skipped(&self) {
        self.documents_skipped.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_documents_without_output(&self) {
        self.documents_without_output.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_attachments_downloaded(&self) {
        self.attachments_downloaded.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_attachments_failed(&self) {
        self.attachments_failed.fetch_add(1, Ordering::SeqCst);
    }
}
