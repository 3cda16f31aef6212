//! Local path layout for exported nodes.
//!
//! ```text
//! <base>/<Folder>/
//! <base>/<Folder>/<Document>.docx | .html
//! <base>/<Folder>/<Document>_attachments/<Attachment>
//! ```
//!
//! Every component goes through [`path_component`], so no title can inject a
//! separator or climb out of its parent.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use super::constants::{
    ATTACHMENTS_DIR_SUFFIX, UNKNOWN_ATTACHMENT, UNKNOWN_DOCUMENT, UNKNOWN_FOLDER,
};
use super::sanitize::path_component;
use crate::model::ExportFormat;

/// Path component used for a folder's directory.
#[must_use]
pub fn folder_name(title: Option<&str>) -> String {
    path_component(title, UNKNOWN_FOLDER)
}

/// Path component used for a document's file stem.
#[must_use]
pub fn document_stem(title: Option<&str>) -> String {
    path_component(title, UNKNOWN_DOCUMENT)
}

/// Export file for a document with the given stem.
#[must_use]
pub fn document_file(dir: &Path, stem: &str, format: ExportFormat) -> PathBuf {
    dir.join(format!("{stem}.{}", format.extension()))
}

/// Sibling directory holding a document's attachments.
#[must_use]
pub fn attachments_dir(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}{ATTACHMENTS_DIR_SUFFIX}"))
}

/// Destination of one attachment inside its document's attachments directory.
#[must_use]
pub fn attachment_file(attachments: &Path, name: Option<&str>) -> PathBuf {
    attachments.join(path_component(name, UNKNOWN_ATTACHMENT))
}

/// Paths written during one session.
///
/// Two nodes mapping to the same path overwrite each other (the later one
/// wins); this set only exists to make that visible in the log.
#[derive(Debug, Default)]
pub struct WrittenPaths {
    paths: Mutex<HashSet<PathBuf>>,
}

impl WrittenPaths {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `path`, warning if it was already written this session.
    ///
    /// Returns `false` on a collision.
    pub fn record(&self, path: &Path) -> bool {
        let inserted = self
            .paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf());
        if !inserted {
            warn!(
                path = %path.display(),
                "two items share this path; the later one overwrote the earlier"
            );
        }
        inserted
    }

    /// Number of distinct paths recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
