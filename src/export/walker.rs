//! Depth-first folder traversal.
//!
//! Each folder moves through `Fetching -> DirectoryReady ->
//! EnumeratingChildren -> Done`. A failed fetch ends the folder before any
//! directory is created. Children are dispatched strictly in order, one at a
//! time, each behind the shared [`Throttler`](super::Throttler).

use std::path::{Path, PathBuf};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::{debug, info, warn};

use super::context::{ExportContext, indent};
use super::document::DocumentExporter;
use super::error::{NodeError, NodeKind};
use super::paths::folder_name;
use crate::model::ChildRef;

/// Result of walking one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    /// Every child was dispatched.
    Completed {
        /// The folder's local directory.
        path: PathBuf,
        /// Children dispatched.
        items: usize,
    },
    /// The interrupt flag stopped dispatch part way through.
    Interrupted {
        /// The folder's local directory.
        path: PathBuf,
        /// Children dispatched before the interrupt.
        items: usize,
    },
    /// The folder could not be fetched or its directory created.
    Skipped,
}

/// Recursive folder walker.
#[derive(Debug, Clone)]
pub struct FolderWalker {
    ctx: ExportContext,
    documents: DocumentExporter,
}

impl FolderWalker {
    /// Creates a walker over the shared context.
    #[must_use]
    pub fn new(ctx: ExportContext) -> Self {
        let documents = DocumentExporter::new(ctx.clone());
        Self { ctx, documents }
    }

    /// Mirrors `folder_id` and its descendants under `base`.
    ///
    /// `depth` only affects log indentation.
    pub async fn walk(&self, folder_id: &str, base: &Path, depth: usize) -> FolderOutcome {
        self.walk_path(folder_id, base, depth, &[]).await
    }

    /// `ancestors` holds the ids of the folders on the path from the walk's
    /// root down to (not including) `folder_id`.
    fn walk_path<'a>(
        &'a self,
        folder_id: &'a str,
        base: &'a Path,
        depth: usize,
        ancestors: &'a [String],
    ) -> BoxFuture<'a, FolderOutcome> {
        async move {
            let indent = indent(depth);
            let stats = self.ctx.stats();

            let folder = match self.ctx.client().get_folder(folder_id).await {
                Ok(folder) => folder,
                Err(source) => {
                    warn!("{indent}{}", NodeError::fetch(NodeKind::Folder, folder_id, source));
                    stats.increment_folders_skipped();
                    return FolderOutcome::Skipped;
                }
            };

            let name = folder_name(folder.title.as_deref());
            let path = base.join(&name);
            if let Err(source) = tokio::fs::create_dir_all(&path).await {
                warn!("{indent}{}", NodeError::io(&path, source));
                stats.increment_folders_skipped();
                return FolderOutcome::Skipped;
            }
            stats.increment_folders_exported();
            info!("{indent}Processing folder: {name}");

            // Entries of unknown type are paced and counted, then skipped.
            let total = folder.children.len() + folder.unrecognized_children;
            info!("{indent}Found in {name}: ({total} items)");

            let mut lineage = ancestors.to_vec();
            lineage.push(folder_id.to_string());

            let mut dispatched = 0;
            let entries = folder
                .children
                .iter()
                .map(Some)
                .chain(std::iter::repeat_n(None, folder.unrecognized_children));
            for (position, child) in entries.enumerate() {
                if self.ctx.is_interrupted() {
                    info!("{indent}Interrupted in folder: {name} ({dispatched}/{total} items)");
                    return FolderOutcome::Interrupted {
                        path,
                        items: dispatched,
                    };
                }

                self.ctx.throttler().before_call().await;
                dispatched += 1;
                stats.increment_items_visited();

                let Some(child) = child else {
                    debug!(folder_id, position, "entry of unknown type skipped");
                    continue;
                };
                match child {
                    ChildRef::Document { id } => {
                        info!(
                            "{indent}  ({}/{total}) Processing document...",
                            position + 1
                        );
                        self.documents.export(id, &path, depth + 1).await;
                    }
                    ChildRef::Folder { id } if lineage.contains(id) => {
                        warn!("{indent}  {}", NodeError::CycleDetected { id: id.clone() });
                        stats.increment_folders_skipped();
                    }
                    ChildRef::Folder { id } => {
                        self.walk_path(id, &path, depth + 1, &lineage).await;
                    }
                }
            }

            info!("{indent}Completed folder: {name} ({total} items)");
            FolderOutcome::Completed {
                path,
                items: dispatched,
            }
        }
        .boxed()
    }
}
