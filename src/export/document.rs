//! Per-document export: primary format, fallback markup, then attachments.
//!
//! Every failure in here is contained at the document boundary. The caller
//! receives a [`DocumentOutcome`] for accounting, never an error.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use super::context::{ExportContext, indent};
use super::error::{NodeError, NodeKind};
use super::paths::{attachment_file, attachments_dir, document_file, document_stem};
use crate::model::{DocumentNode, ExportFormat};

/// Result of exporting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// A file was written in `format`.
    Exported {
        /// Primary or fallback format.
        format: ExportFormat,
        /// The written file.
        path: PathBuf,
    },
    /// Metadata was fetched but neither format could be written.
    NoOutput,
    /// Metadata could not be fetched; nothing was attempted.
    Skipped,
}

/// Exports single documents into a target directory.
#[derive(Debug, Clone)]
pub struct DocumentExporter {
    ctx: ExportContext,
}

impl DocumentExporter {
    /// Creates an exporter over the shared context.
    #[must_use]
    pub fn new(ctx: ExportContext) -> Self {
        Self { ctx }
    }

    /// Exports `document_id` into `target_dir`.
    ///
    /// `target_dir` must exist. `depth` only affects log indentation.
    #[instrument(skip(self, target_dir), fields(target_dir = %target_dir.display()))]
    pub async fn export(
        &self,
        document_id: &str,
        target_dir: &Path,
        depth: usize,
    ) -> DocumentOutcome {
        let indent = indent(depth);
        let stats = self.ctx.stats();

        let document = match self.ctx.client().get_document(document_id).await {
            Ok(document) => document,
            Err(source) => {
                let error = NodeError::fetch(NodeKind::Document, document_id, source);
                warn!("{indent}{error}");
                stats.increment_documents_skipped();
                return DocumentOutcome::Skipped;
            }
        };

        let stem = document_stem(document.title.as_deref());
        let outcome = self
            .write_content(document_id, &document, &stem, target_dir, &indent)
            .await;
        match &outcome {
            DocumentOutcome::Exported {
                format: ExportFormat::Docx,
                ..
            } => stats.increment_documents_exported(),
            DocumentOutcome::Exported {
                format: ExportFormat::Html,
                ..
            } => stats.increment_documents_fallback(),
            DocumentOutcome::NoOutput | DocumentOutcome::Skipped => {
                stats.increment_documents_without_output();
            }
        }

        self.fetch_attachments(&document, &stem, target_dir, &indent)
            .await;
        outcome
    }

    /// Writes the primary export, or the fallback markup when that fails.
    async fn write_content(
        &self,
        document_id: &str,
        document: &DocumentNode,
        stem: &str,
        dir: &Path,
        indent: &str,
    ) -> DocumentOutcome {
        let reason = match self
            .ctx
            .client()
            .export_document(document_id, ExportFormat::Docx)
            .await
        {
            Ok(response) if response.is_success() => {
                let path = document_file(dir, stem, ExportFormat::Docx);
                match self.write_file(&path, &response.body).await {
                    Ok(()) => {
                        info!("{indent}Extracted DOCX: {}", path.display());
                        return DocumentOutcome::Exported {
                            format: ExportFormat::Docx,
                            path,
                        };
                    }
                    Err(error) => {
                        warn!("{indent}{error}");
                        error.to_string()
                    }
                }
            }
            Ok(response) => {
                info!("{indent}Failed to download DOCX for {stem}: {}", response.status);
                format!("export returned HTTP {}", response.status)
            }
            Err(error) => {
                info!("{indent}Failed to download DOCX for {stem}: {error}");
                error.to_string()
            }
        };

        let Some(html) = document.html.as_deref() else {
            let error = NodeError::FormatUnavailable {
                id: document_id.to_string(),
                reason,
            };
            warn!("{indent}{error}");
            return DocumentOutcome::NoOutput;
        };

        let path = document_file(dir, stem, ExportFormat::Html);
        match self.write_file(&path, html.as_bytes()).await {
            Ok(()) => {
                info!("{indent}Extracted HTML instead: {}", path.display());
                DocumentOutcome::Exported {
                    format: ExportFormat::Html,
                    path,
                }
            }
            Err(error) => {
                warn!("{indent}{error}");
                DocumentOutcome::NoOutput
            }
        }
    }

    /// Writes `contents` to `path`; a partially written file is removed.
    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), NodeError> {
        if let Err(source) = tokio::fs::write(path, contents).await {
            if tokio::fs::metadata(path).await.is_ok_and(|meta| meta.is_file()) {
                let _ = tokio::fs::remove_file(path).await;
            }
            return Err(NodeError::io(path, source));
        }
        self.ctx.written().record(path);
        Ok(())
    }

    /// Downloads every attachment with a URL into `<stem>_attachments`.
    ///
    /// The directory is created on the first attachment that has a URL.
    async fn fetch_attachments(
        &self,
        document: &DocumentNode,
        stem: &str,
        dir: &Path,
        indent: &str,
    ) {
        if document.attachments.is_empty() {
            return;
        }
        let stats = self.ctx.stats();
        let target = attachments_dir(dir, stem);
        let mut target_ready = false;

        for attachment in &document.attachments {
            if self.ctx.is_interrupted() {
                debug!(document_id = %document.id, "interrupted; remaining attachments skipped");
                return;
            }

            let Some(url) = attachment.url.as_deref() else {
                warn!(
                    "{indent}Attachment {} of {stem} has no URL; skipping",
                    attachment.name.as_deref().unwrap_or("(unnamed)")
                );
                stats.increment_attachments_failed();
                continue;
            };

            if !target_ready {
                if let Err(source) = tokio::fs::create_dir_all(&target).await {
                    warn!("{indent}{}", NodeError::io(&target, source));
                    stats.increment_attachments_failed();
                    return;
                }
                target_ready = true;
            }

            let dest = attachment_file(&target, attachment.name.as_deref());
            if self.ctx.fetcher().fetch(url, &dest).await {
                self.ctx.written().record(&dest);
                info!("{indent}Downloaded attachment: {}", dest.display());
                stats.increment_attachments_downloaded();
            } else {
                stats.increment_attachments_failed();
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::export::attachment::AttachmentFetcher;
    use crate::export::throttle::Throttler;
    use crate::model::AttachmentRef;
    use crate::remote::HttpTimeouts;
    use crate::test_support::fake_store::FakeStore;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn exporter(store: FakeStore) -> DocumentExporter {
        let fetcher = AttachmentFetcher::new(HttpTimeouts::default()).unwrap();
        DocumentExporter::new(ExportContext::new(
            Arc::new(store),
            fetcher,
            Throttler::disabled(),
        ))
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_export_writes_primary_format() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = exporter(FakeStore::new().document("T1", "Plan: Q3", b"PKdocx"));

        let outcome = exporter.export("T1", temp_dir.path(), 1).await;

        let expected = temp_dir.path().join("Plan Q3.docx");
        assert_eq!(
            outcome,
            DocumentOutcome::Exported {
                format: ExportFormat::Docx,
                path: expected.clone()
            }
        );
        assert_eq!(std::fs::read(expected).unwrap(), b"PKdocx");
        assert_eq!(exporter.ctx.stats().snapshot().documents_exported, 1);
    }

    #[tokio::test]
    async fn test_export_primary_failure_falls_back_to_html() {
        let temp_dir = TempDir::new().unwrap();
        let store = FakeStore::new().html_only_document("T1", "Notes", "<p>hi</p>", 500);
        let exporter = exporter(store);

        let outcome = exporter.export("T1", temp_dir.path(), 0).await;

        assert!(matches!(
            outcome,
            DocumentOutcome::Exported {
                format: ExportFormat::Html,
                ..
            }
        ));
        assert_eq!(entries(temp_dir.path()), vec!["Notes.html"]);
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("Notes.html")).unwrap(),
            "<p>hi</p>"
        );
        assert_eq!(exporter.ctx.stats().snapshot().documents_fallback, 1);
    }

    #[tokio::test]
    async fn test_export_primary_write_failure_leaves_only_fallback() {
        let temp_dir = TempDir::new().unwrap();
        // A directory in the way makes the .docx write fail.
        std::fs::create_dir(temp_dir.path().join("Notes.docx")).unwrap();
        let node = DocumentNode {
            id: "T1".into(),
            title: Some("Notes".into()),
            html: Some("<p>hi</p>".into()),
            ..DocumentNode::default()
        };
        let exporter = exporter(FakeStore::new().document_with(node, 200, b"PKdocx"));

        let outcome = exporter.export("T1", temp_dir.path(), 0).await;

        assert!(matches!(
            outcome,
            DocumentOutcome::Exported {
                format: ExportFormat::Html,
                ..
            }
        ));
        assert!(!temp_dir.path().join("Notes.docx").is_file());
        assert!(temp_dir.path().join("Notes.html").is_file());
        assert_eq!(exporter.ctx.written().len(), 1);
    }

    #[tokio::test]
    async fn test_export_without_any_format_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let node = DocumentNode {
            id: "T1".into(),
            title: Some("Empty".into()),
            ..DocumentNode::default()
        };
        let exporter = exporter(FakeStore::new().document_with(node, 403, b""));

        let outcome = exporter.export("T1", temp_dir.path(), 0).await;

        assert_eq!(outcome, DocumentOutcome::NoOutput);
        assert!(entries(temp_dir.path()).is_empty());
        assert_eq!(exporter.ctx.stats().snapshot().documents_without_output, 1);
    }

    #[tokio::test]
    async fn test_export_metadata_error_skips_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = FakeStore::new();
        let exporter = exporter(store);

        let outcome = exporter.export("MISSING", temp_dir.path(), 0).await;

        assert_eq!(outcome, DocumentOutcome::Skipped);
        assert!(entries(temp_dir.path()).is_empty());
        assert_eq!(exporter.ctx.stats().snapshot().documents_skipped, 1);
    }

    #[tokio::test]
    async fn test_export_untitled_document_uses_placeholder() {
        let temp_dir = TempDir::new().unwrap();
        let node = DocumentNode {
            id: "T1".into(),
            title: None,
            ..DocumentNode::default()
        };
        let exporter = exporter(FakeStore::new().document_with(node, 200, b"x"));

        exporter.export("T1", temp_dir.path(), 0).await;

        assert_eq!(entries(temp_dir.path()), vec!["Unknown_Document.docx"]);
    }

    #[tokio::test]
    async fn test_attachment_failure_does_not_stop_siblings() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/blob/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/blob/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bytes".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let attachments = vec![
            AttachmentRef {
                url: Some(format!("{}/blob/broken", mock_server.uri())),
                name: Some("broken.png".into()),
            },
            AttachmentRef {
                url: Some(format!("{}/blob/ok", mock_server.uri())),
                name: Some("ok.pdf".into()),
            },
        ];
        let temp_dir = TempDir::new().unwrap();
        let exporter = exporter(FakeStore::new().document_with_attachments("T1", "Design", attachments));

        exporter.export("T1", temp_dir.path(), 0).await;

        assert!(temp_dir.path().join("Design.docx").exists());
        let attachments_dir = temp_dir.path().join("Design_attachments");
        assert_eq!(entries(&attachments_dir), vec!["ok.pdf"]);
        let summary = exporter.ctx.stats().snapshot();
        assert_eq!(summary.attachments_downloaded, 1);
        assert_eq!(summary.attachments_failed, 1);
        // Only Design.docx and ok.pdf were written.
        assert_eq!(exporter.ctx.written().len(), 2);
    }

    #[tokio::test]
    async fn test_attachments_without_url_create_no_directory() {
        let temp_dir = TempDir::new().unwrap();
        let attachments = vec![AttachmentRef {
            url: None,
            name: Some("orphan.bin".into()),
        }];
        let exporter = exporter(FakeStore::new().document_with_attachments("T1", "Doc", attachments));

        exporter.export("T1", temp_dir.path(), 0).await;

        assert_eq!(entries(temp_dir.path()), vec!["Doc.docx"]);
        assert_eq!(exporter.ctx.stats().snapshot().attachments_failed, 1);
    }

    #[tokio::test]
    async fn test_interrupt_skips_remaining_attachments() {
        let temp_dir = TempDir::new().unwrap();
        let attachments = vec![AttachmentRef {
            url: Some("http://127.0.0.1:9/never".into()),
            name: Some("a.bin".into()),
        }];
        let exporter = exporter(FakeStore::new().document_with_attachments("T1", "Doc", attachments));
        exporter.ctx.interrupt_handle().store(true, Ordering::SeqCst);

        exporter.export("T1", temp_dir.path(), 0).await;

        assert_eq!(entries(temp_dir.path()), vec!["Doc.docx"]);
        let summary = exporter.ctx.stats().snapshot();
        assert_eq!(summary.attachments_downloaded + summary.attachments_failed, 0);
    }
}
