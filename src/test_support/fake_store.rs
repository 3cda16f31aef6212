//! In-memory [`RemoteClient`] for traversal tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::{AttachmentRef, ChildRef, DocumentNode, ExportFormat, FolderNode};
use crate::remote::{ClientError, ExportResponse, RemoteClient};

/// A fixture tree: folders, documents and export results keyed by id.
#[derive(Debug, Default)]
pub struct FakeStore {
    folders: HashMap<String, FolderNode>,
    documents: HashMap<String, DocumentNode>,
    exports: HashMap<String, ExportResponse>,
    calls: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a folder whose children are given as `("doc" | "folder", id)` pairs.
    pub fn folder(mut self, id: &str, title: &str, children: &[(&str, &str)]) -> Self {
        let children = children
            .iter()
            .map(|(kind, child_id)| match *kind {
                "doc" => ChildRef::Document {
                    id: (*child_id).to_string(),
                },
                _ => ChildRef::Folder {
                    id: (*child_id).to_string(),
                },
            })
            .collect();
        self.folders.insert(
            id.to_string(),
            FolderNode {
                id: id.to_string(),
                title: Some(title.to_string()),
                children,
                unrecognized_children: 0,
            },
        );
        self
    }

    /// Adds a folder node as-is.
    pub fn folder_node(mut self, node: FolderNode) -> Self {
        self.folders.insert(node.id.clone(), node);
        self
    }

    /// Adds a document whose DOCX export succeeds with `docx` bytes.
    pub fn document(self, id: &str, title: &str, docx: &[u8]) -> Self {
        self.document_with(
            DocumentNode {
                id: id.to_string(),
                title: Some(title.to_string()),
                html: None,
                attachments: Vec::new(),
            },
            200,
            docx,
        )
    }

    /// Adds a document node with an explicit export status and body.
    pub fn document_with(mut self, node: DocumentNode, status: u16, body: &[u8]) -> Self {
        self.exports.insert(
            node.id.clone(),
            ExportResponse {
                status,
                body: body.to_vec(),
            },
        );
        self.documents.insert(node.id.clone(), node);
        self
    }

    /// Adds a document with fallback HTML whose export fails with `status`.
    pub fn html_only_document(self, id: &str, title: &str, html: &str, status: u16) -> Self {
        self.document_with(
            DocumentNode {
                id: id.to_string(),
                title: Some(title.to_string()),
                html: Some(html.to_string()),
                attachments: Vec::new(),
            },
            status,
            b"",
        )
    }

    /// Adds a document with attachments and a successful export.
    pub fn document_with_attachments(
        self,
        id: &str,
        title: &str,
        attachments: Vec<AttachmentRef>,
    ) -> Self {
        self.document_with(
            DocumentNode {
                id: id.to_string(),
                title: Some(title.to_string()),
                html: None,
                attachments,
            },
            200,
            b"docx",
        )
    }

    /// Returns the sequence of calls made so far, e.g. `folder:F1`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(call);
    }
}

#[async_trait]
impl RemoteClient for FakeStore {
    async fn get_folder(&self, folder_id: &str) -> Result<FolderNode, ClientError> {
        self.record(format!("folder:{folder_id}"));
        self.folders
            .get(folder_id)
            .cloned()
            .ok_or_else(|| ClientError::api(folder_id, "Not Found"))
    }

    async fn get_document(&self, document_id: &str) -> Result<DocumentNode, ClientError> {
        self.record(format!("document:{document_id}"));
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| ClientError::api(document_id, "Not Found"))
    }

    async fn export_document(
        &self,
        document_id: &str,
        format: ExportFormat,
    ) -> Result<ExportResponse, ClientError> {
        self.record(format!("export:{document_id}:{}", format.extension()));
        Ok(self
            .exports
            .get(document_id)
            .cloned()
            .unwrap_or(ExportResponse {
                status: 404,
                body: Vec::new(),
            }))
    }
}
