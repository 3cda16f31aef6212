//! Snapshot entities of the remote folder tree.
//!
//! These types are produced by the response decoding layer in
//! [`crate::remote`] and consumed top-to-bottom by the export engine. They
//! are never mutated after decoding and never persisted between runs.

/// A remote folder with its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    /// Opaque folder id.
    pub id: String,
    /// Display title, if the payload carried one.
    pub title: Option<String>,
    /// Children in the order the remote store listed them.
    pub children: Vec<ChildRef>,
    /// Number of child entries that carried neither a document nor a folder id.
    pub unrecognized_children: usize,
}

/// Reference to a folder child, classified once at decode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildRef {
    /// A document (Quip "thread").
    Document {
        /// Document id.
        id: String,
    },
    /// A nested folder.
    Folder {
        /// Folder id.
        id: String,
    },
}

impl ChildRef {
    /// Returns the id of the referenced node.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Document { id } | Self::Folder { id } => id,
        }
    }
}

/// A remote document and its attachment references.
///
/// The primary export (DOCX) is not part of the node: it is requested from the
/// export endpoint. `html` is the fallback markup carried by the metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentNode {
    /// Opaque document id.
    pub id: String,
    /// Display title, if present.
    pub title: Option<String>,
    /// Raw HTML markup, used when the primary export is unavailable.
    pub html: Option<String>,
    /// Binary attachments referenced by the document.
    pub attachments: Vec<AttachmentRef>,
}

/// A binary blob referenced by one document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttachmentRef {
    /// Download URL.
    pub url: Option<String>,
    /// Display name used as the local filename.
    pub name: Option<String>,
}

/// Export formats supported by the remote export endpoint and the fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Word-processor export, requested from the export endpoint.
    Docx,
    /// Markup already present in the document metadata.
    Html,
}

impl ExportFormat {
    /// File extension without the leading dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Html => "html",
        }
    }

    /// Path segment used by the export endpoint.
    #[must_use]
    pub fn endpoint_segment(self) -> &'static str {
        self.extension()
    }
}
