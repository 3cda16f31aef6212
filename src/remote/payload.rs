//! Response decoding layer.
//!
//! Quip payloads are loosely shaped: keys come and go between API versions
//! and error responses reuse the same endpoints. Every field is decoded as an
//! `Option`, then mapped into the [`crate::model`] entities. Error payloads and
//! undecodable bodies fail closed as [`ClientError`] so the caller skips the
//! node instead of crashing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use super::error::ClientError;
use crate::model::{AttachmentRef, ChildRef, DocumentNode, FolderNode};

/// Reads any JSON value and keeps it only when it has the expected shape.
///
/// A wrongly typed field becomes `None` instead of failing the whole payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

#[derive(Debug, Default, Deserialize)]
struct ErrorFields {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    error_description: Option<String>,
}

impl ErrorFields {
    /// Returns the API error text if the payload signals an error.
    fn message(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        let base = match error {
            Value::Null => return None,
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        Some(match self.error_description.as_deref() {
            Some(description) if !description.is_empty() => format!("{base}: {description}"),
            _ => base,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct FolderPayload {
    #[serde(flatten)]
    errors: ErrorFields,
    #[serde(default, deserialize_with = "lenient")]
    folder: Option<FolderInfo>,
    #[serde(default, deserialize_with = "lenient")]
    children: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct FolderInfo {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChildPayload {
    #[serde(default, deserialize_with = "lenient")]
    thread_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    folder_id: Option<String>,
}

impl ChildPayload {
    fn classify(self) -> Option<ChildRef> {
        match (self.thread_id, self.folder_id) {
            (Some(id), _) => Some(ChildRef::Document { id }),
            (None, Some(id)) => Some(ChildRef::Folder { id }),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ThreadPayload {
    #[serde(flatten)]
    errors: ErrorFields,
    #[serde(default, deserialize_with = "lenient")]
    thread: Option<ThreadInfo>,
    #[serde(default, deserialize_with = "lenient")]
    html: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    blobs: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct ThreadInfo {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BlobPayload {
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
}

/// Extracts the API error message from a raw body, if it is an error payload.
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorFields>(body)
        .ok()
        .and_then(|fields| fields.message())
}

/// Decodes a folder response into a [`FolderNode`].
///
/// `requested_id` is used when the payload omits the folder id.
///
/// # Errors
///
/// Returns [`ClientError::Api`] for error payloads and [`ClientError::Decode`]
/// when the body is not a folder-shaped JSON object.
pub(crate) fn decode_folder(
    requested_id: &str,
    url: &str,
    body: &[u8],
) -> Result<FolderNode, ClientError> {
    let payload: FolderPayload =
        serde_json::from_slice(body).map_err(|e| ClientError::decode(url, e))?;
    if let Some(message) = payload.errors.message() {
        return Err(ClientError::api(requested_id, message));
    }

    let info = payload.folder.unwrap_or_default();
    let raw_children = payload.children.unwrap_or_default();
    let total = raw_children.len();
    let children: Vec<ChildRef> = raw_children
        .into_iter()
        .filter_map(|entry| {
            serde_json::from_value::<ChildPayload>(entry)
                .ok()
                .and_then(ChildPayload::classify)
        })
        .collect();
    let unrecognized_children = total - children.len();
    if unrecognized_children > 0 {
        debug!(
            folder_id = requested_id,
            unrecognized_children, "folder lists children of unknown type"
        );
    }

    Ok(FolderNode {
        id: info.id.unwrap_or_else(|| requested_id.to_string()),
        title: info.title,
        children,
        unrecognized_children,
    })
}

/// Decodes a thread response into a [`DocumentNode`].
///
/// # Errors
///
/// Returns [`ClientError::Api`] for error payloads and [`ClientError::Decode`]
/// when the body is not a thread-shaped JSON object.
pub(crate) fn decode_document(
    requested_id: &str,
    url: &str,
    body: &[u8],
) -> Result<DocumentNode, ClientError> {
    let payload: ThreadPayload =
        serde_json::from_slice(body).map_err(|e| ClientError::decode(url, e))?;
    if let Some(message) = payload.errors.message() {
        return Err(ClientError::api(requested_id, message));
    }

    let info = payload.thread.unwrap_or_default();
    let attachments = payload
        .blobs
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            // A malformed entry stays in the list without a URL and counts as failed.
            let blob = serde_json::from_value::<BlobPayload>(entry).unwrap_or_default();
            AttachmentRef {
                url: blob.url,
                name: blob.name,
            }
        })
        .collect();

    Ok(DocumentNode {
        id: info.id.unwrap_or_else(|| requested_id.to_string()),
        title: info.title,
        html: payload.html.filter(|html| !html.is_empty()),
        attachments,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const URL: &str = "https://platform.quip.com/1/folders/F1";

    #[test]
    fn test_decode_folder_classifies_children_in_order() {
        let body = br#"{
            "folder": {"id": "F1", "title": "Team"},
            "children": [
                {"thread_id": "T1"},
                {"folder_id": "F2"},
                {"restricted": true},
                {"thread_id": "T2"}
            ]
        }"#;
        let folder = decode_folder("F1", URL, body).unwrap();
        assert_eq!(folder.title.as_deref(), Some("Team"));
        assert_eq!(
            folder.children,
            vec![
                ChildRef::Document { id: "T1".into() },
                ChildRef::Folder { id: "F2".into() },
                ChildRef::Document { id: "T2".into() },
            ]
        );
        assert_eq!(folder.unrecognized_children, 1);
    }

    #[test]
    fn test_decode_folder_missing_keys_tolerated() {
        let folder = decode_folder("F9", URL, b"{}").unwrap();
        assert_eq!(folder.id, "F9");
        assert!(folder.title.is_none());
        assert!(folder.children.is_empty());
    }

    #[test]
    fn test_decode_folder_error_payload_is_api_error() {
        let body = br#"{"error_code": 404, "error": "Not Found", "error_description": "No folder"}"#;
        let err = decode_folder("F1", URL, body).unwrap_err();
        match err {
            ClientError::Api { id, message } => {
                assert_eq!(id, "F1");
                assert_eq!(message, "Not Found: No folder");
            }
            other => panic!("Expected Api error, got: {other:?}"),
        }
    }

    #[test]
    fn test_decode_folder_null_error_is_not_an_error() {
        let body = br#"{"error": null, "folder": {"title": "Ok"}}"#;
        let folder = decode_folder("F1", URL, body).unwrap();
        assert_eq!(folder.title.as_deref(), Some("Ok"));
    }

    #[test]
    fn test_decode_folder_non_json_fails_closed() {
        let err = decode_folder("F1", URL, b"<html>gateway</html>").unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[test]
    fn test_decode_document_reads_title_html_and_blobs() {
        let body = br#"{
            "thread": {"id": "T1", "title": "Plan: Q3"},
            "html": "<h1>Plan</h1>",
            "blobs": [{"url": "https://x/b1", "name": "a.png"}, {"name": "orphan.bin"}]
        }"#;
        let doc = decode_document("T1", URL, body).unwrap();
        assert_eq!(doc.title.as_deref(), Some("Plan: Q3"));
        assert_eq!(doc.html.as_deref(), Some("<h1>Plan</h1>"));
        assert_eq!(doc.attachments.len(), 2);
        assert!(doc.attachments[1].url.is_none());
    }

    #[test]
    fn test_decode_folder_wrongly_typed_child_keeps_siblings() {
        let body = br#"{
            "folder": {"id": "F1", "title": "Team"},
            "children": [{"thread_id": "T1"}, {"folder_id": 42}, "junk", {"thread_id": "T2"}]
        }"#;
        let folder = decode_folder("F1", URL, body).unwrap();
        assert_eq!(
            folder.children,
            vec![
                ChildRef::Document { id: "T1".into() },
                ChildRef::Document { id: "T2".into() },
            ]
        );
        assert_eq!(folder.unrecognized_children, 2);
    }

    #[test]
    fn test_decode_folder_non_string_title_is_absent() {
        let folder = decode_folder("F1", URL, br#"{"folder": {"title": 2024, "id": ["x"]}}"#)
            .unwrap();
        assert!(folder.title.is_none());
        assert_eq!(folder.id, "F1");
    }

    #[test]
    fn test_decode_folder_children_not_a_list_is_empty() {
        let folder = decode_folder("F1", URL, br#"{"children": {"thread_id": "T1"}}"#).unwrap();
        assert!(folder.children.is_empty());
    }

    #[test]
    fn test_decode_document_wrongly_typed_blob_keeps_document() {
        let body = br#"{
            "thread": {"id": "T1", "title": 7},
            "html": "<p>body</p>",
            "blobs": [{"name": 7}, {"url": "https://x/b1", "name": "a.png"}, null]
        }"#;
        let doc = decode_document("T1", URL, body).unwrap();
        assert!(doc.title.is_none());
        assert_eq!(doc.html.as_deref(), Some("<p>body</p>"));
        assert_eq!(doc.attachments.len(), 3);
        assert_eq!(doc.attachments[0], AttachmentRef::default());
        assert_eq!(doc.attachments[1].url.as_deref(), Some("https://x/b1"));
        assert!(doc.attachments[2].url.is_none());
    }

    #[test]
    fn test_decode_document_empty_html_treated_as_absent() {
        let doc = decode_document("T1", URL, br#"{"thread": {}, "html": ""}"#).unwrap();
        assert!(doc.html.is_none());
        assert_eq!(doc.id, "T1");
    }

    #[test]
    fn test_error_message_from_plain_body() {
        assert_eq!(
            error_message(br#"{"error": "Unauthorized"}"#).as_deref(),
            Some("Unauthorized")
        );
        assert!(error_message(b"not json").is_none());
        assert!(error_message(br#"{"folder": {}}"#).is_none());
    }
}
