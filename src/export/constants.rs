//! Constants for the export engine (placeholders, pacing, defaults).

use std::time::Duration;

/// Default minimum spacing between paced child dispatches (half a second).
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(500);

/// Directory name used when a folder has no usable title.
pub const UNKNOWN_FOLDER: &str = "Unknown_Folder";

/// File stem used when a document has no usable title.
pub const UNKNOWN_DOCUMENT: &str = "Unknown_Document";

/// File name used when an attachment has no usable name.
pub const UNKNOWN_ATTACHMENT: &str = "Unknown_Attachment";

/// Suffix appended to a document's title for its attachments directory.
pub const ATTACHMENTS_DIR_SUFFIX: &str = "_attachments";

/// Default output directory when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "./quip_export";

/// API base URL used when neither a flag nor the share link supplies one.
pub const DEFAULT_API_URL: &str = "https://platform.quip-amazon.com";
