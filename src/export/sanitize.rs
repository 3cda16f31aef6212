//! Title sanitization for local path components.

use std::path::{Component, Path};

/// Characters that are invalid in file names on common filesystems.
pub const RESERVED_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Removes every reserved filesystem character from `title`.
///
/// The result is not trimmed, not deduplicated and may be empty (a title made
/// only of reserved characters). Use [`path_component`] where the result
/// becomes part of a path.
///
/// # Examples
///
/// ```
/// use quip_export_core::export::sanitize;
///
/// assert_eq!(sanitize("Q3: Plan / Draft?"), "Q3 Plan  Draft");
/// assert_eq!(sanitize("Notes"), "Notes");
/// assert_eq!(sanitize("<>"), "");
/// ```
#[must_use]
pub fn sanitize(title: &str) -> String {
    title
        .chars()
        .filter(|c| !RESERVED_CHARS.contains(c))
        .collect()
}

/// Turns an optional title into a usable path component.
///
/// Falls back to `placeholder` when the title is absent, sanitizes to an empty
/// string, or sanitizes to `.`/`..` (which would merge into or escape the
/// parent directory).
#[must_use]
pub fn path_component(title: Option<&str>, placeholder: &str) -> String {
    let sanitized = title.map(sanitize).unwrap_or_default();
    if is_usable_component(&sanitized) {
        sanitized
    } else {
        placeholder.to_string()
    }
}

fn is_usable_component(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}
