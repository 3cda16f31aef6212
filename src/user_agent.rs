//! Shared User-Agent string for API and attachment HTTP clients.

/// Default User-Agent for every outbound request (identifies the tool and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("quip-export/{version} (folder-mirror)")
}
