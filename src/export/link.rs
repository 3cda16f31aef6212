//! Share link resolution into an entity id and API domain.

use tracing::debug;
use url::{ParseError, Url};

use super::error::LinkError;

/// Entity id and host extracted from a share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    /// Last non-empty path segment of the link, without fragment.
    pub entity_id: String,
    /// Host component of the link (may be empty for host-less URLs).
    pub api_domain: String,
}

impl ResolvedLink {
    /// API base URL derived from the link's host, e.g. `https://platform.quip.com`.
    ///
    /// Returns `None` when the link has no host.
    #[must_use]
    pub fn api_base_url(&self) -> Option<String> {
        (!self.api_domain.is_empty()).then(|| format!("https://platform.{}", self.api_domain))
    }
}

/// Resolves a share link such as `https://quip.com/AbC123#section`.
///
/// Links pasted without a scheme (`quip.com/AbC123`) are read as `https://`.
///
/// # Errors
///
/// Returns [`LinkError::Malformed`] when the text is not a URL and
/// [`LinkError::MissingEntityId`] when its path has no non-empty segment.
///
/// # Examples
///
/// ```
/// use quip_export_core::export::resolve_link;
///
/// let link = resolve_link("https://quip.com/path/ABC123#section").unwrap();
/// assert_eq!(link.entity_id, "ABC123");
/// assert_eq!(link.api_domain, "quip.com");
/// assert!(resolve_link("https://quip.com/").is_err());
/// ```
pub fn resolve(link: &str) -> Result<ResolvedLink, LinkError> {
    let trimmed = link.trim();
    let parsed = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{trimmed}"))
            .map_err(|e| malformed(link, &e))?,
        Err(e) => return Err(malformed(link, &e)),
    };

    let entity_id = parsed
        .path_segments()
        .and_then(|segments| {
            segments
                .filter(|segment| !segment.is_empty())
                .next_back()
                .map(|segment| segment.split('#').next().unwrap_or_default().to_string())
        })
        .filter(|id| !id.is_empty())
        .ok_or_else(|| LinkError::MissingEntityId {
            link: link.to_string(),
        })?;

    let api_domain = parsed.host_str().unwrap_or_default().to_string();
    debug!(entity_id = %entity_id, api_domain = %api_domain, "resolved share link");

    Ok(ResolvedLink {
        entity_id,
        api_domain,
    })
}

fn malformed(link: &str, error: &ParseError) -> LinkError {
    LinkError::Malformed {
        link: link.to_string(),
        reason: error.to_string(),
    }
}
