//! Spreadsheet URL parsing and CSV export URL construction.

use frameworkgen_shared::{FrameworkError, Result};
use url::Url;

/// A published spreadsheet, identified by its document id and origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSource {
    /// Document id, the path segment after `/d/`.
    pub id: String,
    origin: String,
}

impl SheetSource {
    /// Parse any spreadsheet URL containing `/d/<id>` (edit, view, or export links).
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim())
            .map_err(|e| FrameworkError::validation(format!("invalid spreadsheet URL '{raw}': {e}")))?;

        let id = url
            .path_segments()
            .and_then(|mut segments| {
                segments.by_ref().find(|s| *s == "d")?;
                segments.next()
            })
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                FrameworkError::validation(format!(
                    "could not find a spreadsheet id (/d/<id>) in '{raw}'"
                ))
            })?;

        Ok(Self {
            id: id.to_string(),
            origin: origin_url(&url)?,
        })
    }

    /// CSV export URL for one tab.
    pub fn export_url(&self, gid: &str) -> String {
        format!(
            "{}/spreadsheets/d/{}/export?format=csv&gid={gid}",
            self.origin, self.id
        )
    }
}

/// Scheme + host + port of a URL.
fn origin_url(url: &Url) -> Result<String> {
    let scheme = url.scheme();
    let host = url
        .host_str()
        .ok_or_else(|| FrameworkError::validation(format!("URL has no host: {url}")))?;

    match url.port() {
        Some(port) => Ok(format!("{scheme}://{host}:{port}")),
        None => Ok(format!("{scheme}://{host}")),
    }
}
