//! Fetching framework tabs from a published spreadsheet as CSV.
//!
//! Each dataset lives in its own tab (identified by a `gid`). A tab is either
//! probed with a `HEAD` request to check that it is publicly readable, or
//! downloaded to the source directory and given a light header check.

mod export;
mod verify;

use std::path::{Path, PathBuf};
use std::time::Duration;

use frameworkgen_shared::{FrameworkError, Result, SheetSpec, SheetsConfig};
use reqwest::{Client, StatusCode, redirect};
use tracing::{debug, info, instrument, warn};

pub use export::SheetSource;
pub use verify::{VerifyOutcome, verify_csv};

/// Maximum redirects followed when downloading an export.
const MAX_REDIRECTS: usize = 5;

/// User-Agent string for spreadsheet requests.
const USER_AGENT: &str = concat!("frameworkgen/", env!("CARGO_PKG_VERSION"));

/// How to make a private sheet readable by the export endpoint.
pub const SHARING_HINT: &str = "open the sheet, click Share, choose \
    'Anyone with the link', set the role to Viewer, then try again";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Request timeouts for probe and download.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub download_timeout_secs: u64,
    pub probe_timeout_secs: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&SheetsConfig::default())
    }
}

impl From<&SheetsConfig> for FetchOptions {
    fn from(config: &SheetsConfig) -> Self {
        Self {
            download_timeout_secs: config.download_timeout_secs,
            probe_timeout_secs: config.probe_timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Probe
// ---------------------------------------------------------------------------

/// What a `HEAD` against a tab's export URL says about its visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// `200`, or a redirect straight to the file download.
    Accessible { status: u16 },
    /// A redirect to the sign-in page; the sheet is private.
    AuthRequired { location: String },
    /// Anything else.
    Unexpected { status: u16 },
}

impl ProbeOutcome {
    pub fn is_accessible(&self) -> bool {
        matches!(self, ProbeOutcome::Accessible { .. })
    }
}

/// Check whether a tab is publicly exportable without downloading it.
#[instrument(skip_all, fields(sheet = %spec.title, gid = %spec.gid))]
pub async fn probe(source: &SheetSource, spec: &SheetSpec, opts: &FetchOptions) -> Result<ProbeOutcome> {
    let url = source.export_url(&spec.gid);
    let client = build_client(opts.probe_timeout_secs, redirect::Policy::none())?;

    debug!(%url, "probing export URL");
    let response = client
        .head(&url)
        .send()
        .await
        .map_err(|e| FrameworkError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    let outcome = match status {
        StatusCode::OK => ProbeOutcome::Accessible { status: status.as_u16() },
        StatusCode::FOUND | StatusCode::TEMPORARY_REDIRECT => {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            if is_login_redirect(&location) {
                ProbeOutcome::AuthRequired { location }
            } else {
                ProbeOutcome::Accessible { status: status.as_u16() }
            }
        }
        other => ProbeOutcome::Unexpected { status: other.as_u16() },
    };

    info!(?outcome, "probe finished");
    Ok(outcome)
}

fn is_login_redirect(location: &str) -> bool {
    location.contains("ServiceLogin") || location.contains("accounts.google.com")
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// Download a tab's CSV export into `dir`, overwriting any previous copy.
///
/// Returns the written path. Auth failures (`401`/`403`, or an HTML page in
/// place of CSV) come back as [`FrameworkError::AccessDenied`].
#[instrument(skip_all, fields(sheet = %spec.title, gid = %spec.gid))]
pub async fn download(
    source: &SheetSource,
    spec: &SheetSpec,
    dir: &Path,
    opts: &FetchOptions,
) -> Result<PathBuf> {
    let url = source.export_url(&spec.gid);
    let client = build_client(
        opts.download_timeout_secs,
        redirect::Policy::limited(MAX_REDIRECTS),
    )?;

    info!(%url, "downloading sheet");
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| FrameworkError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(FrameworkError::access_denied(
            &spec.title,
            format!("HTTP {status}; {SHARING_HINT}"),
        ));
    }
    if !status.is_success() {
        return Err(FrameworkError::Network(format!("{url}: HTTP {status}")));
    }

    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("text/html"));
    if is_html {
        return Err(FrameworkError::access_denied(
            &spec.title,
            format!("received HTML instead of CSV; {SHARING_HINT}"),
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FrameworkError::Network(format!("{url}: {e}")))?;

    std::fs::create_dir_all(dir).map_err(|e| FrameworkError::io(dir, e))?;
    let path = dir.join(&spec.filename);
    if path.exists() {
        warn!(path = %path.display(), "overwriting existing export");
    }
    std::fs::write(&path, body.as_bytes()).map_err(|e| FrameworkError::io(&path, e))?;

    info!(path = %path.display(), bytes = body.len(), "sheet downloaded");
    Ok(path)
}

/// Build a reqwest client with the given timeout and redirect policy.
fn build_client(timeout_secs: u64, policy: redirect::Policy) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(policy)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| FrameworkError::Network(format!("failed to build HTTP client: {e}")))
}
