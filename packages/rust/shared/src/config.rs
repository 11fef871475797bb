//! Project configuration for frameworkgen.
//!
//! Looked up in order: an explicit `--config` path, `<root>/frameworkgen.toml`,
//! `~/.frameworkgen/frameworkgen.toml`, then built-in defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FrameworkError, Result};
use crate::types::{Dataset, SheetSpec};

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "frameworkgen.toml";

/// Config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".frameworkgen";

/// Published framework spreadsheet.
pub const DEFAULT_SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/1XE1bytd649pIb6vyesIq5rNmSna4YpaywiCFVW8IrYM/edit";

// ---------------------------------------------------------------------------
// Config structs (matching frameworkgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub sheets: SheetsConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

/// `[paths]` section. Relative paths resolve against the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Where downloaded CSV exports land.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Where normalized YAML data files live.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Site content root; each dataset renders into a section below it.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// SVG icons referenced by category and section pages.
    #[serde(default = "default_icons_dir")]
    pub icons_dir: String,

    /// Optional directory of template overrides and section assets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            data_dir: default_data_dir(),
            content_dir: default_content_dir(),
            icons_dir: default_icons_dir(),
            template_dir: None,
        }
    }
}

fn default_source_dir() -> String {
    "docs".into()
}
fn default_data_dir() -> String {
    "data".into()
}
fn default_content_dir() -> String {
    "website/content".into()
}
fn default_icons_dir() -> String {
    "website/assets/icons".into()
}

/// `[sheets]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Spreadsheet URL (any URL containing `/d/<id>`).
    #[serde(default = "default_sheet_url")]
    pub url: String,

    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Per-dataset tab id overrides, keyed by dataset name.
    #[serde(default)]
    pub gids: BTreeMap<String, String>,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            url: default_sheet_url(),
            download_timeout_secs: default_download_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            gids: BTreeMap::new(),
        }
    }
}

fn default_sheet_url() -> String {
    DEFAULT_SHEET_URL.into()
}
fn default_download_timeout() -> u64 {
    30
}
fn default_probe_timeout() -> u64 {
    10
}

impl SheetsConfig {
    /// Sheet spec for a dataset with any configured gid override applied.
    pub fn sheet_spec(&self, dataset: Dataset) -> SheetSpec {
        let spec = SheetSpec::for_dataset(dataset);
        match self.gids.get(dataset.name()) {
            Some(gid) if !gid.trim().is_empty() => spec.with_gid(gid.trim()),
            _ => spec,
        }
    }
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Front matter `date`, `YYYY-MM-DD`.
    #[serde(default = "default_date")]
    pub date: String,

    #[serde(default)]
    pub draft: bool,

    /// Literal text fixes applied to rendered record text.
    #[serde(default = "default_replacements")]
    pub replacements: BTreeMap<String, String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            date: default_date(),
            draft: false,
            replacements: default_replacements(),
        }
    }
}

fn default_date() -> String {
    "2024-01-01".into()
}
fn default_replacements() -> BTreeMap<String, String> {
    [
        ("â", "'"),
        ("accouts", "accounts"),
        ("ingres/egres", "ingress/egress"),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

impl RenderConfig {
    /// Parse and validate the configured date.
    pub fn parsed_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|e| {
            FrameworkError::config(format!(
                "render.date '{}' is not a YYYY-MM-DD calendar date: {e}",
                self.date
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Project layout (runtime, resolved against the project root)
// ---------------------------------------------------------------------------

/// Absolute locations of every input and output, derived from config + root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub source_dir: PathBuf,
    pub data_dir: PathBuf,
    pub content_dir: PathBuf,
    pub icons_dir: PathBuf,
    pub template_dir: Option<PathBuf>,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>, paths: &PathsConfig) -> Self {
        let root = root.into();
        let resolve = |p: &str| {
            let p = Path::new(p);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };

        Self {
            source_dir: resolve(&paths.source_dir),
            data_dir: resolve(&paths.data_dir),
            content_dir: resolve(&paths.content_dir),
            icons_dir: resolve(&paths.icons_dir),
            template_dir: paths.template_dir.as_deref().map(resolve),
            root,
        }
    }

    /// Downloaded CSV export for a dataset.
    pub fn csv_path(&self, dataset: Dataset) -> PathBuf {
        self.source_dir.join(dataset.csv_filename())
    }

    /// Normalized YAML data file for a dataset.
    pub fn yaml_path(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(dataset.yaml_filename())
    }

    /// Rendered content section for a dataset.
    pub fn section_dir(&self, dataset: Dataset) -> PathBuf {
        self.content_dir.join(dataset.section())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.frameworkgen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| FrameworkError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Load config for a project. An explicit path must exist; otherwise the
/// project file, then the user file, then defaults.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let project = root.join(CONFIG_FILE_NAME);
    if project.is_file() {
        return load_config_from(&project);
    }

    if let Ok(dir) = config_dir() {
        let user = dir.join(CONFIG_FILE_NAME);
        if user.is_file() {
            return load_config_from(&user);
        }
    }

    tracing::debug!(root = %root.display(), "no config file found, using defaults");
    Ok(AppConfig::default())
}

/// Load and validate the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FrameworkError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        FrameworkError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.render.parsed_date()?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write a default `frameworkgen.toml` into the project root.
/// Refuses to overwrite an existing file. Returns the path written.
pub fn init_config(root: &Path) -> Result<PathBuf> {
    let path = root.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(FrameworkError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    std::fs::create_dir_all(root).map_err(|e| FrameworkError::io(root, e))?;
    let content = to_toml(&AppConfig::default())?;
    std::fs::write(&path, content).map_err(|e| FrameworkError::io(&path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(path)
}

/// Render a config as pretty TOML.
pub fn to_toml(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| FrameworkError::config(e.to_string()))
}
