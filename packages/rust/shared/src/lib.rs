//! Shared types, error model, and configuration for frameworkgen.
//!
//! This crate is the foundation depended on by all other frameworkgen crates.
//! It provides:
//! - [`FrameworkError`], the unified error type
//! - Domain types ([`Dataset`], [`Asset`], [`Control`], [`GovernanceItem`], [`DatasetMeta`])
//! - Configuration ([`AppConfig`], [`ProjectLayout`], config loading)
//! - Slug helpers shared by the normalize and render stages

pub mod config;
pub mod error;
mod lenient;
pub mod text;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, DEFAULT_SHEET_URL, PathsConfig, ProjectLayout, RenderConfig,
    SheetsConfig, config_dir, init_config, load_config, load_config_from, to_toml,
};
pub use error::{FrameworkError, Result};
pub use text::{category_from_identifier, identifier_segment, slug_from_identifier, slugify, title_case};
pub use types::{Asset, Control, Dataset, DatasetMeta, GovernanceItem, SheetSpec};
