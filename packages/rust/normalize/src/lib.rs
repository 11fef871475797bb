//! CSV → YAML normalization for framework datasets.
//!
//! Reads a spreadsheet export, cleans every cell, derives slugs, and writes a
//! YAML data file of the shape `{ <dataset>: [...], meta: {...} }`.

mod rows;
pub mod text;

use std::fs::File;
use std::path::{Path, PathBuf};

use frameworkgen_shared::{Dataset, DatasetMeta, FrameworkError, Result};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info, instrument};

pub use rows::{RowsRead, read_assets, read_controls, read_governance};
pub use text::{clean_text, parse_notes, split_tags};

/// Value of `meta.generated_by` in files written here.
pub const GENERATED_BY: &str = "frameworkgen convert";

/// Outcome of converting one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub dataset: Dataset,
    pub records: usize,
    pub skipped_empty: usize,
    pub skipped_invalid: usize,
    pub output: PathBuf,
}

/// Convert one dataset's CSV export into its YAML data file.
#[instrument(skip_all, fields(dataset = %dataset))]
pub fn convert_csv(dataset: Dataset, csv_path: &Path, yaml_path: &Path) -> Result<ConvertSummary> {
    if !csv_path.is_file() {
        return Err(FrameworkError::missing_input(
            csv_path,
            format!("run `frameworkgen sync {dataset}` first"),
        ));
    }
    let input = File::open(csv_path).map_err(|e| FrameworkError::io(csv_path, e))?;
    let source = csv_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dataset.csv_filename());

    let (yaml, counts) = match dataset {
        Dataset::Assets => encode(dataset, read_assets(input)?, &source)?,
        Dataset::Controls => encode(dataset, read_controls(input)?, &source)?,
        Dataset::Governance => encode(dataset, read_governance(input)?, &source)?,
    };
    let (records, skipped_empty, skipped_invalid) = counts;

    if let Some(parent) = yaml_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| FrameworkError::io(parent, e))?;
    }
    std::fs::write(yaml_path, yaml).map_err(|e| FrameworkError::io(yaml_path, e))?;
    debug!(path = %yaml_path.display(), "wrote data file");

    info!(records, skipped_empty, skipped_invalid, "dataset converted");

    Ok(ConvertSummary {
        dataset,
        records,
        skipped_empty,
        skipped_invalid,
        output: yaml_path.to_path_buf(),
    })
}

fn encode<T: Serialize>(
    dataset: Dataset,
    read: RowsRead<T>,
    source: &str,
) -> Result<(String, (usize, usize, usize))> {
    let yaml = to_document(dataset, &read.records, source)?;
    Ok((yaml, (read.records.len(), read.skipped_empty, read.skipped_invalid)))
}

/// Serialize records plus their `meta` block, records first.
pub fn to_document<T: Serialize>(dataset: Dataset, records: &[T], source: &str) -> Result<String> {
    let meta = DatasetMeta {
        source: source.to_string(),
        generated_by: GENERATED_BY.to_string(),
        ..DatasetMeta::defaults(dataset, records.len())
    };

    let mut doc = Mapping::new();
    doc.insert(
        Value::from(dataset.records_key()),
        serde_yaml::to_value(records).map_err(|e| FrameworkError::parse(e.to_string()))?,
    );
    doc.insert(
        Value::from("meta"),
        serde_yaml::to_value(&meta).map_err(|e| FrameworkError::parse(e.to_string()))?,
    );

    serde_yaml::to_string(&doc).map_err(|e| FrameworkError::parse(e.to_string()))
}
