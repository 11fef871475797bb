//! Lenient loading of YAML data files.

use std::path::Path;

use frameworkgen_shared::{DatasetMeta, FrameworkError, Result};
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::record::SiteRecord;

/// Records that survived validation, plus the file's meta block.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub meta: DatasetMeta,
    /// Entries that failed to deserialize or validate.
    pub skipped: usize,
}

/// Load a data file for `T`'s dataset.
///
/// Only a missing file or a document that is not a mapping is an error.
/// Bad entries are skipped with a warning; a bad meta block falls back to
/// the dataset defaults.
pub fn load_records<T: SiteRecord>(path: &Path) -> Result<Loaded<T>> {
    let dataset = T::DATASET;
    if !path.is_file() {
        return Err(FrameworkError::missing_input(
            path,
            format!("run `frameworkgen convert {dataset}` first"),
        ));
    }

    let content = std::fs::read_to_string(path).map_err(|e| FrameworkError::io(path, e))?;
    let doc: Value = serde_yaml::from_str(&content)
        .map_err(|e| FrameworkError::parse(format!("{}: {e}", path.display())))?;
    let Value::Mapping(mut doc) = doc else {
        return Err(FrameworkError::parse(format!(
            "{}: expected a mapping at the top level",
            path.display()
        )));
    };

    let entries = match doc.remove(dataset.records_key()) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(seq)) => seq,
        Some(_) => {
            return Err(FrameworkError::parse(format!(
                "{}: '{}' must be a list",
                path.display(),
                dataset.records_key()
            )));
        }
    };

    let total = entries.len();
    let mut records = Vec::with_capacity(total);
    for (idx, entry) in entries.into_iter().enumerate() {
        let record: T = match serde_yaml::from_value(entry) {
            Ok(record) => record,
            Err(e) => {
                warn!(%dataset, index = idx, error = %e, "skipping invalid record");
                continue;
            }
        };
        if let Err(e) = record.validate() {
            warn!(%dataset, index = idx, error = %e, "skipping invalid record");
            continue;
        }
        records.push(record);
    }

    let meta = match doc.remove("meta").map(serde_yaml::from_value::<DatasetMeta>) {
        Some(Ok(meta)) => meta,
        Some(Err(e)) => {
            warn!(%dataset, error = %e, "invalid meta block, using defaults");
            DatasetMeta::defaults(dataset, records.len())
        }
        None => {
            warn!(%dataset, "missing meta block, using defaults");
            DatasetMeta::defaults(dataset, records.len())
        }
    };

    debug!(%dataset, loaded = records.len(), total, "data file loaded");
    Ok(Loaded {
        skipped: total - records.len(),
        records,
        meta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use frameworkgen_shared::{Asset, Control, GovernanceItem};
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/yaml")
            .join(name)
    }

    fn scratch(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("fwgen-load-{}.yml", uuid::Uuid::now_v7()));
        std::fs::write(&path, content).expect("write scratch yaml");
        path
    }

    #[test]
    fn invalid_assets_are_skipped() {
        let loaded = load_records::<Asset>(&fixture("assets.yml")).unwrap();
        assert_eq!(loaded.records.len(), 6);
        assert_eq!(loaded.skipped, 2);
        assert_eq!(loaded.meta.count, 6);

        let policies = loaded.records.iter().find(|a| a.name == "Policies").unwrap();
        assert_eq!(policies.description, "42");
    }

    #[test]
    fn controls_coerce_scalars() {
        let loaded = load_records::<Control>(&fixture("controls.yml")).unwrap();
        assert_eq!(loaded.records.len(), 6);
        let backup = loaded
            .records
            .iter()
            .find(|c| c.id == "C.Backup.DailySnapshots")
            .unwrap();
        assert_eq!(backup.tested_on_asset_inventory, "true");
        assert_eq!(backup.slug, "");
    }

    #[test]
    fn invalid_meta_falls_back_to_defaults() {
        let loaded = load_records::<GovernanceItem>(&fixture("governance.yml")).unwrap();
        assert_eq!(loaded.records.len(), 5);
        assert_eq!(loaded.meta.count, 5);
        assert_eq!(loaded.meta.title, "Secure Product Model Governance");
    }

    #[test]
    fn missing_records_key_is_empty() {
        let path = scratch("meta:\n  title: t\n");
        let loaded = load_records::<Control>(&path).unwrap();
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.meta.count, 0);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn non_mapping_document_is_an_error() {
        let path = scratch("- just\n- a list\n");
        let err = load_records::<Asset>(&path).unwrap_err();
        assert!(matches!(err, FrameworkError::Parse { .. }));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_names_convert_command() {
        let err = load_records::<Asset>(Path::new("/nonexistent/assets.yml")).unwrap_err();
        assert!(err.to_string().contains("frameworkgen convert assets"));
    }
}
