//! Post-download sanity check of a CSV export.

use std::path::Path;

use frameworkgen_shared::{FrameworkError, Result, SheetSpec};

/// Result of checking a downloaded CSV against its sheet's expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// All expected headers are present and there is at least one data row.
    Passed { rows: usize },
    /// One or more expected headers are absent.
    MissingHeaders {
        missing: Vec<String>,
        found: Vec<String>,
    },
    /// Header row only, or nothing at all.
    Empty,
}

impl VerifyOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, VerifyOutcome::Passed { .. })
    }
}

/// Check the header row and data-row count of a CSV file.
///
/// Only an unreadable file is an error; shape problems come back as outcomes.
pub fn verify_csv(path: &Path, spec: &SheetSpec) -> Result<VerifyOutcome> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| FrameworkError::parse(format!("{}: {e}", path.display())))?;

    let found: Vec<String> = reader
        .headers()
        .map_err(|e| FrameworkError::parse(format!("{}: {e}", path.display())))?
        .iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();

    if found.is_empty() {
        return Ok(VerifyOutcome::Empty);
    }

    let missing: Vec<String> = spec
        .expected_headers
        .iter()
        .filter(|expected| !found.iter().any(|h| h == *expected))
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Ok(VerifyOutcome::MissingHeaders { missing, found });
    }

    let rows = reader.records().filter(|r| r.is_ok()).count();
    if rows == 0 {
        return Ok(VerifyOutcome::Empty);
    }

    Ok(VerifyOutcome::Passed { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use frameworkgen_shared::Dataset;
    use std::path::PathBuf;

    fn write_scratch(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("fwgen-verify-{}.csv", uuid::Uuid::now_v7()));
        std::fs::write(&path, content).expect("write scratch csv");
        path
    }

    #[test]
    fn fixture_passes() {
        let spec = SheetSpec::for_dataset(Dataset::Assets);
        let outcome = verify_csv(
            Path::new("../../../fixtures/csv/Control Framework - Assets.csv"),
            &spec,
        )
        .unwrap();
        assert!(outcome.is_passed(), "{outcome:?}");
    }

    #[test]
    fn reports_missing_headers() {
        let path = write_scratch("Different,Headers\nx,y\n");
        let spec = SheetSpec::for_dataset(Dataset::Governance);
        match verify_csv(&path, &spec).unwrap() {
            VerifyOutcome::MissingHeaders { missing, found } => {
                assert_eq!(missing, vec!["ID", "Expectation", "Details"]);
                assert_eq!(found, vec!["Different", "Headers"]);
            }
            other => panic!("expected MissingHeaders, got {other:?}"),
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn header_only_is_empty() {
        let path = write_scratch(" ID ,Expectation,Details\n");
        let spec = SheetSpec::for_dataset(Dataset::Governance);
        assert_eq!(verify_csv(&path, &spec).unwrap(), VerifyOutcome::Empty);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn blank_file_is_empty() {
        let path = write_scratch("");
        let spec = SheetSpec::for_dataset(Dataset::Assets);
        assert_eq!(verify_csv(&path, &spec).unwrap(), VerifyOutcome::Empty);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn counts_data_rows() {
        let path = write_scratch("Resources,Description,Notes\nUsers,People,\nRBAC,Roles,\n");
        let spec = SheetSpec::for_dataset(Dataset::Assets);
        assert_eq!(
            verify_csv(&path, &spec).unwrap(),
            VerifyOutcome::Passed { rows: 2 }
        );
        std::fs::remove_file(&path).ok();
    }
}
