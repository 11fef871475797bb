//! Section writer.
//!
//! Takes a rendered section and either replaces its directory on disk or
//! compares it against what is already there.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use frameworkgen_render::RenderedSection;
use frameworkgen_shared::{Dataset, FrameworkError, Result};
use tracing::{debug, info, instrument};

/// Replace `dir` wholesale with the section's pages.
///
/// The old directory is removed first, so pages for records that no longer
/// exist do not linger. A failure partway through leaves whatever was
/// written so far.
#[instrument(skip_all, fields(dataset = %section.dataset, path = %dir.display()))]
pub fn write_section(dir: &Path, section: &RenderedSection) -> Result<usize> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| FrameworkError::io(dir, e))?;
        debug!("removed previous section directory");
    }
    std::fs::create_dir_all(dir).map_err(|e| FrameworkError::io(dir, e))?;

    for page in &section.pages {
        let file_path = dir.join(&page.path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FrameworkError::io(parent, e))?;
        }
        std::fs::write(&file_path, &page.content)
            .map_err(|e| FrameworkError::io(&file_path, e))?;
        debug!(path = %file_path.display(), "wrote page");
    }

    info!(pages = section.pages.len(), "section written");
    Ok(section.pages.len())
}

// ---------------------------------------------------------------------------
// Drift check
// ---------------------------------------------------------------------------

/// One way the directory on disk differs from a fresh render.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Drift {
    /// Rendered, but absent on disk.
    Missing(PathBuf),
    /// Present on disk with different bytes.
    Changed(PathBuf),
    /// On disk, but no longer rendered.
    Stale(PathBuf),
}

impl std::fmt::Display for Drift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Drift::Missing(p) => write!(f, "missing  {}", p.display()),
            Drift::Changed(p) => write!(f, "changed  {}", p.display()),
            Drift::Stale(p) => write!(f, "stale    {}", p.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DriftReport {
    pub dataset: Dataset,
    pub pages: usize,
    pub drift: Vec<Drift>,
}

impl DriftReport {
    pub fn is_clean(&self) -> bool {
        self.drift.is_empty()
    }
}

/// Compare a rendered section with the files under `dir`. Nothing is written.
#[instrument(skip_all, fields(dataset = %section.dataset, path = %dir.display()))]
pub fn diff_section(dir: &Path, section: &RenderedSection) -> Result<DriftReport> {
    let mut drift = Vec::new();
    let mut expected = BTreeSet::new();

    for page in &section.pages {
        expected.insert(page.path.clone());
        let file_path = dir.join(&page.path);
        if !file_path.is_file() {
            drift.push(Drift::Missing(page.path.clone()));
            continue;
        }
        let on_disk =
            std::fs::read(&file_path).map_err(|e| FrameworkError::io(&file_path, e))?;
        if on_disk != page.content.as_bytes() {
            drift.push(Drift::Changed(page.path.clone()));
        }
    }

    if dir.is_dir() {
        let mut on_disk = Vec::new();
        collect_files(dir, Path::new(""), &mut on_disk)?;
        drift.extend(
            on_disk
                .into_iter()
                .filter(|p| !expected.contains(p))
                .map(Drift::Stale),
        );
    }

    drift.sort();
    debug!(drift = drift.len(), "section compared");
    Ok(DriftReport {
        dataset: section.dataset,
        pages: section.pages.len(),
        drift,
    })
}

/// Every file below `root`, as paths relative to it.
fn collect_files(root: &Path, rel: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let dir = root.join(rel);
    let entries = std::fs::read_dir(&dir).map_err(|e| FrameworkError::io(&dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| FrameworkError::io(&dir, e))?;
        let child = rel.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| FrameworkError::io(entry.path(), e))?;
        if file_type.is_dir() {
            collect_files(root, &child, out)?;
        } else {
            out.push(child);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use frameworkgen_render::RenderedPage;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fwgen-assembler-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_section() -> RenderedSection {
        let page = |path: &str, content: &str| RenderedPage {
            path: PathBuf::from(path),
            content: content.to_string(),
        };
        RenderedSection {
            dataset: Dataset::Controls,
            pages: vec![
                page("_index.md", "---\ntitle: \"Controls\"\n---\n\n# Controls\n"),
                page("account/_index.md", "---\ntitle: \"Account\"\n---\n\n# Account\n"),
                page("account/mfa.md", "---\ntitle: \"MFA\"\n---\n\n# MFA\n"),
            ],
            categories: Vec::new(),
            items: 1,
            skipped: 0,
        }
    }

    #[test]
    fn write_section_creates_pages() {
        let tmp = temp_dir();
        let dir = tmp.join("controls");

        let written = write_section(&dir, &make_section()).unwrap();

        assert_eq!(written, 3);
        assert!(dir.join("_index.md").exists());
        let content = std::fs::read_to_string(dir.join("account/mfa.md")).unwrap();
        assert!(content.contains("# MFA"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_section_removes_old_pages() {
        let tmp = temp_dir();
        let dir = tmp.join("controls");
        std::fs::create_dir_all(dir.join("retired")).unwrap();
        std::fs::write(dir.join("retired/old.md"), "old").unwrap();

        write_section(&dir, &make_section()).unwrap();

        assert!(!dir.join("retired").exists());
        assert!(dir.join("account/_index.md").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn diff_is_clean_after_write() {
        let tmp = temp_dir();
        let dir = tmp.join("controls");
        let section = make_section();

        write_section(&dir, &section).unwrap();
        let report = diff_section(&dir, &section).unwrap();

        assert!(report.is_clean(), "{:?}", report.drift);
        assert_eq!(report.pages, 3);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn diff_reports_every_kind_of_drift() {
        let tmp = temp_dir();
        let dir = tmp.join("controls");
        let section = make_section();

        write_section(&dir, &section).unwrap();
        std::fs::remove_file(dir.join("_index.md")).unwrap();
        std::fs::write(dir.join("account/mfa.md"), "edited by hand\n").unwrap();
        std::fs::write(dir.join("account/extra.md"), "left over\n").unwrap();

        let report = diff_section(&dir, &section).unwrap();
        assert_eq!(
            report.drift,
            vec![
                Drift::Missing(PathBuf::from("_index.md")),
                Drift::Changed(PathBuf::from("account/mfa.md")),
                Drift::Stale(PathBuf::from("account/extra.md")),
            ]
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn diff_of_missing_directory_lists_all_pages() {
        let tmp = temp_dir();
        let report = diff_section(&tmp.join("nothing-here"), &make_section()).unwrap();
        assert_eq!(report.drift.len(), 3);
        assert!(report.drift.iter().all(|d| matches!(d, Drift::Missing(_))));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
