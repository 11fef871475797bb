//! Stage entry points: `sync`/`probe` → `convert` → `render`/`check`.
//!
//! Stages only talk to each other through files on disk, so each entry point
//! can be run on its own.

use std::path::PathBuf;

use frameworkgen_normalize::ConvertSummary;
use frameworkgen_render::RenderContext;
use frameworkgen_sheets::{FetchOptions, ProbeOutcome, SheetSource, VerifyOutcome};
use frameworkgen_shared::{Dataset, ProjectLayout, Result, SheetsConfig};
use tracing::{error, info, instrument, warn};

use crate::assembler::{self, DriftReport};

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a dataset is processed.
    fn dataset_started(&self, dataset: Dataset, current: usize, total: usize);
    /// Called after a dataset is processed, successfully or not.
    fn dataset_finished(&self, dataset: Dataset);
}

/// Where a dataset falls in a multi-dataset run, for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub current: usize,
    pub total: usize,
}

impl Step {
    /// Step `index` (zero-based) of `total`.
    pub fn of(index: usize, total: usize) -> Self {
        Self {
            current: index + 1,
            total,
        }
    }
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn dataset_started(&self, _dataset: Dataset, _current: usize, _total: usize) {}
    fn dataset_finished(&self, _dataset: Dataset) {}
}

// ---------------------------------------------------------------------------
// Sync / probe
// ---------------------------------------------------------------------------

/// Per-sheet outcome. One sheet failing does not stop the others.
#[derive(Debug)]
pub struct SheetReport<T> {
    pub dataset: Dataset,
    pub outcome: Result<T>,
}

/// A downloaded export and what the header check found.
#[derive(Debug, Clone)]
pub struct Downloaded {
    pub path: PathBuf,
    /// `None` when the file could not be read back for checking.
    pub verify: Option<VerifyOutcome>,
}

/// Number of sheets whose outcome is an error.
pub fn failures<T>(reports: &[SheetReport<T>]) -> usize {
    reports.iter().filter(|r| r.outcome.is_err()).count()
}

/// Download each dataset's tab into the source directory.
///
/// Only an unparseable sheet URL fails the whole call; network and access
/// errors are recorded per sheet and the remaining sheets still run.
#[instrument(skip_all, fields(sheets = datasets.len()))]
pub async fn sync_sheets(
    layout: &ProjectLayout,
    config: &SheetsConfig,
    url: Option<&str>,
    datasets: &[Dataset],
    progress: &dyn ProgressReporter,
) -> Result<Vec<SheetReport<Downloaded>>> {
    let source = SheetSource::parse(url.unwrap_or(&config.url))?;
    let opts = FetchOptions::from(config);

    progress.phase("Downloading sheets");
    let mut reports = Vec::with_capacity(datasets.len());
    for (i, &dataset) in datasets.iter().enumerate() {
        progress.dataset_started(dataset, i + 1, datasets.len());
        let spec = config.sheet_spec(dataset);

        let outcome = frameworkgen_sheets::download(&source, &spec, &layout.source_dir, &opts)
            .await
            .map(|path| {
                let verify = match frameworkgen_sheets::verify_csv(&path, &spec) {
                    Ok(outcome) => {
                        if !outcome.is_passed() {
                            warn!(%dataset, ?outcome, "downloaded CSV failed verification");
                        }
                        Some(outcome)
                    }
                    Err(e) => {
                        warn!(%dataset, error = %e, "could not verify downloaded CSV");
                        None
                    }
                };
                Downloaded { path, verify }
            });
        if let Err(e) = &outcome {
            error!(%dataset, error = %e, "sheet sync failed");
        }

        progress.dataset_finished(dataset);
        reports.push(SheetReport { dataset, outcome });
    }

    info!(
        total = reports.len(),
        failed = failures(&reports),
        "sync complete"
    );
    Ok(reports)
}

/// Check each dataset's tab for public access without downloading.
#[instrument(skip_all, fields(sheets = datasets.len()))]
pub async fn probe_sheets(
    config: &SheetsConfig,
    url: Option<&str>,
    datasets: &[Dataset],
    progress: &dyn ProgressReporter,
) -> Result<Vec<SheetReport<ProbeOutcome>>> {
    let source = SheetSource::parse(url.unwrap_or(&config.url))?;
    let opts = FetchOptions::from(config);

    progress.phase("Probing sheets");
    let mut reports = Vec::with_capacity(datasets.len());
    for (i, &dataset) in datasets.iter().enumerate() {
        progress.dataset_started(dataset, i + 1, datasets.len());
        let spec = config.sheet_spec(dataset);
        let outcome = frameworkgen_sheets::probe(&source, &spec, &opts).await;
        if let Err(e) = &outcome {
            error!(%dataset, error = %e, "sheet probe failed");
        }
        progress.dataset_finished(dataset);
        reports.push(SheetReport { dataset, outcome });
    }
    Ok(reports)
}

// ---------------------------------------------------------------------------
// Convert
// ---------------------------------------------------------------------------

/// CSV export → YAML data file for one dataset.
pub fn convert_dataset(
    layout: &ProjectLayout,
    dataset: Dataset,
    step: Step,
    progress: &dyn ProgressReporter,
) -> Result<ConvertSummary> {
    progress.phase(&format!("Converting {dataset}"));
    progress.dataset_started(dataset, step.current, step.total);
    let summary = frameworkgen_normalize::convert_csv(
        dataset,
        &layout.csv_path(dataset),
        &layout.yaml_path(dataset),
    );
    progress.dataset_finished(dataset);
    summary
}

// ---------------------------------------------------------------------------
// Render / check
// ---------------------------------------------------------------------------

/// What a render pass wrote for one dataset.
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub dataset: Dataset,
    pub categories: usize,
    pub items: usize,
    pub skipped: usize,
    pub pages: usize,
    pub output: PathBuf,
}

/// YAML data file → pages, replacing the dataset's section directory.
///
/// Every page is rendered in memory before anything on disk is touched.
#[instrument(skip_all, fields(dataset = %dataset))]
pub fn render_dataset(
    layout: &ProjectLayout,
    ctx: &RenderContext,
    dataset: Dataset,
    step: Step,
    progress: &dyn ProgressReporter,
) -> Result<RenderSummary> {
    progress.phase(&format!("Rendering {dataset}"));
    progress.dataset_started(dataset, step.current, step.total);
    let output = layout.section_dir(dataset);
    let written = frameworkgen_render::render_dataset(dataset, &layout.yaml_path(dataset), ctx)
        .and_then(|section| Ok((assembler::write_section(&output, &section)?, section)));
    progress.dataset_finished(dataset);

    let (pages, section) = written?;
    Ok(RenderSummary {
        dataset,
        categories: section.categories.len(),
        items: section.items,
        skipped: section.skipped,
        pages,
        output,
    })
}

/// Render in memory and compare with the section directory on disk.
#[instrument(skip_all, fields(dataset = %dataset))]
pub fn check_dataset(
    layout: &ProjectLayout,
    ctx: &RenderContext,
    dataset: Dataset,
    step: Step,
    progress: &dyn ProgressReporter,
) -> Result<DriftReport> {
    progress.phase(&format!("Checking {dataset}"));
    progress.dataset_started(dataset, step.current, step.total);
    let report = frameworkgen_render::render_dataset(dataset, &layout.yaml_path(dataset), ctx)
        .and_then(|section| assembler::diff_section(&layout.section_dir(dataset), &section));
    progress.dataset_finished(dataset);

    let report = report?;
    if !report.is_clean() {
        warn!(%dataset, drift = report.drift.len(), "rendered pages differ from disk");
    }
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
