//! Pipeline orchestration for frameworkgen.
//!
//! Ties the fetch, normalize, and render stages to the project layout and
//! writes rendered sections to disk (`sync`, `probe`, `convert`, `render`,
//! `check`).

pub mod assembler;
pub mod pipeline;

pub use assembler::{Drift, DriftReport, diff_section, write_section};
pub use frameworkgen_normalize::ConvertSummary;
pub use frameworkgen_render::RenderContext;
pub use frameworkgen_sheets::{ProbeOutcome, VerifyOutcome};
pub use pipeline::{
    Downloaded, ProgressReporter, RenderSummary, SheetReport, SilentProgress, Step, check_dataset,
    convert_dataset, failures, probe_sheets, render_dataset, sync_sheets,
};
