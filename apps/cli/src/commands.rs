//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use frameworkgen_core::{
    ProbeOutcome, ProgressReporter, RenderContext, Step, VerifyOutcome, check_dataset,
    convert_dataset, failures, probe_sheets, render_dataset, sync_sheets,
};
use frameworkgen_shared::{AppConfig, Dataset, ProjectLayout, init_config, load_config, to_toml};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// frameworkgen: turn the control framework spreadsheet into site content.
#[derive(Parser)]
#[command(
    name = "frameworkgen",
    version,
    about = "Fetch, normalize, and render compliance framework data into Hugo content.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Project root; relative config paths resolve against it.
    #[arg(long, env = "FRAMEWORKGEN_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Config file to use instead of the usual lookup.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Download sheet tabs as CSV into the source directory.
    Sync {
        /// Dataset to fetch (assets, controls, governance). Defaults to all.
        dataset: Option<Dataset>,

        /// Only check that the tabs are publicly readable.
        #[arg(long)]
        test: bool,

        /// Spreadsheet URL overriding the configured one.
        #[arg(long)]
        url: Option<String>,
    },

    /// Convert downloaded CSV exports into YAML data files.
    Convert {
        /// Dataset to convert. Defaults to all.
        dataset: Option<Dataset>,
    },

    /// Render YAML data files into site pages.
    Render {
        /// Dataset to render. Defaults to all.
        dataset: Option<Dataset>,

        /// Compare with the pages on disk instead of writing.
        #[arg(long)]
        check: bool,
    },

    /// Convert, then render.
    Build {
        /// Dataset to build. Defaults to all.
        dataset: Option<Dataset>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default frameworkgen.toml into the project root.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "frameworkgen=info",
        1 => "frameworkgen=debug",
        _ => "frameworkgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()
            .map_err(|e| eyre!("cannot determine working directory: {e}"))?,
    };
    let explicit = cli.config.as_deref();
    let quiet = matches!(cli.log_format, LogFormat::Json);

    match cli.command {
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&root),
            ConfigAction::Show => cmd_config_show(&root, explicit),
        },
        command => {
            let config = load_config(&root, explicit)?;
            let layout = ProjectLayout::new(&root, &config.paths);
            let progress = CliProgress::new(quiet);
            let result = match command {
                Command::Sync { dataset, test, url } => {
                    let datasets = selected(dataset);
                    if test {
                        cmd_probe(&config, url.as_deref(), &datasets, &progress).await
                    } else {
                        cmd_sync(&layout, &config, url.as_deref(), &datasets, &progress).await
                    }
                }
                Command::Convert { dataset } => cmd_convert(&layout, &selected(dataset), &progress),
                Command::Render { dataset, check } => {
                    let datasets = selected(dataset);
                    if check {
                        cmd_check(&layout, &config, &datasets, &progress)
                    } else {
                        cmd_render(&layout, &config, &datasets, &progress)
                    }
                }
                Command::Build { dataset } => {
                    let datasets = selected(dataset);
                    cmd_convert(&layout, &datasets, &progress)
                        .and_then(|()| cmd_render(&layout, &config, &datasets, &progress))
                }
                Command::Config { .. } => Ok(()),
            };
            progress.finish();
            result
        }
    }
}

/// The one dataset named on the command line, or all of them.
fn selected(dataset: Option<Dataset>) -> Vec<Dataset> {
    match dataset {
        Some(dataset) => vec![dataset],
        None => Dataset::ALL.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// A hidden spinner when logs are machine-readable.
    fn new(quiet: bool) -> Self {
        if quiet {
            return Self {
                spinner: ProgressBar::hidden(),
            };
        }

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn dataset_started(&self, dataset: Dataset, current: usize, total: usize) {
        self.spinner
            .set_message(format!("[{current}/{total}] {}", dataset.title()));
    }

    fn dataset_finished(&self, dataset: Dataset) {
        self.spinner.set_message(format!("{} done", dataset.title()));
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_sync(
    layout: &ProjectLayout,
    config: &AppConfig,
    url: Option<&str>,
    datasets: &[Dataset],
    progress: &CliProgress,
) -> Result<()> {
    info!(sheets = datasets.len(), "syncing sheets");
    let reports = sync_sheets(layout, &config.sheets, url, datasets, progress).await?;
    progress.finish();

    println!();
    for report in &reports {
        match &report.outcome {
            Ok(downloaded) => {
                let check = match &downloaded.verify {
                    Some(VerifyOutcome::Passed { rows }) => format!("{rows} rows"),
                    Some(VerifyOutcome::MissingHeaders { missing, .. }) => {
                        format!("missing headers: {}", missing.join(", "))
                    }
                    Some(VerifyOutcome::Empty) => "no data rows".to_string(),
                    None => "not verified".to_string(),
                };
                println!(
                    "  ok      {:<11} {} ({check})",
                    report.dataset.name(),
                    downloaded.path.display()
                );
            }
            Err(e) => println!("  failed  {:<11} {e}", report.dataset.name()),
        }
    }
    println!();

    match failures(&reports) {
        0 => Ok(()),
        n => Err(eyre!("{n} of {} sheets failed to sync", reports.len())),
    }
}

async fn cmd_probe(
    config: &AppConfig,
    url: Option<&str>,
    datasets: &[Dataset],
    progress: &CliProgress,
) -> Result<()> {
    let reports = probe_sheets(&config.sheets, url, datasets, progress).await?;
    progress.finish();

    println!();
    let mut inaccessible = 0;
    for report in &reports {
        let name = report.dataset.name();
        match &report.outcome {
            Ok(ProbeOutcome::Accessible { status }) => {
                println!("  ok      {name:<11} accessible (HTTP {status})");
            }
            Ok(ProbeOutcome::AuthRequired { .. }) => {
                inaccessible += 1;
                println!("  denied  {name:<11} sign-in required; share the sheet publicly");
            }
            Ok(ProbeOutcome::Unexpected { status }) => {
                inaccessible += 1;
                println!("  failed  {name:<11} unexpected HTTP {status}");
            }
            Err(e) => {
                inaccessible += 1;
                println!("  failed  {name:<11} {e}");
            }
        }
    }
    println!();

    match inaccessible {
        0 => Ok(()),
        n => Err(eyre!("{n} of {} sheets are not accessible", reports.len())),
    }
}

fn cmd_convert(layout: &ProjectLayout, datasets: &[Dataset], progress: &CliProgress) -> Result<()> {
    for (i, &dataset) in datasets.iter().enumerate() {
        let summary = convert_dataset(layout, dataset, Step::of(i, datasets.len()), progress)?;
        progress.spinner.suspend(|| {
            println!(
                "  {:<11} {} records → {} (skipped: {} empty, {} invalid)",
                dataset.name(),
                summary.records,
                summary.output.display(),
                summary.skipped_empty,
                summary.skipped_invalid,
            );
        });
    }
    Ok(())
}

fn cmd_render(
    layout: &ProjectLayout,
    config: &AppConfig,
    datasets: &[Dataset],
    progress: &CliProgress,
) -> Result<()> {
    let ctx = RenderContext::new(layout, &config.render)?;
    for (i, &dataset) in datasets.iter().enumerate() {
        let summary = render_dataset(layout, &ctx, dataset, Step::of(i, datasets.len()), progress)?;
        progress.spinner.suspend(|| {
            println!(
                "  {:<11} {} pages ({} categories, {} items, {} skipped) → {}",
                dataset.name(),
                summary.pages,
                summary.categories,
                summary.items,
                summary.skipped,
                summary.output.display(),
            );
        });
    }
    Ok(())
}

fn cmd_check(
    layout: &ProjectLayout,
    config: &AppConfig,
    datasets: &[Dataset],
    progress: &CliProgress,
) -> Result<()> {
    let ctx = RenderContext::new(layout, &config.render)?;
    let mut drifted = 0;
    for (i, &dataset) in datasets.iter().enumerate() {
        let report = check_dataset(layout, &ctx, dataset, Step::of(i, datasets.len()), progress)?;
        progress.spinner.suspend(|| {
            if report.is_clean() {
                println!("  {:<11} up to date ({} pages)", dataset.name(), report.pages);
            } else {
                println!("  {:<11} {} pages differ:", dataset.name(), report.drift.len());
                for drift in &report.drift {
                    println!("      {drift}");
                }
            }
        });
        if !report.is_clean() {
            drifted += 1;
        }
    }

    match drifted {
        0 => Ok(()),
        n => Err(eyre!(
            "{n} section(s) out of date; run `frameworkgen render` to regenerate"
        )),
    }
}

fn cmd_config_init(root: &Path) -> Result<()> {
    let path = init_config(root)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path, explicit: Option<&Path>) -> Result<()> {
    let config = load_config(root, explicit)?;
    println!("{}", to_toml(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_dataset_and_flags() {
        let cli = Cli::try_parse_from(["frameworkgen", "sync", "Controls", "--test"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Sync {
                dataset: Some(Dataset::Controls),
                test: true,
                url: None
            }
        ));

        let cli = Cli::try_parse_from(["frameworkgen", "-vv", "render", "--check"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Render {
                dataset: None,
                check: true
            }
        ));
    }

    #[test]
    fn rejects_unknown_dataset() {
        assert!(Cli::try_parse_from(["frameworkgen", "convert", "widgets"]).is_err());
    }

    #[test]
    fn selected_defaults_to_all() {
        assert_eq!(selected(None), Dataset::ALL.to_vec());
        assert_eq!(selected(Some(Dataset::Assets)), vec![Dataset::Assets]);
    }
}
