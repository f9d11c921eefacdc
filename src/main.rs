use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use typographer::discovery::{self, DiscoveryConfig};
use typographer::processing::{process_file, Action};
use typographer::reader::{AsyncFileReader, ReaderConfig};
use typographer::report::{write_stats, FileStatus, RunStats};
use typographer::{Mode, SettingsStore, Typographer};

#[derive(Parser, Debug)]
#[command(name = "typographer")]
#[command(about = "Highlights and normalizes smart typography in markup files")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: CliCommand,

    /// Settings file (JSON) overriding the built-in defaults
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Abort on first error
    #[arg(long, global = true)]
    fail_fast: bool,

    /// Honor .gitignore and .ignore files while discovering
    #[arg(long, global = true)]
    respect_ignore_files: bool,

    /// Suppress console progress bar
    #[arg(long, global = true)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long, global = true, default_value = "typographer_stats.json")]
    stats_out: PathBuf,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Report every problem character in markup files under ROOT
    Scan {
        /// Root directory to scan for markup files
        root_dir: PathBuf,
    },
    /// Replace or escape problem characters in markup files under ROOT
    Fix {
        /// Root directory to scan for markup files
        root_dir: PathBuf,

        /// Plain-text replacement or numeric character reference
        #[arg(long, value_enum, default_value_t = Mode::Replace)]
        mode: Mode,

        /// Write rewritten files back (dry run otherwise)
        #[arg(long)]
        write: bool,
    },
}

fn validate_root(root_dir: &Path) -> Result<()> {
    if !root_dir.exists() {
        anyhow::bail!("Root directory does not exist: {}", root_dir.display());
    }
    if !root_dir.is_dir() {
        anyhow::bail!("Root path is not a directory: {}", root_dir.display());
    }
    Ok(())
}

fn progress_bar(len: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {wide_msg}") {
        bar.set_style(style);
    }
    bar
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: logs go to stderr so scan/fix output on stdout stays pipeable
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let (root_dir, action) = match &args.command {
        CliCommand::Scan { root_dir } => (root_dir, Action::Scan),
        CliCommand::Fix { root_dir, mode, write } => (
            root_dir,
            Action::Fix {
                mode: *mode,
                write: *write,
            },
        ),
    };
    validate_root(root_dir)?;

    let store = match &args.settings {
        Some(path) => SettingsStore::from_file(path)?,
        None => SettingsStore::default(),
    };
    let mut plugin = Typographer::new(store);

    let discovery_config = DiscoveryConfig {
        fail_fast: args.fail_fast,
        respect_ignore_files: args.respect_ignore_files,
    };
    info!("Starting file discovery in: {}", root_dir.display());
    let discovered = discovery::collect_discovered_files(root_dir, discovery_config).await?;
    let valid: Vec<_> = discovered.iter().filter(|f| f.error.is_none()).collect();

    for file in discovered.iter().filter(|f| f.error.is_some()) {
        if let Some(ref error) = file.error {
            info!("Issue with {}: {}", file.path.display(), error);
        }
    }

    let reader = AsyncFileReader::new(ReaderConfig {
        fail_fast: args.fail_fast,
        ..Default::default()
    });

    let run_start = Instant::now();
    let mut run = RunStats::default();
    let bar = progress_bar(valid.len(), args.no_progress);

    for file in valid {
        bar.set_message(file.path.display().to_string());
        let outcome = process_file(&file.path, &mut plugin, &reader, action, args.fail_fast).await?;

        bar.suspend(|| {
            for line in &outcome.problems {
                println!("{line}");
            }
            if let Some(ref message) = outcome.status_message {
                println!("{}: {}", file.path.display(), message);
            }
            if outcome.stats.status == FileStatus::Failed {
                if let Some(ref error) = outcome.stats.error {
                    eprintln!("{error}");
                }
            }
        });

        run.record(outcome.stats);
        bar.inc(1);
    }
    bar.finish_and_clear();

    run.total_time_ms = run_start.elapsed().as_millis() as u64;
    write_stats(&args.stats_out, &run).await?;

    println!(
        "typographer v{}: {} processed, {} skipped, {} failed, {} problem characters",
        env!("CARGO_PKG_VERSION"),
        run.files_processed,
        run.files_skipped,
        run.files_failed,
        run.problems_detected
    );
    info!("Run complete in {}ms, stats written to {}", run.total_time_ms, args.stats_out.display());

    Ok(())
}
