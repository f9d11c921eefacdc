// WHY: drives one file through the plugin the way an editor would: load, highlight, optionally rewrite
// Shared by the CLI and integration tests

use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::document::{Document, Workspace};
use crate::highlight::MemoryDisplay;
use crate::host::View;
use crate::plugin::Typographer;
use crate::reader::{write_document, AsyncFileReader};
use crate::report::{format_problems, FileStats, FileStatus};
use crate::rewriter::Mode;

/// What to do with each eligible file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Report problem characters only
    Scan,
    /// Rewrite problem characters; persist only when `write` is set
    Fix { mode: Mode, write: bool },
}

/// Result of processing one file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub stats: FileStats,
    /// `path:line:col` lines for each problem character found
    pub problems: Vec<String>,
    /// Status text emitted by the rewrite command
    pub status_message: Option<String>,
}

impl FileOutcome {
    fn without_problems(stats: FileStats) -> Self {
        Self {
            stats,
            problems: Vec::new(),
            status_message: None,
        }
    }
}

/// Process one file; read and write failures become `Failed` stats unless `fail_fast`
pub async fn process_file(
    path: &Path,
    plugin: &mut Typographer,
    reader: &AsyncFileReader,
    action: Action,
    fail_fast: bool,
) -> Result<FileOutcome> {
    let start_time = Instant::now();
    let (text, read_stats) = reader.read_document(path).await?;

    if let Some(error) = read_stats.read_error {
        return Ok(FileOutcome::without_problems(FileStats::failed(path, error)));
    }

    let mut stats = FileStats::new(path);
    stats.chars_processed = read_stats.chars_read;

    let mut workspace = Workspace::new();
    let mut display = MemoryDisplay::new();
    let id = workspace.open(Document::from_file(path, &text));

    let scanned = match workspace.get(id) {
        Some(doc) => plugin.highlight_view(doc, &mut display)?,
        None => false,
    };
    if !scanned {
        debug!("Skipping ineligible file {}", path.display());
        stats.status = FileStatus::Skipped;
        stats.processing_time_ms = start_time.elapsed().as_millis() as u64;
        return Ok(FileOutcome::without_problems(stats));
    }

    let spans = display
        .marks(id)
        .map(|marks| marks.spans.clone())
        .unwrap_or_default();
    stats.problems_detected = spans.len() as u64;
    let problems = format_problems(path, &text, &spans);

    let mut status_message = None;
    if let Action::Fix { mode, write } = action {
        let Some(doc) = workspace.get_mut(id) else {
            return Ok(FileOutcome::without_problems(stats));
        };
        let summary = plugin.rewrite_typography(&mut *doc, mode)?;
        status_message = Some(summary.message());

        if doc.is_modified() {
            if write {
                if let Err(e) = write_document(path, &doc.text()).await {
                    let error = format!("Failed to write {}: {}", path.display(), e);
                    warn!("{}", error);
                    if fail_fast {
                        return Err(anyhow::anyhow!(error));
                    }
                    return Ok(FileOutcome::without_problems(FileStats::failed(path, error)));
                }
                // Only characters that reached disk count as rewritten
                stats.characters_rewritten = summary.count as u64;
                info!("Rewrote {} in {} mode", path.display(), mode);
            } else {
                debug!("Dry run, leaving {} untouched", path.display());
            }
        }
    }

    stats.processing_time_ms = start_time.elapsed().as_millis() as u64;
    Ok(FileOutcome {
        stats,
        problems,
        status_message,
    })
}
