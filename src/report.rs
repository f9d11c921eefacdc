// WHY: per-file statistics for a command-line run, written as JSON next to the console output

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::detector::{Location, Span, SpanLocator};

/// Outcome of processing one file
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Scanned (and rewritten, when requested)
    Processed,
    /// Ineligible: wrong syntax or over the size ceiling
    Skipped,
    /// Could not be read or written
    Failed,
}

/// Per-file processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileStats {
    /// File path as discovered
    pub path: String,
    /// Number of characters in the document
    pub chars_processed: u64,
    /// Number of problem characters detected
    pub problems_detected: u64,
    /// Number of characters replaced or escaped
    pub characters_rewritten: u64,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    pub status: FileStatus,
    /// Error message if processing failed
    pub error: Option<String>,
}

impl FileStats {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            chars_processed: 0,
            problems_detected: 0,
            characters_rewritten: 0,
            processing_time_ms: 0,
            status: FileStatus::Processed,
            error: None,
        }
    }

    pub fn failed(path: &Path, error: String) -> Self {
        Self {
            status: FileStatus::Failed,
            error: Some(error),
            ..Self::new(path)
        }
    }
}

/// Aggregate statistics for a run
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RunStats {
    pub files_processed: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub problems_detected: u64,
    pub characters_rewritten: u64,
    pub total_time_ms: u64,
    pub files: Vec<FileStats>,
}

impl RunStats {
    pub fn record(&mut self, stats: FileStats) {
        match stats.status {
            FileStatus::Processed => self.files_processed += 1,
            FileStatus::Skipped => self.files_skipped += 1,
            FileStatus::Failed => self.files_failed += 1,
        }
        self.problems_detected += stats.problems_detected;
        self.characters_rewritten += stats.characters_rewritten;
        self.files.push(stats);
    }
}

/// Write run statistics as pretty JSON
pub async fn write_stats(path: &Path, stats: &RunStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// One `path:line:col U+XXXX 'c'` line per problem character
pub fn format_problems(path: &Path, text: &str, spans: &[Span]) -> Vec<String> {
    let mut locator = SpanLocator::new(text);
    let mut chars = text.chars().enumerate();
    let mut lines = Vec::with_capacity(spans.len());

    for span in spans {
        let Location { line, col } = locator.locate(*span);
        let found = loop {
            match chars.next() {
                Some((i, c)) if i == span.start => break Some(c),
                Some(_) => continue,
                None => break None,
            }
        };
        if let Some(c) = found {
            lines.push(format!("{}:{}:{} U+{:04X} '{}'", path.display(), line, col, u32::from(c), c));
        }
    }
    lines
}
