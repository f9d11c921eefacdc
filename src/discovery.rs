use anyhow::Result;
use futures::stream::{self, Stream, StreamExt};
use ignore::{WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::eligibility::is_markup_file_name;

/// Configuration for file discovery behavior
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Honor .gitignore / .ignore files while walking
    pub respect_ignore_files: bool,
}

/// Result of file discovery validation
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    /// Size on disk in bytes, when metadata was readable
    pub size_bytes: Option<u64>,
    pub error: Option<String>,
}

/// Discovers markup files recursively under the given root directory.
/// Returns an async stream of validated file paths.
///
/// # Arguments
/// * `root_dir` - Root directory to search recursively
/// * `config` - Discovery configuration
///
/// # Returns
/// Stream of `FileValidation` results in no particular order
pub fn discover_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root_dir.as_ref().to_path_buf();
    let config = Arc::new(config);

    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        info!("Starting directory traversal in: {}", root_path.display());
        let traversal_start = std::time::Instant::now();

        // WHY: ignore::WalkBuilder (from ripgrep) walks deep trees in parallel
        let walker = WalkBuilder::new(&root_path)
            .threads((num_cpus::get() / 2).max(1))
            .follow_links(false)
            .hidden(false)
            .ignore(config.respect_ignore_files)
            .git_ignore(config.respect_ignore_files)
            .build_parallel();

        // WHY: tokio's unbounded sender is sync, so walker threads feed the task without blocking a worker
        let (result_tx, mut result_rx) = mpsc::unbounded_channel();

        // Walker blocks, keep it off the async runtime
        std::thread::spawn(move || {
            walker.run(|| {
                let result_tx = result_tx.clone();
                Box::new(move |result| {
                    if let Ok(entry) = result {
                        if entry.file_type().is_some_and(|ft| ft.is_file())
                            && is_markup_file_name(entry.path())
                        {
                            debug!("Found markup file: {}", entry.path().display());
                            let _ = result_tx.send(entry.path().to_path_buf());
                        }
                    }
                    WalkState::Continue
                })
            });
        });

        let mut file_count = 0;
        while let Some(path) = result_rx.recv().await {
            file_count += 1;

            match validate_file(&path, &config).await {
                Ok(validation) => {
                    if tx.send(Ok(validation)).is_err() {
                        debug!("Receiver dropped, stopping discovery");
                        break;
                    }
                }
                Err(e) => {
                    if tx.send(Err(e)).is_err() {
                        debug!("Receiver dropped, stopping discovery");
                    }
                    break;
                }
            }
        }

        info!(
            "Discovery and validation completed in {}ms, streamed {} files",
            traversal_start.elapsed().as_millis(),
            file_count
        );
    });

    stream::unfold(rx, |mut receiver| async move {
        receiver.recv().await.map(|result| (result, receiver))
    })
}

/// Check the path is an accessible regular file
async fn validate_file(path: &Path, config: &DiscoveryConfig) -> Result<FileValidation> {
    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => Ok(FileValidation {
            path: path.to_path_buf(),
            size_bytes: Some(metadata.len()),
            error: None,
        }),
        Ok(_) => {
            let error = format!("Path is not a file: {}", path.display());
            warn!("{}", error);
            Ok(FileValidation {
                path: path.to_path_buf(),
                size_bytes: None,
                error: Some(error),
            })
        }
        Err(e) => {
            let error = format!("Cannot access file {}: {}", path.display(), e);
            warn!("{}", error);

            if config.fail_fast {
                Err(anyhow::anyhow!(error))
            } else {
                Ok(FileValidation {
                    path: path.to_path_buf(),
                    size_bytes: None,
                    error: Some(error),
                })
            }
        }
    }
}

/// Collect all discovered files, sorted by path for stable output
pub async fn collect_discovered_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(discover_files(root_dir, config));

    while let Some(result) = stream.next().await {
        files.push(result?);
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let valid_count = files.iter().filter(|f| f.error.is_none()).count();
    let invalid_count = files.len() - valid_count;

    if invalid_count > 0 {
        warn!("Found {} files with validation issues", invalid_count);
    }

    info!("File discovery summary: {} valid, {} invalid", valid_count, invalid_count);

    Ok(files)
}

/// Paths of accessible markup files under `root_dir`
pub async fn find_markup_files(root_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let files = collect_discovered_files(root_dir, DiscoveryConfig::default()).await?;
    Ok(files
        .into_iter()
        .filter(|f| f.error.is_none())
        .map(|f| f.path)
        .collect())
}
