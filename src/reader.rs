use anyhow::Result;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info, warn};

/// Configuration for file reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics for file reading operations
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub bytes_read: u64,
    pub chars_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

impl ReadStats {
    fn failed(path: &Path, bytes_read: u64, duration_ms: u64, error: String) -> Self {
        Self {
            file_path: path.display().to_string(),
            bytes_read,
            chars_read: 0,
            duration_ms,
            read_error: Some(error),
        }
    }
}

/// Async reader that loads whole documents, preserving their exact content
pub struct AsyncFileReader {
    config: ReaderConfig,
}

impl AsyncFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a document into memory with async buffered I/O
    /// WHY: span offsets are computed against the full text, so line endings must survive untouched
    pub async fn read_document<P: AsRef<Path>>(&self, file_path: P) -> Result<(String, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of file: {}", path.display());

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) => {
                let error_msg = format!("Failed to open file {}: {}", path.display(), e);
                warn!("{}", error_msg);

                if self.config.fail_fast {
                    return Err(anyhow::anyhow!(error_msg));
                }
                let stats = ReadStats::failed(path, 0, start_time.elapsed().as_millis() as u64, error_msg);
                return Ok((String::new(), stats));
            }
        };

        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut bytes = Vec::new();
        if let Err(e) = reader.read_to_end(&mut bytes).await {
            let error_msg = format!("Failed to read file {}: {}", path.display(), e);
            warn!("{}", error_msg);

            if self.config.fail_fast {
                return Err(anyhow::anyhow!(error_msg));
            }
            let stats = ReadStats::failed(
                path,
                bytes.len() as u64,
                start_time.elapsed().as_millis() as u64,
                error_msg,
            );
            return Ok((String::new(), stats));
        }

        let byte_count = bytes.len() as u64;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                let error_msg = format!(
                    "UTF-8 decoding error in {} at byte {}",
                    path.display(),
                    e.utf8_error().valid_up_to()
                );
                warn!("{}", error_msg);

                if self.config.fail_fast {
                    return Err(anyhow::anyhow!(error_msg));
                }
                let stats = ReadStats::failed(path, byte_count, start_time.elapsed().as_millis() as u64, error_msg);
                return Ok((String::new(), stats));
            }
        };

        let stats = ReadStats {
            file_path: path.display().to_string(),
            bytes_read: byte_count,
            chars_read: content.chars().count() as u64,
            duration_ms: start_time.elapsed().as_millis() as u64,
            read_error: None,
        };

        info!(
            "Successfully read {}: {} bytes, {} chars in {}ms",
            path.display(),
            stats.bytes_read,
            stats.chars_read,
            stats.duration_ms
        );
        Ok((content, stats))
    }
}

/// Convenience function for reading a single file with default configuration
pub async fn read_file_async<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let reader = AsyncFileReader::new(ReaderConfig {
        fail_fast: true,
        ..Default::default()
    });
    let (content, _stats) = reader.read_document(file_path).await?;
    Ok(content)
}

/// Write a rewritten document back in place
pub async fn write_document<P: AsRef<Path>>(file_path: P, content: &str) -> Result<()> {
    let path = file_path.as_ref();
    let file = File::create(path).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).await?;
    writer.flush().await?;
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
