// WHY: strongly typed settings resolved once per pass, hot-swappable as a whole
// A pass takes one Arc snapshot so a concurrent reload can never be observed half-applied

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::eligibility::EligibilityPolicy;
use crate::table::ReplacementTable;

pub const DEFAULT_MAX_FILE_SIZE: usize = 1_048_576;
pub const DEFAULT_HIGHLIGHT_STYLE: &str = "invalid";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Plugin settings; every field falls back to its default when absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Whether highlighting runs automatically on lifecycle events
    pub enabled: bool,
    /// Problem characters and their plain-text substitutes
    pub replacement_table: ReplacementTable,
    /// Opaque style label handed to the display layer
    pub highlight_style: String,
    /// Largest buffer, in characters, scanned automatically
    pub max_file_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            replacement_table: ReplacementTable::default(),
            highlight_style: DEFAULT_HIGHLIGHT_STYLE.to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&content)?;
        info!(
            "Loaded settings from {}: {} replacements, max size {}",
            path.display(),
            settings.replacement_table.len(),
            settings.max_file_size
        );
        Ok(settings)
    }

    pub fn eligibility(&self) -> EligibilityPolicy {
        EligibilityPolicy::new(self.max_file_size)
    }
}

/// Holds the current settings snapshot
#[derive(Debug)]
pub struct SettingsStore {
    current: ArcSwap<Settings>,
    source: Option<PathBuf>,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: ArcSwap::from_pointee(settings),
            source: None,
        }
    }

    /// Store backed by a settings file that `reload` re-reads
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = Settings::load(&path)?;
        Ok(Self {
            current: ArcSwap::from_pointee(settings),
            source: Some(path),
        })
    }

    /// Consistent view of the settings for one pass
    pub fn snapshot(&self) -> Arc<Settings> {
        self.current.load_full()
    }

    /// Replace the settings atomically
    pub fn replace(&self, settings: Settings) {
        debug!("Swapping settings snapshot");
        self.current.store(Arc::new(settings));
    }

    /// Re-read the backing file; the previous snapshot stays in place on error
    pub fn reload(&self) -> Result<(), SettingsError> {
        match &self.source {
            Some(path) => {
                let settings = Settings::load(path)?;
                self.replace(settings);
                Ok(())
            }
            None => {
                debug!("Settings store has no backing file, nothing to reload");
                Ok(())
            }
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
