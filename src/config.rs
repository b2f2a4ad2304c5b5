//! Draw configuration.
//!
//! Settings are loaded from a JSON file. Importer and exporter selection
//! are closed enums, so an unrecognized value fails at load time instead
//! of surfacing as a missing collaborator later.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

use crate::error::DrawError;

/// Ordered log verbosity: `Silent < Info < Debug < Verbose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// No log output.
    Silent,
    /// Progress messages only.
    #[default]
    Info,
    /// Per-attempt diagnostics (timings, heat sizes, block populations).
    Debug,
    /// Constraint-level diagnostics.
    Verbose,
}

impl Verbosity {
    /// The `tracing` level filter this verbosity admits.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Silent => LevelFilter::OFF,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Verbose => LevelFilter::TRACE,
        }
    }
}

/// Entry-list source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImporterKind {
    /// JSON entry list.
    Json,
}

/// Start-list destination format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExporterKind {
    /// Pretty-printed JSON start list.
    Json,
    /// IOF v3-style XML start list.
    Xml,
}

/// Draw settings, loaded from a settings file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Number of heats to draw (must be positive).
    pub heats: usize,
    /// Log verbosity.
    #[serde(default)]
    pub log_level: Verbosity,
    /// Entry-list source format.
    pub importer: ImporterKind,
    /// Start-list destination format.
    pub exporter: ExporterKind,
    /// Entry-list file path.
    pub source_file: PathBuf,
    /// Start-list output path.
    pub destination_file: PathBuf,
    /// Event name used in exported documents.
    #[serde(default = "default_event_name")]
    pub event_name: String,
    /// Seed for the anchor draw. Unset = draw from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Upper bound on the block-window correction factor.
    #[serde(default = "default_max_correction")]
    pub max_correction: u32,
}

fn default_event_name() -> String {
    "Start Draw".to_string()
}

fn default_max_correction() -> u32 {
    crate::solver::DEFAULT_MAX_CORRECTION
}

impl Settings {
    /// Loads and validates settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DrawError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks settings invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), DrawError> {
        if self.heats == 0 {
            return Err(DrawError::Config("heat count must be positive".into()));
        }
        if self.source_file.as_os_str().is_empty() {
            return Err(DrawError::Config("source file path is empty".into()));
        }
        if self.destination_file.as_os_str().is_empty() {
            return Err(DrawError::Config("destination file path is empty".into()));
        }
        Ok(())
    }
}
