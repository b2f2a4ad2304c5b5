//! JSON entry import and start-list export.

use std::fs;
use std::path::PathBuf;

use crate::error::DrawError;
use crate::models::{Entry, StartList};

/// Reads a JSON entry list from disk.
pub struct JsonImporter {
    source: PathBuf,
}

impl JsonImporter {
    /// Creates an importer for the given source file.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Imports the entry list.
    pub fn import(&self) -> Result<Vec<Entry>, DrawError> {
        let raw = fs::read_to_string(&self.source)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Writes a start list to disk as pretty-printed JSON.
pub struct JsonExporter {
    destination: PathBuf,
}

impl JsonExporter {
    /// Creates an exporter for the given destination file.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    /// Exports the start list entries in start order.
    pub fn export(&self, start_list: &StartList) -> Result<(), DrawError> {
        let raw = serde_json::to_string_pretty(start_list.entries())?;
        fs::write(&self.destination, raw)?;
        Ok(())
    }
}
