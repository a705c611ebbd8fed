use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Backing file for a record list: a pretty-printed JSON array on disk, or
/// nothing at all for in-memory stores.
#[derive(Debug, Clone)]
pub struct RecordFile {
    path: Option<PathBuf>,
    label: &'static str,
}

impl RecordFile {
    pub fn on_disk(path: PathBuf, label: &'static str) -> Self {
        Self { path: Some(path), label }
    }

    pub fn in_memory(label: &'static str) -> Self {
        Self { path: None, label }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read every record. A missing file is an empty list; a corrupt one is an
    /// error, never silently discarded.
    pub fn load<T>(&self) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };

        if !path.exists() {
            debug!("No {} file at {}, starting empty", self.label, path.display());
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {} file {}", self.label, path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<T> = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt {} file {}", self.label, path.display()))?;
        debug!("Loaded {} {} records from {}", records.len(), self.label, path.display());
        Ok(records)
    }

    /// Replace the file with `records`
    pub fn save<T>(&self, records: &[T]) -> Result<()>
    where
        T: Serialize,
    {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(records)
            .with_context(|| format!("Failed to serialize {} records", self.label))?;

        // Sibling temp file renamed over the target: readers see the old or the new list, never half of one
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write {} file {}", self.label, tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace {} file {}", self.label, path.display()))?;

        debug!("Saved {} {} records to {}", records.len(), self.label, path.display());
        Ok(())
    }
}
