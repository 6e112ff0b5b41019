// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractors::amendment::{ParseMode, ParsedDocument};
use crate::extractors::table_diff::ChangeSummary;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Saves the parse result as `<stem>.json`
    pub fn save_parsed(&self, stem: &str, parsed: &ParsedDocument) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}.json", stem));
        write_json(&file_path, parsed)?;

        tracing::info!("Saved parsed document to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the parse as `<stem>_meta.json`
    pub fn save_metadata(
        &self,
        stem: &str,
        parsed: &ParsedDocument,
        source: &Path,
        mode: ParseMode,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_meta.json", stem));

        let metadata = serde_json::json!({
            "source": source.display().to_string(),
            "mode": mode,
            "header_tags": parsed.header.len(),
            "amendment_count": parsed.amendments.len(),
            "amendment_numbers": parsed.amendments.keys().collect::<Vec<_>>(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });
        write_json(&file_path, &metadata)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves per-amendment change summaries as `<stem>_summary.json`
    pub fn save_summary(&self, stem: &str, summaries: &[(u32, ChangeSummary)]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_summary.json", stem));

        let rows: Vec<serde_json::Value> = summaries
            .iter()
            .map(|(number, summary)| {
                serde_json::json!({
                    "amendment": number,
                    "original_type": summary.original_type,
                    "deleted": summary.deleted,
                    "added": summary.added,
                    "rejection": summary.rejection,
                })
            })
            .collect();
        write_json(&file_path, &rows)?;

        tracing::info!("Saved change summary to {}", file_path.display());
        Ok(file_path)
    }
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    fs::write(path, content).map_err(StorageError::IoError)
}
