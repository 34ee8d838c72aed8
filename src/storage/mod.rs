// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use serde::Serialize;
use crate::extractors::ParsedIssue;
use crate::template::Template;
use crate::utils::error::StorageError;

const PARSED_ISSUE_FILE: &str = "parsed-issue.json";
const PARSED_TEMPLATE_FILE: &str = "parsed-template.json";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Saves the extracted issue fields as JSON
    pub fn save_parsed_issue(&self, parsed: &ParsedIssue, pretty: bool) -> Result<PathBuf, StorageError> {
        self.save_json(PARSED_ISSUE_FILE, parsed, pretty)
    }

    /// Saves the normalized template as JSON
    pub fn save_parsed_template(&self, template: &Template, pretty: bool) -> Result<PathBuf, StorageError> {
        self.save_json(PARSED_TEMPLATE_FILE, template, pretty)
    }

    fn save_json<T: Serialize>(&self, filename: &str, value: &T, pretty: bool) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(filename);
        let json = to_json(value, pretty)?;

        fs::write(&file_path, json)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved {} to {}", filename, file_path.display());

        Ok(file_path)
    }
}

/// Serializes output the same way whether it lands on disk or stdout
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, StorageError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map_err(|e| StorageError::SerializationError(e.to_string()))
}
