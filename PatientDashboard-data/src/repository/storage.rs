use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::lab_result::LabResult;
use super::errors::RepositoryError;
use super::lab_results::StorageStatus;

/// Flat JSON document storage for lab results
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage handle for the document at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the JSON document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read the whole stored collection. A missing document is an empty collection.
    pub async fn load(&self) -> Result<Vec<LabResult>, RepositoryError> {
        debug!("Loading lab results from {}", self.path.display());

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No lab results document at {}, returning empty collection", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(RepositoryError::Io(e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let results: Vec<LabResult> = serde_json::from_slice(&bytes)?;
        debug!("Loaded {} lab results", results.len());
        Ok(results)
    }

    /// Overwrite the stored collection.
    ///
    /// The document is written next to the target and renamed over it, so a
    /// concurrent `load` sees either the old or the new collection.
    pub async fn replace(&self, results: &[LabResult]) -> Result<(), RepositoryError> {
        let json = serde_json::to_vec_pretty(results)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, &json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        info!("Stored {} lab results at {}", results.len(), self.path.display());
        Ok(())
    }

    /// Report whether the document can be read or created
    pub async fn status(&self) -> StorageStatus {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => StorageStatus::Healthy,
            Ok(_) => StorageStatus::Unavailable(format!(
                "{} exists but is not a file",
                self.path.display()
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let parent_ready = match self.path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => {
                        tokio::fs::metadata(parent)
                            .await
                            .map(|m| m.is_dir())
                            .unwrap_or(false)
                    }
                    _ => true,
                };

                if parent_ready {
                    StorageStatus::Healthy
                } else {
                    StorageStatus::Degraded(
                        "Data directory does not exist yet; it will be created on first upload".to_string(),
                    )
                }
            }
            Err(e) => StorageStatus::Unavailable(e.to_string()),
        }
    }
}
