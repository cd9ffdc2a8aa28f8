//! Storage configuration for the lab results store
//!
//! The stored collection lives in a single JSON document under the data
//! directory. An in-memory backend is available for tests and throwaway runs.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use crate::repository::RepositoryError;

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default name of the stored lab results document
pub const DEFAULT_LAB_RESULTS_FILE: &str = "lab_results.json";

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Flat JSON document on disk
    File,
    /// Process memory, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "json" => Ok(StorageBackend::File),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(RepositoryError::Config(format!(
                "Unsupported storage backend: {}",
                other
            ))),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Which backend holds the lab results
    pub backend: StorageBackend,
    /// Directory holding the JSON document and staged uploads
    pub data_dir: PathBuf,
    /// File name of the JSON document inside `data_dir`
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            file_name: DEFAULT_LAB_RESULTS_FILE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Create a new storage configuration from environment variables
    ///
    /// Reads `STORAGE_BACKEND`, `DATA_DIR` and `LAB_RESULTS_FILE`.
    pub fn from_env() -> Result<Self, RepositoryError> {
        let defaults = Self::default();

        let backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.backend,
        };

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let file_name = env::var("LAB_RESULTS_FILE").unwrap_or(defaults.file_name);
        if file_name.trim().is_empty() {
            return Err(RepositoryError::Config(
                "LAB_RESULTS_FILE must not be empty".to_string(),
            ));
        }

        Ok(Self {
            backend,
            data_dir,
            file_name,
        })
    }

    /// Configuration for a file store rooted at `data_dir`
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Configuration for an in-memory store
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            ..Self::default()
        }
    }

    /// Full path of the lab results document
    pub fn lab_results_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    /// Directory where uploads are staged before ingestion
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    /// Create the data and upload directories if they do not exist yet
    pub fn ensure_data_dir(&self) -> Result<(), RepositoryError> {
        for dir in [self.data_dir.clone(), self.uploads_dir()] {
            if !dir.exists() {
                info!("Creating data directory: {}", dir.display());
                std::fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}
