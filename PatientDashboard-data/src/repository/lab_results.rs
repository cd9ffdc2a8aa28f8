use async_trait::async_trait;
use tracing::debug;

use crate::models::lab_result::LabResult;
use crate::store::{StorageBackend, StoreConfig};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::JsonFileStorage;

/// Health of the underlying storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageStatus {
    /// Reads and writes are expected to succeed
    Healthy,
    /// Usable, with a caveat worth reporting
    Degraded(String),
    /// Reads or writes will fail
    Unavailable(String),
}

/// Repository trait for the stored lab result collection.
///
/// The collection is an ordered sequence with no key; the only mutation is a
/// wholesale replace.
#[async_trait]
pub trait LabResultRepositoryTrait: Send + Sync {
    /// Load the full stored collection
    async fn load(&self) -> Result<Vec<LabResult>, RepositoryError>;

    /// Replace the full stored collection
    async fn replace(&self, results: Vec<LabResult>) -> Result<(), RepositoryError>;

    /// Check whether the storage is usable
    async fn storage_status(&self) -> StorageStatus;
}

#[derive(Debug, Clone)]
enum Backend {
    File(JsonFileStorage),
    Memory(InMemoryStorage),
}

/// Repository for lab results backed by either a JSON document or memory
#[derive(Debug, Clone)]
pub struct LabResultRepository {
    backend: Backend,
}

impl Default for LabResultRepository {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

impl LabResultRepository {
    /// Create a repository over the JSON document at `path`
    pub fn json_file(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            backend: Backend::File(JsonFileStorage::new(path)),
        }
    }

    /// Create a repository that keeps results in process memory
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(InMemoryStorage::new()),
        }
    }

    /// Create the repository described by `config`
    pub fn from_config(config: &StoreConfig) -> Self {
        match config.backend {
            StorageBackend::File => Self::json_file(config.lab_results_path()),
            StorageBackend::Memory => Self::in_memory(),
        }
    }

    /// Human-readable description of the backend, for start-up logging
    pub fn describe(&self) -> String {
        match &self.backend {
            Backend::File(storage) => format!("JSON file at {}", storage.path().display()),
            Backend::Memory(_) => "in-memory storage".to_string(),
        }
    }
}

#[async_trait]
impl LabResultRepositoryTrait for LabResultRepository {
    async fn load(&self) -> Result<Vec<LabResult>, RepositoryError> {
        match &self.backend {
            Backend::File(storage) => storage.load().await,
            Backend::Memory(storage) => storage.load().await,
        }
    }

    async fn replace(&self, results: Vec<LabResult>) -> Result<(), RepositoryError> {
        debug!("Replacing stored lab results with {} entries", results.len());
        match &self.backend {
            Backend::File(storage) => storage.replace(&results).await,
            Backend::Memory(storage) => storage.replace(results).await,
        }
    }

    async fn storage_status(&self) -> StorageStatus {
        match &self.backend {
            Backend::File(storage) => storage.status().await,
            Backend::Memory(_) => StorageStatus::Healthy,
        }
    }
}

/// Mock lab result repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Mock implementation of the lab result repository for testing
    #[derive(Debug, Clone, Default)]
    pub struct MockLabResultRepository {
        results: Arc<Mutex<Vec<LabResult>>>,
        replace_calls: Arc<AtomicUsize>,
        fail_load: bool,
        fail_replace: bool,
    }

    impl MockLabResultRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined results
        pub fn with_results(results: Vec<LabResult>) -> Self {
            Self {
                results: Arc::new(Mutex::new(results)),
                ..Self::default()
            }
        }

        /// Make every `load` fail
        pub fn failing_load(mut self) -> Self {
            self.fail_load = true;
            self
        }

        /// Make every `replace` fail
        pub fn failing_replace(mut self) -> Self {
            self.fail_replace = true;
            self
        }

        /// Number of `replace` calls seen so far
        pub fn replace_calls(&self) -> usize {
            self.replace_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LabResultRepositoryTrait for MockLabResultRepository {
        async fn load(&self) -> Result<Vec<LabResult>, RepositoryError> {
            if self.fail_load {
                return Err(RepositoryError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "mock is configured to fail load",
                )));
            }
            Ok(self.results.lock()?.clone())
        }

        async fn replace(&self, results: Vec<LabResult>) -> Result<(), RepositoryError> {
            self.replace_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_replace {
                return Err(RepositoryError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "mock is configured to fail replace",
                )));
            }
            *self.results.lock()? = results;
            Ok(())
        }

        async fn storage_status(&self) -> StorageStatus {
            if self.fail_load {
                StorageStatus::Unavailable("mock storage offline".to_string())
            } else {
                StorageStatus::Healthy
            }
        }
    }
}

#[cfg(test)]
mod repository_tests {
    use super::*;
    use super::tests::MockLabResultRepository;

    fn result(title: &str) -> LabResult {
        LabResult {
            title: title.to_string(),
            value: 5.0,
            range: "1-10".to_string(),
            status: "normal".to_string(),
            unit: "N/A".to_string(),
            date: None,
        }
    }

    #[tokio::test]
    async fn test_in_memory_repository_replaces_rather_than_appends() {
        let repo = LabResultRepository::in_memory();

        repo.replace(vec![result("A"), result("B"), result("C")]).await.unwrap();
        repo.replace(vec![result("D"), result("E")]).await.unwrap();

        let stored = repo.load().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].title, "D");
        assert_eq!(repo.storage_status().await, StorageStatus::Healthy);
    }

    #[tokio::test]
    async fn test_file_repository_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::file(dir.path());
        let repo = LabResultRepository::from_config(&config);

        repo.replace(vec![result("Glucose")]).await.unwrap();

        let reopened = LabResultRepository::from_config(&config);
        let stored = reopened.load().await.unwrap();
        assert_eq!(stored, vec![result("Glucose")]);
        assert!(reopened.describe().contains("lab_results.json"));
    }

    #[tokio::test]
    async fn test_mock_repository_failures() {
        let repo = MockLabResultRepository::new().failing_replace();
        assert!(repo.replace(vec![result("A")]).await.is_err());
        assert_eq!(repo.replace_calls(), 1);
        assert!(repo.load().await.unwrap().is_empty());

        let repo = MockLabResultRepository::with_results(vec![result("A")]).failing_load();
        assert!(repo.load().await.is_err());
        assert!(matches!(repo.storage_status().await, StorageStatus::Unavailable(_)));
    }
}
