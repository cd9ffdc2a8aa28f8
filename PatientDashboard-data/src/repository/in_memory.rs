use std::sync::{Arc, RwLock};

use crate::models::lab_result::LabResult;
use super::errors::RepositoryError;

/// In-memory storage implementation for lab results
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    /// Stored collection, shared between clones
    results: Arc<RwLock<Vec<LabResult>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new, empty in-memory storage
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Get the whole collection
    pub async fn load(&self) -> Result<Vec<LabResult>, RepositoryError> {
        let store = self.results.read()?;
        Ok(store.clone())
    }

    /// Swap the whole collection for `results`
    pub async fn replace(&self, results: Vec<LabResult>) -> Result<(), RepositoryError> {
        let mut store = self.results.write()?;
        *store = results;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str) -> LabResult {
        LabResult {
            title: title.to_string(),
            value: 1.0,
            range: "0-2".to_string(),
            status: "normal".to_string(),
            unit: "N/A".to_string(),
            date: None,
        }
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let storage = InMemoryStorage::new();
        let clone = storage.clone();

        clone.replace(vec![result("Iron"), result("Zinc")]).await.unwrap();

        let results = storage.load().await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Iron");
    }
}
