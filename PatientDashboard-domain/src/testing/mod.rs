// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use patient_dashboard_data::repository::tests::MockLabResultRepository;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use patient_dashboard_data::repository::StorageStatus;

use crate::entities::analytics::{BiologicalAge, BiomarkerDetail, PatientRecommendations};
use crate::entities::ingestion::IngestionReport;
use crate::entities::lab_result::LabResult;
use crate::health::{
    storage_component, ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth,
    SystemStatus,
};
use crate::services::biological_age::estimate_biological_age;
use crate::services::biomarker::{build_detail, BiomarkerResolver, FuzzyTitleResolver};
use crate::services::education::EducationCatalog;
use crate::services::ingestion::{ingest_rows, parse_csv, IngestionPolicy};
use crate::services::lab_results::{LabResultServiceError, LabResultServiceTrait};
use crate::services::recommendations::generate_recommendations;

/// Mock implementation of the LabResultServiceTrait for testing.
///
/// Keeps results in memory and runs the real analytics over them.
pub struct MockLabResultService {
    results: RwLock<Vec<LabResult>>,
    should_fail_storage: bool,
}

impl Default for MockLabResultService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLabResultService {
    /// Create a new mock lab result service with no results
    pub fn new() -> Self {
        Self {
            results: RwLock::new(Vec::new()),
            should_fail_storage: false,
        }
    }

    /// Start with pre-defined results
    pub fn with_results(self, results: Vec<LabResult>) -> Self {
        Self {
            results: RwLock::new(results),
            ..self
        }
    }

    /// Configure the mock so every storage access fails
    pub fn with_storage_failure(mut self) -> Self {
        self.should_fail_storage = true;
        self
    }

    fn snapshot(&self) -> Result<Vec<LabResult>, LabResultServiceError> {
        if self.should_fail_storage {
            return Err(LabResultServiceError::RepositoryError(
                "Storage failure - mock is configured to fail".to_string(),
            ));
        }
        self.results
            .read()
            .map(|results| results.clone())
            .map_err(|_| LabResultServiceError::RepositoryError("Mock storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl LabResultServiceTrait for MockLabResultService {
    async fn get_all_results(&self) -> Result<Vec<LabResult>, LabResultServiceError> {
        self.snapshot()
    }

    async fn upload_results(&self, csv: &[u8]) -> Result<IngestionReport, LabResultServiceError> {
        let rows = parse_csv(csv).map_err(|e| LabResultServiceError::MalformedUpload(e.to_string()))?;
        if rows.is_empty() {
            return Err(LabResultServiceError::MalformedUpload(
                "Upload contains no data rows".to_string(),
            ));
        }

        let report = ingest_rows(rows, IngestionPolicy::Strict);
        if report.results.is_empty() {
            return Err(LabResultServiceError::NoValidRows {
                rejected: report.rejected,
            });
        }

        if self.should_fail_storage {
            return Err(LabResultServiceError::RepositoryError(
                "Storage failure - mock is configured to fail".to_string(),
            ));
        }
        {
            let mut stored = self.results.write().map_err(|_| {
                LabResultServiceError::RepositoryError("Mock storage lock poisoned".to_string())
            })?;
            *stored = report.results.clone();
        }

        Ok(report)
    }

    async fn get_recommendations(&self) -> Result<PatientRecommendations, LabResultServiceError> {
        Ok(generate_recommendations(&self.snapshot()?))
    }

    async fn get_biological_age(&self) -> Result<BiologicalAge, LabResultServiceError> {
        estimate_biological_age(&self.snapshot()?).ok_or_else(|| {
            LabResultServiceError::InsufficientData("No lab results available".to_string())
        })
    }

    async fn get_biomarker_detail(
        &self,
        identifier: &str,
    ) -> Result<BiomarkerDetail, LabResultServiceError> {
        let results = self.snapshot()?;
        match FuzzyTitleResolver.resolve(&results, identifier) {
            Some(result) => Ok(build_detail(result, &EducationCatalog::default())),
            None => Err(LabResultServiceError::NotFound {
                identifier: identifier.to_string(),
                available: results.into_iter().map(|result| result.title).collect(),
            }),
        }
    }
}

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    /// Storage component status
    storage_status: StorageStatus,
    /// Additional components
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            storage_status: StorageStatus::Healthy,
            components: HashMap::new(),
        }
    }

    /// Configure the mock with degraded storage
    pub fn with_degraded_storage(mut self) -> Self {
        self.storage_status = StorageStatus::Degraded("Data directory missing".to_string());
        self
    }

    /// Configure the mock with unavailable storage
    pub fn with_unavailable_storage(mut self) -> Self {
        self.storage_status = StorageStatus::Unavailable("Storage is not readable".to_string());
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components
            .insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = self.components.clone();
        let storage = storage_component(self.storage_status.clone());

        let status = match storage.status {
            ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
            ComponentStatus::Degraded => SystemStatus::Degraded,
            ComponentStatus::Healthy => SystemStatus::Healthy,
        };
        components.insert("storage".to_string(), storage);

        SystemHealth { status, components }
    }

    async fn check_storage_status(&self) -> StorageStatus {
        self.storage_status.clone()
    }
}

/// Factory function to create a mock health service
pub fn create_mock_health_service() -> impl HealthServiceTrait {
    MockHealthService::new()
}
