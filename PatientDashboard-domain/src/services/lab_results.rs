use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::entities::analytics::{BiologicalAge, BiomarkerDetail, PatientRecommendations};
use crate::entities::conversions;
use crate::entities::ingestion::{IngestionReport, MalformedRow};
use crate::entities::lab_result::LabResult;
use crate::services::biological_age::estimate_biological_age;
use crate::services::biomarker::{build_detail, BiomarkerResolver, FuzzyTitleResolver};
use crate::services::education::EducationCatalog;
use crate::services::ingestion::{ingest_rows, parse_csv, IngestionPolicy};
use crate::services::recommendations::generate_recommendations;
use patient_dashboard_data::repository::{LabResultRepositoryTrait, RepositoryError};

/// Lab result service errors
#[derive(Debug, Error)]
pub enum LabResultServiceError {
    /// The upload could not be read as CSV or had no data rows
    #[error("Malformed upload: {0}")]
    MalformedUpload(String),

    /// Every data row in the upload was rejected
    #[error("Upload contained no valid rows ({} rejected)", .rejected.len())]
    NoValidRows { rejected: Vec<MalformedRow> },

    /// No stored result matches the identifier
    #[error("Biomarker not found: {identifier}")]
    NotFound {
        identifier: String,
        available: Vec<String>,
    },

    /// Insufficient data error
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Trait for lab result service operations
#[async_trait]
pub trait LabResultServiceTrait {
    /// Get the stored collection in upload order
    async fn get_all_results(&self) -> Result<Vec<LabResult>, LabResultServiceError>;

    /// Ingest a CSV upload and replace the stored collection with it
    async fn upload_results(&self, csv: &[u8]) -> Result<IngestionReport, LabResultServiceError>;

    /// Get recommendations for the stored collection
    async fn get_recommendations(&self) -> Result<PatientRecommendations, LabResultServiceError>;

    /// Get the biological age estimate for the stored collection
    async fn get_biological_age(&self) -> Result<BiologicalAge, LabResultServiceError>;

    /// Get the detail view for one biomarker
    async fn get_biomarker_detail(
        &self,
        identifier: &str,
    ) -> Result<BiomarkerDetail, LabResultServiceError>;
}

/// Lab result service for domain logic
pub struct LabResultService<R: LabResultRepositoryTrait> {
    repository: R,
    policy: IngestionPolicy,
    resolver: Box<dyn BiomarkerResolver>,
    catalog: EducationCatalog,
}

impl<R: LabResultRepositoryTrait> LabResultService<R> {
    /// Create a new lab result service with strict ingestion, fuzzy title
    /// matching and the default education content
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            policy: IngestionPolicy::default(),
            resolver: Box::new(FuzzyTitleResolver),
            catalog: EducationCatalog::default(),
        }
    }

    /// Use a different ingestion policy
    pub fn with_policy(mut self, policy: IngestionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a different biomarker resolver
    pub fn with_resolver(mut self, resolver: impl BiomarkerResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Use a different education catalog
    pub fn with_catalog(mut self, catalog: EducationCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> LabResultServiceError {
        LabResultServiceError::RepositoryError(err.to_string())
    }

    async fn load_results(&self) -> Result<Vec<LabResult>, LabResultServiceError> {
        let data_results = self
            .repository
            .load()
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(data_results
            .into_iter()
            .map(conversions::convert_to_domain_result)
            .collect())
    }
}

#[async_trait]
impl<R: LabResultRepositoryTrait + Send + Sync> LabResultServiceTrait for LabResultService<R> {
    async fn get_all_results(&self) -> Result<Vec<LabResult>, LabResultServiceError> {
        self.load_results().await
    }

    async fn upload_results(&self, csv: &[u8]) -> Result<IngestionReport, LabResultServiceError> {
        let rows = parse_csv(csv).map_err(|e| LabResultServiceError::MalformedUpload(e.to_string()))?;
        if rows.is_empty() {
            return Err(LabResultServiceError::MalformedUpload(
                "Upload contains no data rows".to_string(),
            ));
        }

        let report = ingest_rows(rows, self.policy);
        if report.results.is_empty() {
            warn!("Rejected upload: all {} rows were malformed", report.rejected.len());
            return Err(LabResultServiceError::NoValidRows {
                rejected: report.rejected,
            });
        }

        let data_results = report
            .results
            .iter()
            .map(conversions::convert_to_data_result)
            .collect();
        self.repository
            .replace(data_results)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!(
            "Ingested {} lab results ({} rows rejected)",
            report.accepted(),
            report.rejected.len()
        );
        Ok(report)
    }

    async fn get_recommendations(&self) -> Result<PatientRecommendations, LabResultServiceError> {
        let results = self.load_results().await?;
        Ok(generate_recommendations(&results))
    }

    async fn get_biological_age(&self) -> Result<BiologicalAge, LabResultServiceError> {
        let results = self.load_results().await?;
        estimate_biological_age(&results).ok_or_else(|| {
            LabResultServiceError::InsufficientData(
                "No lab results available to estimate biological age".to_string(),
            )
        })
    }

    async fn get_biomarker_detail(
        &self,
        identifier: &str,
    ) -> Result<BiomarkerDetail, LabResultServiceError> {
        let results = self.load_results().await?;

        match self.resolver.resolve(&results, identifier) {
            Some(result) => {
                debug!("Resolved biomarker '{}' to '{}'", identifier, result.title);
                Ok(build_detail(result, &self.catalog))
            }
            None => Err(LabResultServiceError::NotFound {
                identifier: identifier.to_string(),
                available: results.into_iter().map(|result| result.title).collect(),
            }),
        }
    }
}

/// Create a lab result service over `repository`
pub fn create_lab_result_service<R>(
    repository: R,
    policy: IngestionPolicy,
    catalog: EducationCatalog,
) -> impl LabResultServiceTrait + Send + Sync
where
    R: LabResultRepositoryTrait + 'static,
{
    LabResultService::new(repository)
        .with_policy(policy)
        .with_catalog(catalog)
}

/// Create a default lab result service using the repository from data layer
pub fn create_default_lab_result_service() -> impl LabResultServiceTrait + Send + Sync {
    LabResultService::new(patient_dashboard_data::repository::LabResultRepository::default())
}

/// Create a mock lab result service for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_lab_result_service() -> impl LabResultServiceTrait + Send + Sync {
    crate::testing::MockLabResultService::new()
}
