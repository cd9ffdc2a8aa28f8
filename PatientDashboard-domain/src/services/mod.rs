pub mod classification;
pub mod ingestion;
pub mod recommendations;
pub mod biological_age;
pub mod biomarker;
pub mod education;
pub mod lab_results;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use lab_results::{
    create_default_lab_result_service, create_lab_result_service, LabResultService,
    LabResultServiceError, LabResultServiceTrait,
};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use lab_results::create_mock_lab_result_service;
