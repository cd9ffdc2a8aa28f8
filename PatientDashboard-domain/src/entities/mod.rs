// Domain entities and value objects
pub mod lab_result;
pub mod analytics;
pub mod ingestion;
pub mod conversions;

// Re-export common types for easier imports
pub use lab_result::{LabResult, LabStatus, DEFAULT_UNIT};
pub use analytics::{BiologicalAge, BiomarkerDetail, BiomarkerEducation, HistoryPoint, PatientRecommendations};
pub use ingestion::{IngestionReport, MalformedRow};
