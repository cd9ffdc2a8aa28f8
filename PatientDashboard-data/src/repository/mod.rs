// Repository module structure
pub mod errors;
mod lab_results;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryStorage;
pub use lab_results::{LabResultRepository, LabResultRepositoryTrait, StorageStatus};
pub use storage::JsonFileStorage;

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use lab_results::tests;
