// Storage models
pub mod lab_result;

pub use lab_result::LabResult;
