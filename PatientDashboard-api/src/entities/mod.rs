// Public entities for the PatientDashboard API
// Lab results and analytics are served as the domain types; this module holds
// the response shapes that only exist at the HTTP boundary

// Error and message bodies
pub mod common;

// Upload responses
pub mod lab_result;
