// PatientDashboard Domain
// This crate contains the business logic for the patient lab-results dashboard

// Services that implement business logic
pub mod services;

// Admin authentication
pub mod auth;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the storage configuration from the data crate for convenience
pub use patient_dashboard_data::store;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
