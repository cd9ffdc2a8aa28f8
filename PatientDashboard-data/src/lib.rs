// PatientDashboard Data
// This crate handles lab result persistence and storage configuration

// Storage location and backend selection
pub mod store;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
