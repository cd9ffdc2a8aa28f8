// Storage modules
pub mod config;

// Re-export storage configuration
pub use config::*;
