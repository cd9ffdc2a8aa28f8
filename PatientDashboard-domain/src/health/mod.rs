//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;

use async_trait::async_trait;
use patient_dashboard_data::repository::{LabResultRepositoryTrait, StorageStatus};

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the lab result storage
    async fn check_storage_status(&self) -> StorageStatus;
}

/// Map a storage status to a health component
pub fn storage_component(status: StorageStatus) -> HealthComponent {
    match status {
        StorageStatus::Healthy => HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        },
        StorageStatus::Degraded(details) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some(details),
        },
        StorageStatus::Unavailable(details) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(details),
        },
    }
}

/// Health service that reports on the lab result storage
#[derive(Debug, Clone)]
pub struct StorageHealthService<R> {
    repository: R,
}

impl<R: LabResultRepositoryTrait> StorageHealthService<R> {
    /// Create a health service over `repository`
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> HealthServiceTrait for StorageHealthService<R>
where
    R: LabResultRepositoryTrait + std::fmt::Debug,
{
    async fn get_system_health(&self) -> SystemHealth {
        let storage = storage_component(self.check_storage_status().await);

        let overall_status = match storage.status {
            ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
            ComponentStatus::Degraded => SystemStatus::Degraded,
            ComponentStatus::Healthy => SystemStatus::Healthy,
        };

        SystemHealth {
            status: overall_status,
            components: vec![("storage".to_string(), storage)].into_iter().collect(),
        }
    }

    async fn check_storage_status(&self) -> StorageStatus {
        self.repository.storage_status().await
    }
}
