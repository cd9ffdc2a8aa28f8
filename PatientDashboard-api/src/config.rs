//! Application configuration assembled from the environment

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use patient_dashboard_data::repository::RepositoryError;
use patient_dashboard_data::store::StoreConfig;
use patient_dashboard_domain::auth::token::SecurityError;
use patient_dashboard_domain::auth::AuthConfig;
use patient_dashboard_domain::services::education::EducationCatalogError;
use patient_dashboard_domain::services::ingestion::IngestionPolicy;

/// Port when `PORT` is not set
pub const DEFAULT_PORT: u16 = 8000;

/// Upload body limit when `MAX_UPLOAD_BYTES` is not set (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration errors raised while reading the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Storage configuration error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("Authentication configuration error: {0}")]
    Auth(#[from] SecurityError),

    #[error(transparent)]
    Education(#[from] EducationCatalogError),
}

/// Everything the server needs to start
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port to listen on
    pub port: u16,
    /// Deployment environment name, reported by `/health`
    pub environment: String,
    /// Maximum accepted upload body in bytes
    pub max_upload_bytes: usize,
    /// Where lab results are stored
    pub store: StoreConfig,
    /// Admin login and token settings
    pub auth: AuthConfig,
    /// How rows with unparseable values are treated
    pub ingestion_policy: IngestionPolicy,
    /// Optional JSON file with biomarker education content
    pub education_catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Read the configuration from environment variables.
    ///
    /// `PORT`, `APP_ENV`, `MAX_UPLOAD_BYTES`, `INGESTION_POLICY` and
    /// `EDUCATION_CATALOG_PATH` are read here; storage and auth settings are
    /// read by [`StoreConfig::from_env`] and [`AuthConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_var("PORT", DEFAULT_PORT)?;
        let max_upload_bytes = parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        let ingestion_policy = match env::var("INGESTION_POLICY") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "INGESTION_POLICY",
                value,
            })?,
            Err(_) => IngestionPolicy::default(),
        };

        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let education_catalog_path = env::var("EDUCATION_CATALOG_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let config = Self {
            port,
            environment,
            max_upload_bytes,
            store: StoreConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            ingestion_policy,
            education_catalog_path,
        };

        info!(
            "Configuration loaded: environment={}, port={}, ingestion={:?}, data_dir={}",
            config.environment,
            config.port,
            config.ingestion_policy,
            config.store.data_dir.display()
        );

        Ok(config)
    }

    /// Configuration with defaults around the given store and auth settings
    pub fn new(store: StoreConfig, auth: AuthConfig) -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: "development".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            store,
            auth,
            ingestion_policy: IngestionPolicy::default(),
            education_catalog_path: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}
