pub mod handlers;
pub mod routes;

use axum::Router;

use crate::config::{AppConfig, ConfigError};

pub use routes::{create_app, AppState};

/// Create the application router from the loaded configuration
pub fn create_application(config: &AppConfig) -> Result<Router, ConfigError> {
    let state = AppState::from_config(config)?;
    Ok(create_app(state))
}
