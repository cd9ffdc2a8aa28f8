use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use patient_dashboard_data::repository::LabResultRepository;
use patient_dashboard_domain::auth::{auth_middleware, configure_auth, login, AuthConfig};
use patient_dashboard_domain::health::StorageHealthService;
use patient_dashboard_domain::services::create_lab_result_service;
use patient_dashboard_domain::services::education::EducationCatalog;

use crate::api::handlers::health::{self, Environment, HealthService};
use crate::api::handlers::lab_results::{self, LabResultService, UploadSettings};
use crate::config::{AppConfig, ConfigError};
use crate::entities::common::MessageResponse;
use crate::openapi::configure_swagger_routes;

/// Services and settings the router is built from
#[derive(Clone)]
pub struct AppState {
    pub lab_results: LabResultService,
    pub health: HealthService,
    pub auth: Arc<AuthConfig>,
    pub uploads: UploadSettings,
    pub max_upload_bytes: usize,
    pub environment: String,
}

impl AppState {
    /// Wire the services described by `config` around one shared repository
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let repository = LabResultRepository::from_config(&config.store);
        info!("Lab results stored in {}", repository.describe());

        let catalog = match &config.education_catalog_path {
            Some(path) => EducationCatalog::from_json_file(path)?,
            None => EducationCatalog::default(),
        };

        let lab_results: LabResultService = Arc::new(create_lab_result_service(
            repository.clone(),
            config.ingestion_policy,
            catalog,
        ));
        let health: HealthService = Arc::new(StorageHealthService::new(repository));

        Ok(Self {
            lab_results,
            health,
            auth: Arc::new(config.auth.clone()),
            uploads: UploadSettings {
                uploads_dir: config.store.uploads_dir(),
            },
            max_upload_bytes: config.max_upload_bytes,
            environment: config.environment.clone(),
        })
    }
}

async fn welcome() -> Json<MessageResponse> {
    debug!("Welcome endpoint called");
    Json(MessageResponse {
        message: "Welcome to the Patient Dashboard API".to_string(),
    })
}

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    // Read-only dashboard routes
    let lab_routes = Router::new()
        .route("/api/lab-results", get(lab_results::get_lab_results))
        .route("/api/recommendations", get(lab_results::get_recommendations))
        .route("/api/biological-age", get(lab_results::get_biological_age))
        .route("/api/biomarker/:biomarker", get(lab_results::get_biomarker))
        .route(
            "/api/biomarker/:category/:biomarker",
            get(lab_results::get_biomarker_in_category),
        );

    // Upload requires an admin token
    let admin_routes = Router::new()
        .route(
            "/api/admin/upload-lab-results",
            post(lab_results::upload_lab_results),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(Extension(state.uploads.clone()));

    let data_routes = lab_routes
        .merge(admin_routes)
        .with_state(state.lab_results.clone());

    debug!("Lab result routes configured");

    let auth_routes = Router::new()
        .route("/api/login", post(login))
        .with_state(state.auth.clone());

    let public_routes = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health::health_check))
        .layer(Extension(state.health.clone()))
        .layer(Extension(Environment(state.environment.clone())));

    debug!("Public routes configured");

    let app = Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(data_routes);

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    // Apply CORS and security headers
    let app = configure_auth(app);

    // Initialize health check service startup time
    health::initialize_server_start_time();

    app.layer(TraceLayer::new_for_http())
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}
