use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Lab result endpoints
        crate::api::handlers::lab_results::get_lab_results,
        crate::api::handlers::lab_results::get_recommendations,
        crate::api::handlers::lab_results::get_biological_age,
        crate::api::handlers::lab_results::get_biomarker,
        crate::api::handlers::lab_results::get_biomarker_in_category,
        crate::api::handlers::lab_results::upload_lab_results,

        // Auth endpoints
        patient_dashboard_domain::auth::login
    ),
    components(
        schemas(
            // Entities
            crate::entities::common::ErrorResponse,
            crate::entities::common::MessageResponse,
            crate::entities::lab_result::UploadResponse,

            // Domain entities
            patient_dashboard_domain::entities::LabResult,
            patient_dashboard_domain::entities::LabStatus,
            patient_dashboard_domain::entities::PatientRecommendations,
            patient_dashboard_domain::entities::BiologicalAge,
            patient_dashboard_domain::entities::BiomarkerDetail,
            patient_dashboard_domain::entities::BiomarkerEducation,
            patient_dashboard_domain::entities::HistoryPoint,
            patient_dashboard_domain::entities::MalformedRow,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Auth schemas
            patient_dashboard_domain::auth::LoginRequest,
            patient_dashboard_domain::auth::LoginResponse,
            patient_dashboard_domain::auth::Claims
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "lab_results", description = "Lab results, recommendations, biological age and biomarker detail"),
        (name = "Authentication", description = "Admin authentication")
    ),
    info(
        title = "Patient Dashboard API",
        version = "0.1.0",
        description = "API for uploading lab results and deriving patient health insights",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "Patient Dashboard API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "lab_results"));
        assert!(tags.iter().any(|tag| tag.name == "Authentication"));

        let paths = &openapi.paths.paths;
        for path in [
            "/health",
            "/api/login",
            "/api/lab-results",
            "/api/recommendations",
            "/api/biological-age",
            "/api/biomarker/{biomarker}",
            "/api/biomarker/{category}/{biomarker}",
            "/api/admin/upload-lab-results",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
    }
}
