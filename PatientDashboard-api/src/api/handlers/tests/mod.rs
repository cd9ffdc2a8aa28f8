// Handler tests run the full router against mock domain services

mod lab_results_test;

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request},
    response::Response,
    Router,
};
use patient_dashboard_domain::auth::{token::generate_token, AuthConfig};
use patient_dashboard_domain::health::HealthServiceTrait;
use patient_dashboard_domain::services::LabResultServiceTrait;
use serde_json::Value;

use crate::api::handlers::lab_results::UploadSettings;
use crate::api::routes::{create_app, AppState};

pub const BOUNDARY: &str = "patient-dashboard-test-boundary";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig::new("handler-test-secret", "admin", bcrypt::hash("s3cret", 4).unwrap())
}

pub fn test_app(
    lab_results: impl LabResultServiceTrait + Send + Sync + 'static,
    health: impl HealthServiceTrait + 'static,
    uploads_dir: &Path,
) -> Router {
    create_app(AppState {
        lab_results: Arc::new(lab_results),
        health: Arc::new(health),
        auth: Arc::new(test_auth_config()),
        uploads: UploadSettings {
            uploads_dir: uploads_dir.to_path_buf(),
        },
        max_upload_bytes: 64 * 1024,
        environment: "test".to_string(),
    })
}

pub fn admin_token() -> String {
    generate_token(&test_auth_config(), "admin").unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Multipart upload with a single `file` part
pub fn upload_request(
    token: Option<&str>,
    file_name: &str,
    content_type: &str,
    contents: &str,
) -> Request<Body> {
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: {content_type}\r\n\r\n\
         {contents}\r\n\
         --{boundary}--\r\n",
        boundary = BOUNDARY,
    );

    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/admin/upload-lab-results")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
