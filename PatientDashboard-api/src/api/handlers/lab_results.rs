use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Json, Multipart, Path, State},
    http::StatusCode,
    Extension,
};
use serde_json::json;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use patient_dashboard_domain::auth::Claims;
use patient_dashboard_domain::entities::{
    BiologicalAge, BiomarkerDetail, LabResult, PatientRecommendations,
};
use patient_dashboard_domain::services::{LabResultServiceError, LabResultServiceTrait};

use crate::entities::common::ErrorResponse;
use crate::entities::lab_result::UploadResponse;

/// Service type for dependency injection
pub type LabResultService = Arc<dyn LabResultServiceTrait + Send + Sync>;

/// Where uploaded files are staged before ingestion
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub uploads_dir: PathBuf,
}

const CSV_CONTENT_TYPES: [&str; 2] = ["text/csv", "application/vnd.ms-excel"];

/// Map a domain error to the public error body
fn map_service_error(err: LabResultServiceError) -> ErrorResponse {
    match err {
        LabResultServiceError::NotFound {
            identifier,
            available,
        } => {
            info!("Biomarker not found: {}", identifier);
            ErrorResponse::not_found(
                format!("Biomarker '{}' not found", identifier),
                Some(json!({ "available_biomarkers": available })),
            )
        }
        LabResultServiceError::InsufficientData(message) => {
            info!("Insufficient data: {}", message);
            ErrorResponse::insufficient_data(message)
        }
        LabResultServiceError::MalformedUpload(message) => {
            warn!("Malformed upload: {}", message);
            ErrorResponse::bad_request(message, None)
        }
        LabResultServiceError::NoValidRows { rejected } => {
            warn!("Upload rejected, {} invalid rows", rejected.len());
            ErrorResponse::bad_request(
                "No valid lab results found in upload",
                Some(json!({ "rejected": rejected })),
            )
        }
        LabResultServiceError::RepositoryError(message) => {
            error!("Storage error: {}", message);
            ErrorResponse::internal_error()
        }
    }
}

fn map_multipart_error(err: MultipartError) -> ErrorResponse {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Upload exceeds the body limit");
        ErrorResponse::payload_too_large("Uploaded file is too large")
    } else {
        warn!("Invalid multipart body: {}", err.body_text());
        ErrorResponse::bad_request(format!("Invalid multipart body: {}", err.body_text()), None)
    }
}

/// Whether the part looks like a CSV file
fn is_csv_upload(content_type: Option<&str>, file_name: &str) -> bool {
    let by_type = content_type
        .map(|value| value.split(';').next().unwrap_or("").trim().to_lowercase())
        .is_some_and(|value| CSV_CONTENT_TYPES.contains(&value.as_str()));

    by_type || file_name.to_lowercase().ends_with(".csv")
}

/// Strip directories and unusual characters from a client-supplied file name
fn sanitize_file_name(file_name: &str) -> String {
    let base = FsPath::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "upload.csv".to_string()
    } else {
        cleaned
    }
}

/// Write the upload to `<uploads_dir>/<uuid>-<name>`
async fn stage_upload(
    uploads_dir: &FsPath,
    file_name: &str,
    contents: &[u8],
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(uploads_dir).await?;
    let path = uploads_dir.join(format!("{}-{}", Uuid::new_v4(), sanitize_file_name(file_name)));
    tokio::fs::write(&path, contents).await?;
    Ok(path)
}

/// Get the stored lab results
#[utoipa::path(
    get,
    path = "/api/lab-results",
    responses(
        (status = 200, description = "Stored lab results in upload order", body = [LabResult]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lab_results"
)]
#[instrument(skip(service))]
pub async fn get_lab_results(
    State(service): State<LabResultService>,
) -> Result<Json<Vec<LabResult>>, ErrorResponse> {
    info!("Fetching lab results");

    let results = service.get_all_results().await.map_err(map_service_error)?;
    info!("Returning {} lab results", results.len());
    Ok(Json(results))
}

/// Get health recommendations for the stored lab results
#[utoipa::path(
    get,
    path = "/api/recommendations",
    responses(
        (status = 200, description = "Recommendations", body = PatientRecommendations),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lab_results"
)]
#[instrument(skip(service))]
pub async fn get_recommendations(
    State(service): State<LabResultService>,
) -> Result<Json<PatientRecommendations>, ErrorResponse> {
    info!("Generating recommendations");

    let recommendations = service
        .get_recommendations()
        .await
        .map_err(map_service_error)?;
    Ok(Json(recommendations))
}

/// Get the biological age estimate for the stored lab results
#[utoipa::path(
    get,
    path = "/api/biological-age",
    responses(
        (status = 200, description = "Biological age estimate", body = BiologicalAge),
        (status = 404, description = "No lab results stored", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lab_results"
)]
#[instrument(skip(service))]
pub async fn get_biological_age(
    State(service): State<LabResultService>,
) -> Result<Json<BiologicalAge>, ErrorResponse> {
    info!("Estimating biological age");

    let estimate = service
        .get_biological_age()
        .await
        .map_err(map_service_error)?;
    Ok(Json(estimate))
}

/// Get the detail view for one biomarker
#[utoipa::path(
    get,
    path = "/api/biomarker/{biomarker}",
    params(
        ("biomarker" = String, Path, description = "Biomarker title or identifier, e.g. `vitamin-d`")
    ),
    responses(
        (status = 200, description = "Biomarker detail", body = BiomarkerDetail),
        (status = 404, description = "No stored result matches; details list the available biomarkers", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lab_results"
)]
#[instrument(skip(service))]
pub async fn get_biomarker(
    State(service): State<LabResultService>,
    Path(biomarker): Path<String>,
) -> Result<Json<BiomarkerDetail>, ErrorResponse> {
    lookup_biomarker(&service, &biomarker).await
}

/// Get the detail view for one biomarker; the category segment is ignored
#[utoipa::path(
    get,
    path = "/api/biomarker/{category}/{biomarker}",
    params(
        ("category" = String, Path, description = "Display category, not used for lookup"),
        ("biomarker" = String, Path, description = "Biomarker title or identifier")
    ),
    responses(
        (status = 200, description = "Biomarker detail", body = BiomarkerDetail),
        (status = 404, description = "No stored result matches; details list the available biomarkers", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lab_results"
)]
#[instrument(skip(service))]
pub async fn get_biomarker_in_category(
    State(service): State<LabResultService>,
    Path((_category, biomarker)): Path<(String, String)>,
) -> Result<Json<BiomarkerDetail>, ErrorResponse> {
    lookup_biomarker(&service, &biomarker).await
}

async fn lookup_biomarker(
    service: &LabResultService,
    biomarker: &str,
) -> Result<Json<BiomarkerDetail>, ErrorResponse> {
    info!("Fetching biomarker detail for '{}'", biomarker);

    let detail = service
        .get_biomarker_detail(biomarker)
        .await
        .map_err(map_service_error)?;
    Ok(Json(detail))
}

/// Upload a CSV of lab results, replacing the stored collection
#[utoipa::path(
    post,
    path = "/api/admin/upload-lab-results",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Form field `file` holding a CSV with columns title, value, range, unit, date"
    ),
    responses(
        (status = 200, description = "Lab results stored", body = UploadResponse),
        (status = 400, description = "Missing, non-CSV or unusable file", body = ErrorResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Invalid or expired token"),
        (status = 413, description = "File exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "lab_results"
)]
#[instrument(skip(service, settings, claims, multipart))]
pub async fn upload_lab_results(
    State(service): State<LabResultService>,
    Extension(settings): Extension<UploadSettings>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ErrorResponse> {
    info!("Lab results upload by {}", claims.username);

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        if !is_csv_upload(field.content_type(), &file_name) {
            warn!("Rejected non-CSV upload '{}'", file_name);
            return Err(ErrorResponse::bad_request("Only CSV files are allowed", None));
        }

        let contents = field.bytes().await.map_err(map_multipart_error)?;
        upload = Some((file_name, contents));
        break;
    }

    let Some((file_name, contents)) = upload else {
        return Err(ErrorResponse::bad_request("No file uploaded", None));
    };

    let staged = stage_upload(&settings.uploads_dir, &file_name, &contents)
        .await
        .map_err(|e| {
            error!("Failed to stage upload '{}': {}", file_name, e);
            ErrorResponse::internal_error()
        })?;
    info!("Staged upload '{}' at {}", file_name, staged.display());

    let outcome = match tokio::fs::read(&staged).await {
        Ok(bytes) => service.upload_results(&bytes).await.map_err(map_service_error),
        Err(e) => {
            error!("Failed to read staged upload {}: {}", staged.display(), e);
            Err(ErrorResponse::internal_error())
        }
    };

    if let Err(e) = tokio::fs::remove_file(&staged).await {
        warn!("Failed to remove staged upload {}: {}", staged.display(), e);
    }

    let report = outcome?;
    info!(
        "Stored {} lab results from '{}' ({} rejected)",
        report.accepted(),
        file_name,
        report.rejected.len()
    );
    Ok(Json(UploadResponse::from(report)))
}
