use axum::http::{header, StatusCode};
use patient_dashboard_domain::entities::LabResult;
use patient_dashboard_domain::testing::{MockHealthService, MockLabResultService};
use serde_json::json;
use tower::ServiceExt;

use super::{admin_token, body_json, get, test_app, upload_request};

const CSV_UPLOAD: &str = "title,value,range,unit,date\n\
    Glucose,110,70-100,mg/dL,2024-01-05\n\
    Vitamin D,45,30-100,ng/mL,2024-01-05\n\
    Iron,40,60-170,ug/dL,2024-01-05\n";

fn stored_results() -> Vec<LabResult> {
    vec![
        LabResult::new("Glucose", 110.0, "70-100", Some("mg/dL".to_string()), None),
        LabResult::new("Vitamin D", 45.0, "30-100", Some("ng/mL".to_string()), None),
    ]
}

#[tokio::test]
async fn test_welcome_message() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockLabResultService::new(), MockHealthService::new(), dir.path());

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Welcome to the Patient Dashboard API"
    );
}

#[tokio::test]
async fn test_security_headers_applied() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockLabResultService::new(), MockHealthService::new(), dir.path());

    let response = app.oneshot(get("/api/lab-results")).await.unwrap();

    assert_eq!(
        response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
}

#[tokio::test]
async fn test_get_lab_results_empty() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockLabResultService::new(), MockHealthService::new(), dir.path());

    let response = app.oneshot(get("/api/lab-results")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_get_lab_results_returns_stored_order() {
    let dir = tempfile::tempdir().unwrap();
    let service = MockLabResultService::new().with_results(stored_results());
    let app = test_app(service, MockHealthService::new(), dir.path());

    let response = app.oneshot(get("/api/lab-results")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["title"], "Glucose");
    assert_eq!(body[0]["status"], "high");
    assert_eq!(body[1]["title"], "Vitamin D");
    assert_eq!(body[1]["status"], "normal");
}

#[tokio::test]
async fn test_get_recommendations_counts_abnormal() {
    let dir = tempfile::tempdir().unwrap();
    let service = MockLabResultService::new().with_results(stored_results());
    let app = test_app(service, MockHealthService::new(), dir.path());

    let response = app.oneshot(get("/api/recommendations")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["clinician_summary"]
        .as_str()
        .unwrap()
        .contains("1 biomarker is outside the normal range"));
    assert!(!body["recommended_foods"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_biological_age_without_data_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockLabResultService::new(), MockHealthService::new(), dir.path());

    let response = app.oneshot(get("/api/biological-age")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "insufficient_data");
}

#[tokio::test]
async fn test_biological_age_with_data() {
    let dir = tempfile::tempdir().unwrap();
    let service = MockLabResultService::new().with_results(stored_results());
    let app = test_app(service, MockHealthService::new(), dir.path());

    let response = app.oneshot(get("/api/biological-age")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["chronologicalAge"], 35.0);
    assert!(body["biologicalAge"].is_number());
    assert!(body["analysis"].as_str().unwrap().contains("years"));
}

#[tokio::test]
async fn test_biomarker_detail_with_category() {
    let dir = tempfile::tempdir().unwrap();
    let service = MockLabResultService::new().with_results(stored_results());
    let app = test_app(service, MockHealthService::new(), dir.path());

    let response = app
        .oneshot(get("/api/biomarker/vitamins/vitamin-d"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Vitamin D");
    assert_eq!(body["value"], 45.0);
    assert!(body["description"].is_string());
    assert!(body["whyItMatters"].is_string());
    assert_eq!(body["history"].as_array().unwrap().len(), 5);
    assert_eq!(body["history"][4]["value"], 45.0);
}

#[tokio::test]
async fn test_biomarker_substring_match() {
    let dir = tempfile::tempdir().unwrap();
    let service = MockLabResultService::new().with_results(stored_results());
    let app = test_app(service, MockHealthService::new(), dir.path());

    let response = app.oneshot(get("/api/biomarker/gluc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Glucose");
}

#[tokio::test]
async fn test_biomarker_not_found_lists_available() {
    let dir = tempfile::tempdir().unwrap();
    let service = MockLabResultService::new().with_results(stored_results());
    let app = test_app(service, MockHealthService::new(), dir.path());

    let response = app.oneshot(get("/api/biomarker/zinc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_found");
    assert_eq!(
        body["details"]["available_biomarkers"],
        json!(["Glucose", "Vitamin D"])
    );
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let service = MockLabResultService::new().with_storage_failure();
    let app = test_app(service, MockHealthService::new(), dir.path());

    let response = app.oneshot(get("/api/lab-results")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "internal_error");
}

#[tokio::test]
async fn test_upload_without_token_is_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockLabResultService::new(), MockHealthService::new(), dir.path());

    let response = app
        .oneshot(upload_request(None, "labs.csv", "text/csv", CSV_UPLOAD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_with_invalid_token_is_forbidden() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockLabResultService::new(), MockHealthService::new(), dir.path());

    let response = app
        .oneshot(upload_request(
            Some("not.a.token"),
            "labs.csv",
            "text/csv",
            CSV_UPLOAD,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_upload_replaces_results_and_cleans_staging() {
    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let service = MockLabResultService::new().with_results(stored_results());
    let app = test_app(service, MockHealthService::new(), &uploads);
    let token = admin_token();

    let response = app
        .clone()
        .oneshot(upload_request(Some(&token), "labs.csv", "text/csv", CSV_UPLOAD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["rejected"], json!([]));

    let response = app.oneshot(get("/api/lab-results")).await.unwrap();
    let body = body_json(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|result| result["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Glucose", "Vitamin D", "Iron"]);
    assert_eq!(body[2]["status"], "low");

    let leftovers = std::fs::read_dir(&uploads).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_upload_accepts_csv_extension_with_generic_type() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockLabResultService::new(), MockHealthService::new(), dir.path());

    let response = app
        .oneshot(upload_request(
            Some(&admin_token()),
            "export.csv",
            "application/octet-stream",
            CSV_UPLOAD,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_rejects_non_csv() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockLabResultService::new(), MockHealthService::new(), dir.path());

    let response = app
        .oneshot(upload_request(
            Some(&admin_token()),
            "labs.pdf",
            "application/pdf",
            "%PDF-1.4",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Only CSV files are allowed");
}

#[tokio::test]
async fn test_upload_with_only_bad_rows_keeps_previous_results() {
    let dir = tempfile::tempdir().unwrap();
    let service = MockLabResultService::new().with_results(stored_results());
    let app = test_app(service, MockHealthService::new(), dir.path());

    let response = app
        .clone()
        .oneshot(upload_request(
            Some(&admin_token()),
            "labs.csv",
            "text/csv",
            "title,value,range\nGlucose,high,70-100\n",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["details"]["rejected"][0]["line"], 2);
    assert_eq!(body["details"]["rejected"][0]["title"], "Glucose");

    let response = app.oneshot(get("/api/lab-results")).await.unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_upload_with_partial_rejections() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockLabResultService::new(), MockHealthService::new(), dir.path());

    let response = app
        .oneshot(upload_request(
            Some(&admin_token()),
            "labs.csv",
            "text/csv",
            "title,value,range\nGlucose,90,70-100\nIron,,60-170\n",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["rejected"][0]["reason"], "missing value");
}

#[tokio::test]
async fn test_upload_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockLabResultService::new(), MockHealthService::new(), dir.path());

    let mut csv = String::from("title,value,range\n");
    while csv.len() < 128 * 1024 {
        csv.push_str("Glucose,90,70-100\n");
    }

    let response = app
        .oneshot(upload_request(Some(&admin_token()), "labs.csv", "text/csv", &csv))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockLabResultService::new(), MockHealthService::new(), dir.path());

    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{b}--\r\n",
        b = super::BOUNDARY
    );
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/admin/upload-lab-results")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", super::BOUNDARY),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
        .body(axum::body::Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No file uploaded");
}
