//! Authentication module for the PatientDashboard API
//!
//! A single admin account signs in with a password and receives a JWT that
//! unlocks the upload endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, warn};
use validator::{Validate, ValidationErrors};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::auth::logging::{
    log_auth_event, log_failed_login, log_successful_login, AuthEvent, AuthEventType,
};

// Settings loaded from the environment
pub mod config;

// Include logging module
pub mod logging;

// bcrypt helpers
pub mod password;

// Add token module for JWT handling
pub mod token;

pub use config::AuthConfig;

/// Authentication claims for JSON Web Tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Claims {
    /// Subject (admin username)
    pub sub: String,
    /// Admin username
    pub username: String,
    /// Issuer
    pub iss: String,
    /// Issued at (as timestamp)
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LoginRequest {
    /// Admin username
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LoginResponse {
    /// JWT to send as `Authorization: Bearer <token>`
    pub token: String,
}

fn auth_error(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "message": message.into(),
        })),
    )
        .into_response()
}

fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

fn elapsed_ms(start_time: Instant) -> u64 {
    start_time.elapsed().as_millis() as u64
}

/// Authentication middleware for protected routes.
///
/// A request without a bearer token gets 401; a token that does not validate
/// gets 403. Valid claims are added to the request extensions.
pub async fn auth_middleware(
    State(config): State<Arc<AuthConfig>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let request_path = req.uri().path().to_string();
    let start_time = Instant::now();

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    let Some(token) = token else {
        debug!("Missing bearer token for {}", request_path);

        let event = AuthEvent::new(AuthEventType::AccessDenied, None, false)
            .with_details("Missing bearer token")
            .with_resource(request_path)
            .with_duration(elapsed_ms(start_time))
            .with_auth_method("jwt");
        log_auth_event(event);

        return auth_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Authentication token required",
        );
    };

    match token::validate_token(&config, &token) {
        Ok(claims) => {
            let event = AuthEvent::new(AuthEventType::TokenValidation, Some(&claims.username), true)
                .with_resource(request_path)
                .with_duration(elapsed_ms(start_time))
                .with_auth_method("jwt");
            log_auth_event(event);

            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            warn!("Rejected token for {}: {}", request_path, e);

            let event = AuthEvent::new(AuthEventType::TokenValidation, None, false)
                .with_details(e.to_string())
                .with_resource(request_path)
                .with_duration(elapsed_ms(start_time))
                .with_auth_method("jwt");
            log_auth_event(event);

            auth_error(StatusCode::FORBIDDEN, "forbidden", "Invalid or expired token")
        }
    }
}

/// Configure CORS and security headers for the application
#[cfg(feature = "with-web")]
pub fn configure_auth(app: axum::Router) -> axum::Router {
    use axum::http::{HeaderName, HeaderValue, Method};
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::set_header::SetResponseHeaderLayer;

    // The dashboard is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
        ));

    app.layer(cors).layer(security_headers)
}

/// Login endpoint - authenticate the admin with username and password
#[cfg_attr(feature = "with-api", utoipa::path(
    post,
    path = "/api/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful. Send the token as 'Bearer {token}' on admin requests.", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    operation_id = "login"
))]
pub async fn login(
    State(config): State<Arc<AuthConfig>>,
    Json(login_req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, Response> {
    let start_time = Instant::now();

    if let Err(errors) = login_req.validate() {
        let message = validation_message(&errors);
        log_failed_login(&login_req.username, &message, elapsed_ms(start_time));
        return Err(auth_error(StatusCode::BAD_REQUEST, "validation_error", message));
    }

    // The hash is checked even for an unknown username
    let password_ok = password::verify_password(
        login_req.password.clone(),
        config.admin_password_hash().to_string(),
    )
    .await
    .map_err(|e| {
        error!("Password verification failed: {}", e);
        auth_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "server_error",
            "Failed to verify credentials",
        )
    })?;

    if !password_ok || login_req.username != config.admin_username {
        log_failed_login(
            &login_req.username,
            "Invalid username or password",
            elapsed_ms(start_time),
        );
        return Err(auth_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "Invalid credentials",
        ));
    }

    let token = token::generate_token(&config, &login_req.username).map_err(|e| {
        error!("Failed to generate token: {}", e);
        auth_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "server_error",
            "Failed to generate token",
        )
    })?;

    log_successful_login(&login_req.username, elapsed_ms(start_time));
    Ok(Json(LoginResponse { token }))
}
