use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Types of authentication events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthEventType {
    /// Successful admin login
    Login,
    /// Failed login attempt
    FailedLogin,
    /// Bearer token check on a protected route
    TokenValidation,
    /// Request to a protected route without a token
    AccessDenied,
}

impl std::fmt::Display for AuthEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthEventType::Login => write!(f, "LOGIN"),
            AuthEventType::FailedLogin => write!(f, "FAILED_LOGIN"),
            AuthEventType::TokenValidation => write!(f, "TOKEN_VALIDATION"),
            AuthEventType::AccessDenied => write!(f, "ACCESS_DENIED"),
        }
    }
}

/// Authentication event record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    /// Type of authentication event
    pub event_type: AuthEventType,
    /// Username (if available)
    pub username: Option<String>,
    /// Timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
    /// Whether the event was successful
    pub success: bool,
    /// Additional details about the event
    pub details: Option<String>,
    /// The resource being accessed (if applicable)
    pub resource: Option<String>,
    /// Duration of the operation in milliseconds (if applicable)
    pub duration_ms: Option<u64>,
    /// Authentication method used (password, jwt)
    pub auth_method: Option<String>,
}

impl AuthEvent {
    /// Create a new authentication event
    pub fn new(event_type: AuthEventType, username: Option<&str>, success: bool) -> Self {
        Self {
            event_type,
            username: username.map(String::from),
            timestamp: Utc::now(),
            success,
            details: None,
            resource: None,
            duration_ms: None,
            auth_method: None,
        }
    }

    /// Set the details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Set the resource
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Set the authentication method
    pub fn with_auth_method(mut self, auth_method: impl Into<String>) -> Self {
        self.auth_method = Some(auth_method.into());
        self
    }
}

/// Log an authentication event
pub fn log_auth_event(event: AuthEvent) {
    let username = event.username.as_deref().unwrap_or("anonymous");
    let details = event.details.as_deref().unwrap_or("");
    let resource = event.resource.as_deref().unwrap_or("-");

    if event.success {
        info!(
            event_type = %event.event_type,
            duration_ms = event.duration_ms,
            "AUTH-LOG [{}] [{}] [SUCCESS] [{}] {}",
            event.event_type,
            username,
            resource,
            details
        );
    } else {
        warn!(
            event_type = %event.event_type,
            duration_ms = event.duration_ms,
            "AUTH-LOG [{}] [{}] [FAILURE] [{}] {}",
            event.event_type,
            username,
            resource,
            details
        );
    }
}

/// Log a successful login
pub fn log_successful_login(username: &str, duration_ms: u64) {
    let event = AuthEvent::new(AuthEventType::Login, Some(username), true)
        .with_details("Login successful")
        .with_duration(duration_ms)
        .with_auth_method("password");

    log_auth_event(event);
}

/// Log a failed login attempt
pub fn log_failed_login(username: &str, reason: &str, duration_ms: u64) {
    let event = AuthEvent::new(AuthEventType::FailedLogin, Some(username), false)
        .with_details(reason)
        .with_duration(duration_ms)
        .with_auth_method("password");

    log_auth_event(event);
}
