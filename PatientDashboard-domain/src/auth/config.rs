use std::env;
use std::fmt;

use chrono::Duration;
use tracing::{info, warn};

use crate::auth::password::hash_password;
use crate::auth::token::SecurityError;

/// Admin username when `ADMIN_USERNAME` is not set
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Token issuer when `JWT_ISSUER` is not set
pub const DEFAULT_JWT_ISSUER: &str = "patient-dashboard-api";

/// Token lifetime when `TOKEN_TTL_HOURS` is not set
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEVELOPMENT_JWT_SECRET: &str = "patient-dashboard-development-secret";

/// Settings for admin login and token signing
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for HS256 tokens
    pub jwt_secret: String,
    /// `iss` claim written and required
    pub issuer: String,
    /// The only account that can sign in
    pub admin_username: String,
    admin_password_hash: String,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("admin_username", &self.admin_username)
            .field("admin_password_hash", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl AuthConfig {
    /// Create a configuration with the default issuer and token lifetime
    pub fn new(
        jwt_secret: impl Into<String>,
        admin_username: impl Into<String>,
        admin_password_hash: impl Into<String>,
    ) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            issuer: DEFAULT_JWT_ISSUER.to_string(),
            admin_username: admin_username.into(),
            admin_password_hash: admin_password_hash.into(),
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }

    /// Set the token issuer
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set the token lifetime
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// bcrypt hash of the admin password
    pub fn admin_password_hash(&self) -> &str {
        &self.admin_password_hash
    }

    /// Build the configuration from environment variables.
    ///
    /// Reads `JWT_SECRET`, `JWT_ISSUER`, `ADMIN_USERNAME`, `ADMIN_PASSWORD_HASH`,
    /// `ADMIN_PASSWORD` and `TOKEN_TTL_HOURS`. A plain `ADMIN_PASSWORD` is hashed
    /// here; with neither password variable the development password is used.
    pub fn from_env() -> Result<Self, SecurityError> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                warn!("JWT_SECRET is not set, using the development signing secret");
                DEVELOPMENT_JWT_SECRET.to_string()
            }
        };

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_JWT_ISSUER.to_string());

        let admin_username = env::var("ADMIN_USERNAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string());

        let admin_password_hash = match (env::var("ADMIN_PASSWORD_HASH"), env::var("ADMIN_PASSWORD")) {
            (Ok(hash), _) if !hash.trim().is_empty() => hash,
            (_, Ok(password)) if !password.is_empty() => hash_password(&password)?,
            _ => {
                warn!(
                    "Neither ADMIN_PASSWORD_HASH nor ADMIN_PASSWORD is set, using the default admin password"
                );
                hash_password(DEFAULT_ADMIN_PASSWORD)?
            }
        };

        let token_ttl_hours = match env::var("TOKEN_TTL_HOURS") {
            Ok(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|hours| *hours > 0)
                .ok_or_else(|| {
                    SecurityError::ConfigError(format!("Invalid TOKEN_TTL_HOURS: {}", value))
                })?,
            Err(_) => DEFAULT_TOKEN_TTL_HOURS,
        };

        info!(
            "Admin authentication configured for '{}' (tokens valid for {}h)",
            admin_username, token_ttl_hours
        );

        Ok(Self {
            jwt_secret,
            issuer,
            admin_username,
            admin_password_hash,
            token_ttl: Duration::hours(token_ttl_hours),
        })
    }
}
