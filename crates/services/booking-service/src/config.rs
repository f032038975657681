//! Booking service configuration.

use std::env;

use common::{AppError, AppResult, DatabaseConfig, JwtConfig, ServiceConfig};
use domain::{DEFAULT_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH};

const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Booking service configuration.
#[derive(Debug, Clone)]
pub struct BookingServiceConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl BookingServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Fails when `JWT_SECRET` is missing in a release build, or shorter than
    /// `MIN_JWT_SECRET_LENGTH`.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let jwt = JwtConfig {
            secret,
            expiration_hours: parse_var("JWT_EXPIRATION_HOURS")
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
        };
        validate_jwt(&jwt)?;

        let database_defaults = DatabaseConfig::default();
        let service_defaults = ServiceConfig::default();

        Ok(Self {
            service: ServiceConfig {
                service_name: "booking-service".to_string(),
                host: env::var("SERVER_HOST").unwrap_or(service_defaults.host),
                port: parse_var("SERVER_PORT").unwrap_or(service_defaults.port),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(database_defaults.url),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(database_defaults.max_connections),
                min_connections: database_defaults.min_connections,
            },
            jwt,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Reject signing secrets too short to be safe.
pub fn validate_jwt(jwt: &JwtConfig) -> AppResult<()> {
    if jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(AppError::internal(format!(
            "JWT_SECRET must be at least {} characters long",
            MIN_JWT_SECRET_LENGTH
        )));
    }
    if jwt.expiration_hours <= 0 {
        return Err(AppError::internal("JWT_EXPIRATION_HOURS must be positive"));
    }
    Ok(())
}
