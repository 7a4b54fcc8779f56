use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// JWT configuration structure
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub jwt_secret: String,
    /// Access token expiration time in minutes
    pub access_token_expiration: i64,
    /// Refresh token expiration time in minutes
    pub refresh_token_expiration: i64,
    /// JWT issuer (optional)
    pub jwt_issuer: Option<String>,
    /// JWT audience (optional)
    pub jwt_audience: Option<String>,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JWT_SECRET: Secret key for signing JWT tokens (required)
    /// - JWT_ACCESS_TOKEN_EXPIRY: Access token expiration in minutes (defaults to 15)
    /// - JWT_REFRESH_TOKEN_EXPIRY: Refresh token expiration in minutes (defaults to 10080 = 1 week)
    /// - JWT_ISSUER: JWT issuer (optional)
    /// - JWT_AUDIENCE: JWT audience (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading JWT configuration from environment variables");

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| {
            error!("JWT_SECRET environment variable not found");
            ConfigError::EnvVarNotFound("JWT_SECRET".to_string())
        })?;

        if jwt_secret.len() < 32 {
            error!("JWT_SECRET is too short (minimum 32 characters required)");
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }
        debug!("JWT secret loaded (length: {} chars)", jwt_secret.len());

        let access_token_expiration = env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| {
                warn!("JWT_ACCESS_TOKEN_EXPIRY not set, using default: 15 minutes");
                "15".to_string()
            })
            .parse::<i64>()
            .map_err(|e| {
                error!("Invalid JWT_ACCESS_TOKEN_EXPIRY value: {}", e);
                ConfigError::InvalidValue(format!("JWT_ACCESS_TOKEN_EXPIRY: {}", e))
            })?;

        let refresh_token_expiration = env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| {
                warn!("JWT_REFRESH_TOKEN_EXPIRY not set, using default: 10080 minutes (1 week)");
                "10080".to_string()
            })
            .parse::<i64>()
            .map_err(|e| {
                error!("Invalid JWT_REFRESH_TOKEN_EXPIRY value: {}", e);
                ConfigError::InvalidValue(format!("JWT_REFRESH_TOKEN_EXPIRY: {}", e))
            })?;

        let jwt_issuer = env::var("JWT_ISSUER").ok();
        let jwt_audience = env::var("JWT_AUDIENCE").ok();

        let config = JwtConfig {
            jwt_secret,
            access_token_expiration,
            refresh_token_expiration,
            jwt_issuer,
            jwt_audience,
        };

        config.validate()?;
        info!("JWT configuration loaded successfully");
        Ok(config)
    }

    /// Validate the JWT configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < 32 {
            error!("JWT secret is too short (minimum 32 characters required)");
            return Err(ConfigError::ValidationError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        if self.access_token_expiration <= 0 {
            error!("Access token expiration must be greater than 0");
            return Err(ConfigError::ValidationError(
                "Access token expiration must be greater than 0".to_string(),
            ));
        }

        if self.refresh_token_expiration <= 0 {
            error!("Refresh token expiration must be greater than 0");
            return Err(ConfigError::ValidationError(
                "Refresh token expiration must be greater than 0".to_string(),
            ));
        }

        if self.access_token_expiration >= self.refresh_token_expiration {
            warn!("Access token expiration is greater than or equal to refresh token expiration");
        }

        Ok(())
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            jwt_secret: "test_secret_key_for_jwt_testing_should_be_long_enough_for_security"
                .to_string(),
            access_token_expiration: 15,
            refresh_token_expiration: 10080, // 1 week
            jwt_issuer: Some("cotizador-backend".to_string()),
            jwt_audience: Some("cotizador-backend-users".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = JwtConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_short_secret() {
        let mut config = JwtConfig::default();
        config.jwt_secret = "too_short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_expiration() {
        let mut config = JwtConfig::default();
        config.access_token_expiration = 0;
        assert!(config.validate().is_err());
    }
}
