use std::env;

use crate::config::ConfigError;

/// Bootstrap administrator account created at startup when missing.
pub struct AdminUserConfig {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl AdminUserConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let username = env::var("ADMIN_USERNAME")
            .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_USERNAME".to_string()))?;
        let email = env::var("ADMIN_EMAIL")
            .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_EMAIL".to_string()))?;
        let password = env::var("ADMIN_PASSWORD")
            .map_err(|_| ConfigError::EnvVarNotFound("ADMIN_PASSWORD".to_string()))?;
        let first_name =
            env::var("ADMIN_FIRST_NAME").unwrap_or_else(|_| "Administrador".to_string());
        let last_name = env::var("ADMIN_LAST_NAME").unwrap_or_else(|_| "Sistema".to_string());

        Ok(AdminUserConfig {
            username,
            first_name,
            last_name,
            email,
            password,
        })
    }
}
