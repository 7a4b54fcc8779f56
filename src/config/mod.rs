pub mod admin_user_conf;
pub mod app_conf;
pub mod cotizacion_conf;
pub mod jwt_conf;
pub mod minio_conf;
pub mod mongo_conf;

pub use admin_user_conf::AdminUserConfig;
pub use app_conf::AppConfig;
pub use cotizacion_conf::CotizacionConfig;
pub use jwt_conf::JwtConfig;
pub use minio_conf::MinioConfig;
pub use mongo_conf::MongoConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
