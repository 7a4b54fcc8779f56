use serde::{Deserialize, Serialize};
use std::env;
use tracing::{error, info, warn};

use crate::config::ConfigError;

/// Business parameters of the quoting process. These are commercial policy,
/// not code: the fixed markup added to every unit's base price, the
/// reservation ("separación") fee, how long a proposal stays valid, and the
/// upper time limit for fetching the unit photo while rendering the PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CotizacionConfig {
    /// Fixed markup in PEN added to the unit base price before any discount.
    pub recargo_fijo: f64,
    /// Reservation fee in PEN subtracted when computing the balance to finance.
    pub costo_separacion: f64,
    /// Proposal validity in days (expiry date = issue date + this).
    pub validez_dias: i64,
    /// Upper bound in seconds for the photo fetch during PDF generation.
    pub timeout_foto_secs: u64,
}

impl CotizacionConfig {
    /// Load quoting parameters from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - COTIZACION_RECARGO_FIJO: markup in PEN (defaults to 50000)
    /// - COTIZACION_COSTO_SEPARACION: reservation fee in PEN (defaults to 1500)
    /// - COTIZACION_VALIDEZ_DIAS: proposal validity in days (defaults to 15)
    /// - COTIZACION_TIMEOUT_FOTO: photo fetch timeout in seconds (defaults to 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading cotizacion configuration from environment variables");

        let recargo_fijo = env::var("COTIZACION_RECARGO_FIJO")
            .unwrap_or_else(|_| {
                warn!("COTIZACION_RECARGO_FIJO not set, using default: 50000");
                "50000".to_string()
            })
            .parse::<f64>()
            .map_err(|_| {
                error!("Invalid COTIZACION_RECARGO_FIJO value");
                ConfigError::InvalidValue("Invalid COTIZACION_RECARGO_FIJO value".to_string())
            })?;

        let costo_separacion = env::var("COTIZACION_COSTO_SEPARACION")
            .unwrap_or_else(|_| {
                warn!("COTIZACION_COSTO_SEPARACION not set, using default: 1500");
                "1500".to_string()
            })
            .parse::<f64>()
            .map_err(|_| {
                error!("Invalid COTIZACION_COSTO_SEPARACION value");
                ConfigError::InvalidValue("Invalid COTIZACION_COSTO_SEPARACION value".to_string())
            })?;

        let validez_dias = env::var("COTIZACION_VALIDEZ_DIAS")
            .unwrap_or_else(|_| {
                warn!("COTIZACION_VALIDEZ_DIAS not set, using default: 15");
                "15".to_string()
            })
            .parse::<i64>()
            .map_err(|_| {
                error!("Invalid COTIZACION_VALIDEZ_DIAS value");
                ConfigError::InvalidValue("Invalid COTIZACION_VALIDEZ_DIAS value".to_string())
            })?;

        let timeout_foto_secs = env::var("COTIZACION_TIMEOUT_FOTO")
            .unwrap_or_else(|_| {
                warn!("COTIZACION_TIMEOUT_FOTO not set, using default: 5 seconds");
                "5".to_string()
            })
            .parse::<u64>()
            .map_err(|_| {
                error!("Invalid COTIZACION_TIMEOUT_FOTO value");
                ConfigError::InvalidValue("Invalid COTIZACION_TIMEOUT_FOTO value".to_string())
            })?;

        let config = CotizacionConfig {
            recargo_fijo,
            costo_separacion,
            validez_dias,
            timeout_foto_secs,
        };

        config.validate()?;
        info!("Cotizacion configuration loaded successfully");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recargo_fijo < 0.0 {
            error!("Recargo fijo is negative");
            return Err(ConfigError::ValidationError(
                "Recargo fijo cannot be negative".to_string(),
            ));
        }

        if self.costo_separacion < 0.0 {
            error!("Costo de separacion is negative");
            return Err(ConfigError::ValidationError(
                "Costo de separacion cannot be negative".to_string(),
            ));
        }

        if self.validez_dias <= 0 {
            error!("Validez dias must be greater than 0");
            return Err(ConfigError::ValidationError(
                "Validez dias must be greater than 0".to_string(),
            ));
        }

        if self.timeout_foto_secs == 0 {
            error!("Photo fetch timeout is 0");
            return Err(ConfigError::ValidationError(
                "Photo fetch timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CotizacionConfig {
    fn default() -> Self {
        CotizacionConfig {
            recargo_fijo: 50_000.0,
            costo_separacion: 1_500.0,
            validez_dias: 15,
            timeout_foto_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CotizacionConfig::default();
        assert_eq!(config.recargo_fijo, 50_000.0);
        assert_eq!(config.costo_separacion, 1_500.0);
        assert_eq!(config.validez_dias, 15);
        assert_eq!(config.timeout_foto_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_negative_recargo() {
        let mut config = CotizacionConfig::default();
        config.recargo_fijo = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_validez() {
        let mut config = CotizacionConfig::default();
        config.validez_dias = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = CotizacionConfig::default();
        config.timeout_foto_secs = 0;
        assert!(config.validate().is_err());
    }
}
