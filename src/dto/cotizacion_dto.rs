use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::cotizacion::{Cotizacion, TipoDescuento};

/// Payload to create (and finalize) a quote. Field-level constraints run
/// before anything reaches the pricing engine; the service re-checks the
/// DNI digits, so a malformed record can never be persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCotizacionRequest {
    #[validate(length(min = 2, max = 200))]
    pub nombre_cliente: String,

    /// Exactly 8 characters; digit check happens in the service layer.
    #[validate(length(equal = 8))]
    pub dni_cliente: String,

    #[validate(length(min = 2, max = 300))]
    pub direccion_cliente: String,

    #[validate(length(min = 2, max = 100))]
    pub distrito_cliente: String,

    #[validate(length(min = 6, max = 15))]
    pub telefono_cliente: String,

    #[validate(email)]
    pub email_cliente: Option<String>,

    /// Hex ObjectId of the quoted unit.
    #[validate(length(equal = 24))]
    pub departamento_id: String,

    #[validate(length(max = 1000))]
    pub observaciones: Option<String>,

    #[serde(default)]
    pub tipo_descuento: TipoDescuento,

    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub valor_descuento: f64,

    #[validate(range(min = 0.0))]
    pub cuota_inicial: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CotizacionResponseDto {
    pub cotizacion: Cotizacion,
    /// Public link to the unit photo, when one exists.
    pub imagen_url: Option<String>,
}
