use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Current layout of [`DepartamentoSnapshot`]. Bump when the snapshot shape
/// changes so old quotes remain renderable.
pub const SNAPSHOT_VERSION: u32 = 1;

fn snapshot_version_default() -> u32 {
    SNAPSHOT_VERSION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoDescuento {
    /// Percentage discount over the adjusted base price.
    Porcentaje,
    /// Fixed amount in PEN subtracted from the adjusted base price.
    Monto,
}

impl Default for TipoDescuento {
    fn default() -> Self {
        TipoDescuento::Porcentaje
    }
}

/// Frozen copy of a unit's display attributes, captured once when the quote
/// is finalized. Display only — pricing never reads it back. The fields are
/// pre-formatted strings so a quote prints identically forever, even if the
/// live unit is edited or the unit schema changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartamentoSnapshot {
    #[serde(default = "snapshot_version_default")]
    pub version: u32,
    pub nombre: String,
    /// Inventory code with its alpha prefix stripped, e.g. "DPTO_101" → "101".
    pub codigo_corto: String,
    /// Formatted roofed area, e.g. "75.50 m²".
    pub area_m2: String,
    /// Formatted free area.
    pub area_libre: String,
    /// Formatted list price (base + fixed markup), e.g. "S/. 550,000.00".
    pub precio_lista: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cotizacion {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    /// Sequential business number, `cotizacion_NN`. Assigned exactly once at
    /// first save and never changed afterwards.
    pub numero_cotizacion: Option<String>,

    // Datos del cliente
    pub nombre_cliente: String,
    /// National ID, exactly 8 digits.
    pub dni_cliente: String,
    pub direccion_cliente: String,
    pub distrito_cliente: String,
    pub telefono_cliente: String,
    pub email_cliente: Option<String>,

    /// Unit this quote refers to. Many quotes per unit.
    pub departamento_id: ObjectId,

    pub observaciones: Option<String>,
    #[serde(default)]
    pub tipo_descuento: TipoDescuento,
    #[serde(default)]
    pub valor_descuento: f64,
    /// Down payment offered by the client, if any.
    pub cuota_inicial: Option<f64>,
    /// Derived by the pricing engine; never user-editable.
    pub precio_final: Option<f64>,
    pub departamento_snapshot: Option<DepartamentoSnapshot>,

    // Metadatos
    pub fecha_creacion: Option<String>,
    pub creado_por: Option<ObjectId>,
    /// Soft-delete flag. Inactive quotes are invisible to every lookup path.
    pub activo: bool,
}

impl Cotizacion {
    /// A quote is finalized once it carries both its number and its snapshot.
    /// Finalizing again must be a no-op.
    pub fn esta_finalizada(&self) -> bool {
        self.numero_cotizacion.is_some()
            && self.departamento_snapshot.is_some()
            && self.precio_final.is_some()
    }
}
