use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a unit. `disponible` units can be quoted; `vendido`
/// and `reservado` units stay listed for reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstadoDepartamento {
    Disponible,
    Vendido,
    Reservado,
}

impl Default for EstadoDepartamento {
    fn default() -> Self {
        EstadoDepartamento::Disponible
    }
}

impl std::fmt::Display for EstadoDepartamento {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EstadoDepartamento::Disponible => "disponible",
            EstadoDepartamento::Vendido => "vendido",
            EstadoDepartamento::Reservado => "reservado",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Departamento {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    /// Unique inventory code, e.g. "DPTO_101".
    pub codigo: String,
    pub nombre: String,
    pub descripcion: String,
    /// Base price in PEN, before the fixed markup.
    pub precio: f64,
    /// Roofed area in m².
    pub area_m2: f64,
    /// Free (uncovered) area in m².
    pub area_libre: f64,
    pub habitaciones: u32,
    pub banos: u32,
    pub pisos: Option<String>,
    pub disponible: bool,
    #[serde(default)]
    pub estado: EstadoDepartamento,
    /// Object path of the unit photo in the MinIO bucket, if one was uploaded.
    pub imagen: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
