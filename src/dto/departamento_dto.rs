use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::departamento::EstadoDepartamento;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDepartamentoRequest {
    #[validate(length(min = 2, max = 20))]
    pub codigo: String,

    #[validate(length(min = 2, max = 100))]
    pub nombre: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub descripcion: String,

    #[validate(range(min = 1.0))]
    pub precio: f64,

    #[validate(range(min = 1.0))]
    pub area_m2: f64,

    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub area_libre: f64,

    #[validate(range(min = 1, max = 20))]
    pub habitaciones: u32,

    #[validate(range(min = 1, max = 20))]
    pub banos: u32,

    pub pisos: Option<String>,

    #[serde(default = "default_disponible")]
    pub disponible: bool,

    #[serde(default)]
    pub estado: EstadoDepartamento,
}

fn default_disponible() -> bool {
    true
}

/// Edits reuse the creation shape; the photo has its own upload endpoint.
pub type UpdateDepartamentoRequest = CreateDepartamentoRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartamentoResponseDto {
    pub departamento: crate::model::departamento::Departamento,
    pub imagen_url: Option<String>,
}
