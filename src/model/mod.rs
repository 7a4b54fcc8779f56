pub mod cotizacion;
pub mod departamento;
pub mod user;
