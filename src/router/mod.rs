pub mod cotizacion_router;
pub mod departamento_router;
pub mod user_router;
