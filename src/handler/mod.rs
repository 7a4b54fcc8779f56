pub mod cotizacion_handler;
pub mod departamento_handler;
pub mod user_handler;
