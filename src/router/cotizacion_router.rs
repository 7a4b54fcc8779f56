use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::handler::cotizacion_handler::{
    create_cotizacion_handler, descargar_pdf_handler, eliminar_cotizacion_handler,
    get_cotizacion_handler, list_cotizaciones_handler, ver_pdf_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::cotizacion_service::CotizacionServiceImpl;

pub fn cotizacion_router(
    service: Arc<CotizacionServiceImpl>,
    auth_state: Arc<AuthState>,
) -> Router {
    // Every quote operation requires an authenticated seller or admin
    Router::new()
        .route("/cotizaciones", post(create_cotizacion_handler))
        .route("/cotizaciones", get(list_cotizaciones_handler))
        .route("/cotizaciones/{id}", get(get_cotizacion_handler))
        .route("/cotizaciones/{id}", delete(eliminar_cotizacion_handler))
        .route("/cotizaciones/{id}/pdf", get(descargar_pdf_handler))
        .route("/cotizaciones/{id}/pdf/ver", get(ver_pdf_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
