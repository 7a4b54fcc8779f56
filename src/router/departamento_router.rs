use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::departamento_handler::{
    create_departamento_handler, editar_departamento_handler, eliminar_departamento_handler,
    get_departamento_handler, list_departamentos_handler, subir_imagen_handler,
};
use crate::middlewares::auth_middleware::{require_admin, require_auth, AuthState};
use crate::service::departamento_service::DepartamentoServiceImpl;

pub fn departamento_router(
    service: Arc<DepartamentoServiceImpl>,
    auth_state: Arc<AuthState>,
) -> Router {
    // Sellers can browse the inventory
    let lectura = Router::new()
        .route("/departamentos", get(list_departamentos_handler))
        .route("/departamentos/{id}", get(get_departamento_handler))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ));

    // Master data is admin-only
    let admin = Router::new()
        .route("/departamentos", post(create_departamento_handler))
        .route("/departamentos/{id}", put(editar_departamento_handler))
        .route("/departamentos/{id}", delete(eliminar_departamento_handler))
        .route("/departamentos/{id}/imagen", put(subir_imagen_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_admin));

    lectura.merge(admin).with_state(service)
}
