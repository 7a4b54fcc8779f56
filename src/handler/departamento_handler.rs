use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use bson::oid::ObjectId;
use bytes::BytesMut;
use tracing::{error, info};
use validator::Validate;

use crate::dto::departamento_dto::{CreateDepartamentoRequest, UpdateDepartamentoRequest};
use crate::service::departamento_service::{DepartamentoService, DepartamentoServiceImpl};
use crate::util::error::HandlerError;

fn parse_id(id: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(id).map_err(|_| HandlerError::bad_request("Invalid departamento id"))
}

pub async fn create_departamento_handler(
    State(service): State<Arc<DepartamentoServiceImpl>>,
    Json(payload): Json<CreateDepartamentoRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError {
            error: crate::util::error::HandlerErrorKind::Validation,
            message: format!("Validation error: {}", e),
            details: None,
        });
    }
    let creado = service.crear_departamento(payload).await?;
    Ok(Json(creado))
}

pub async fn list_departamentos_handler(
    State(service): State<Arc<DepartamentoServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let departamentos = service.list_departamentos().await?;
    Ok(Json(departamentos))
}

pub async fn get_departamento_handler(
    State(service): State<Arc<DepartamentoServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    let departamento = service.get_departamento(id).await?;
    Ok(Json(departamento))
}

pub async fn editar_departamento_handler(
    State(service): State<Arc<DepartamentoServiceImpl>>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateDepartamentoRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    if let Err(e) = payload.validate() {
        return Err(HandlerError {
            error: crate::util::error::HandlerErrorKind::Validation,
            message: format!("Validation error: {}", e),
            details: None,
        });
    }
    let actualizado = service.editar_departamento(id, payload).await?;
    Ok(Json(actualizado))
}

/// Deletes the unit and cascades to its quotes. The confirmation dialog is
/// the calling layer's responsibility.
pub async fn eliminar_departamento_handler(
    State(service): State<Arc<DepartamentoServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    service.eliminar_departamento(id).await?;
    Ok(Json(serde_json::json!({ "eliminado": true })))
}

/// Multipart upload of the unit photo. Expects a single file field named
/// `imagen`.
pub async fn subir_imagen_handler(
    State(service): State<Arc<DepartamentoServiceImpl>>,
    Path((id,)): Path<(String,)>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    info!("[subir_imagen_handler] Upload for departamento {}", id);

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("[subir_imagen_handler] Error getting next field: {}", e);
        HandlerError::bad_request(format!("Failed to get next field: {}", e))
    })? {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();
        if name != "imagen" {
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string()).unwrap_or_default();
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut buf = BytesMut::new();
        let mut stream = field;
        while let Some(chunk) = stream.chunk().await.map_err(|e| {
            error!("[subir_imagen_handler] Error reading file chunk: {}", e);
            HandlerError::bad_request(format!("Failed to read file chunk: {}", e))
        })? {
            buf.extend_from_slice(&chunk);
        }

        info!(
            "[subir_imagen_handler] Received file: {} ({} bytes)",
            filename,
            buf.len()
        );
        if buf.is_empty() {
            return Err(HandlerError::bad_request("Empty image upload"));
        }

        let object_name = service
            .subir_imagen(id, &filename, &content_type, buf.to_vec())
            .await?;
        return Ok(Json(serde_json::json!({ "imagen": object_name })));
    }

    Err(HandlerError::bad_request("Missing 'imagen' field"))
}
