use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use bson::oid::ObjectId;
use validator::Validate;

use crate::dto::cotizacion_dto::CreateCotizacionRequest;
use crate::service::cotizacion_service::{CotizacionService, CotizacionServiceImpl};
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

fn parse_id(id: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(id).map_err(|_| HandlerError::bad_request("Invalid cotizacion id"))
}

pub async fn create_cotizacion_handler(
    State(service): State<Arc<CotizacionServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateCotizacionRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError {
            error: crate::util::error::HandlerErrorKind::Validation,
            message: format!("Validation error: {}", e),
            details: None,
        });
    }

    let creado_por = ObjectId::parse_str(&claims.sub).ok();
    let creada = service.crear_cotizacion(payload, creado_por).await?;
    Ok(Json(creada))
}

pub async fn list_cotizaciones_handler(
    State(service): State<Arc<CotizacionServiceImpl>>,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let page = params.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let limit = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let cotizaciones = service.list_cotizaciones(page, limit).await?;
    Ok(Json(cotizaciones))
}

pub async fn get_cotizacion_handler(
    State(service): State<Arc<CotizacionServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    let cotizacion = service.get_cotizacion(id).await?;
    Ok(Json(cotizacion))
}

pub async fn eliminar_cotizacion_handler(
    State(service): State<Arc<CotizacionServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    service.eliminar_cotizacion(id).await?;
    Ok(Json(serde_json::json!({ "eliminada": true })))
}

/// Download as attachment: `cotizacion_NN_YYYYMMDD.pdf`.
pub async fn descargar_pdf_handler(
    State(service): State<Arc<CotizacionServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    let documento = service.generar_pdf(id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", documento.nombre_archivo),
            ),
        ],
        documento.bytes,
    ))
}

/// Same document, rendered inline for in-browser viewing/printing.
pub async fn ver_pdf_handler(
    State(service): State<Arc<CotizacionServiceImpl>>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    let documento = service.generar_pdf(id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", documento.nombre_archivo),
            ),
        ],
        documento.bytes,
    ))
}
