use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::dto::user_dto::{LoginRequest, RefreshTokenRequest};
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::HandlerError;

pub async fn login_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError {
            error: crate::util::error::HandlerErrorKind::Validation,
            message: format!("Validation error: {}", e),
            details: None,
        });
    }

    let response = service.login(payload.username, payload.password).await.map_err(|e| {
        HandlerError {
            error: crate::util::error::HandlerErrorKind::Unauthorized,
            message: format!("{}", e),
            details: None,
        }
    })?;
    Ok(Json(response))
}

pub async fn refresh_token_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError {
            error: crate::util::error::HandlerErrorKind::Validation,
            message: format!("Validation error: {}", e),
            details: None,
        });
    }

    let tokens = service.refresh_token(payload.refresh_token).await.map_err(|e| {
        HandlerError {
            error: crate::util::error::HandlerErrorKind::Unauthorized,
            message: format!("{}", e),
            details: None,
        }
    })?;
    Ok(Json(tokens))
}
