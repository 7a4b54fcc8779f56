use axum::http::StatusCode;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use std::sync::Arc;

use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use crate::util::policy::{self, Rol};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

fn claims_from_request(
    state: &AuthState,
    req: &Request<Body>,
) -> Result<crate::util::jwt::Claims, StatusCode> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    state
        .jwt_utils
        .validate_access_token(&token)
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

/// Any authenticated role (admin or vendedor). Claims are attached to the
/// request extensions for handler-level attribution.
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let claims = claims_from_request(&state, &req)?;

    let rol = Rol::from_str(&claims.role).ok_or(StatusCode::FORBIDDEN)?;
    if !policy::puede_gestionar_cotizaciones(rol) {
        return Err(StatusCode::FORBIDDEN);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Unit master data is admin-only.
pub async fn require_admin(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let claims = claims_from_request(&state, &req)?;

    let rol = Rol::from_str(&claims.role).ok_or(StatusCode::FORBIDDEN)?;
    if !policy::puede_gestionar_departamentos(rol) {
        return Err(StatusCode::FORBIDDEN);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
