use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use tracing::error;

use chirp_types::api::{LoginRequest, RegisterRequest};

use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, StatusCode> {
    // Malformed JSON is a 400 before any business logic runs
    let Json(req) = payload.map_err(|_| StatusCode::BAD_REQUEST)?;

    let svc = state.clone();
    let account = tokio::task::spawn_blocking(move || {
        svc.service.create_account(&req.username, &req.password)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .ok_or(StatusCode::BAD_REQUEST)?;

    Ok(Json(account))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, StatusCode> {
    let Json(req) = payload.map_err(|_| StatusCode::BAD_REQUEST)?;

    // Empty fields are malformed input, not a credential mismatch
    if req.username.is_empty() || req.password.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let svc = state.clone();
    let account = tokio::task::spawn_blocking(move || {
        svc.service.validate_password(&req.username, &req.password)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .ok_or(StatusCode::UNAUTHORIZED)?;

    Ok(Json(account))
}
