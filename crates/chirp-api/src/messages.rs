use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use chirp_types::api::{CreateMessageRequest, UpdateMessageRequest};

use crate::AppState;

pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, StatusCode> {
    let Json(req) = payload.map_err(|_| StatusCode::BAD_REQUEST)?;

    let svc = state.clone();
    let message = tokio::task::spawn_blocking(move || {
        svc.service
            .create_message(req.posted_by, &req.text, req.posted_at)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .ok_or(StatusCode::BAD_REQUEST)?;

    Ok(Json(message))
}

pub async fn get_all_messages(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    let svc = state.clone();
    let messages = tokio::task::spawn_blocking(move || svc.service.get_all_messages())
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(messages))
}

/// A missing id is not an error on this endpoint: 200 with an empty body.
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, StatusCode> {
    let svc = state.clone();
    let message = tokio::task::spawn_blocking(move || svc.service.get_message_by_id(id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(match message {
        Some(message) => Json(message).into_response(),
        None => StatusCode::OK.into_response(),
    })
}

pub async fn get_messages_for_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, StatusCode> {
    let svc = state.clone();
    let messages = tokio::task::spawn_blocking(move || svc.service.get_all_messages_for_user(id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(messages))
}

/// Same contract as GET: deleting a nonexistent message is 200 empty body,
/// a found message comes back as the pre-deletion snapshot.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, StatusCode> {
    let svc = state.clone();
    let message = tokio::task::spawn_blocking(move || svc.service.delete_message(id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(match message {
        Some(message) => Json(message).into_response(),
        None => StatusCode::OK.into_response(),
    })
}

pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> Result<Response, StatusCode> {
    let Json(req) = payload.map_err(|_| StatusCode::BAD_REQUEST)?;

    let svc = state.clone();
    let message = tokio::task::spawn_blocking(move || svc.service.update_message(id, &req.text))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(match message {
        Some(message) => Json(message).into_response(),
        None => (StatusCode::BAD_REQUEST, "Message not updated").into_response(),
    })
}
