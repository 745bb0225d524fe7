//! Sync HTTP Routes
//!
//! - `GET|POST {root}/`          banner
//! - `POST     {root}/update`    push `{"uuid", "encrypted"}`
//! - `GET      {root}/get/:uuid` fetch `{"encrypted"}`
//! - `POST     {root}/get/:uuid` fetch, decrypted when `{"password"}` is given

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::config::HttpServerConfig;
use super::errors::{ApiError, ApiResult};
use super::state::SyncState;
use crate::cipher;
use crate::store::{validate_key, EncryptedPayload};

// ==================
// Request Types
// ==================

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub encrypted: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DecryptRequest {
    #[serde(default)]
    pub password: String,
}

// ==================
// Router
// ==================

/// Sync routes under the configured API root
pub fn sync_routes(state: Arc<SyncState>, config: &HttpServerConfig) -> Router {
    Router::new()
        .route(&config.route("/"), get(root_handler).post(root_handler))
        .route(&config.route("/update"), post(update_handler))
        .route(
            &config.route("/get/:uuid"),
            get(get_handler).post(get_decrypt_handler),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn root_handler(State(state): State<Arc<SyncState>>) -> String {
    format!("Hello World! API ROOT = {}", state.api_root)
}

async fn update_handler(
    State(state): State<Arc<SyncState>>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let req: UpdateRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "update body is not valid JSON");
        ApiError::InvalidBody
    })?;

    if req.uuid.is_empty() || req.encrypted.is_empty() {
        warn!("update is missing uuid or encrypted");
        return Err(ApiError::MissingField(
            "both 'encrypted' and 'uuid' fields are required",
        ));
    }

    let key = req.uuid;
    state
        .save(key.clone(), req.encrypted)
        .await
        .map_err(|e| {
            warn!(key = %key, error = %e, "update rejected");
            ApiError::from(e)
        })?;

    Ok(Json(json!({ "action": "done" })))
}

async fn get_handler(
    State(state): State<Arc<SyncState>>,
    Path(uuid): Path<String>,
) -> ApiResult<Json<EncryptedPayload>> {
    let encrypted = lookup(&state, &uuid).await?;
    Ok(Json(EncryptedPayload { encrypted }))
}

async fn get_decrypt_handler(
    State(state): State<Arc<SyncState>>,
    Path(uuid): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    let encrypted = lookup(&state, &uuid).await?;

    let req = if body.iter().all(u8::is_ascii_whitespace) {
        DecryptRequest::default()
    } else {
        serde_json::from_slice::<DecryptRequest>(&body).map_err(|e| {
            warn!(key = %uuid, error = %e, "decrypt body is not valid JSON");
            ApiError::InvalidBody
        })?
    };

    if req.password.is_empty() {
        return Ok(Json(EncryptedPayload { encrypted }).into_response());
    }

    let plaintext = cipher::decrypt(&uuid, &encrypted, &req.password);
    Ok(([(header::CONTENT_TYPE, "application/json")], plaintext).into_response())
}

async fn lookup(state: &SyncState, uuid: &str) -> ApiResult<String> {
    validate_key(uuid).map_err(|e| {
        warn!(key = %uuid, error = %e, "invalid uuid");
        ApiError::from(e)
    })?;

    state.load(uuid).await.map_err(|e| {
        warn!(key = %uuid, error = %e, "lookup failed");
        ApiError::from(e)
    })
}
