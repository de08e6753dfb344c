//! Prediction, health and status handlers.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::model::{BatchResponse, IrisBatch, IrisFeatures};
use crate::resilience::{BreakerSnapshot, GuardError, FAILED_MESSAGE, UNAVAILABLE_MESSAGE};

/// `POST /predict_single`: plain-text reply, never exposes error detail.
pub async fn predict_single(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(features): Json<IrisFeatures>,
) -> String {
    let request_id = request_id(&headers);

    match state.guard.predict(&features) {
        Ok(label) => {
            tracing::debug!(request_id = %request_id, label = %label, "Single prediction served");
            format!("Predicted species: {}", label)
        }
        Err(GuardError::Unavailable) => UNAVAILABLE_MESSAGE.to_string(),
        Err(GuardError::Prediction(_)) => {
            // The guard already logged the predictor error
            tracing::debug!(request_id = %request_id, "Single prediction failed");
            FAILED_MESSAGE.to_string()
        }
    }
}

/// `POST /predict_batch`: JSON reply, errors carry the raw message.
pub async fn predict_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(batch): Json<IrisBatch>,
) -> Json<BatchResponse> {
    let request_id = request_id(&headers);

    match state.guard.predict_batch(&batch.features) {
        Ok(labels) => {
            tracing::debug!(request_id = %request_id, count = labels.len(), "Batch prediction served");
            Json(BatchResponse::predictions(labels))
        }
        Err(e) => {
            tracing::debug!(request_id = %request_id, "Batch prediction failed");
            Json(BatchResponse::error(e.to_string()))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// `GET /health`: liveness only.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub model: String,
    pub model_version: String,
    pub breaker: BreakerSnapshot,
}

/// `GET /status`: model identity and breaker state.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        model: state.model_name.to_string(),
        model_version: state.guard.model_version().to_string(),
        breaker: state.guard.breaker().snapshot(),
    })
}
