// ============================================================
// Layer 1 - HTTP Handlers
// ============================================================
// One predict route per pipeline plus /health, and for the
// stress pipeline the rule-based /heart_rate_trend route.
//
//   POST /detect_emotion   {"message": "I feel great"}  → {"emotion": "joy"}
//   POST /predict_stress   {"heart_rate": 72}           → {"anxiety_level": "low"}
//                          {"heart_rate": "72"} is accepted too
//
// Every failure is answered as {"error": "..."} with 400 for
// malformed input and 422 for input that parsed but cannot be
// scored.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::error::PredictError;
use crate::domain::example::{FeatureKind, RawFeature};
use crate::domain::heart_rate::TrendSummary;
use crate::domain::pipeline::PipelineSpec;
use crate::server::AppState;

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(String),
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        let message = e.to_string();
        if e.is_malformed_input() {
            return ApiError::BadRequest(message);
        }
        match e {
            PredictError::DimensionMismatch { .. } | PredictError::UnknownTerms(_) => {
                ApiError::Unprocessable(message)
            }
            _ => ApiError::Internal(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_)    => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_)      => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Rejected request ({}): {}", status, self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let predictor = &state.predictor;
    Json(json!({
        "status":   "ok",
        "pipeline": predictor.spec().kind,
        "classes":  predictor.classes(),
    }))
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let spec       = state.predictor.spec();

    let raw        = coerce_input(spec, &body)?;
    let prediction = state.predictor.predict(&raw)?;

    tracing::debug!("{} → {}", spec.route, prediction.label);
    Ok(Json(json!({ spec.output_field: prediction.label })))
}

#[derive(Debug, Deserialize)]
pub struct TrendRequest {
    pub readings: Vec<f32>,
}

pub async fn heart_rate_trend(
    payload: Result<Json<TrendRequest>, JsonRejection>,
) -> Result<Json<TrendSummary>, ApiError> {
    let Json(request) = payload?;
    TrendSummary::from_readings(&request.readings)
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest("readings must not be empty".to_string()))
}

// ─── Input Coercion ───────────────────────────────────────────────────────────

/// Pull the pipeline's input field out of a request body.
/// Scalar pipelines accept a JSON number or a numeric string.
pub fn coerce_input(spec: &PipelineSpec, body: &Value) -> Result<RawFeature, PredictError> {
    let value = body
        .get(spec.input_field)
        .ok_or_else(|| PredictError::MissingField(spec.input_field.to_string()))?;

    let wrong_type = || PredictError::WrongType {
        expected: spec.feature_kind,
        found:    json_type(value).to_string(),
    };

    match spec.feature_kind {
        FeatureKind::Text => value
            .as_str()
            .map(|s| RawFeature::Text(s.to_string()))
            .ok_or_else(wrong_type),
        FeatureKind::Scalar => {
            let number = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .ok_or_else(wrong_type)?;

            let number = number as f32;
            if number.is_finite() {
                Ok(RawFeature::Scalar(number))
            } else {
                Err(PredictError::NonFinite(number))
            }
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}
