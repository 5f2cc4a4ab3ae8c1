//! Prediction handler.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use windpower_model::Predictions;

use super::ApiError;
use crate::metrics::RequestTimer;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Predictions,
}

/// POST /predict - Predict power for one record or a batch of records
#[instrument(skip_all)]
pub async fn predict_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let timer = RequestTimer::start();

    let Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected malformed request body");
            timer.failure("InvalidJson");
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "InvalidJson",
                rejection.body_text(),
            ));
        }
    };

    match state.pipeline.predict(payload) {
        Ok(predictions) => {
            debug!(rows = predictions.len(), "Served prediction");
            timer.success(predictions.len());
            Ok(Json(PredictResponse { predictions }))
        }
        Err(e) => {
            if e.is_client_error() {
                warn!(error = %e, "Rejected prediction request");
            } else {
                error!(error = %e, "Prediction failed");
            }
            let err = ApiError::from(e);
            timer.failure(err.code().to_string());
            Err(err)
        }
    }
}
