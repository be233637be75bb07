use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use predikt_classifiers::Predictor;

use crate::serve::error::ApiError;

/// Shared, read-only context handed to every handler.
pub struct AppState {
    pub predictor: Predictor,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub prediction: i64,
}

pub async fn predict(
    state: web::Data<AppState>,
    body: web::Json<PredictRequest>,
) -> Result<HttpResponse, ApiError> {
    let features = body.into_inner().features;
    let n_features = features.len();
    let state = state.clone();

    let prediction = web::block(move || state.predictor.predict_one(&features))
        .await
        .map_err(|e| ApiError::internal(format!("Blocking task failed: {}", e)))?
        .map_err(|e| {
            if e.is_input_error() {
                log::debug!("[Predikt::Serve] Rejected request: {}", e);
            } else {
                log::error!("[Predikt::Serve] Prediction failed: {}", e);
            }
            ApiError::from(e)
        })?;

    log::debug!(
        "[Predikt::Serve] Predicted {} from {} features",
        prediction,
        n_features
    );
    Ok(HttpResponse::Ok().json(PredictResponse { prediction }))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub async fn model_info(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.predictor.info())
}

async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::not_found("Endpoint not found"))
}

async fn predict_method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::method_not_allowed("/predict only accepts POST"))
}

fn json_error(err: JsonPayloadError) -> ApiError {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ApiError::payload_too_large(err.to_string())
        }
        _ => ApiError::malformed(err.to_string()),
    }
}

/// Register routes, the JSON extractor limits, and the 404/405 fallbacks.
pub fn configure(json_limit: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(
            web::JsonConfig::default()
                .limit(json_limit)
                .error_handler(|err, _req| json_error(err).into()),
        )
        .service(
            web::resource("/predict")
                .route(web::post().to(predict))
                .default_service(web::to(predict_method_not_allowed)),
        )
        .route("/health", web::get().to(health))
        .route("/model", web::get().to(model_info))
        .default_service(web::to(not_found));
    }
}
