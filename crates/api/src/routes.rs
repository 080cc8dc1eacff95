use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use clima_core::forecast::Forecast;
use clima_core::model::Models;
use clima_core::request::{handle_predict, PredictError, PredictRequest};

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Clone)]
pub struct AppState {
    pub models: Option<Arc<Models>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/estado", get(status))
        .route("/predecir", post(predict))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct ServiceStatus {
    modelos_cargados: bool,
}

async fn status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        modelos_cargados: state.models.is_some(),
    })
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiError(PredictError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PredictError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PredictError::ModelUnavailable | PredictError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// The body is taken as raw bytes so a missing or non-JSON content type still gets the
// JSON error contract instead of axum's default rejection.
async fn predict(State(state): State<AppState>, body: Bytes) -> Result<Json<Forecast>, ApiError> {
    let request = PredictRequest::from_body(&body).map_err(ApiError)?;

    match handle_predict(state.models.as_deref(), &request) {
        Ok(forecast) => {
            tracing::info!(
                total = forecast.summary.total_days,
                porcentaje_bueno = forecast.summary.percent_good,
                "prediction served"
            );
            Ok(Json(forecast))
        }
        Err(err) => {
            match &err {
                PredictError::InvalidInput(msg) => {
                    tracing::debug!(error = %msg, "prediction request rejected")
                }
                PredictError::ModelUnavailable => {
                    tracing::warn!("prediction requested while models are unavailable")
                }
                PredictError::Internal(msg) => {
                    sentry::capture_message(msg, sentry::Level::Error);
                    tracing::error!(error = %msg, "prediction failed")
                }
            }
            Err(ApiError(err))
        }
    }
}
