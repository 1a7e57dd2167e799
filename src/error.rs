use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No stock symbol provided")]
    EmptyInput,

    #[error("No data found for stock symbol {symbol}")]
    SymbolNotFound {
        symbol: String,
        suggestions: Vec<String>,
    },

    #[error("Not enough data to generate a forecast.")]
    InsufficientData { usable_rows: usize },

    #[error("Invalid period value: {0}")]
    InvalidPeriod(String),

    #[error("No forecast data available")]
    ForecastNotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forecast model failed: {0}")]
    Engine(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::EmptyInput => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::SymbolNotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::InsufficientData { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidPeriod(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::ForecastNotFound => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Engine(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Reqwest(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::SerdeJson(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Anyhow(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = match &self {
            AppError::SymbolNotFound { suggestions, .. } => Json(json!({
                "error": message,
                "status": status.as_u16(),
                "suggestions": suggestions,
            })),
            _ => Json(json!({
                "error": message,
                "status": status.as_u16(),
            })),
        };

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
