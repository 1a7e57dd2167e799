use crate::error::{AppError, Result};
use crate::services::{ChartOptions, ForecastParams};
use crate::types::{BarSeries, ChartPayload, FundamentalAnalysis, PeriodUnit, StockSummary};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIDENCE: u32 = 80;

fn default_true() -> bool {
    true
}

fn default_ticker() -> String {
    "STOCK".to_string()
}

/// Forecast request body. Field names match the dashboard form controls.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    #[serde(default)]
    pub ticker: String,
    /// Picklist selection; overrides the typed ticker when present.
    pub stock_select: Option<String>,
    pub period_type: PeriodUnit,
    pub period_value: u32,
    pub start_date: Option<NaiveDate>,
    pub confidence_level: Option<u32>,
    #[serde(default = "default_true")]
    pub show_historical: bool,
    #[serde(default = "default_true")]
    pub show_forecast: bool,
    #[serde(default = "default_true")]
    pub show_bounds: bool,
    #[serde(default)]
    pub show_ma: bool,
    #[serde(default)]
    pub show_rsi: bool,
    pub theme: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub stock: StockSummary,
    pub analysis: FundamentalAnalysis,
    pub chart: ChartPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earnings_chart: Option<BarSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_profit_chart: Option<BarSeries>,
    pub forecast_id: String,
    pub history_id: String,
    /// Snapshot file name, or null when rendering failed.
    pub image_file: Option<String>,
    pub meta: ForecastMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMeta {
    pub trained_rows: usize,
    pub dropped_rows: usize,
    pub horizon_days: u32,
}

/// Bounds the form controls enforce in the browser. Days are validated
/// deeper in the pipeline with their own message.
fn validate(request: &ForecastRequest) -> Result<()> {
    match request.period_type {
        PeriodUnit::Months if !(1..=12).contains(&request.period_value) => {
            return Err(AppError::BadRequest(
                "Months must be between 1 and 12.".to_string(),
            ));
        }
        PeriodUnit::Years if !(1..=4).contains(&request.period_value) => {
            return Err(AppError::BadRequest(
                "Years must be between 1 and 4.".to_string(),
            ));
        }
        _ => {}
    }

    if let Some(confidence) = request.confidence_level {
        if !(50..=95).contains(&confidence) {
            return Err(AppError::BadRequest(
                "Confidence level must be between 50 and 95.".to_string(),
            ));
        }
    }

    Ok(())
}

/// POST /api/forecast
async fn create_forecast(
    State(state): State<AppState>,
    Json(request): Json<ForecastRequest>,
) -> Result<Json<ForecastResponse>> {
    validate(&request)?;

    let params = ForecastParams {
        ticker: request.ticker.clone(),
        picked: request.stock_select.clone(),
        unit: request.period_type,
        magnitude: request.period_value,
        start_date: request.start_date,
        confidence: request.confidence_level.unwrap_or(DEFAULT_CONFIDENCE),
        chart: ChartOptions {
            show_historical: request.show_historical,
            show_forecast: request.show_forecast,
            show_bounds: request.show_bounds,
            show_ma: request.show_ma,
            show_rsi: request.show_rsi,
            dark_theme: request.theme.as_deref() != Some("light"),
        },
    };

    let outcome = state.forecaster.run(params).await?;

    Ok(Json(ForecastResponse {
        stock: outcome.summary,
        analysis: outcome.analysis,
        chart: outcome.chart,
        earnings_chart: outcome.earnings_chart,
        monthly_profit_chart: outcome.monthly_profit_chart,
        forecast_id: outcome.forecast_id,
        history_id: outcome.history_id,
        image_file: outcome.image_file,
        meta: ForecastMeta {
            trained_rows: outcome.trained_rows,
            dropped_rows: outcome.dropped_rows,
            horizon_days: outcome.horizon_days,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default = "default_ticker")]
    pub ticker: String,
    #[serde(default)]
    pub forecast_id: String,
}

/// GET /api/forecast/download
///
/// Serves both forecast and history handles; the columns of the stored
/// table decide the file name. Handles are single-use.
async fn download_forecast(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse> {
    let table = state
        .store
        .consume(&query.forecast_id)
        .ok_or(AppError::ForecastNotFound)?;

    let kind = if table.columns.get(1).map(String::as_str) == Some("Open") {
        "historical"
    } else {
        "forecast"
    };
    let file_name = format!("{}_{}.csv", query.ticker, kind);

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
    ];
    Ok((headers, table.to_csv()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_forecast))
        .route("/download", get(download_forecast))
}
