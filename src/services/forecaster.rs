//! Forecast pipeline orchestration.
//!
//! One request, one pass: normalize the symbol, pull history and
//! fundamentals, fit the model, park the CSV exports, assemble the chart
//! payloads and archive the snapshot. Metadata lookups degrade to
//! placeholders; everything else fails the request.

use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::analysis::analyze_fundamentals;
use crate::services::chart::{
    build_chart, build_earnings_chart, build_monthly_profit_chart, forecast_table, history_table,
    ChartOptions,
};
use crate::services::engine::ForecastEngine;
use crate::services::export_store::ExportStore;
use crate::services::horizon::resolve_horizon;
use crate::services::snapshot::save_chart_image;
use crate::services::ticker::{normalize_ticker, suggest_symbols};
use crate::services::training::build_training_frame;
use crate::sources::MarketData;
use crate::types::{
    BarSeries, ChartPayload, FundamentalAnalysis, PeriodUnit, StockInfo, StockSummary,
};

/// Validated input of one forecast run. The request layer has already
/// bounded the magnitude and confidence ranges.
#[derive(Debug, Clone)]
pub struct ForecastParams {
    pub ticker: String,
    pub picked: Option<String>,
    pub unit: PeriodUnit,
    pub magnitude: u32,
    pub start_date: Option<NaiveDate>,
    pub confidence: u32,
    pub chart: ChartOptions,
}

/// Everything a successful run produces.
#[derive(Debug)]
pub struct ForecastOutcome {
    pub summary: StockSummary,
    pub analysis: FundamentalAnalysis,
    pub chart: ChartPayload,
    pub earnings_chart: Option<BarSeries>,
    pub monthly_profit_chart: Option<BarSeries>,
    pub forecast_id: String,
    pub history_id: String,
    pub image_file: Option<String>,
    pub trained_rows: usize,
    pub dropped_rows: usize,
    pub horizon_days: u32,
}

/// Runs the forecast pipeline against a market data provider and engine.
pub struct Forecaster {
    market: Arc<dyn MarketData>,
    engine: Arc<dyn ForecastEngine>,
    store: Arc<ExportStore>,
    config: Arc<Config>,
}

impl Forecaster {
    pub fn new(
        market: Arc<dyn MarketData>,
        engine: Arc<dyn ForecastEngine>,
        store: Arc<ExportStore>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            market,
            engine,
            store,
            config,
        }
    }

    /// Execute one forecast run end to end.
    pub async fn run(&self, params: ForecastParams) -> Result<ForecastOutcome> {
        let symbol = normalize_ticker(
            &params.ticker,
            params.picked.as_deref(),
            &self.config.default_suffix,
        )?;

        let start = self.config.clamp_history_start(params.start_date);
        let today = Local::now().date_naive();

        let history = self.market.daily_history(&symbol, start, today).await?;
        if history.is_empty() {
            return Err(AppError::SymbolNotFound {
                suggestions: suggest_symbols(&symbol, &self.config.default_suffix),
                symbol,
            });
        }

        // Metadata and earnings are cosmetic next to the forecast itself,
        // so lookup failures degrade instead of aborting the run.
        let stock_info = match self.market.stock_info(&symbol).await {
            Ok(info) => info,
            Err(e) => {
                warn!("Metadata lookup failed for {}: {}", symbol, e);
                StockInfo::placeholder(&symbol)
            }
        };
        let earnings = match self.market.quarterly_earnings(&symbol).await {
            Ok(earnings) => earnings,
            Err(e) => {
                warn!("Earnings lookup failed for {}: {}", symbol, e);
                Vec::new()
            }
        };

        let frame = build_training_frame(&history)?;
        let horizon_days = resolve_horizon(params.unit, params.magnitude)?;
        let interval_width = params.confidence as f64 / 100.0;

        let points = self
            .engine
            .forecast(&frame, horizon_days, interval_width)?;

        let forecast_id = self.store.insert(forecast_table(&points));
        let history_id = self.store.insert(history_table(&history));

        let chart = build_chart(
            &stock_info,
            &frame,
            &points,
            params.magnitude,
            params.unit,
            &params.chart,
        );
        let earnings_chart = build_earnings_chart(&stock_info, &earnings);
        let monthly_profit_chart = build_monthly_profit_chart(&stock_info, &earnings);

        let image_file = match save_chart_image(
            Path::new(&self.config.chart_dir),
            &symbol,
            &self.config.default_suffix,
            &frame,
            &points,
        ) {
            Ok(name) => Some(name),
            Err(e) => {
                warn!("Failed to save chart image for {}: {}", symbol, e);
                None
            }
        };

        info!(
            "Forecast for {}: {} trained rows, {} day horizon",
            symbol,
            frame.len(),
            horizon_days
        );

        Ok(ForecastOutcome {
            summary: StockSummary::from(&stock_info),
            analysis: analyze_fundamentals(&stock_info),
            chart,
            earnings_chart,
            monthly_profit_chart,
            forecast_id,
            history_id,
            image_file,
            trained_rows: frame.len(),
            dropped_rows: frame.dropped_rows,
            horizon_days,
        })
    }
}
