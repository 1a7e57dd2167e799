//! Integration tests for the forecast pipeline

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

use stockpulse::config::Config;
use stockpulse::error::AppError;
use stockpulse::services::{
    ChartOptions, ExportStore, ForecastParams, Forecaster, SeasonalTrendModel,
};
use stockpulse::sources::MarketData;
use stockpulse::types::{PeriodUnit, PricePoint, QuarterlyEarnings, Recommendation, StockInfo};

struct CannedMarket {
    history: Vec<PricePoint>,
    info: Option<StockInfo>,
    earnings: Vec<QuarterlyEarnings>,
}

#[async_trait]
impl MarketData for CannedMarket {
    async fn daily_history(
        &self,
        _symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> stockpulse::Result<Vec<PricePoint>> {
        Ok(self.history.clone())
    }

    async fn stock_info(&self, symbol: &str) -> stockpulse::Result<StockInfo> {
        self.info
            .clone()
            .ok_or_else(|| AppError::ExternalApi(format!("no metadata for {}", symbol)))
    }

    async fn quarterly_earnings(&self, _symbol: &str) -> stockpulse::Result<Vec<QuarterlyEarnings>> {
        Ok(self.earnings.clone())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn history(count: usize) -> Vec<PricePoint> {
    let start = date(2023, 1, 2);
    (0..count)
        .map(|i| {
            let close = 3500.0 + i as f64 * 0.8 + (i as f64 * 0.4).sin() * 25.0;
            PricePoint {
                date: start + chrono::Duration::days(i as i64),
                open: close - 4.0,
                high: close + 12.0,
                low: close - 12.0,
                close,
                volume: 2_000_000.0,
            }
        })
        .collect()
}

fn full_info() -> StockInfo {
    StockInfo {
        symbol: "TCS.NS".to_string(),
        name: Some("Tata Consultancy Services Limited".to_string()),
        price: Some(3890.25),
        currency: Some("INR".to_string()),
        market_cap: Some(14.2e12),
        sector: Some("Technology".to_string()),
        pe_ratio: Some(22.4),
        dividend_yield: Some(0.028),
    }
}

struct Harness {
    forecaster: Forecaster,
    store: Arc<ExportStore>,
    _chart_dir: tempfile::TempDir,
}

fn harness(market: CannedMarket) -> Harness {
    let chart_dir = tempfile::tempdir().unwrap();
    let config = Config {
        host: "0.0.0.0".to_string(),
        port: 3001,
        default_suffix: ".NS".to_string(),
        history_start: date(2018, 1, 1),
        chart_dir: chart_dir.path().to_string_lossy().into_owned(),
        export_ttl_secs: 900,
    };
    let store = ExportStore::new(Duration::from_secs(900));

    Harness {
        forecaster: Forecaster::new(
            Arc::new(market),
            Arc::new(SeasonalTrendModel::default()),
            store.clone(),
            Arc::new(config),
        ),
        store,
        _chart_dir: chart_dir,
    }
}

fn request(ticker: &str) -> ForecastParams {
    ForecastParams {
        ticker: ticker.to_string(),
        picked: None,
        unit: PeriodUnit::Days,
        magnitude: 30,
        start_date: None,
        confidence: 80,
        chart: ChartOptions::default(),
    }
}

#[tokio::test]
async fn test_successful_forecast_run() {
    let harness = harness(CannedMarket {
        history: history(180),
        info: Some(full_info()),
        earnings: vec![
            QuarterlyEarnings { period_end: date(2023, 3, 31), net_income: 1.1e10 },
            QuarterlyEarnings { period_end: date(2023, 6, 30), net_income: 1.2e10 },
        ],
    });

    let outcome = harness.forecaster.run(request("tcs")).await.unwrap();

    assert_eq!(outcome.summary.ticker, "TCS.NS");
    assert_eq!(outcome.summary.name, "Tata Consultancy Services Limited");
    assert_eq!(outcome.summary.price, "3890.25 INR");
    assert_eq!(outcome.trained_rows, 180);
    assert_eq!(outcome.horizon_days, 30);
    assert_eq!(
        outcome.chart.title,
        "Tata Consultancy Services Limited Forecast for 30 Days"
    );
    assert_eq!(outcome.chart.template, "plotly_dark");
    assert!(outcome.earnings_chart.is_some());
    assert!(outcome.monthly_profit_chart.is_some());
    assert!(outcome.image_file.is_some());

    // Low P/E plus a 2.8% yield reaches the buy threshold.
    assert_eq!(outcome.analysis.recommendation, Recommendation::Buy);
}

#[tokio::test]
async fn test_forecast_rows_cover_history_and_horizon() {
    let harness = harness(CannedMarket {
        history: history(120),
        info: Some(full_info()),
        earnings: vec![],
    });

    let outcome = harness.forecaster.run(request("TCS")).await.unwrap();
    let table = harness.store.consume(&outcome.forecast_id).unwrap();

    assert_eq!(table.columns, vec!["Date", "Forecast", "Lower Bound", "Upper Bound"]);
    assert_eq!(table.rows.len(), 120 + 30);

    // Rows continue day by day past the last training date.
    let last_training = date(2023, 1, 2) + chrono::Duration::days(119);
    let first_future = &table.rows[120];
    assert_eq!(
        first_future[0],
        (last_training + chrono::Duration::days(1)).format("%Y-%m-%d").to_string()
    );

    let csv = table.to_csv();
    assert!(csv.starts_with("Date,Forecast,Lower Bound,Upper Bound\n"));
}

#[tokio::test]
async fn test_unknown_symbol_returns_suggestions() {
    let harness = harness(CannedMarket {
        history: vec![],
        info: None,
        earnings: vec![],
    });

    let err = harness.forecaster.run(request("tata")).await.unwrap_err();

    match err {
        AppError::SymbolNotFound { symbol, suggestions } => {
            assert_eq!(symbol, "TATA.NS");
            assert!(suggestions.contains(&"TCS.NS".to_string()));
        }
        other => panic!("expected SymbolNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_picklist_selection_overrides_typed_ticker() {
    let harness = harness(CannedMarket {
        history: history(90),
        info: Some(full_info()),
        earnings: vec![],
    });

    let mut params = request("somethingelse");
    params.picked = Some("TCS".to_string());
    let outcome = harness.forecaster.run(params).await.unwrap();

    assert_eq!(outcome.summary.ticker, "TCS.NS");
}

#[tokio::test]
async fn test_metadata_outage_degrades_to_placeholders() {
    let harness = harness(CannedMarket {
        history: history(90),
        info: None,
        earnings: vec![],
    });

    let outcome = harness.forecaster.run(request("TCS")).await.unwrap();

    assert_eq!(outcome.summary.price, "N/A");
    assert_eq!(outcome.summary.pe_ratio, "N/A");
    assert_eq!(outcome.analysis.pe_ratio, "P/E ratio data unavailable.");
    assert_eq!(outcome.analysis.recommendation, Recommendation::Hold);
    assert!(outcome.earnings_chart.is_none());
}

#[tokio::test]
async fn test_download_handles_are_single_use() {
    let harness = harness(CannedMarket {
        history: history(90),
        info: Some(full_info()),
        earnings: vec![],
    });

    let outcome = harness.forecaster.run(request("TCS")).await.unwrap();

    assert!(harness.store.consume(&outcome.forecast_id).is_some());
    assert!(harness.store.consume(&outcome.forecast_id).is_none());

    let history_table = harness.store.consume(&outcome.history_id).unwrap();
    assert_eq!(
        history_table.columns,
        vec!["Date", "Open", "High", "Low", "Close", "Volume"]
    );
    assert_eq!(history_table.rows.len(), 90);
    assert!(harness.store.consume(&outcome.history_id).is_none());
}

#[tokio::test]
async fn test_too_little_history_is_an_error() {
    let harness = harness(CannedMarket {
        history: history(1),
        info: Some(full_info()),
        earnings: vec![],
    });

    let err = harness.forecaster.run(request("TCS")).await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientData { usable_rows: 1 }));
    assert_eq!(err.to_string(), "Not enough data to generate a forecast.");
}

#[tokio::test]
async fn test_day_bounds_enforced_by_pipeline() {
    let harness = harness(CannedMarket {
        history: history(60),
        info: Some(full_info()),
        earnings: vec![],
    });

    let mut params = request("TCS");
    params.magnitude = 0;
    let err = harness.forecaster.run(params).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid period value: Days must be between 1 and 90.");
}

#[tokio::test]
async fn test_month_horizon_converts_to_days() {
    let harness = harness(CannedMarket {
        history: history(120),
        info: Some(full_info()),
        earnings: vec![],
    });

    let mut params = request("TCS");
    params.unit = PeriodUnit::Months;
    params.magnitude = 3;
    let outcome = harness.forecaster.run(params).await.unwrap();

    assert_eq!(outcome.horizon_days, 90);
    assert_eq!(
        outcome.chart.title,
        "Tata Consultancy Services Limited Forecast for 3 Months"
    );
}

#[tokio::test]
async fn test_rsi_overlay_brings_oscillator_axis() {
    let harness = harness(CannedMarket {
        history: history(120),
        info: Some(full_info()),
        earnings: vec![],
    });

    let mut params = request("TCS");
    params.chart = ChartOptions {
        show_ma: true,
        show_rsi: true,
        ..ChartOptions::default()
    };
    let outcome = harness.forecaster.run(params).await.unwrap();

    let names: Vec<&str> = outcome.chart.traces.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Historical", "Forecast", "Upper Bound", "Lower Bound", "50-day MA", "RSI (14)"]
    );
    assert_eq!(outcome.chart.oscillator_range, Some((0.0, 100.0)));
}

#[tokio::test]
async fn test_non_finite_closes_are_dropped_and_counted() {
    let mut bars = history(80);
    bars[10].close = f64::NAN;
    bars[20].close = f64::INFINITY;

    let harness = harness(CannedMarket {
        history: bars,
        info: Some(full_info()),
        earnings: vec![],
    });

    let outcome = harness.forecaster.run(request("TCS")).await.unwrap();
    assert_eq!(outcome.trained_rows, 78);
    assert_eq!(outcome.dropped_rows, 2);
}
