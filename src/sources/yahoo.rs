//! Yahoo Finance API client.
//!
//! Daily OHLCV history via the unofficial chart endpoint, plus company
//! metadata and quarterly income statements via quoteSummary.

use crate::error::{AppError, Result};
use crate::types::{PricePoint, QuarterlyEarnings, StockInfo};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_BASE: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct YahooResult {
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct YahooMeta {
    symbol: String,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// quoteSummary response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    summary_detail: Option<SummaryDetailModule>,
    asset_profile: Option<AssetProfileModule>,
    income_statement_history_quarterly: Option<IncomeStatementHistory>,
}

/// Numeric fields arrive wrapped as `{"raw": 123.4, "fmt": "123.40"}`,
/// sometimes as an empty object when the value is unknown.
#[derive(Debug, Deserialize, Default)]
struct RawValue {
    raw: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct RawTimestamp {
    raw: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct PriceModule {
    long_name: Option<String>,
    currency: Option<String>,
    regular_market_price: Option<RawValue>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct SummaryDetailModule {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    dividend_yield: Option<RawValue>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct AssetProfileModule {
    sector: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct IncomeStatementHistory {
    income_statement_history: Vec<IncomeStatement>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct IncomeStatement {
    end_date: Option<RawTimestamp>,
    net_income: Option<RawValue>,
}

fn timestamp_to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

/// Zip Yahoo's parallel arrays into daily bars. Rows with a missing or
/// non-positive close are skipped, missing open/high/low fall back to the
/// close, and dates come out strictly increasing (intraday buckets on the
/// current session collapse to the first row seen).
fn assemble_points(timestamps: &[i64], quote: YahooQuote) -> Vec<PricePoint> {
    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let close = closes.get(i).and_then(|v| *v).unwrap_or(0.0);

        // Skip invalid data points
        if close <= 0.0 {
            continue;
        }

        let Some(date) = timestamp_to_date(timestamp) else {
            continue;
        };

        if points.last().map(|p| p.date >= date) == Some(true) {
            continue;
        }

        points.push(PricePoint {
            date,
            open: opens.get(i).and_then(|v| *v).unwrap_or(close),
            high: highs.get(i).and_then(|v| *v).unwrap_or(close),
            low: lows.get(i).and_then(|v| *v).unwrap_or(close),
            close,
            volume: volumes.get(i).and_then(|v| *v).unwrap_or(0) as f64,
        });
    }

    points
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch daily OHLCV bars for `[start, end)`.
    ///
    /// An unknown symbol yields an empty vec; transport and API failures
    /// are errors. Rows with a missing or non-positive close are skipped.
    pub async fn fetch_daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp();
        let url = format!(
            "{}/{}?period1={}&period2={}&interval=1d&includePrePost=false&events=history",
            CHART_BASE, symbol, period1, period2
        );

        debug!("Fetching Yahoo Finance history: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // Unknown symbols come back as 404 with an error body
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!("Yahoo API error: {}", status)));
        }

        let data: YahooChartResponse = response.json().await?;

        if let Some(error) = data.chart.error {
            if error.code == "Not Found" {
                return Ok(Vec::new());
            }
            return Err(AppError::ExternalApi(format!(
                "Yahoo API error: {} - {}",
                error.code, error.description
            )));
        }

        let result = match data.chart.result.and_then(|r| r.into_iter().next()) {
            Some(result) => result,
            None => return Ok(Vec::new()),
        };

        let timestamps = result.timestamp.unwrap_or_default();
        let quote = match result.indicators.quote.into_iter().next() {
            Some(quote) => quote,
            None => return Ok(Vec::new()),
        };

        Ok(assemble_points(&timestamps, quote))
    }

    async fn fetch_quote_summary(
        &self,
        symbol: &str,
        modules: &str,
    ) -> Result<QuoteSummaryResult> {
        let url = format!("{}/{}?modules={}", QUOTE_SUMMARY_BASE, symbol, modules);
        debug!("Fetching Yahoo Finance summary: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!("Yahoo API error: {}", status)));
        }

        let data: QuoteSummaryResponse = response.json().await?;

        if let Some(error) = data.quote_summary.error {
            return Err(AppError::ExternalApi(format!(
                "Yahoo API error: {} - {}",
                error.code, error.description
            )));
        }

        data.quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| AppError::ExternalApi("Empty quoteSummary result".to_string()))
    }

    /// Fetch descriptive metadata for a symbol.
    pub async fn fetch_stock_info(&self, symbol: &str) -> Result<StockInfo> {
        let result = self
            .fetch_quote_summary(symbol, "price,summaryDetail,assetProfile")
            .await?;

        let price = result.price.unwrap_or_default();
        let detail = result.summary_detail.unwrap_or_default();
        let profile = result.asset_profile.unwrap_or_default();

        Ok(StockInfo {
            symbol: symbol.to_string(),
            name: price.long_name,
            price: price.regular_market_price.and_then(|v| v.raw),
            currency: price.currency,
            market_cap: price.market_cap.and_then(|v| v.raw),
            sector: profile.sector,
            pe_ratio: detail.trailing_pe.and_then(|v| v.raw),
            dividend_yield: detail.dividend_yield.and_then(|v| v.raw),
        })
    }

    /// Fetch quarterly net income, oldest first.
    pub async fn fetch_quarterly_earnings(&self, symbol: &str) -> Result<Vec<QuarterlyEarnings>> {
        let result = self
            .fetch_quote_summary(symbol, "incomeStatementHistoryQuarterly")
            .await?;

        let statements = result
            .income_statement_history_quarterly
            .map(|h| h.income_statement_history)
            .unwrap_or_default();

        let mut earnings: Vec<QuarterlyEarnings> = statements
            .into_iter()
            .filter_map(|s| {
                let period_end = s.end_date.and_then(|d| d.raw).and_then(timestamp_to_date)?;
                let net_income = s.net_income.and_then(|v| v.raw)?;
                Some(QuarterlyEarnings { period_end, net_income })
            })
            .collect();

        earnings.sort_by_key(|e| e.period_end);
        Ok(earnings)
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl super::MarketData for YahooFinanceClient {
    async fn daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        self.fetch_daily_history(symbol, start, end).await
    }

    async fn stock_info(&self, symbol: &str) -> Result<StockInfo> {
        self.fetch_stock_info(symbol).await
    }

    async fn quarterly_earnings(&self, symbol: &str) -> Result<Vec<QuarterlyEarnings>> {
        self.fetch_quarterly_earnings(symbol).await
    }
}
