pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::types::{PricePoint, QuarterlyEarnings, StockInfo};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Market data provider boundary.
///
/// The forecast pipeline talks to the outside world only through this
/// trait, so tests can substitute a canned provider. An unknown symbol
/// surfaces as an empty history, not an error; errors mean the provider
/// itself failed.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Daily OHLCV bars for `[start, end)`, dates strictly increasing.
    async fn daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>>;

    /// Descriptive metadata for a symbol.
    async fn stock_info(&self, symbol: &str) -> Result<StockInfo>;

    /// Quarterly net income, oldest first.
    async fn quarterly_earnings(&self, symbol: &str) -> Result<Vec<QuarterlyEarnings>>;
}
