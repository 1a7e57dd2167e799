use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Descriptive stock metadata. Every field except the symbol is optional:
/// the provider omits fields freely and the pipeline degrades to "N/A"
/// rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockInfo {
    pub symbol: String,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
    pub sector: Option<String>,
    pub pe_ratio: Option<f64>,
    /// Dividend yield as a fraction (0.0035 = 0.35%).
    pub dividend_yield: Option<f64>,
}

impl StockInfo {
    /// Metadata stand-in used when the provider lookup fails.
    pub fn placeholder(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: None,
            price: None,
            currency: None,
            market_cap: None,
            sector: None,
            pe_ratio: None,
            dividend_yield: None,
        }
    }

    /// Display name, falling back to the symbol itself.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}

/// Stock metadata formatted for display, with "N/A" fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub ticker: String,
    pub name: String,
    pub price: String,
    pub market_cap: String,
    pub sector: String,
    pub pe_ratio: String,
    pub dividend_yield: String,
}

impl From<&StockInfo> for StockSummary {
    fn from(info: &StockInfo) -> Self {
        let currency = info.currency.as_deref().unwrap_or("");
        Self {
            ticker: info.symbol.clone(),
            name: info.display_name().to_string(),
            price: match info.price {
                Some(p) => format!("{} {}", p, currency),
                None => "N/A".to_string(),
            },
            market_cap: match info.market_cap {
                Some(cap) => format!("{:.2}B {}", cap / 1e9, currency),
                None => "N/A".to_string(),
            },
            sector: info.sector.clone().unwrap_or_else(|| "N/A".to_string()),
            pe_ratio: match info.pe_ratio {
                Some(pe) => format!("{:.2}", pe),
                None => "N/A".to_string(),
            },
            dividend_yield: match info.dividend_yield {
                Some(dy) => format!("{:.2}%", dy * 100.0),
                None => "N/A".to_string(),
            },
        }
    }
}

/// One quarter of reported net income.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyEarnings {
    pub period_end: NaiveDate,
    pub net_income: f64,
}
