//! Fundamental analysis scoring.
//!
//! Scores three metrics (P/E ratio, dividend yield, market cap) against
//! fixed thresholds and rolls them up into a buy/sell/hold call. Missing
//! metrics score zero and are reported as unavailable, so the analyzer
//! never fails outright.

use crate::types::{AnalysisScores, FundamentalAnalysis, Recommendation, StockInfo};

/// Benchmark P/E used for the under/overvaluation comparison.
const INDUSTRY_AVG_PE: f64 = 25.0;

/// Dividend yield (in percent) above which a stock counts as income-friendly.
const DIVIDEND_ATTRACTIVE_PCT: f64 = 2.0;

/// Market cap (in billions) above which a company counts as large-cap.
const LARGE_CAP_BILLIONS: f64 = 100.0;

/// Analyze a stock's fundamentals and derive a recommendation.
pub fn analyze_fundamentals(info: &StockInfo) -> FundamentalAnalysis {
    let (pe_note, pe_score) = match info.pe_ratio {
        Some(pe) if pe < INDUSTRY_AVG_PE => (
            format!(
                "P/E ratio ({:.2}) is below industry average ({}), suggesting potential undervaluation.",
                pe, INDUSTRY_AVG_PE as i64
            ),
            1,
        ),
        Some(pe) if pe > INDUSTRY_AVG_PE + 5.0 => (
            format!(
                "P/E ratio ({:.2}) is above industry average ({}), suggesting potential overvaluation.",
                pe, INDUSTRY_AVG_PE as i64
            ),
            -1,
        ),
        Some(pe) => (
            format!(
                "P/E ratio ({:.2}) is close to industry average ({}).",
                pe, INDUSTRY_AVG_PE as i64
            ),
            0,
        ),
        None => ("P/E ratio data unavailable.".to_string(), 0),
    };

    // Yahoo reports the yield as a fraction; the notes speak in percent.
    let (dividend_note, dividend_score) = match info.dividend_yield.map(|y| y * 100.0) {
        Some(pct) if pct > DIVIDEND_ATTRACTIVE_PCT => (
            format!("Dividend yield ({:.2}%) is attractive for income investors.", pct),
            1,
        ),
        Some(pct) => (
            format!("Dividend yield ({:.2}%) is moderate or low.", pct),
            0,
        ),
        None => ("Dividend yield data unavailable.".to_string(), 0),
    };

    let (cap_note, cap_score) = match info.market_cap.map(|cap| cap / 1e9) {
        Some(billions) if billions > LARGE_CAP_BILLIONS => (
            format!("Market cap ({:.2}B) indicates a large, stable company.", billions),
            1,
        ),
        Some(billions) => (
            format!(
                "Market cap ({:.2}B) indicates a smaller company, potentially higher risk.",
                billions
            ),
            0,
        ),
        None => ("Market cap data unavailable.".to_string(), 0),
    };

    let sector_note = format!("Sector: {}", info.sector.as_deref().unwrap_or("Unknown"));

    let scores = AnalysisScores {
        pe: pe_score,
        dividend: dividend_score,
        market_cap: cap_score,
    };

    let (recommendation, reason) = if scores.total() >= 2 || (pe_score == 1 && dividend_score == 1) {
        (
            Recommendation::Buy,
            "The stock shows strong fundamental signals (low P/E, high dividend yield, large market cap), suggesting it may be undervalued.",
        )
    } else if scores.total() <= -1 && pe_score == -1 {
        (
            Recommendation::Sell,
            "The stock shows weak fundamental signals (high P/E), suggesting it may be overvalued.",
        )
    } else {
        (
            Recommendation::Hold,
            "The stock has mixed fundamental signals, suggesting no clear buy or sell opportunity at this time.",
        )
    };

    FundamentalAnalysis {
        pe_ratio: pe_note,
        dividend_yield: dividend_note,
        market_cap: cap_note,
        sector: sector_note,
        scores,
        recommendation,
        reason: reason.to_string(),
    }
}
