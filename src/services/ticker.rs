//! Ticker normalization and symbol suggestions.

use crate::error::{AppError, Result};

/// Curated picklist of popular NSE stocks, also the suggestion corpus.
pub const POPULAR_STOCKS: &[(&str, &str)] = &[
    ("Reliance Industries", "RELIANCE"),
    ("Tata Consultancy Services", "TCS"),
    ("Infosys", "INFY"),
    ("HDFC Bank", "HDFCBANK"),
    ("ICICI Bank", "ICICIBANK"),
    ("Wipro", "WIPRO"),
    ("Bharti Airtel", "BHARTIARTL"),
    ("Asian Paints", "ASIANPAINT"),
    ("Hindustan Unilever", "HINDUNILVR"),
    ("Bajaj Finance", "BAJFINANCE"),
];

/// Resolve the raw user input into a canonical exchange symbol.
///
/// A non-empty picklist selection wins over the typed ticker. The input is
/// trimmed and uppercased, and the exchange suffix is appended when the
/// symbol carries no exchange qualifier. Already-qualified symbols pass
/// through unchanged, so normalization is idempotent.
pub fn normalize_ticker(raw: &str, picked: Option<&str>, suffix: &str) -> Result<String> {
    let chosen = match picked {
        Some(p) if !p.trim().is_empty() => p,
        _ => raw,
    };

    let ticker = chosen.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AppError::EmptyInput);
    }

    if ticker.contains('.') {
        Ok(ticker)
    } else {
        Ok(format!("{}{}", ticker, suffix))
    }
}

/// Suggest qualified symbols for a failed lookup.
///
/// The attempted symbol (suffix stripped, case-insensitive) is substring
/// matched against both the symbols and the display names of the curated
/// list. Returns an empty vec when nothing matches.
pub fn suggest_symbols(attempted: &str, suffix: &str) -> Vec<String> {
    let needle = attempted
        .trim_end_matches(suffix)
        .trim_end_matches(&suffix.to_lowercase())
        .to_lowercase();

    POPULAR_STOCKS
        .iter()
        .filter(|(name, symbol)| {
            symbol.to_lowercase().contains(&needle) || name.to_lowercase().contains(&needle)
        })
        .map(|(_, symbol)| format!("{}{}", symbol, suffix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // normalize_ticker Tests
    // =========================================================================

    #[test]
    fn test_normalize_appends_suffix() {
        let symbol = normalize_ticker("reliance", None, ".NS").unwrap();
        assert_eq!(symbol, "RELIANCE.NS");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        let symbol = normalize_ticker("  tcs  ", None, ".NS").unwrap();
        assert_eq!(symbol, "TCS.NS");
    }

    #[test]
    fn test_normalize_keeps_existing_qualifier() {
        let symbol = normalize_ticker("AAPL.MX", None, ".NS").unwrap();
        assert_eq!(symbol, "AAPL.MX");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_ticker("infy", None, ".NS").unwrap();
        let twice = normalize_ticker(&once, None, ".NS").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_empty_is_error() {
        assert!(matches!(
            normalize_ticker("", None, ".NS"),
            Err(AppError::EmptyInput)
        ));
        assert!(matches!(
            normalize_ticker("   ", None, ".NS"),
            Err(AppError::EmptyInput)
        ));
    }

    #[test]
    fn test_normalize_picked_wins_over_typed() {
        let symbol = normalize_ticker("WIPRO", Some("RELIANCE"), ".NS").unwrap();
        assert_eq!(symbol, "RELIANCE.NS");
    }

    #[test]
    fn test_normalize_blank_pick_falls_back_to_typed() {
        let symbol = normalize_ticker("WIPRO", Some("  "), ".NS").unwrap();
        assert_eq!(symbol, "WIPRO.NS");
    }

    #[test]
    fn test_normalize_empty_both_is_error() {
        assert!(matches!(
            normalize_ticker("", Some(""), ".NS"),
            Err(AppError::EmptyInput)
        ));
    }

    // =========================================================================
    // suggest_symbols Tests
    // =========================================================================

    #[test]
    fn test_suggest_matches_symbol_substring() {
        let suggestions = suggest_symbols("RELI.NS", ".NS");
        assert_eq!(suggestions, vec!["RELIANCE.NS".to_string()]);
    }

    #[test]
    fn test_suggest_matches_name_substring() {
        // "bank" appears in HDFC Bank and ICICI Bank names
        let suggestions = suggest_symbols("BANK", ".NS");
        assert!(suggestions.contains(&"HDFCBANK.NS".to_string()));
        assert!(suggestions.contains(&"ICICIBANK.NS".to_string()));
    }

    #[test]
    fn test_suggest_case_insensitive() {
        let suggestions = suggest_symbols("wip", ".NS");
        assert_eq!(suggestions, vec!["WIPRO.NS".to_string()]);
    }

    #[test]
    fn test_suggest_no_match_is_empty() {
        let suggestions = suggest_symbols("ZZZZZZ.NS", ".NS");
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_suggest_strips_suffix_before_matching() {
        // Without stripping, the ".NS" part would never match a bare symbol
        let suggestions = suggest_symbols("TCS.NS", ".NS");
        assert_eq!(suggestions, vec!["TCS.NS".to_string()]);
    }
}
