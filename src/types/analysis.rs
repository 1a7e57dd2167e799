use serde::{Deserialize, Serialize};

/// Automated buy/sell/hold call derived from fundamental metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

/// Per-metric scores feeding the recommendation. Each is -1, 0 or +1;
/// missing data always scores 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisScores {
    pub pe: i8,
    pub dividend: i8,
    pub market_cap: i8,
}

impl AnalysisScores {
    pub fn total(&self) -> i8 {
        self.pe + self.dividend + self.market_cap
    }
}

/// Fundamental analysis result: human-readable notes per metric, the
/// underlying scores, and the derived recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalAnalysis {
    pub pe_ratio: String,
    pub dividend_yield: String,
    pub market_cap: String,
    pub sector: String,
    pub scores: AnalysisScores,
    pub recommendation: Recommendation,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_serializes_as_word() {
        assert_eq!(serde_json::to_string(&Recommendation::Buy).unwrap(), "\"Buy\"");
        assert_eq!(serde_json::to_string(&Recommendation::Sell).unwrap(), "\"Sell\"");
        assert_eq!(serde_json::to_string(&Recommendation::Hold).unwrap(), "\"Hold\"");
    }

    #[test]
    fn test_scores_total() {
        let scores = AnalysisScores { pe: 1, dividend: 1, market_cap: 0 };
        assert_eq!(scores.total(), 2);

        let scores = AnalysisScores { pe: -1, dividend: 0, market_cap: 0 };
        assert_eq!(scores.total(), -1);
    }
}
