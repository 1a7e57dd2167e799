use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit of the requested prediction period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Days,
    Months,
    Years,
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodUnit::Days => write!(f, "Days"),
            PeriodUnit::Months => write!(f, "Months"),
            PeriodUnit::Years => write!(f, "Years"),
        }
    }
}

/// One observation the model trains on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Cleaned (date, value) series ready for fitting. `dropped_rows` counts
/// observations discarded during numeric coercion so the filtering stays
/// observable instead of silent.
#[derive(Debug, Clone)]
pub struct TrainingFrame {
    pub points: Vec<TrainingPoint>,
    pub dropped_rows: usize,
}

impl TrainingFrame {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Date of the last observation. Frames are built with at least two
    /// rows, so this only returns `None` for hand-rolled empty frames.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// One forecast row: point estimate plus confidence bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub forecast: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A CSV-serializable table held by the export store until downloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// Render the table as CSV, header first.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.columns.join(","));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_unit_deserializes_lowercase() {
        let unit: PeriodUnit = serde_json::from_str("\"days\"").unwrap();
        assert_eq!(unit, PeriodUnit::Days);
        let unit: PeriodUnit = serde_json::from_str("\"months\"").unwrap();
        assert_eq!(unit, PeriodUnit::Months);
        let unit: PeriodUnit = serde_json::from_str("\"years\"").unwrap();
        assert_eq!(unit, PeriodUnit::Years);
    }

    #[test]
    fn test_period_unit_rejects_unknown() {
        let result: Result<PeriodUnit, _> = serde_json::from_str("\"weeks\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_period_unit_display_capitalized() {
        assert_eq!(PeriodUnit::Days.to_string(), "Days");
        assert_eq!(PeriodUnit::Months.to_string(), "Months");
        assert_eq!(PeriodUnit::Years.to_string(), "Years");
    }

    #[test]
    fn test_training_frame_last_date() {
        let frame = TrainingFrame {
            points: vec![
                TrainingPoint { date: date(2024, 1, 1), value: 100.0 },
                TrainingPoint { date: date(2024, 1, 2), value: 101.0 },
            ],
            dropped_rows: 0,
        };
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.last_date(), Some(date(2024, 1, 2)));
    }

    #[test]
    fn test_export_table_to_csv() {
        let table = ExportTable {
            columns: vec!["Date".to_string(), "Forecast".to_string()],
            rows: vec![
                vec!["2024-01-01".to_string(), "100.5".to_string()],
                vec!["2024-01-02".to_string(), "101.25".to_string()],
            ],
        };

        let csv = table.to_csv();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Date,Forecast"));
        assert_eq!(lines.next(), Some("2024-01-01,100.5"));
        assert_eq!(lines.next(), Some("2024-01-02,101.25"));
        assert_eq!(lines.next(), None);
    }
}
