use chrono::NaiveDate;
use std::env;

/// Earliest allowed start of the historical window. Requests asking for
/// older data are clamped to this date.
pub fn min_history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

fn default_history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default()
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Exchange suffix appended to bare tickers (".NS" for NSE).
    pub default_suffix: String,
    /// Default start of the historical window fed to the model.
    pub history_start: NaiveDate,
    /// Folder chart snapshots are written to.
    pub chart_dir: String,
    /// How long export handles stay downloadable, in seconds.
    pub export_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            default_suffix: env::var("DEFAULT_EXCHANGE_SUFFIX")
                .unwrap_or_else(|_| ".NS".to_string()),
            history_start: env::var("HISTORY_START")
                .ok()
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
                .unwrap_or_else(default_history_start),
            chart_dir: env::var("CHART_DIR").unwrap_or_else(|_| "forecast_charts".to_string()),
            export_ttl_secs: env::var("EXPORT_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900),
        }
    }

    /// Clamp a requested history start date into the allowed window.
    pub fn clamp_history_start(&self, requested: Option<NaiveDate>) -> NaiveDate {
        let start = requested.unwrap_or(self.history_start);
        start.max(min_history_start())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
