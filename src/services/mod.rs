pub mod analysis;
pub mod chart;
pub mod engine;
pub mod export_store;
pub mod forecaster;
pub mod horizon;
pub mod indicators;
pub mod snapshot;
pub mod ticker;
pub mod training;

pub use analysis::analyze_fundamentals;
pub use chart::ChartOptions;
pub use engine::{EngineError, ForecastEngine, SeasonalTrendModel};
pub use export_store::ExportStore;
pub use forecaster::{ForecastOutcome, ForecastParams, Forecaster};
pub use horizon::resolve_horizon;
pub use ticker::{normalize_ticker, suggest_symbols, POPULAR_STOCKS};
pub use training::build_training_frame;
