//! StockPulse - Stock price forecasting and fundamental analysis server

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use config::Config;
use services::{ExportStore, Forecaster};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub forecaster: Arc<Forecaster>,
    pub store: Arc<ExportStore>,
}

// Re-export commonly used types
pub use error::{AppError, Result};
pub use types::*;
