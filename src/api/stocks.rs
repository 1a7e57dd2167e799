use crate::services::POPULAR_STOCKS;
use crate::AppState;
use axum::{routing::get, Json, Router};
use serde::Serialize;

/// One entry of the curated picklist.
#[derive(Debug, Serialize)]
pub struct PopularStock {
    pub name: &'static str,
    pub symbol: &'static str,
}

/// GET /api/stocks
async fn list_stocks() -> Json<Vec<PopularStock>> {
    Json(
        POPULAR_STOCKS
            .iter()
            .map(|&(name, symbol)| PopularStock { name, symbol })
            .collect(),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_stocks))
}
