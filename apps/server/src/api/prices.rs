use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use folioledger_core::{
    operations::InstrumentId,
    prices::{NewPricePoint, PricePoint},
};
use serde::Deserialize;

#[derive(Deserialize)]
struct PriceRangeQuery {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

async fn get_prices(
    Path(instrument_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<PriceRangeQuery>,
) -> ApiResult<Json<Vec<PricePoint>>> {
    let prices = state
        .price_service
        .get_prices(&InstrumentId::new(instrument_id), q.from, q.to)?;
    Ok(Json(prices))
}

async fn save_prices(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Vec<NewPricePoint>>,
) -> ApiResult<Json<Vec<PricePoint>>> {
    let saved = state.price_service.save_prices(payload).await?;
    Ok(Json(saved))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/prices", post(save_prices))
        .route("/prices/{instrument_id}", get(get_prices))
}
