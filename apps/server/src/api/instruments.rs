use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use folioledger_core::{
    instruments::{Instrument, InstrumentInput},
    operations::InstrumentId,
};

async fn list_instruments(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Instrument>>> {
    let instruments = state.instrument_service.list_instruments()?;
    Ok(Json(instruments))
}

async fn upsert_instrument(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InstrumentInput>,
) -> ApiResult<Json<Instrument>> {
    let instrument = state.instrument_service.upsert_instrument(payload).await?;
    Ok(Json(instrument))
}

async fn get_instrument(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Instrument>> {
    let instrument = state
        .instrument_service
        .get_instrument(&InstrumentId::new(id))?;
    Ok(Json(instrument))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/instruments", get(list_instruments).put(upsert_instrument))
        .route("/instruments/{id}", get(get_instrument))
}
