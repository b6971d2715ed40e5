use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use folioledger_core::sync::{SyncKind, SyncStatusSnapshot};

/// Starts a run in the background and answers with the tracker's state.
///
/// The run keeps going after the response; its outcome is visible through
/// `GET /sync/status`.
fn trigger(state: &AppState, kind: SyncKind) -> ApiResult<(StatusCode, Json<SyncStatusSnapshot>)> {
    let _handle = state.sync_runner.trigger(kind)?;
    Ok((StatusCode::ACCEPTED, Json(state.sync_runner.status(kind))))
}

async fn sync_prices(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<SyncStatusSnapshot>)> {
    trigger(&state, SyncKind::Prices)
}

async fn sync_instruments(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<SyncStatusSnapshot>)> {
    trigger(&state, SyncKind::Instruments)
}

async fn get_sync_status(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SyncStatusSnapshot>>> {
    Ok(Json(state.sync_runner.statuses()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sync/prices", post(sync_prices))
        .route("/sync/instruments", post(sync_instruments))
        .route("/sync/status", get(get_sync_status))
}
