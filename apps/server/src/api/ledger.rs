use std::sync::Arc;

use crate::{
    api::shared::{parse_currency, parse_valuation_date},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use folioledger_core::{ledger::PositionValuation, operations::InstrumentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceQuery {
    currency: Option<String>,
    instrument_id: Option<String>,
}

#[derive(Serialize)]
struct BalanceResponse {
    balance: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AveragePriceQuery {
    instrument_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AveragePriceResponse {
    average_price: Decimal,
}

#[derive(Deserialize)]
struct SharesQuery {
    date: Option<String>,
}

async fn get_balance(
    Path(portfolio_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<BalanceQuery>,
) -> ApiResult<Json<BalanceResponse>> {
    state.portfolio_service.get_portfolio(&portfolio_id)?;
    let currency = parse_currency(q.currency.as_deref())?;
    let instrument_id = q
        .instrument_id
        .map(InstrumentId::new)
        .filter(|id| !id.is_empty());
    let balance = state
        .ledger_service
        .balance(&portfolio_id, currency, instrument_id.as_ref())
        .await?;
    Ok(Json(BalanceResponse { balance }))
}

async fn get_average_price(
    Path(portfolio_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<AveragePriceQuery>,
) -> ApiResult<Json<AveragePriceResponse>> {
    state.portfolio_service.get_portfolio(&portfolio_id)?;
    let instrument_id = q
        .instrument_id
        .map(InstrumentId::new)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("instrumentId is required".to_string()))?;
    let average_price = state
        .ledger_service
        .average_price(&portfolio_id, &instrument_id)
        .await?;
    Ok(Json(AveragePriceResponse { average_price }))
}

async fn get_shares(
    Path(portfolio_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<SharesQuery>,
) -> ApiResult<Json<Vec<PositionValuation>>> {
    state.portfolio_service.get_portfolio(&portfolio_id)?;
    let date = parse_valuation_date(q.date.as_deref())?;
    let positions = state
        .ledger_service
        .positions(&portfolio_id, date)
        .await?;
    Ok(Json(positions))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolios/{id}/balance", get(get_balance))
        .route("/portfolios/{id}/average-price", get(get_average_price))
        .route("/portfolios/{id}/shares", get(get_shares))
}
