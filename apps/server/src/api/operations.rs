use std::sync::Arc;

use crate::{api::shared::parse_currency, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use folioledger_core::operations::{InstrumentId, NewOperation, Operation, OperationQuery};
use serde::Deserialize;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct OperationsQuery {
    instrument_id: Option<String>,
    currency: Option<String>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl OperationsQuery {
    fn into_query(self) -> ApiResult<OperationQuery> {
        Ok(OperationQuery {
            instrument_id: self.instrument_id.map(InstrumentId::new),
            currency: parse_currency(self.currency.as_deref())?,
            from: self.from,
            to: self.to,
        })
    }
}

async fn list_operations(
    Path(portfolio_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<OperationsQuery>,
) -> ApiResult<Json<Vec<Operation>>> {
    let query = q.into_query()?;
    let operations = state
        .operation_service
        .get_operations(&portfolio_id, &query)?;
    Ok(Json(operations))
}

async fn create_operation(
    Path(portfolio_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<NewOperation>,
) -> ApiResult<(StatusCode, Json<Operation>)> {
    payload.portfolio_id = portfolio_id;
    let operation = state.operation_service.create_operation(payload).await?;
    Ok((StatusCode::CREATED, Json(operation)))
}

async fn create_operations(
    Path(portfolio_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Vec<NewOperation>>,
) -> ApiResult<(StatusCode, Json<Vec<Operation>>)> {
    let operations = state
        .operation_service
        .create_operations(&portfolio_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(operations)))
}

async fn delete_operation(
    Path((portfolio_id, operation_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Operation>> {
    let deleted = state
        .operation_service
        .delete_operation(&portfolio_id, &operation_id)
        .await?;
    Ok(Json(deleted))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/portfolios/{id}/operations",
            get(list_operations).post(create_operation),
        )
        .route("/portfolios/{id}/operations/bulk", post(create_operations))
        .route(
            "/portfolios/{id}/operations/{operation_id}",
            delete(delete_operation),
        )
}
