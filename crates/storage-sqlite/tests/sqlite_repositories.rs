//! Integration tests for the SQLite repositories against a temporary database.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use tempfile::TempDir;

use folioledger_core::instruments::{Instrument, InstrumentRepositoryTrait};
use folioledger_core::operations::{
    Currency, InstrumentId, Operation, OperationQuery, OperationRepositoryTrait, OperationType,
};
use folioledger_core::portfolios::{Portfolio, PortfolioRepositoryTrait};
use folioledger_core::prices::{PricePoint, PriceRepositoryTrait};
use folioledger_storage_sqlite::{
    open, InstrumentRepository, OperationRepository, PortfolioRepository, PriceRepository,
};

struct Repos {
    _dir: TempDir,
    portfolios: Arc<PortfolioRepository>,
    operations: Arc<OperationRepository>,
    prices: Arc<PriceRepository>,
    instruments: Arc<InstrumentRepository>,
}

async fn setup() -> Repos {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db").join("ledger.db");
    let (pool, writer) = open(path.to_str().unwrap()).unwrap();
    let repos = Repos {
        portfolios: Arc::new(PortfolioRepository::new(pool.clone(), writer.clone())),
        operations: Arc::new(OperationRepository::new(pool.clone(), writer.clone())),
        prices: Arc::new(PriceRepository::new(pool.clone(), writer.clone())),
        instruments: Arc::new(InstrumentRepository::new(pool, writer)),
        _dir: dir,
    };
    repos
        .portfolios
        .create_portfolio(Portfolio {
            id: "p1".to_string(),
            name: "Main".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    repos
}

fn operation(id: &str, instrument: &str, hour: u32, operation_type: OperationType) -> Operation {
    let ts = Utc.with_ymd_and_hms(2020, 2, 3, hour, 0, 0).unwrap();
    Operation {
        id: id.to_string(),
        portfolio_id: "p1".to_string(),
        instrument_id: InstrumentId::new(instrument),
        currency: Currency::Rub,
        unit_price: dec!(590.7),
        volume: 40,
        timestamp: ts,
        operation_type,
        created_at: ts,
    }
}

#[tokio::test]
async fn test_operations_ordered_with_stable_ties() {
    let repos = setup().await;
    let ops = vec![
        operation("late", "FXGD", 12, OperationType::Sell),
        operation("tie-b", "FXGD", 10, OperationType::Buy),
        operation("tie-a", "FXIT", 10, OperationType::Buy),
        operation("early", "RUB/cash", 9, OperationType::PayIn),
    ];
    assert_eq!(repos.operations.create_operations(ops).await.unwrap(), 4);

    let listed = repos
        .operations
        .get_operations("p1", &OperationQuery::default())
        .unwrap();
    let ids: Vec<_> = listed.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["early", "tie-b", "tie-a", "late"]);
    assert_eq!(listed[1].unit_price, dec!(590.7));

    let fxgd = repos
        .operations
        .get_operations("p1", &OperationQuery::for_instrument(InstrumentId::new("FXGD")))
        .unwrap();
    assert_eq!(fxgd.len(), 2);

    let upto = repos
        .operations
        .get_operations(
            "p1",
            &OperationQuery::up_to(Utc.with_ymd_and_hms(2020, 2, 3, 10, 0, 0).unwrap()),
        )
        .unwrap();
    assert_eq!(upto.len(), 3);

    assert!(repos
        .operations
        .get_operations("nobody", &OperationQuery::default())
        .unwrap()
        .is_empty());

    let ids = repos.operations.list_instrument_ids().unwrap();
    assert_eq!(
        ids,
        vec![
            InstrumentId::new("FXGD"),
            InstrumentId::new("FXIT"),
            InstrumentId::new("RUB/cash")
        ]
    );
}

#[tokio::test]
async fn test_delete_operation_and_not_found() {
    let repos = setup().await;
    repos
        .operations
        .create_operations(vec![operation("op-1", "FXGD", 10, OperationType::Buy)])
        .await
        .unwrap();

    let deleted = repos.operations.delete_operation("op-1").await.unwrap();
    assert_eq!(deleted.id, "op-1");
    assert!(repos.operations.get_operation("op-1").unwrap_err().is_not_found());
    assert!(repos
        .operations
        .delete_operation("op-1")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_duplicate_operation_rolls_back_batch() {
    let repos = setup().await;
    let result = repos
        .operations
        .create_operations(vec![
            operation("dup", "FXGD", 10, OperationType::Buy),
            operation("dup", "FXGD", 11, OperationType::Buy),
        ])
        .await;
    assert!(result.is_err());
    assert!(repos
        .operations
        .get_operations("p1", &OperationQuery::default())
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_price_upsert_and_range() {
    let repos = setup().await;
    let id = InstrumentId::new("FXGD");
    let day = |d: u32| Utc.with_ymd_and_hms(2020, 2, d, 0, 0, 0).unwrap();
    let points = vec![
        PricePoint::new(id.clone(), day(5), dec!(600), 100, "MOEX"),
        PricePoint::new(id.clone(), day(6), dec!(601), 100, "MOEX"),
        PricePoint::new(id.clone(), day(7), dec!(602), 100, "MOEX"),
    ];
    repos.prices.upsert_prices(points).await.unwrap();
    repos
        .prices
        .upsert_prices(vec![PricePoint::new(id.clone(), day(7), dec!(603.5), 120, "MOEX")])
        .await
        .unwrap();

    let all = repos.prices.get_prices(&id, None, None).unwrap();
    assert_eq!(all.len(), 3);

    let latest = repos.prices.latest_price(&id).unwrap().unwrap();
    assert_eq!(latest.price, dec!(603.5));
    assert_eq!(latest.id, "FXGD_20200207");

    let window = repos
        .prices
        .get_prices(&id, Some(day(6)), Some(day(6) + Duration::hours(1)))
        .unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].price, dec!(601));

    assert!(repos
        .prices
        .latest_price(&InstrumentId::new("FXIT"))
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_instrument_upsert_replaces_entry() {
    let repos = setup().await;
    let mut instrument = Instrument {
        id: InstrumentId::new("IE00B8XB7377"),
        ticker: Some("FXGD".to_string()),
        isin: Some("IE00B8XB7377".to_string()),
        figi: None,
        name: None,
        currency: Some(Currency::Rub),
        updated_at: Utc::now(),
    };
    repos
        .instruments
        .upsert_instrument(instrument.clone())
        .await
        .unwrap();
    instrument.name = Some("FinEx Gold ETF".to_string());
    instrument.currency = None;
    repos
        .instruments
        .upsert_instrument(instrument.clone())
        .await
        .unwrap();

    let stored = repos
        .instruments
        .get_instrument(&instrument.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.name.as_deref(), Some("FinEx Gold ETF"));
    assert!(stored.currency.is_none());
    assert_eq!(repos.instruments.list_instruments().unwrap().len(), 1);
    assert!(repos
        .instruments
        .get_instrument(&InstrumentId::new("FXIT"))
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_portfolio_not_found_and_delete() {
    let repos = setup().await;
    assert!(repos.portfolios.get_portfolio("nope").unwrap_err().is_not_found());
    assert_eq!(repos.portfolios.list_portfolios().unwrap().len(), 1);
    repos.portfolios.delete_portfolio("p1").await.unwrap();
    assert!(repos.portfolios.list_portfolios().unwrap().is_empty());
}
