use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::test_fixtures::{day, op};
use super::{LedgerService, LedgerServiceTrait};
use crate::operations::{Currency, InstrumentId, Operation, OperationType};
use crate::prices::PricePoint;
use crate::test_support::{
    MockInstrumentRepository, MockOperationRepository, MockPriceRepository,
};

fn scenario_operations() -> Vec<Operation> {
    vec![
        op(1, "RUB/cash", OperationType::PayIn, dec!(1), 100000),
        op(2, "FXIT", OperationType::Buy, dec!(4195), 1),
        op(3, "FXGD", OperationType::Buy, dec!(590.7), 40),
        op(4, "FXGD", OperationType::Sell, dec!(595), 20),
        op(5, "FXIT", OperationType::Sell, dec!(4230), 1),
        op(6, "FXGD", OperationType::Sell, dec!(604.9), 10),
    ]
}

fn service(operations: Vec<Operation>, prices: Vec<PricePoint>) -> LedgerService {
    LedgerService::new(
        Arc::new(MockOperationRepository::with(operations)),
        Arc::new(MockPriceRepository::with(prices)),
        Arc::new(MockInstrumentRepository::with_tickers(&[
            ("FXIT", "FXIT"),
            ("FXGD", "FXGD"),
        ])),
    )
}

#[tokio::test]
async fn test_positions_end_to_end() {
    let prices = vec![
        PricePoint::new("FXIT".into(), day(7), dec!(4251), 100, "MOEX"),
        PricePoint::new("FXGD".into(), day(6), dec!(605.1), 100, "MOEX"),
        PricePoint::new("FXGD".into(), day(7), dec!(606.4), 100, "MOEX"),
    ];
    let service = service(scenario_operations(), prices);

    let positions = service.positions("p1", Some(day(8))).await.unwrap();
    let tickers: Vec<_> = positions.iter().map(|p| p.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["FXGD", "RUB"]);
    assert_eq!(positions[0].volume, 10);
    assert_eq!(positions[0].valuation_price, dec!(606.4));
    assert_eq!(positions[1].valuation_price, dec!(94356));

    let again = service.positions("p1", Some(day(8))).await.unwrap();
    assert_eq!(positions, again);
}

#[tokio::test]
async fn test_positions_before_any_operation_is_empty() {
    let service = service(scenario_operations(), vec![]);
    let positions = service
        .positions("p1", Some(day(1) - chrono::Duration::hours(1)))
        .await
        .unwrap();
    assert!(positions.is_empty());
}

#[tokio::test]
async fn test_balance_filters() {
    let mut ops = scenario_operations();
    let mut usd = op(7, "RUB/cash", OperationType::PayIn, dec!(1), 50);
    usd.currency = Currency::Usd;
    ops.push(usd);
    let service = service(ops, vec![]);

    assert_eq!(service.balance("p1", None, None).await.unwrap(), dec!(94406));
    assert_eq!(
        service
            .balance("p1", Some(Currency::Rub), None)
            .await
            .unwrap(),
        dec!(94356)
    );
    let fxgd = InstrumentId::new("FXGD");
    assert_eq!(
        service.balance("p1", None, Some(&fxgd)).await.unwrap(),
        dec!(-5679)
    );
    assert_eq!(
        service.balance("other", None, None).await.unwrap(),
        Decimal::ZERO
    );
}

#[tokio::test]
async fn test_average_price_ignores_fees_and_cash() {
    let mut ops = scenario_operations();
    ops.push(op(7, "FXGD", OperationType::BrokerageFee, dec!(3), 1));
    ops.push(op(8, "FXGD", OperationType::Buy, dec!(610), 10));
    let service = service(ops, vec![]);

    assert_eq!(
        service
            .average_price("p1", &InstrumentId::new("FXGD"))
            .await
            .unwrap(),
        dec!(600.35)
    );
    assert_eq!(
        service
            .average_price("p1", &InstrumentId::new("FXIT"))
            .await
            .unwrap(),
        Decimal::ZERO
    );
}
