use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use super::*;
use crate::test_support::{MockOperationRepository, MockPortfolioRepository};
use crate::Error;

fn new_op(portfolio: &str, instrument: &str, operation_type: OperationType) -> NewOperation {
    NewOperation {
        id: None,
        portfolio_id: portfolio.to_string(),
        instrument_id: instrument.to_string(),
        currency: Currency::Rub,
        unit_price: dec!(590.7),
        volume: 40,
        timestamp: Utc.with_ymd_and_hms(2020, 2, 3, 10, 0, 0).unwrap(),
        operation_type,
    }
}

fn setup() -> (OperationService, Arc<MockOperationRepository>) {
    let operations = Arc::new(MockOperationRepository::default());
    let service = OperationService::new(
        operations.clone(),
        Arc::new(MockPortfolioRepository::with_ids(&["p1", "p2"])),
    );
    (service, operations)
}

#[tokio::test]
async fn test_create_assigns_id_and_persists() {
    let (service, repo) = setup();
    let created = service
        .create_operation(new_op("p1", "FXGD", OperationType::Buy))
        .await
        .unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(repo.operations.read().unwrap().len(), 1);

    let listed = service
        .get_operations("p1", &OperationQuery::default())
        .unwrap();
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_create_for_missing_portfolio() {
    let (service, _) = setup();
    let err = service
        .create_operation(new_op("nope", "FXGD", OperationType::Buy))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Operation(OperationError::PortfolioNotFound(_))
    ));
}

#[tokio::test]
async fn test_bulk_create_is_all_or_nothing() {
    let (service, repo) = setup();
    let mut bad = new_op("", "FXGD", OperationType::Sell);
    bad.volume = -1;
    let result = service
        .create_operations("p1", vec![new_op("", "FXGD", OperationType::Buy), bad])
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(repo.operations.read().unwrap().is_empty());

    let created = service
        .create_operations(
            "p1",
            vec![
                new_op("", "FXGD", OperationType::Buy),
                new_op("ignored", "FXIT", OperationType::Buy),
            ],
        )
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|op| op.portfolio_id == "p1"));
}

#[tokio::test]
async fn test_delete_checks_ownership() {
    let (service, repo) = setup();
    let created = service
        .create_operation(new_op("p1", "FXGD", OperationType::Buy))
        .await
        .unwrap();

    let err = service.delete_operation("p2", &created.id).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Operation(OperationError::PortfolioMismatch { .. })
    ));

    let err = service.delete_operation("p1", "missing").await.unwrap_err();
    assert!(err.is_not_found());

    let deleted = service.delete_operation("p1", &created.id).await.unwrap();
    assert_eq!(deleted.id, created.id);
    assert!(repo.operations.read().unwrap().is_empty());
}
