use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, StorageBackend};
use folioledger_core::{
    instruments::{InstrumentRepositoryTrait, InstrumentService, InstrumentServiceTrait},
    ledger::{LedgerService, LedgerServiceTrait},
    operations::{OperationRepositoryTrait, OperationService, OperationServiceTrait},
    portfolios::{PortfolioRepositoryTrait, PortfolioService, PortfolioServiceTrait},
    prices::{PriceRepositoryTrait, PriceService, PriceServiceTrait},
    sync::{InstrumentSyncJob, PriceSyncJob, SyncRunner},
};
use folioledger_market_data::{MarketDataProvider, MoexProvider};
use folioledger_storage_memory::{
    InMemoryInstrumentRepository, InMemoryOperationRepository, InMemoryPortfolioRepository,
    InMemoryPriceRepository,
};
use folioledger_storage_sqlite::{
    db, InstrumentRepository, OperationRepository, PortfolioRepository, PriceRepository,
};

pub struct AppState {
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub operation_service: Arc<dyn OperationServiceTrait>,
    pub instrument_service: Arc<dyn InstrumentServiceTrait>,
    pub price_service: Arc<dyn PriceServiceTrait>,
    pub ledger_service: Arc<dyn LedgerServiceTrait>,
    pub sync_runner: Arc<SyncRunner>,
}

struct Repositories {
    portfolios: Arc<dyn PortfolioRepositoryTrait>,
    operations: Arc<dyn OperationRepositoryTrait>,
    instruments: Arc<dyn InstrumentRepositoryTrait>,
    prices: Arc<dyn PriceRepositoryTrait>,
}

impl Repositories {
    fn sqlite(db_path: &str) -> anyhow::Result<Self> {
        let (pool, writer) = db::open(db_path)?;
        Ok(Self {
            portfolios: Arc::new(PortfolioRepository::new(pool.clone(), writer.clone())),
            operations: Arc::new(OperationRepository::new(pool.clone(), writer.clone())),
            instruments: Arc::new(InstrumentRepository::new(pool.clone(), writer.clone())),
            prices: Arc::new(PriceRepository::new(pool, writer)),
        })
    }

    fn memory() -> Self {
        Self {
            portfolios: Arc::new(InMemoryPortfolioRepository::new()),
            operations: Arc::new(InMemoryOperationRepository::new()),
            instruments: Arc::new(InMemoryInstrumentRepository::new()),
            prices: Arc::new(InMemoryPriceRepository::new()),
        }
    }
}

/// Installs the global subscriber; `log` records from the library crates are
/// forwarded to it.
pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
    };
    if let Err(e) = result {
        eprintln!("Tracing already initialized: {}", e);
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let repositories = match config.storage {
        StorageBackend::Sqlite => {
            let repositories = Repositories::sqlite(&config.db_path)?;
            tracing::info!("Database path in use: {}", config.db_path);
            repositories
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage; data is lost on shutdown");
            Repositories::memory()
        }
    };

    let mut moex = MoexProvider::new(config.moex_base_url.clone());
    if let Some(board) = &config.moex_board {
        moex = moex.with_preferred_board(board.clone());
    }
    let provider: Arc<dyn MarketDataProvider> = Arc::new(moex);

    let sync_runner = SyncRunner::new()
        .with_job(Arc::new(PriceSyncJob::new(
            repositories.instruments.clone(),
            repositories.prices.clone(),
            provider.clone(),
        )))
        .with_job(Arc::new(InstrumentSyncJob::new(
            repositories.operations.clone(),
            repositories.instruments.clone(),
            provider,
        )));

    Ok(Arc::new(AppState {
        portfolio_service: Arc::new(PortfolioService::new(
            repositories.portfolios.clone(),
            repositories.operations.clone(),
        )),
        operation_service: Arc::new(OperationService::new(
            repositories.operations.clone(),
            repositories.portfolios.clone(),
        )),
        instrument_service: Arc::new(InstrumentService::new(repositories.instruments.clone())),
        price_service: Arc::new(PriceService::new(repositories.prices.clone())),
        ledger_service: Arc::new(LedgerService::new(
            repositories.operations,
            repositories.prices,
            repositories.instruments,
        )),
        sync_runner: Arc::new(sync_runner),
    }))
}
