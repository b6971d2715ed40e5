use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};

/// Which repository implementation backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("Unknown storage backend '{}'", other)),
        }
    }
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub storage: StorageBackend,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub moex_base_url: String,
    /// Board whose bars win over other boards' bars for the same day
    pub moex_board: Option<String>,
    /// `None` disables the periodic price sync
    pub price_sync_interval: Option<Duration>,
    pub log_format: String,
}

impl Config {
    /// Reads `LEDGER_*` variables after loading a `.env` file when present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let listen_addr: SocketAddr = var("LEDGER_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid LEDGER_LISTEN_ADDR")?;
        let storage = var("LEDGER_STORAGE", "sqlite").parse()?;
        let db_path = var("LEDGER_DB_PATH", "./db/ledger.db");
        let cors_allow = var("LEDGER_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = var("LEDGER_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);
        let moex_base_url = var("LEDGER_MOEX_BASE_URL", "https://iss.moex.com/iss");
        let moex_board = lookup("LEDGER_MOEX_BOARD")
            .map(|b| b.trim().to_ascii_uppercase())
            .filter(|b| !b.is_empty());
        let sync_secs: u64 = var("LEDGER_PRICE_SYNC_INTERVAL_SECS", "21600")
            .parse()
            .context("Invalid LEDGER_PRICE_SYNC_INTERVAL_SECS")?;
        let log_format = var("LEDGER_LOG_FORMAT", "text");

        Ok(Self {
            listen_addr,
            storage,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            moex_base_url,
            moex_board,
            price_sync_interval: (sync_secs > 0).then(|| Duration::from_secs(sync_secs)),
            log_format,
        })
    }
}
