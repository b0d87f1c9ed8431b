//! Offline-first refresh of the symbol catalog and latest rates

use super::cache::{KeyValueStore, RATES_KEY, SYMBOLS_KEY, read_json, write_json};
use super::currency::RateService;
use super::error::RateError;
use super::model::{REFERENCE_CURRENCY, RateSnapshot, SymbolEntry};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSource {
    Remote,
    Cache,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    pub symbols: Vec<SymbolEntry>,
    pub snapshot: Option<RateSnapshot>,
    pub source: SyncSource,
}

impl SyncOutcome {
    /// `None` means the rates shown are missing or of unknown age.
    pub fn last_updated(&self) -> Option<&str> {
        self.snapshot.as_ref()?.as_of_date.as_deref()
    }
}

pub struct SyncEngine<'a> {
    service: &'a dyn RateService,
    store: &'a dyn KeyValueStore,
}

impl<'a> SyncEngine<'a> {
    pub fn new(service: &'a dyn RateService, store: &'a dyn KeyValueStore) -> Self {
        Self { service, store }
    }

    /// Fetches fresh data, or whatever the store last saw if the service is
    /// unavailable. Never fails.
    pub async fn sync(&self) -> SyncOutcome {
        match self.fetch_remote().await {
            Ok((symbols, snapshot)) => {
                self.persist(&symbols, &snapshot).await;
                info!(
                    symbols = symbols.len(),
                    date = ?snapshot.as_of_date,
                    "Synced rates from remote"
                );
                SyncOutcome {
                    symbols,
                    snapshot: Some(snapshot),
                    source: SyncSource::Remote,
                }
            }
            Err(e) => {
                warn!(error = %e, "Rate sync failed, falling back to cached data");
                self.load_cached().await
            }
        }
    }

    async fn fetch_remote(&self) -> Result<(Vec<SymbolEntry>, RateSnapshot), RateError> {
        let symbols = self.service.fetch_symbols().await?;
        let codes: Vec<String> = symbols.iter().map(|s| s.code.clone()).collect();
        debug!("Fetched {} symbols", codes.len());

        let latest = self
            .service
            .fetch_latest(REFERENCE_CURRENCY, &codes)
            .await?;
        let snapshot = RateSnapshot {
            base: latest.base,
            as_of_date: latest.date,
            rates: latest.rates,
        };
        Ok((symbols, snapshot))
    }

    /// Only called once both fetches succeeded. A failed write leaves the
    /// previous cached value in place.
    async fn persist(&self, symbols: &[SymbolEntry], snapshot: &RateSnapshot) {
        if let Err(e) = write_json(self.store, RATES_KEY, snapshot).await {
            warn!(error = %e, "Failed to cache rates");
        }
        if let Err(e) = write_json(self.store, SYMBOLS_KEY, symbols).await {
            warn!(error = %e, "Failed to cache symbols");
        }
    }

    async fn load_cached(&self) -> SyncOutcome {
        let symbols = match read_json::<Vec<SymbolEntry>>(self.store, SYMBOLS_KEY).await {
            Ok(symbols) => symbols,
            Err(_) => {
                info!("No offline symbols available");
                Vec::new()
            }
        };
        let snapshot = match read_json::<RateSnapshot>(self.store, RATES_KEY).await {
            Ok(snapshot) => Some(snapshot),
            Err(_) => {
                info!("No offline rates available");
                None
            }
        };
        SyncOutcome {
            symbols,
            snapshot,
            source: SyncSource::Cache,
        }
    }
}
