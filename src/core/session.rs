//! Application state and the operations the presentation layer calls

use super::cache::KeyValueStore;
use super::chart::ChartSeriesBuilder;
use super::convert::{ConvertedAmount, convert};
use super::currency::RateService;
use super::error::RateError;
use super::history::{HistoryLog, Recorded};
use super::model::{ChartSeries, CurrencyPair, RateSnapshot, SymbolEntry};
use super::sync::{SyncEngine, SyncOutcome, SyncSource};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// In-progress flags the presentation layer reads to disable re-entrant
/// triggers while an operation is awaiting I/O.
#[derive(Debug, Default)]
pub struct SessionStatus {
    loading: AtomicBool,
    converting: AtomicBool,
    adding: AtomicBool,
    generating: AtomicBool,
}

impl SessionStatus {
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn is_converting(&self) -> bool {
        self.converting.load(Ordering::SeqCst)
    }

    pub fn is_adding(&self) -> bool {
        self.adding.load(Ordering::SeqCst)
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }
}

/// Holds a status flag for its lifetime.
struct Busy<'a>(&'a AtomicBool);

impl<'a> Busy<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Busy(flag))
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Session {
    service: Arc<dyn RateService>,
    store: Arc<dyn KeyValueStore>,
    status: Arc<SessionStatus>,
    symbols: Vec<SymbolEntry>,
    snapshot: Option<RateSnapshot>,
    source: SyncSource,
    favorites: HistoryLog,
    recents: HistoryLog,
    selection: CurrencyPair,
    last_result: Option<ConvertedAmount>,
}

impl Session {
    /// Syncs reference data and restores both pair logs concurrently.
    pub async fn start(
        service: Arc<dyn RateService>,
        store: Arc<dyn KeyValueStore>,
        selection: CurrencyPair,
    ) -> Self {
        Self::start_with_status(service, store, selection, Arc::default()).await
    }

    /// Like [`Session::start`], reporting progress through a status the
    /// caller already holds.
    pub async fn start_with_status(
        service: Arc<dyn RateService>,
        store: Arc<dyn KeyValueStore>,
        selection: CurrencyPair,
        status: Arc<SessionStatus>,
    ) -> Self {
        let busy = Busy::acquire(&status.loading);
        let engine = SyncEngine::new(service.as_ref(), store.as_ref());
        let (outcome, favorites, recents) = futures::join!(
            engine.sync(),
            HistoryLog::favorites().load(store.as_ref()),
            HistoryLog::recents().load(store.as_ref()),
        );
        drop(busy);

        let SyncOutcome {
            symbols,
            snapshot,
            source,
        } = outcome;
        info!(
            ?source,
            symbols = symbols.len(),
            favorites = favorites.len(),
            recents = recents.len(),
            "Session started"
        );

        Self {
            service,
            store,
            status,
            symbols,
            snapshot,
            source,
            favorites,
            recents,
            selection,
            last_result: None,
        }
    }

    pub fn status(&self) -> Arc<SessionStatus> {
        Arc::clone(&self.status)
    }

    pub fn symbols(&self) -> &[SymbolEntry] {
        &self.symbols
    }

    pub fn snapshot(&self) -> Option<&RateSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn source(&self) -> SyncSource {
        self.source
    }

    /// Date of the rates in use; `None` when rates are unavailable.
    pub fn last_updated(&self) -> Option<&str> {
        self.snapshot.as_ref()?.as_of_date.as_deref()
    }

    pub fn favorites(&self) -> &[CurrencyPair] {
        self.favorites.entries()
    }

    pub fn recents(&self) -> &[CurrencyPair] {
        self.recents.entries()
    }

    pub fn selection(&self) -> &CurrencyPair {
        &self.selection
    }

    pub fn last_result(&self) -> Option<ConvertedAmount> {
        self.last_result
    }

    pub fn set_selection(&mut self, pair: CurrencyPair) {
        self.selection = pair;
    }

    /// Makes `pair` the current selection. Not persisted.
    pub fn use_pair(&mut self, pair: &CurrencyPair) {
        debug!("Using pair {}", pair);
        self.selection = pair.clone();
    }

    /// Converts `amount` along the current selection. The pair goes into the
    /// recents log only when the conversion succeeds.
    pub async fn convert(&mut self, amount: f64) -> Result<ConvertedAmount> {
        let Some(_busy) = Busy::acquire(&self.status.converting) else {
            anyhow::bail!("A conversion is already in progress");
        };

        let pair = self.selection.clone();
        let Some(snapshot) = self.snapshot.as_ref() else {
            return Err(RateError::ComputeUnavailable(pair.to_string()).into());
        };
        let result = convert(amount, &pair, snapshot)?;
        self.recents.record(&pair, self.store.as_ref()).await?;
        debug!(%pair, amount, %result, "Converted");
        self.last_result = Some(result);
        Ok(result)
    }

    /// Adds the current selection to favorites. Does nothing before any
    /// symbols are known or while another add is running.
    pub async fn add_favorite(&mut self) -> Result<Option<Recorded>> {
        if self.symbols.is_empty() {
            debug!("No symbols loaded, ignoring favorite");
            return Ok(None);
        }
        let Some(_busy) = Busy::acquire(&self.status.adding) else {
            debug!("Favorite add already in progress");
            return Ok(None);
        };

        let pair = self.selection.clone();
        let recorded = self.favorites.record(&pair, self.store.as_ref()).await?;
        Ok(Some(recorded))
    }

    pub async fn build_chart(&self) -> Result<ChartSeries> {
        self.build_chart_on(Utc::now().date_naive()).await
    }

    pub async fn build_chart_on(&self, today: NaiveDate) -> Result<ChartSeries> {
        let Some(_busy) = Busy::acquire(&self.status.generating) else {
            anyhow::bail!("A chart is already being generated");
        };
        let series = ChartSeriesBuilder::new(self.service.as_ref())
            .build_series(&self.selection, today)
            .await?;
        Ok(series)
    }
}
