//! Deduplicated, size-capped logs of currency pairs (favorites and recents)

use super::cache::{FAVORITES_KEY, HISTORY_KEY, KeyValueStore, read_json, write_json};
use super::model::CurrencyPair;
use anyhow::Result;
use tracing::debug;

/// Most pairs either log keeps.
pub const MAX_PAIRS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    AlreadyPresent,
    Added { evicted: Option<CurrencyPair> },
}

/// Insertion-ordered pair list. Repeats are ignored and the oldest entry is
/// evicted once the log is over capacity.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    key: &'static str,
    capacity: usize,
    entries: Vec<CurrencyPair>,
}

impl HistoryLog {
    pub fn favorites() -> Self {
        Self::empty(FAVORITES_KEY)
    }

    pub fn recents() -> Self {
        Self::empty(HISTORY_KEY)
    }

    fn empty(key: &'static str) -> Self {
        Self {
            key,
            capacity: MAX_PAIRS,
            entries: Vec::new(),
        }
    }

    /// Restores the log persisted under this log's key. Missing or
    /// unreadable data gives an empty log.
    pub async fn load(mut self, store: &dyn KeyValueStore) -> Self {
        let mut entries: Vec<CurrencyPair> = read_json(store, self.key).await.unwrap_or_default();
        if entries.len() > self.capacity {
            entries.drain(..entries.len() - self.capacity);
        }
        debug!("Loaded {} pairs from {}", entries.len(), self.key);
        self.entries = entries;
        self
    }

    pub fn entries(&self) -> &[CurrencyPair] {
        &self.entries
    }

    pub fn contains(&self, pair: &CurrencyPair) -> bool {
        self.entries.iter().any(|p| p == pair)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends `pair` and persists the whole list. The in-memory list only
    /// changes after the store write succeeded. A pair already present is
    /// left where it is and nothing is written.
    pub async fn record(
        &mut self,
        pair: &CurrencyPair,
        store: &dyn KeyValueStore,
    ) -> Result<Recorded> {
        if self.contains(pair) {
            debug!("{} already in {}", pair, self.key);
            return Ok(Recorded::AlreadyPresent);
        }

        let mut updated = self.entries.clone();
        updated.push(pair.clone());
        let evicted = if updated.len() > self.capacity {
            Some(updated.remove(0))
        } else {
            None
        };

        write_json(store, self.key, &updated).await?;
        self.entries = updated;
        debug!("Recorded {} in {}", pair, self.key);
        Ok(Recorded::Added { evicted })
    }
}
