//! Remote rate service abstractions

use super::error::RateError;
use super::model::SymbolEntry;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Latest rates as returned by the service, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestRates {
    pub base: String,
    pub date: Option<String>,
    pub rates: BTreeMap<String, f64>,
}

/// Per-date rates keyed by `YYYY-MM-DD`, ascending.
pub type TimeSeries = BTreeMap<String, BTreeMap<String, f64>>;

#[async_trait]
pub trait RateService: Send + Sync {
    async fn fetch_symbols(&self) -> Result<Vec<SymbolEntry>, RateError>;

    async fn fetch_latest(&self, base: &str, symbols: &[String]) -> Result<LatestRates, RateError>;

    async fn fetch_timeseries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: &str,
        symbols: &[String],
    ) -> Result<TimeSeries, RateError>;
}
