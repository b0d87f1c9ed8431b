//! Reference data and pair types shared by the engines

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Reference currency for every snapshot fetched by sync.
pub const REFERENCE_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolEntry {
    #[serde(rename = "value")]
    pub code: String,
    pub label: String,
}

/// Latest rates relative to `base`. A snapshot without `as_of_date` came from
/// a degraded source and is shown as "rates unavailable" by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base: String,
    #[serde(rename = "date", default)]
    pub as_of_date: Option<String>,
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

impl RateSnapshot {
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    #[serde(rename = "cur1")]
    pub from: String,
    #[serde(rename = "cur2")]
    pub to: String,
}

impl CurrencyPair {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
        }
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

/// Plottable rate series. `labels` and `values` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub pair: CurrencyPair,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_shapes() {
        let entry = SymbolEntry {
            code: "INR".to_string(),
            label: "Indian Rupee".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"value":"INR","label":"Indian Rupee"}"#
        );

        let pair: CurrencyPair = serde_json::from_str(r#"{"cur1":"INR","cur2":"USD"}"#).unwrap();
        assert_eq!(pair, CurrencyPair::new("inr", "usd"));
        assert_eq!(pair.to_string(), "INR to USD");
    }

    #[test]
    fn test_snapshot_accepts_raw_latest_response() {
        let raw = r#"{
            "success": true,
            "timestamp": 1700000000,
            "base": "USD",
            "date": "2026-10-18",
            "rates": {"INR": 83.0, "USD": 1.0}
        }"#;
        let snapshot: RateSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.base, "USD");
        assert_eq!(snapshot.as_of_date.as_deref(), Some("2026-10-18"));
        assert_eq!(snapshot.rate("INR"), Some(83.0));
        assert_eq!(snapshot.rate("EUR"), None);
    }
}
