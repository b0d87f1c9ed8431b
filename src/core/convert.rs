//! Cross-rate conversion from a cached snapshot

use super::error::RateError;
use super::model::{CurrencyPair, RateSnapshot};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;

pub const RESULT_DECIMALS: u32 = 8;

/// A conversion result fixed to eight decimal places. Displays with all
/// eight digits, e.g. `0.01204819` or `1.00000000`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConvertedAmount {
    Exact(Decimal),
    /// Finite result too large for `Decimal`.
    Wide(f64),
}

impl Display for ConvertedAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertedAmount::Exact(d) => write!(f, "{:.*}", RESULT_DECIMALS as usize, d),
            ConvertedAmount::Wide(v) => write!(f, "{:.*}", RESULT_DECIMALS as usize, v),
        }
    }
}

/// Looks up both legs of `pair`. Fails if either rate is missing or the
/// `from` rate is zero.
pub fn cross_rate(pair: &CurrencyPair, snapshot: &RateSnapshot) -> Result<f64, RateError> {
    let unavailable = || RateError::ComputeUnavailable(format!("{}->{}", pair.from, pair.to));
    let from = snapshot.rate(&pair.from).ok_or_else(unavailable)?;
    let to = snapshot.rate(&pair.to).ok_or_else(unavailable)?;
    if from == 0.0 {
        return Err(unavailable());
    }
    Ok(to / from)
}

/// `amount * (rates[to] / rates[from])`; both rates share the snapshot base
/// so the base cancels out. A non-finite amount or result is unavailable.
pub fn convert(
    amount: f64,
    pair: &CurrencyPair,
    snapshot: &RateSnapshot,
) -> Result<ConvertedAmount, RateError> {
    let rate = cross_rate(pair, snapshot)?;
    let value = amount * rate;
    if !value.is_finite() {
        return Err(RateError::ComputeUnavailable(format!("{} {}", amount, pair)));
    }
    Ok(match Decimal::from_f64_retain(value) {
        Some(d) => ConvertedAmount::Exact(
            d.round_dp_with_strategy(RESULT_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        ),
        None => ConvertedAmount::Wide(value),
    })
}
