//! Offline-first rate sync, conversion and pair bookkeeping

pub mod cache;
pub mod chart;
pub mod config;
pub mod convert;
pub mod currency;
pub mod error;
pub mod history;
pub mod log;
pub mod model;
pub mod session;
pub mod sync;

// Re-export main types for cleaner imports
pub use cache::KeyValueStore;
pub use currency::RateService;
pub use error::RateError;
pub use model::{ChartSeries, CurrencyPair, RateSnapshot, SymbolEntry};
pub use session::Session;
