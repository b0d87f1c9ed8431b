pub mod exchangerates;

pub use exchangerates::ExchangeRatesProvider;
