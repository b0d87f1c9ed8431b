pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::model::CurrencyPair;
use crate::core::session::Session;
use crate::providers::exchangerates::ExchangeRatesProvider;
use crate::store::DiskStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Currency overrides for the configured default pair.
#[derive(Debug, Clone, Default)]
pub struct PairArgs {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl PairArgs {
    pub fn resolve(&self, default: &CurrencyPair) -> CurrencyPair {
        CurrencyPair::new(
            self.from.as_deref().unwrap_or(&default.from),
            self.to.as_deref().unwrap_or(&default.to),
        )
    }
}

/// A saved pair, 1-based as listed by `pairs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedPair {
    Favorite(usize),
    Recent(usize),
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Sync,
    Symbols,
    Convert {
        amount: f64,
        pair: PairArgs,
        saved: Option<SavedPair>,
    },
    Favorite(PairArgs),
    Pairs,
    Chart(PairArgs),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxc starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(base_url = %config.api.base_url, data_path = ?config.data_path, "Loaded config");

    let api_key = config.api_key();
    if api_key.is_empty() {
        warn!("No API key configured, only cached rates will be available");
    }
    let service = Arc::new(ExchangeRatesProvider::new(&config.api.base_url, &api_key));
    let store = Arc::new(DiskStore::open(&config.store_path()?)?);

    let spinner = cli::ui::new_spinner("Fetching rates...");
    let mut session = Session::start(service, store, config.defaults.pair()).await;
    spinner.finish_and_clear();

    match command {
        AppCommand::Sync => cli::status::sync(&session),
        AppCommand::Symbols => cli::status::symbols(&session),
        AppCommand::Convert {
            amount,
            pair,
            saved,
        } => cli::convert::convert(&mut session, amount, &pair, saved).await,
        AppCommand::Favorite(pair) => cli::convert::favorite(&mut session, &pair).await,
        AppCommand::Pairs => cli::pairs::run(&session),
        AppCommand::Chart(pair) => cli::chart::run(&mut session, &pair).await,
    }
}
