use super::ui;
use crate::core::history::Recorded;
use crate::core::model::CurrencyPair;
use crate::core::session::Session;
use crate::core::RateError;
use crate::{PairArgs, SavedPair};
use anyhow::{Result, anyhow};

/// Picks the pair a command should use: a saved pair when asked for, else the
/// configured default with any overrides applied.
fn select_pair(session: &mut Session, pair: &PairArgs, saved: Option<SavedPair>) -> Result<()> {
    match saved {
        Some(saved) => {
            let (list, index, name) = match saved {
                SavedPair::Favorite(n) => (session.favorites(), n, "favorite"),
                SavedPair::Recent(n) => (session.recents(), n, "recent"),
            };
            let chosen = index
                .checked_sub(1)
                .and_then(|i| list.get(i))
                .cloned()
                .ok_or_else(|| anyhow!("No {name} pair at position {index}"))?;
            session.use_pair(&chosen);
        }
        None => {
            let resolved = pair.resolve(session.selection());
            session.set_selection(resolved);
        }
    }
    Ok(())
}

pub async fn convert(
    session: &mut Session,
    amount: f64,
    pair: &PairArgs,
    saved: Option<SavedPair>,
) -> Result<()> {
    select_pair(session, pair, saved)?;
    let CurrencyPair { from, to } = session.selection().clone();

    println!("{}", ui::rates_banner(session.last_updated()));
    match session.convert(amount).await {
        Ok(result) => {
            println!(
                "{amount} {from} = {} {to}",
                ui::style_text(&result.to_string(), ui::StyleType::Value)
            );
            Ok(())
        }
        Err(e) if e.downcast_ref::<RateError>().is_some() => {
            println!(
                "{amount} {from} = {} {to}",
                ui::style_text("unavailable", ui::StyleType::Error)
            );
            tracing::debug!(error = %e, "Conversion unavailable");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub async fn favorite(session: &mut Session, pair: &PairArgs) -> Result<()> {
    select_pair(session, pair, None)?;
    let selection = session.selection().clone();

    match session.add_favorite().await? {
        None => println!("No currencies loaded yet, favorite not added."),
        Some(Recorded::AlreadyPresent) => println!("{selection} is already a favorite."),
        Some(Recorded::Added { evicted }) => {
            println!("Added {selection} to favorites.");
            if let Some(old) = evicted {
                println!(
                    "{}",
                    ui::style_text(&format!("Removed oldest favorite {old}"), ui::StyleType::Subtle)
                );
            }
        }
    }
    Ok(())
}
