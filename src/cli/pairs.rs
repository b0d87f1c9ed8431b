use super::ui;
use crate::core::history::MAX_PAIRS;
use crate::core::model::CurrencyPair;
use crate::core::session::Session;
use anyhow::Result;
use comfy_table::Cell;

pub fn run(session: &Session) -> Result<()> {
    if session.favorites().is_empty() && session.recents().is_empty() {
        println!("No favorite or recent pairs yet.");
        return Ok(());
    }

    if !session.favorites().is_empty() {
        println!(
            "\n{} {}",
            ui::style_text("Favorites", ui::StyleType::Title),
            ui::style_text(&format!("(at most {MAX_PAIRS})"), ui::StyleType::Subtle)
        );
        println!("{}", display_pairs(session.favorites(), "--favorite"));
    }

    if !session.recents().is_empty() {
        println!(
            "\n{} {}",
            ui::style_text("History", ui::StyleType::Title),
            ui::style_text(&format!("(last {MAX_PAIRS})"), ui::StyleType::Subtle)
        );
        println!("{}", display_pairs(session.recents(), "--recent"));
    }
    Ok(())
}

/// Numbered pair table with the `convert` flag that reuses each row.
fn display_pairs(pairs: &[CurrencyPair], flag: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Pair"),
        ui::header_cell("Use"),
    ]);
    for (i, pair) in pairs.iter().enumerate() {
        let position = i + 1;
        table.add_row(vec![
            ui::number_cell(position.to_string()),
            Cell::new(pair.to_string()),
            Cell::new(format!("fxc convert {flag} {position}")),
        ]);
    }
    table.to_string()
}
