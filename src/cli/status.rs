use super::ui;
use crate::core::model::SymbolEntry;
use crate::core::session::Session;
use crate::core::sync::SyncSource;
use anyhow::Result;
use comfy_table::Cell;

pub fn sync(session: &Session) -> Result<()> {
    println!(
        "{} {}",
        ui::style_text("Currency Converter", ui::StyleType::Title),
        ui::rates_banner(session.last_updated())
    );

    let source = match session.source() {
        SyncSource::Remote => "remote service",
        SyncSource::Cache => "offline cache",
    };
    println!(
        "{} symbols, {} rates from {}",
        session.symbols().len(),
        session.snapshot().map_or(0, |s| s.rates.len()),
        source
    );
    Ok(())
}

pub fn symbols(session: &Session) -> Result<()> {
    if session.symbols().is_empty() {
        println!("No offline symbols available. Run `fxc sync` when online.");
        return Ok(());
    }
    println!("{}", display_symbols(session.symbols()));
    Ok(())
}

fn display_symbols(symbols: &[SymbolEntry]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);
    for symbol in symbols {
        table.add_row(vec![Cell::new(&symbol.code), Cell::new(&symbol.label)]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_symbols() {
        let output = display_symbols(&[SymbolEntry {
            code: "INR".to_string(),
            label: "Indian Rupee".to_string(),
        }]);
        assert!(output.contains("Code"));
        assert!(output.contains("INR"));
        assert!(output.contains("Indian Rupee"));
    }
}
