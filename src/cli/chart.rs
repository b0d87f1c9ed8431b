use super::ui;
use crate::PairArgs;
use crate::core::RateError;
use crate::core::model::ChartSeries;
use crate::core::session::Session;
use anyhow::Result;
use comfy_table::Cell;

const BAR_WIDTH: usize = 30;

pub async fn run(session: &mut Session, pair: &PairArgs) -> Result<()> {
    let resolved = pair.resolve(session.selection());
    session.set_selection(resolved);

    let spinner = ui::new_spinner("Generating");
    let result = session.build_chart().await;
    spinner.finish_and_clear();

    match result {
        Ok(series) => {
            println!(
                "\n{} {}",
                ui::style_text("Rate Chart", ui::StyleType::Title),
                ui::style_text(
                    &format!(
                        "(1{} v/s {})(14 days before 1 week)",
                        series.pair.from, series.pair.to
                    ),
                    ui::StyleType::Subtle
                )
            );
            println!("{}", display_series(&series));
            Ok(())
        }
        Err(e) if e.downcast_ref::<RateError>().is_some() => {
            println!(
                "{}",
                ui::style_text("Rate chart unavailable", ui::StyleType::Error)
            );
            tracing::debug!(error = %e, "Chart unavailable");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Bar length for `value`, scaled between the smallest and largest value.
fn bar(value: f64, min: f64, max: f64) -> String {
    let span = max - min;
    let filled = if span > 0.0 {
        1 + (((value - min) / span) * (BAR_WIDTH - 1) as f64).round() as usize
    } else {
        BAR_WIDTH
    };
    "█".repeat(filled.min(BAR_WIDTH))
}

fn display_series(series: &ChartSeries) -> String {
    let min = series.values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Day"),
        ui::header_cell(&format!("Rate ({})", series.pair.to)),
        ui::header_cell(""),
    ]);
    for (label, value) in series.points() {
        table.add_row(vec![
            Cell::new(label),
            ui::number_cell(format!("{value:.2}")),
            Cell::new(bar(value, min, max)),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CurrencyPair;

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(1.0, 1.0, 2.0).chars().count(), 1);
        assert_eq!(bar(2.0, 1.0, 2.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(5.0, 5.0, 5.0).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_display_series() {
        let series = ChartSeries {
            pair: CurrencyPair::new("USD", "INR"),
            labels: vec!["05".to_string(), "06".to_string()],
            values: vec![83.1, 83.25],
        };
        let output = display_series(&series);
        assert!(output.contains("Rate (INR)"));
        assert!(output.contains("83.10"));
        assert!(output.contains("83.25"));
    }
}
