use super::ui;
use crate::core::{Series, Statistics};
use comfy_table::Cell;

pub fn render(series: &Series, stats: &Statistics, window_days: u32) -> String {
    let currency = series.currency();
    let mut output = format!(
        "\n{}\n\nDate Range: {} → {}\nTotal Data Points: {}\n",
        ui::style_text(&format!("FULL BREAKDOWN: {currency}"), ui::StyleType::Title),
        stats.start,
        stats.end,
        stats.observations
    );

    let mut summary = ui::new_styled_table();
    summary.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Mean"),
        ui::header_cell("Std"),
        ui::header_cell("Min"),
        ui::header_cell("Max"),
    ]);
    summary.add_row(vec![
        Cell::new(currency.code()),
        ui::rate_cell(stats.mean),
        ui::rate_cell(stats.std),
        ui::rate_cell(stats.min),
        ui::rate_cell(stats.max),
    ]);
    output.push_str(&format!(
        "\n{}\n{summary}\n",
        ui::style_text("Statistical Summary:", ui::StyleType::Label)
    ));

    let mut daily = ui::new_styled_table();
    daily.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Rate"),
        ui::header_cell(&format!("{}-Day Avg", stats.rolling_window)),
    ]);
    for obs in series.observations() {
        daily.add_row(vec![
            Cell::new(obs.date),
            ui::rate_cell(obs.rate),
            ui::optional_rate_cell(stats.rolling_average_on(obs.date)),
        ]);
    }
    output.push_str(&format!(
        "\n{}\n{daily}\n",
        ui::style_text(
            &format!(
                "Full {window_days}-Day Data with {}-Day Rolling Average:",
                stats.rolling_window
            ),
            ui::StyleType::Label
        )
    ));

    output.push_str(&format!(
        "\n{}\n   Current Rate: {:.4} UAH\n   {window_days}-Day Average: {:.4} UAH\n   \
         Change from Average: {:+.2}%\n   Period Change: {:+.4} UAH ({:+.2}%)\n   \
         Volatility (Std Dev): {:.4} UAH\n   Range: {:.4} - {:.4} UAH",
        ui::style_text("Insights:", ui::StyleType::Label),
        stats.current,
        stats.mean,
        stats.pct_from_mean() * 100.0,
        stats.change,
        stats.change_pct * 100.0,
        stats.std,
        stats.min,
        stats.max
    ));

    output
}
