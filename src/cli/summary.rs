use super::ui;
use crate::core::Statistics;
use chrono::NaiveDate;
use comfy_table::Cell;

/// Current rate against the window average for every currency.
pub fn render(as_of: NaiveDate, statistics: &[Statistics], window_days: u32) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Current Rate"),
        ui::header_cell(&format!("{window_days}-Day Avg")),
        ui::header_cell("Difference"),
        ui::header_cell("Period Change"),
    ]);

    for stats in statistics {
        table.add_row(vec![
            Cell::new(stats.currency.code()),
            ui::rate_cell(stats.current),
            ui::rate_cell(stats.mean),
            ui::diff_cell(stats.diff_from_mean()),
            ui::change_cell(stats.change_pct),
        ]);
    }

    // Latest published date, which trails `as_of` on weekends and holidays.
    let latest = statistics.iter().map(|s| s.end).max().unwrap_or(as_of);

    format!(
        "\n{}\nDate: {}\n\n{}",
        ui::style_text(
            &format!("Currency Summary (Last {window_days} Days)"),
            ui::StyleType::Title
        ),
        latest,
        table
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::series::tests::date;
    use crate::core::{Currency, Observation, Series, stats};

    #[test]
    fn test_summary_lists_each_currency() {
        let series = |currency, base: f64| {
            let observations = (0..3)
                .map(|i| Observation {
                    date: date(2025, 3, 12 + i),
                    rate: base + f64::from(i),
                })
                .collect();
            Series::new(currency, observations).unwrap()
        };
        let statistics = vec![
            stats::compute(&series(Currency::Usd, 41.0), 7).unwrap(),
            stats::compute(&series(Currency::Eur, 45.0), 7).unwrap(),
        ];

        let output = render(date(2025, 3, 16), &statistics, 30);

        assert!(output.contains("Date: 2025-03-14"));
        assert!(output.contains("30-Day Avg"));
        assert!(output.contains("USD"));
        assert!(output.contains("EUR"));
        assert!(output.contains("43.0000"));
        assert!(output.contains("+1.0000"));
    }
}
