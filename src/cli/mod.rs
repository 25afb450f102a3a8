pub mod detail;
pub mod menu;
pub mod setup;
pub mod summary;
pub mod ui;

use crate::core::{Action, Outcome, QueryKind, QueryResult, RatesService};
use crate::export::CsvExporter;
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

/// Renders a query result for the terminal.
pub fn render(result: &QueryResult, window_days: u32) -> String {
    match result {
        QueryResult::Summary { as_of, statistics } => {
            summary::render(*as_of, statistics, window_days)
        }
        QueryResult::Detail { series, statistics } => {
            detail::render(series, statistics, window_days)
        }
    }
}

/// Runs `action` with a progress bar on stderr. Only query actions get a bar.
pub(crate) async fn execute_with_progress(
    service: &mut RatesService<'_>,
    action: Action,
    as_of: NaiveDate,
) -> crate::core::error::Result<Outcome> {
    let kind = match action {
        Action::RunSummary => Some(QueryKind::Summary),
        Action::RunDetail(_) => Some(QueryKind::Detail),
        Action::SaveLast | Action::Quit => None,
    };
    let pb = match kind {
        Some(kind) => {
            let pb = ui::new_progress_bar(service.max_fetches(kind), true);
            pb.set_message("Fetching rates...");
            pb
        }
        None => indicatif::ProgressBar::hidden(),
    };

    let outcome = service.handle(action, as_of, &|| pb.inc(1)).await;
    pb.finish_and_clear();
    outcome
}

/// Non-interactive flow: run one query, print it and optionally export it.
pub async fn run_once(
    service: &mut RatesService<'_>,
    action: Action,
    as_of: NaiveDate,
    output: Option<&Path>,
) -> Result<()> {
    let window_days = service.params().window_days;
    match execute_with_progress(service, action, as_of).await? {
        Outcome::Ready(result) => println!("{}", render(&result, window_days)),
        other => return Err(anyhow!("{action:?} did not produce a result: {other:?}")),
    }

    if let Some(path) = output {
        if let Outcome::Export(result) = service.handle(Action::SaveLast, as_of, &|| ()).await? {
            let rows = CsvExporter::save_to_path(&result, path)?;
            info!("Saved {} rows to {}", rows, path.display());
            println!(
                "\n{} Data saved to {} ({rows} rows)",
                ui::style_text("[INFO]", ui::StyleType::Info),
                path.display()
            );
        }
    }
    Ok(())
}
