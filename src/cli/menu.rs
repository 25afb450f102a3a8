use super::ui;
use crate::core::{Action, Currency, Outcome, RatesService};
use crate::export::CsvExporter;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{debug, warn};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn show_menu() {
    ui::print_separator('=');
    println!(" Currency Rates (Based on NBU API data) ");
    println!("{}", "=".repeat(30));
    println!("1) Summary: Current rates + averages (all currencies)");
    println!("2) Full breakdown: Detailed stats for one currency");
    println!("3) Save last result to CSV");
    println!("4) Exit");
}

fn info(msg: &str) {
    println!("{} {msg}", ui::style_text("[INFO]", ui::StyleType::Info));
}

fn warning(msg: &str) {
    println!("{} {msg}", ui::style_text("[WARN]", ui::StyleType::Warning));
}

fn error(msg: &str) {
    println!("{} {msg}", ui::style_text("[ERROR]", ui::StyleType::Error));
}

/// Interactive menu reading choices line by line from `input`.
///
/// End of input behaves like choosing "quit".
pub struct Menu<'a, R: BufRead> {
    service: RatesService<'a>,
    exporter: CsvExporter,
    input: R,
    today: fn() -> NaiveDate,
}

impl<'a, R: BufRead> Menu<'a, R> {
    pub fn new(service: RatesService<'a>, exporter: CsvExporter, input: R) -> Self {
        Self {
            service,
            exporter,
            input,
            today,
        }
    }

    /// Pins the reference date instead of using the local calendar date.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn service(&self) -> &RatesService<'a> {
        &self.service
    }

    pub async fn run(&mut self) -> Result<()> {
        show_menu();
        loop {
            let Some(choice) = self.prompt("Choose an option [1-4]: ")? else {
                return Ok(());
            };

            let action = match choice.as_str() {
                "1" => Action::RunSummary,
                "2" => match self.prompt_currency()? {
                    Some(currency) => Action::RunDetail(currency),
                    None => return Ok(()),
                },
                "3" => Action::SaveLast,
                "4" => Action::Quit,
                _ => {
                    error("Invalid choice. Choose 1, 2, 3, or 4.");
                    continue;
                }
            };

            let keep_going = match self.dispatch(action).await? {
                None => false,
                Some(offer_save) => self.ask_continue(offer_save).await?,
            };
            if !keep_going {
                println!("\nExiting.");
                return Ok(());
            }
            show_menu();
        }
    }

    /// Returns `None` to quit, otherwise whether a fresh result can be saved.
    async fn dispatch(&mut self, action: Action) -> Result<Option<bool>> {
        if matches!(action, Action::RunSummary | Action::RunDetail(_)) {
            let window_days = self.service.params().window_days;
            println!("\n> Fetching last {window_days} days of currency data...");
        }

        let started = Instant::now();
        let outcome = super::execute_with_progress(&mut self.service, action, (self.today)()).await;
        let elapsed = started.elapsed().as_secs_f64();

        match outcome {
            Ok(Outcome::Ready(result)) => {
                info(&format!("Query completed in {elapsed:.2} seconds"));
                println!(
                    "{}",
                    super::render(&result, self.service.params().window_days)
                );
                Ok(Some(true))
            }
            Ok(Outcome::Export(result)) => {
                self.export(&result)?;
                Ok(Some(false))
            }
            Ok(Outcome::NothingToExport) => {
                warning("No data loaded. Please fetch data first (option 1 or 2).");
                Ok(Some(false))
            }
            Ok(Outcome::Quit) => Ok(None),
            Err(e) => {
                warn!(error = %e, "Query failed");
                error(&format!("Failed to fetch data after {elapsed:.2} seconds: {e}"));
                Ok(Some(false))
            }
        }
    }

    async fn ask_continue(&mut self, offer_save: bool) -> Result<bool> {
        let question = if offer_save {
            "\nContinue, Save, or Quit? (c/s/q): "
        } else {
            "\nContinue or Quit? (c/q): "
        };

        loop {
            let Some(response) = self.prompt(question)? else {
                return Ok(false);
            };
            match response.to_lowercase().as_str() {
                "c" | "continue" => return Ok(true),
                "s" | "save" if offer_save => {
                    // The menu only exports what the last query cached.
                    self.dispatch(Action::SaveLast).await?;
                    return Ok(true);
                }
                "q" | "quit" => return Ok(false),
                _ if offer_save => {
                    error("Please enter 'c' to continue, 's' to save, or 'q' to quit.")
                }
                _ => error("Please enter 'c' to continue or 'q' to quit."),
            }
        }
    }

    fn export(&mut self, result: &crate::core::QueryResult) -> Result<()> {
        let default_name =
            CsvExporter::default_file_name(result, self.service.params().window_days);
        let Some(input) = self.prompt(&format!("\nEnter filename (default: {default_name}): "))?
        else {
            return Ok(());
        };
        let file_name = CsvExporter::resolve_file_name(&input, &default_name);

        match self.exporter.save(result, &file_name) {
            Ok((path, rows)) => {
                info(&format!("Data saved to {}", path.display()));
                info(&format!("Saved {rows} rows"));
            }
            Err(e) => {
                warn!(error = ?e, "CSV export failed");
                error(&format!("Failed to save CSV: {e:#}"));
            }
        }
        Ok(())
    }

    fn prompt_currency(&mut self) -> Result<Option<Currency>> {
        loop {
            let Some(input) = self.prompt("\nSelect currency for detailed breakdown (USD/EUR): ")?
            else {
                return Ok(None);
            };
            match input.parse::<Currency>() {
                Ok(currency) => return Ok(Some(currency)),
                Err(_) => error("Invalid currency. Only USD and EUR are supported. Please try again."),
            }
        }
    }

    /// Prints `text` and reads one trimmed line; `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        print!("{text}");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            debug!("End of input");
            println!();
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
