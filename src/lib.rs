pub mod cli;
pub mod core;
pub mod export;
pub mod providers;

use crate::core::{Action, Currency, RatesService, config::AppConfig};
use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    /// Interactive menu on stdin/stdout.
    Menu,
    Summary { output: Option<PathBuf> },
    Detail {
        currency: Currency,
        output: Option<PathBuf>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("hryvnia starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let source = providers::NbuRateSource::new(config.nbu_base_url())?;
    let mut service = RatesService::new(&source, config.query_params())?;
    let today = Local::now().date_naive();

    match command {
        AppCommand::Menu => {
            let exporter = export::CsvExporter::new(config.export_dir());
            let stdin = std::io::stdin();
            cli::menu::Menu::new(service, exporter, stdin.lock())
                .run()
                .await
        }
        AppCommand::Summary { output } => {
            cli::run_once(&mut service, Action::RunSummary, today, output.as_deref()).await
        }
        AppCommand::Detail { currency, output } => {
            cli::run_once(
                &mut service,
                Action::RunDetail(currency),
                today,
                output.as_deref(),
            )
            .await
        }
    }
}
