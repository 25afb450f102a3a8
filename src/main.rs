use anyhow::Result;
use clap::{Parser, Subcommand};
use hryvnia::core::Currency;
use hryvnia::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for hryvnia::AppCommand {
    fn from(cmd: Commands) -> hryvnia::AppCommand {
        match cmd {
            Commands::Menu => hryvnia::AppCommand::Menu,
            Commands::Summary { output } => hryvnia::AppCommand::Summary { output },
            Commands::Detail { currency, output } => {
                hryvnia::AppCommand::Detail { currency, output }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Interactive menu (default)
    Menu,
    /// Current rates and window averages for all configured currencies
    Summary {
        /// Also save the result as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Full breakdown with rolling average for one currency
    Detail {
        /// USD or EUR
        currency: Currency,
        /// Also save the result as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Setup => hryvnia::cli::setup::setup(),
        cmd => hryvnia::run_command(cmd.into(), cli.config_path.as_deref()).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
