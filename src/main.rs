use clap::{Parser, Subcommand, ValueEnum};
use configuration::{ExportFormat, LoggingSettings};
use core_types::SeriesField;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod render;

/// The main entry point for the finmodel application.
fn main() -> ExitCode {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match configuration::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // The guard flushes the log file on drop, so it lives until main returns.
    let _log_guard = init_tracing(&config.logging);

    // Execute the appropriate command
    match commands::run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "Command failed.");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr subscriber and, when configured, a daily rolling log file.
fn init_tracing(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "finmodel.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr_layer).init();
            None
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Multi-year financial modeling: statements, ratios and scenario projections.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./finmodel.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create a blank model file with the starter scenarios.
    Init(InitArgs),
    /// Change one value of one series for one year.
    Set(SetArgs),
    /// Add, update or remove scenarios.
    #[command(subcommand)]
    Scenario(ScenarioCommand),
    /// Render the statement sheets.
    Show(ShowArgs),
    /// Render the headline figures for one year.
    Dashboard(DashboardArgs),
    /// Export the model as JSON or CSV.
    Export(ExportArgs),
    /// Check that a model file can be imported.
    Validate(ModelArgs),
}

#[derive(Parser)]
pub(crate) struct ModelArgs {
    /// The model file to read.
    #[arg(long, short, default_value = "model.json")]
    pub model: PathBuf,
}

#[derive(Parser)]
pub(crate) struct InitArgs {
    /// Where to write the new model.
    #[arg(long, short, default_value = "model.json")]
    pub output: PathBuf,

    /// First year of the model (defaults to the configured start year).
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Number of yearly periods (defaults to the configured count).
    #[arg(long)]
    pub periods: Option<usize>,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser)]
pub(crate) struct SetArgs {
    #[command(flatten)]
    pub target: ModelArgs,

    /// The series to edit (e.g. "revenue", "operating-expenses", "cash-flow").
    #[arg(long)]
    pub field: SeriesField,

    /// The year column to edit.
    #[arg(long)]
    pub year: i32,

    /// The new value.
    #[arg(long, allow_hyphen_values = true)]
    pub value: Decimal,
}

#[derive(Subcommand)]
pub(crate) enum ScenarioCommand {
    /// Append a new scenario.
    Add {
        #[command(flatten)]
        target: ModelArgs,
        #[arg(long)]
        name: String,
        /// Revenue growth per period, in percent.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        growth: Decimal,
        /// Margin improvement, in percentage points.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        margin: Decimal,
    },
    /// Change fields of an existing scenario.
    Update {
        #[command(flatten)]
        target: ModelArgs,
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        growth: Option<Decimal>,
        #[arg(long, allow_hyphen_values = true)]
        margin: Option<Decimal>,
    },
    /// Delete a scenario.
    Remove {
        #[command(flatten)]
        target: ModelArgs,
        #[arg(long)]
        id: String,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum SheetChoice {
    Income,
    Balance,
    CashFlow,
    Scenarios,
    Metrics,
    All,
}

#[derive(Parser)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    pub target: ModelArgs,

    #[arg(long, value_enum, default_value = "all")]
    pub sheet: SheetChoice,

    /// Print the per-period derived values as JSON instead of tables.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub(crate) struct DashboardArgs {
    #[command(flatten)]
    pub target: ModelArgs,

    /// Focus year (defaults to the current calendar year).
    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub target: ModelArgs,

    /// Output encoding (defaults to the configured format).
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Output file (stdout when omitted).
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}
