use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use super_core::{CarryOverStrategy, VisaCategory};
use tokio::io::BufReader;
use tracing::{debug, info};

use super_cli::app::{self, EstimateRequest};
use super_cli::config::AppConfig;
use super_cli::logging;
use super_cli::repl::Repl;
use super_cli::report::render_rates;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Estimates the superannuation refund available on leaving Australia.
#[derive(Debug, Parser)]
#[command(name = "super-estimator", version)]
struct Cli {
    /// TOML file with rate overrides and logging settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `super_core=trace`. `RUST_LOG` wins.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate an estimate from arguments and/or a CSV file.
    Estimate(EstimateArgs),

    /// List the withdrawal tax rate for each visa category.
    Rates,

    /// Enter values line by line.
    Interactive {
        #[arg(long, value_enum, default_value_t = CarryOver::Positional)]
        carry_over: CarryOver,
    },
}

#[derive(Debug, Args)]
struct EstimateArgs {
    /// First year worked. Unreadable input means last year.
    #[arg(long)]
    arrival: Option<String>,

    /// Last year worked. Unreadable input means this year.
    #[arg(long)]
    departure: Option<String>,

    /// Salary for each year of the range, in order. Repeatable.
    #[arg(long = "salary", allow_hyphen_values = true)]
    salaries: Vec<String>,

    /// Visa category for each year of the range, in order. Repeatable.
    #[arg(long = "visa", value_parser = parse_visa)]
    visas: Vec<VisaCategory>,

    /// CSV file with `year,salary,visa_category` rows.
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = CarryOver::Positional)]
    carry_over: CarryOver,
}

/// How entries follow a change of year range.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CarryOver {
    /// Keep entries by position within the range.
    Positional,
    /// Keep entries by calendar year.
    ByYear,
}

impl From<CarryOver> for CarryOverStrategy {
    fn from(value: CarryOver) -> Self {
        match value {
            CarryOver::Positional => CarryOverStrategy::Positional,
            CarryOver::ByYear => CarryOverStrategy::ByYear,
        }
    }
}

fn parse_visa(s: &str) -> Result<VisaCategory, String> {
    VisaCategory::parse(s).ok_or_else(|| {
        let codes: Vec<_> = VisaCategory::all().iter().map(|c| c.as_str()).collect();
        format!("expected one of {}", codes.join(", "))
    })
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref()).context("loading config")?;

    let level = cli.log_level.as_deref().or(config.logging.level.as_deref());
    logging::init_logging(level);
    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration loaded");

    let current_year = app::current_year();

    match cli.command {
        Command::Estimate(args) => {
            let mut session = app::build_session(&config, current_year, args.carry_over.into())?;
            let request = EstimateRequest {
                arrival: args.arrival,
                departure: args.departure,
                salaries: args.salaries,
                visas: args.visas,
                input: args.input,
            };
            let report = app::run_estimate(&mut session, &request)?;
            print!("{report}");
        }
        Command::Rates => {
            let estimator = config.estimator().context("building estimator")?;
            print!("{}", render_rates(&estimator));
        }
        Command::Interactive { carry_over } => {
            let session = app::build_session(&config, current_year, carry_over.into())?;
            info!(current_year, "interactive session started");
            println!("Superannuation refund estimator. Type 'help' for commands.");

            let mut repl = Repl::new(session, std::io::stdout());
            repl.run(BufReader::new(tokio::io::stdin()))
                .await
                .context("interactive session")?;
        }
    }

    Ok(())
}
