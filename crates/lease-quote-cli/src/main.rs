mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rust_decimal::Decimal;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::quote::{RateArgs, ValueArgs};

/// Vehicle lease quotes
#[derive(Parser)]
#[command(
    name = "lq",
    version,
    about = "Vehicle lease instalment and affordability quotes",
    long_about = "Quote the monthly instalment of a fixed-rate vehicle lease with a \
                  balloon buyout, or the maximum vehicle value a target instalment \
                  affords. Down payment and buyout accept a percentage of the vehicle \
                  value or a fixed net amount; prices may be net or gross."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (JSON or YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// VAT rate as a fraction (e.g. 0.23), overrides the config file
    #[arg(long, global = true)]
    vat_rate: Option<Decimal>,

    /// Log engine diagnostics to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly instalment for a vehicle value
    Rate(RateArgs),
    /// Maximum vehicle value for a target instalment
    Value(ValueArgs),
    /// Month-by-month amortization schedule for a vehicle value
    Schedule(RateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match input::config::load_engine_config(cli.config.as_deref(), cli.vat_rate) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(2);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Rate(args) => commands::quote::run_rate(args, &config),
        Commands::Value(args) => commands::quote::run_value(args, &config),
        Commands::Schedule(args) => commands::quote::run_schedule(args, &config),
        Commands::Version => {
            println!("lq {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
