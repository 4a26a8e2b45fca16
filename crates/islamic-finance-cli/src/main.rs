mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::compliance::CheckArgs;
use commands::contracts::ClassifyArgs;
use commands::distribution::DistributeArgs;
use commands::metrics::MetricsArgs;
use commands::schedules::{ScheduleArgs, SettlementArgs};
use commands::terms::{ExplainArgs, TermsArgs};

/// Islamic contract financial engine
#[derive(Parser)]
#[command(
    name = "ifc",
    version,
    about = "Islamic contract term derivation and profit/loss distribution",
    long_about = "Derive investor-facing terms (return range, minimum investment, campaign \
                  length) from Murabaha, Mudarabah, Musharakah, Ijarah and Salam contracts, \
                  explain the derivation, and distribute partnership profit and loss. \
                  Contract terms are read as JSON from --input or stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Term-derivation policy override (JSON or YAML)
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the contract variant of a terms document
    Classify(ClassifyArgs),
    /// Derive investment terms (return range, minimum ticket, campaign length)
    Terms(TermsArgs),
    /// Explain how the investment terms were derived
    Explain(ExplainArgs),
    /// Distribute a period's profit and loss between partners
    Distribute(DistributeArgs),
    /// Review contract terms against profit/loss sharing rules
    Check(CheckArgs),
    /// Contract metrics (markup, APR, yield, payback, projected returns)
    Metrics(MetricsArgs),
    /// Murabaha installment or Ijarah rental schedule
    Schedule(ScheduleArgs),
    /// Murabaha early settlement quote
    Settlement(SettlementArgs),
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

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let policy = match input::policy::load_policy(cli.policy.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Classify(args) => commands::contracts::run_classify(args),
        Commands::Terms(args) => commands::terms::run_terms(args, &policy),
        Commands::Explain(args) => commands::terms::run_explain(args, &policy),
        Commands::Distribute(args) => commands::distribution::run_distribute(args),
        Commands::Check(args) => commands::compliance::run_check(args),
        Commands::Metrics(args) => commands::metrics::run_metrics(args),
        Commands::Schedule(args) => commands::schedules::run_schedule(args),
        Commands::Settlement(args) => commands::schedules::run_settlement(args),
        Commands::Version => {
            println!("ifc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
