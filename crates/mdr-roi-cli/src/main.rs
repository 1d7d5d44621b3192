mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::calculate::{CalculateArgs, PresentArgs};
use commands::report::ReportArgs;
use commands::sensitivity::SensitivityArgs;
use commands::CommandOutput;

/// In-house SOC versus MDR cost comparison
#[derive(Parser)]
#[command(
    name = "mdr-roi",
    version,
    about = "Compare the cost of an in-house SOC with an MDR subscription",
    long_about = "Estimates the annual cost of building and running an in-house security \
                  operations center against a managed detection and response subscription, \
                  including expected breach costs, ROI and freed analyst capacity. Produces \
                  the results panel, a one-page report and sensitivity grids."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Pricing policy override file (JSON or YAML)
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cost comparison
    Calculate(CalculateArgs),
    /// Render the results panel (six rows and three bars)
    Present(PresentArgs),
    /// Capture a lead and write the ROI report
    Report(ReportArgs),
    /// Sweep one or two inputs and tabulate a result metric
    Sensitivity(SensitivityArgs),
    /// Print the effective pricing policy
    Policy,
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
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let policy = match input::file::load_policy(cli.policy.as_deref()) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<CommandOutput, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::calculate::run_calculate(args, &policy),
        Commands::Present(args) => commands::calculate::run_present(args, &policy, &cli.output),
        Commands::Report(args) => commands::report::run_report(args, &policy),
        Commands::Sensitivity(args) => {
            commands::sensitivity::run_sensitivity(args, &policy, &cli.output)
        }
        Commands::Policy => serde_json::to_value(&policy)
            .map(CommandOutput::Data)
            .map_err(Into::into),
        Commands::Version => {
            println!("mdr-roi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(CommandOutput::Data(value)) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Ok(CommandOutput::Text(text)) => {
            print!("{text}");
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
