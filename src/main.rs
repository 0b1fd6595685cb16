//! Financial projection CLI
//!
//! Evaluates a calculator request from a JSON file and prints the result.
//!
//! Usage:
//!   finproj list
//!   finproj evaluate request.json [--as-of 2025-01-01] [--csv schedule.csv] [--pretty]

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::info;

use financial_projection::{AmortizationRow, CalculatorKind, CalculatorRequest, EngineConfig};

#[derive(Parser)]
#[command(name = "finproj", version, about = "Financial calculator projection engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available calculators
    List,
    /// Evaluate a JSON calculator request
    Evaluate {
        /// Path to the request JSON, or "-" for stdin
        input: PathBuf,

        /// Date projected payoff dates are counted from (default: today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Write the month-by-month schedule to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::List => {
            for kind in CalculatorKind::ALL {
                println!("{:<22} {}", kind.key(), kind.title());
            }
            Ok(())
        }
        Command::Evaluate {
            input,
            as_of,
            csv,
            pretty,
        } => evaluate(&input, as_of, csv.as_deref(), pretty),
    }
}

fn evaluate(input: &Path, as_of: Option<NaiveDate>, csv: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if input == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read request from stdin")?
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("Failed to read request {}", input.display()))?
    };
    let request = CalculatorRequest::from_json(&json).context("Invalid calculator request")?;

    let config = EngineConfig::from_env();
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    info!("evaluating {} as of {}", request.kind(), as_of);

    let output = request.evaluate(&config, as_of);

    if let Some(path) = csv {
        match output.schedule() {
            Some(rows) => {
                write_schedule(path, rows)?;
                println!("Schedule written to: {}", path.display());
            }
            None => println!("{} has no monthly schedule; skipping CSV", request.kind()),
        }
    }

    let rendered = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    println!("\nSummary:");
    for (label, value) in output.summary() {
        println!("  {}: {}", label, value);
    }

    Ok(())
}

fn write_schedule(path: &Path, rows: &[AmortizationRow]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(["Period", "Payment", "Principal", "Interest", "EndingBalance"])?;
    for row in rows {
        writer.write_record([
            row.period.to_string(),
            format!("{:.2}", row.payment),
            format!("{:.2}", row.principal_portion),
            format!("{:.2}", row.interest_portion),
            format!("{:.2}", row.ending_balance),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
