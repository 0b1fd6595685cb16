//! Evaluate a batch of calculator requests
//!
//! Reads a JSON array of requests and prints one JSON result per line, in
//! input order. Requests are independent, so they are evaluated in parallel.
//!
//! Usage: run_batch requests.json [AS_OF]
//! Engine overrides come from FINPROJ_MAX_PAYOFF_MONTHS and FINPROJ_TAX_TABLES.

use std::env;
use std::fs;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use financial_projection::{CalculatorOutput, CalculatorRequest, EngineConfig};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchLine<'a> {
    index: usize,
    calculator: &'static str,
    output: &'a CalculatorOutput,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        bail!("usage: run_batch <requests.json> [as-of YYYY-MM-DD]");
    };
    let as_of = match args.get(2) {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid as-of date '{}'", date))?,
        None => Local::now().date_naive(),
    };

    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let requests: Vec<CalculatorRequest> =
        serde_json::from_str(&json).context("Expected a JSON array of calculator requests")?;
    let config = EngineConfig::from_env();

    let start = Instant::now();
    let outputs: Vec<CalculatorOutput> = requests
        .par_iter()
        .map(|request| request.evaluate(&config, as_of))
        .collect();
    log::info!("evaluated {} requests in {:?}", outputs.len(), start.elapsed());

    for (index, (request, output)) in requests.iter().zip(&outputs).enumerate() {
        let line = BatchLine {
            index,
            calculator: request.kind().key(),
            output,
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    Ok(())
}
