//! Run pension projections for a batch of requests from CSV
//!
//! Outputs one row per request with the projected savings or the failure reason

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use premium_engine::{EngineConfig, PensionRequest, QuoteEngine, QuoteOutcome, QuoteRequest, QuoteResponse};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Project pension savings for a CSV of requests")]
struct Cli {
    #[arg(long, default_value = "data/requests/pension_requests.csv")]
    input: PathBuf,
    #[arg(long, default_value = "pension_batch_output.csv")]
    output: PathBuf,
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Raw CSV row for a pension request
#[derive(Debug, Deserialize)]
struct RequestRow {
    #[serde(rename = "RequestId")]
    request_id: u32,
    #[serde(rename = "ProductId")]
    product_id: String,
    #[serde(rename = "Email")]
    email: Option<String>,
    #[serde(rename = "CurrentAge")]
    current_age: i32,
    #[serde(rename = "CurrentSavings")]
    current_savings: f64,
    #[serde(rename = "UserContribution")]
    user_contribution: f64,
    #[serde(rename = "EmployerContribution")]
    employer_contribution: f64,
    #[serde(rename = "Strategy")]
    strategy: String,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    #[serde(rename = "RequestId")]
    request_id: u32,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Years")]
    years: Option<u32>,
    #[serde(rename = "StateContribution")]
    state_contribution: Option<i64>,
    #[serde(rename = "TotalSavings")]
    total_savings: Option<String>,
    #[serde(rename = "Valorization")]
    valorization: Option<String>,
    #[serde(rename = "Message")]
    message: String,
}

impl OutputRow {
    fn new(request_id: u32, response: QuoteResponse) -> Self {
        let status = serde_json::to_value(response.status)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let mut row = OutputRow {
            request_id,
            status,
            years: None,
            state_contribution: None,
            total_savings: None,
            valorization: None,
            message: response.message,
        };
        if let Some(QuoteOutcome::Pension(quoted)) = response.data {
            let p = quoted.result;
            row.years = Some(p.years_to_retirement);
            row.state_contribution = Some(p.state_contribution);
            row.total_savings = Some(format!("{:.2}", p.total_savings));
            row.valorization = Some(format!("{:.2}", p.valorization));
        }
        row
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_path(path).map_err(|e| anyhow::anyhow!("{}", e))?,
        None => EngineConfig::default(),
    };
    let engine = QuoteEngine::from_config(config).map_err(|e| anyhow::anyhow!("failed to start engine: {}", e))?;

    let start = Instant::now();
    println!("Loading requests from {}...", cli.input.display());

    let mut reader = csv::Reader::from_path(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    let rows: Vec<RequestRow> = reader.deserialize().collect::<Result<_, _>>()?;

    let ids: Vec<u32> = rows.iter().map(|r| r.request_id).collect();
    let requests: Vec<QuoteRequest> = rows
        .into_iter()
        .map(|r| {
            QuoteRequest::Pension(PensionRequest {
                product_id: r.product_id,
                email: r.email,
                current_age: r.current_age,
                current_savings: r.current_savings,
                user_contribution: r.user_contribution,
                employer_contribution: r.employer_contribution,
                strategy: r.strategy,
            })
        })
        .collect();
    println!("Loaded {} requests in {:?}", requests.len(), start.elapsed());

    println!("Running projections...");
    let proj_start = Instant::now();
    let responses = engine.quote_batch(&requests);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let failed = responses.iter().filter(|r| !r.is_ok()).count();

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    for (id, response) in ids.into_iter().zip(responses) {
        writer.serialize(OutputRow::new(id, response))?;
    }
    writer.flush()?;

    println!("Output written to {}", cli.output.display());
    println!("\nSummary:");
    println!("  Requests: {}", requests.len());
    println!("  Failed:   {}", failed);
    println!("  Total time: {:?}", start.elapsed());
    Ok(())
}
