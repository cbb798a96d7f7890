//! Premium Engine CLI
//!
//! Prices a single quote against the product catalog and prints the response
//! envelope as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use premium_engine::{
    EngineConfig, LifeQuoteRequest, PensionRequest, PropertyQuoteRequest, QuoteEngine, QuoteRequest,
};

/// Insurance premium and pension projection engine
#[derive(Parser, Debug)]
#[command(name = "premium_engine", version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory with product CSV files, overrides the configuration
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price a life insurance policy
    Life(LifeArgs),
    /// Price a property insurance policy
    Property(PropertyArgs),
    /// Project pension savings at retirement
    Pension(PensionArgs),
    /// List the products in the catalog
    Products,
}

#[derive(Args, Debug)]
struct LifeArgs {
    #[arg(long)]
    product: String,
    #[arg(long)]
    email: Option<String>,

    #[arg(long, default_value_t = 0)]
    death: i64,
    #[arg(long, default_value_t = 0)]
    injuries: i64,
    #[arg(long, default_value_t = 0)]
    diseases: i64,
    /// Daily benefit for work incapacity
    #[arg(long, default_value_t = 0)]
    work_incapacity: i64,
    /// Daily benefit for hospitalization
    #[arg(long, default_value_t = 0)]
    hospitalization: i64,
    #[arg(long, default_value_t = 0)]
    hospitalization_length: i64,
    #[arg(long, default_value_t = 0)]
    invalidity: i64,
    #[arg(long, default_value_t = 0)]
    invalidity_level: i64,

    #[arg(long)]
    smoker: bool,
    #[arg(long)]
    sport: bool,
}

#[derive(Args, Debug)]
struct PropertyArgs {
    #[arg(long)]
    product: String,
    #[arg(long)]
    email: Option<String>,

    /// house, flat or garage
    #[arg(long = "type")]
    property_type: String,
    #[arg(long)]
    square_meters: i64,

    #[arg(long)]
    property: bool,
    #[arg(long)]
    equipment: bool,
    #[arg(long)]
    liability: bool,
}

#[derive(Args, Debug)]
struct PensionArgs {
    #[arg(long)]
    product: String,
    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    age: i32,
    #[arg(long, default_value_t = 0.0)]
    savings: f64,
    /// Monthly user contribution
    #[arg(long)]
    contribution: f64,
    /// Monthly employer contribution
    #[arg(long, default_value_t = 0.0)]
    employer: f64,
    /// Dynamická, Konzervativní or Vyvážená
    #[arg(long)]
    strategy: String,
    /// Include the year-by-year trajectory
    #[arg(long)]
    detailed: bool,
}

impl From<LifeArgs> for LifeQuoteRequest {
    fn from(args: LifeArgs) -> Self {
        LifeQuoteRequest {
            product_id: args.product,
            email: args.email,
            death_insurance: args.death,
            injuries_insurance: args.injuries,
            diseases_insurance: args.diseases,
            work_incapacity_insurance: args.work_incapacity,
            hospitalization_insurance: args.hospitalization,
            hospitalization_length: args.hospitalization_length,
            invalidity_insurance: args.invalidity,
            invalidity_level: args.invalidity_level,
            is_smoker: args.smoker,
            does_sport: args.sport,
        }
    }
}

impl From<PropertyArgs> for PropertyQuoteRequest {
    fn from(args: PropertyArgs) -> Self {
        PropertyQuoteRequest {
            product_id: args.product,
            email: args.email,
            property_type: args.property_type,
            square_meters: args.square_meters,
            include_property: args.property,
            include_equipment: args.equipment,
            include_liability: args.liability,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_path(path)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("failed to read configuration {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    let request = match cli.command {
        Commands::Life(args) => QuoteRequest::LifeInsurance(args.into()),
        Commands::Property(args) => QuoteRequest::PropertyInsurance(args.into()),
        Commands::Pension(args) => {
            config.detailed_pension |= args.detailed;
            QuoteRequest::Pension(PensionRequest {
                product_id: args.product,
                email: args.email,
                current_age: args.age,
                current_savings: args.savings,
                user_contribution: args.contribution,
                employer_contribution: args.employer,
                strategy: args.strategy,
            })
        }
        Commands::Products => return list_products(config),
    };

    let engine = QuoteEngine::from_config(config).map_err(|e| anyhow::anyhow!("failed to start engine: {}", e))?;
    let response = engine.respond(&request);
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_ok() {
        anyhow::bail!("{}", response.message);
    }
    Ok(())
}

fn list_products(config: EngineConfig) -> anyhow::Result<()> {
    let catalog = premium_engine::products::load_catalog(&config.data_dir)
        .with_context(|| format!("failed to load products from {}", config.data_dir.display()))?;

    println!("Life insurance:");
    for p in catalog.life_products() {
        println!("  {:<16} {}", p.product_id, p.name);
    }
    println!("Property insurance:");
    for p in catalog.property_products() {
        println!("  {:<16} {}", p.product_id, p.name);
    }
    println!("Pension:");
    for p in catalog.pension_products() {
        println!(
            "  {:<16} {} ({}% / {}% / {}%)",
            p.product_id, p.name, p.dynamic_pct, p.balanced_pct, p.conservative_pct
        );
    }
    match catalog.schedule() {
        Some(schedule) => println!("State contribution tiers: {}", schedule.len()),
        None => println!("State contribution tiers: none"),
    }
    Ok(())
}
