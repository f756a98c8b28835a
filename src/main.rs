use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tickstats::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tickstats")]
#[command(about = "Risk/return metrics for single-instrument price histories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //compute metrics for one or more symbols
    Run {
        //path to csv data file (date,close[,symbol])
        #[arg(long)]
        data: PathBuf,

        //symbols to analyse (eg spy, qqq)
        #[arg(long, required = true, num_args = 1..)]
        symbol: Vec<String>,

        //first date included (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        //first date excluded (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        //return convention (log, simple, both)
        #[arg(long, default_value = "both")]
        convention: String,

        //json config file
        #[arg(long)]
        config: Option<PathBuf>,

        //annual risk-free rate (overrides config)
        #[arg(long)]
        risk_free_rate: Option<f64>,

        //periods per year used for annualization (overrides config)
        #[arg(long)]
        trading_days: Option<u32>,

        //zero volatility handling: permissive reports non-finite ratios, strict fails (overrides config)
        #[arg(long)]
        policy: Option<String>,

        //output path for json records
        #[arg(long)]
        output_json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            symbol,
            start,
            end,
            convention,
            config,
            risk_free_rate,
            trading_days,
            policy,
            output_json,
        } => {
            let config = build_config(config, risk_free_rate, trading_days, policy.as_deref())?;
            let conventions = parse_conventions(&convention)?;
            run_metrics(data, symbol, start, end, conventions, config, output_json)?;
        }
    }

    Ok(())
}

fn build_config(
    path: Option<PathBuf>,
    risk_free_rate: Option<f64>,
    trading_days: Option<u32>,
    policy: Option<&str>,
) -> Result<MetricsConfig> {
    let mut config = match path {
        Some(path) => MetricsConfig::from_json_file(&path)
            .context(format!("Failed to load config from {:?}", path))?,
        None => MetricsConfig::default(),
    };

    if let Some(rate) = risk_free_rate {
        config = config.with_risk_free_rate(rate);
    }
    if let Some(days) = trading_days {
        config = config.with_trading_days(days);
    }
    if let Some(raw) = policy {
        let policy = DegeneratePolicy::parse(raw)
            .ok_or_else(|| anyhow::anyhow!("Unknown policy: {}", raw))?;
        config = config.with_policy(policy);
    }

    config.validate()?;
    Ok(config)
}

fn parse_conventions(raw: &str) -> Result<Vec<ReturnConvention>> {
    if raw.eq_ignore_ascii_case("both") {
        return Ok(ReturnConvention::ALL.to_vec());
    }

    let convention = ReturnConvention::parse(raw)
        .ok_or_else(|| anyhow::anyhow!("Unknown convention: {}", raw))?;
    Ok(vec![convention])
}

fn run_metrics(
    data_path: PathBuf,
    symbols: Vec<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    conventions: Vec<ReturnConvention>,
    config: MetricsConfig,
    output_json: Option<PathBuf>,
) -> Result<()> {
    println!("Tickstats Risk/Return Metrics");
    println!("=============================\n");

    //load data
    println!("Loading data from {:?}...", data_path);
    let records =
        load_csv(&data_path).context(format!("Failed to load data from {:?}", data_path))?;

    let mut series = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        let prices = build_price_series(&records, symbol, start, end)?;
        if let Some((first, last)) = prices.date_range() {
            println!(
                "Loaded {} closes for {} ({} to {})",
                prices.len(),
                symbol,
                first,
                last
            );
        }
        series.push(prices);
    }

    println!("Risk-free rate: {:.4}", config.risk_free_rate);
    println!("Periods per year: {}\n", config.trading_days_per_year);

    let mut computed = Vec::new();
    for outcome in compute_batch(&series, &conventions, &config) {
        let record = outcome.result.context(format!(
            "Failed to compute {} metrics for {}",
            outcome.convention, outcome.symbol
        ))?;
        if record.has_non_finite() {
            tracing::warn!(
                symbol = record.symbol(),
                convention = %record.convention(),
                "record contains non-finite metrics"
            );
        }
        computed.push(record);
    }

    //display results
    println!("Results");
    println!("=======\n");
    if computed.len() == 1 {
        computed[0].pretty_print_table();
    } else {
        print_comparison_table(&computed);
    }

    if let Some(json_path) = output_json {
        save_json(&computed, &json_path)?;
        println!("\nMetrics saved to {:?}", json_path);
    }

    Ok(())
}

fn save_json(records: &[MetricsRecord], path: &PathBuf) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).context(format!("Failed to write {:?}", path))?;
    Ok(())
}
