use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{Cell, Row, Table};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use voltlab::prelude::*;

#[derive(Parser)]
#[command(name = "voltlab")]
#[command(about = "A Rust-based signal strategy backtesting engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a backtest
    Run {
        //json run configuration, flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        //path to csv or json bar file
        #[arg(long)]
        data: Option<PathBuf>,

        //strategy id (see the strategies command)
        #[arg(long)]
        strategy: Option<String>,

        //strategy parameter as key=value, repeatable
        #[arg(long = "param")]
        params: Vec<String>,

        //output path for equity curve csv
        #[arg(long)]
        output_equity_csv: Option<PathBuf>,

        //output path for the full result as json
        #[arg(long)]
        output_json: Option<PathBuf>,
    },
    //list available strategies
    Strategies,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let engine = BacktestEngine::default();

    match cli.command {
        Commands::Run {
            config,
            data,
            strategy,
            params,
            output_equity_csv,
            output_json,
        } => {
            let mut run = match config {
                Some(path) => RunConfiguration::from_json_file(&path)
                    .context(format!("Failed to load configuration from {:?}", path))?,
                None => RunConfiguration::default(),
            };
            if let Some(data) = data {
                run.data_path = data;
            }
            if let Some(strategy) = strategy {
                run.strategy = strategy;
            }
            if output_equity_csv.is_some() {
                run.output_equity_csv = output_equity_csv;
            }
            if output_json.is_some() {
                run.output_json = output_json;
            }
            run.apply_overrides(&params)?;

            run_backtest(&engine, &run)?;
        }
        Commands::Strategies => print_strategies(&engine),
    }

    Ok(())
}

fn run_backtest(engine: &BacktestEngine, run: &RunConfiguration) -> Result<()> {
    println!("VoltLab Signal Backtesting Engine");
    println!("=================================\n");

    println!("Loading data from {:?}...", run.data_path);
    let bars = load_bars(&run.data_path)
        .context(format!("Failed to load data from {:?}", run.data_path))?;
    match &run.symbol {
        Some(symbol) => println!("Loaded {} bars for {}", bars.len(), symbol),
        None => println!("Loaded {} bars", bars.len()),
    }

    if !run.parameters.is_empty() {
        let rendered: Vec<String> = run
            .parameters
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        println!("Parameters: {}", rendered.join(", "));
    }

    println!("Running backtest...\n");
    let result = engine
        .run_backtest(&bars, &run.strategy, &run.parameters)
        .context(format!("Backtest failed for strategy {}", run.strategy))?;

    println!("Backtest Results");
    println!("================\n");
    SummaryMetrics::from_result(&result).pretty_print_table();

    if let Some(equity_path) = &run.output_equity_csv {
        let series = PriceSeries::from_raw(&bars)?;
        save_equity_csv(&series, &result, equity_path)?;
        println!("\nEquity curve saved to {:?}", equity_path);
    }

    if let Some(json_path) = &run.output_json {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(json_path, json)?;
        println!("Result saved to {:?}", json_path);
    }

    Ok(())
}

fn print_strategies(engine: &BacktestEngine) {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Id"),
        Cell::new("Name"),
        Cell::new("On Failure"),
    ]));

    for info in engine.registry().list() {
        let policy = match info.failure_policy {
            FailurePolicy::Propagate => "error",
            FailurePolicy::Neutral => "flat signals",
        };
        table.add_row(Row::new(vec![
            Cell::new(&info.id),
            Cell::new(&info.display_name),
            Cell::new(policy),
        ]));
    }

    table.printstd();
}

fn save_equity_csv(series: &PriceSeries, result: &BacktestResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to create equity csv {:?}", path))?;
    writer.write_record(["timestamp", "close", "signal", "equity"])?;

    for ((bar, signal), equity) in series
        .bars()
        .iter()
        .zip(result.signals.iter())
        .zip(result.equity_curve.iter())
    {
        writer.write_record([
            bar.timestamp.to_rfc3339(),
            bar.close.to_string(),
            signal.to_string(),
            equity.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
