use analytics::StatisticsEngine;
use analyzer::{ContextualAnnotator, ExtremeMovementDetector, explain};
use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use configuration::{Config, load_config};
use core_types::Panel;
use display::ValueFormat;
use forecaster::TrendPredictor;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

mod display;
mod loader;
mod logging;
mod report;

/// The main entry point for the econtrends analytics tool.
fn main() -> Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let _log_guard = logging::init(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Stats(args) => handle_stats(args, &config),
        Commands::Movements(args) => handle_movements(args, &config),
        Commands::Forecast(args) => handle_forecast(args, &config),
        Commands::Compare(args) => handle_compare(args, &config),
        Commands::Data(args) => handle_data(args, &config),
        Commands::Report(args) => {
            handle_stats(
                StatsArgs {
                    input: args.input.clone(),
                    growth: false,
                },
                &config,
            )?;
            handle_movements(
                MovementArgs {
                    input: args.input.clone(),
                    top_n: args.top_n,
                },
                &config,
            )?;
            handle_compare(
                CompareArgs {
                    input: args.input.clone(),
                    years: Vec::new(),
                },
                &config,
            )?;
            handle_forecast(
                ForecastArgs {
                    input: args.input,
                    years: Vec::new(),
                    country: None,
                },
                &config,
            )
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Descriptive statistics, extreme movements and trend forecasts for country indicator panels.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Latest values, summary statistics, CAGR and latest-year ranking.
    Stats(StatsArgs),
    /// The largest year-over-year rises and dips with contextual notes.
    Movements(MovementArgs),
    /// Linear trend models and predictions.
    Forecast(ForecastArgs),
    /// Each country's values in selected years, side by side.
    Compare(CompareArgs),
    /// The validated panel as CSV, sorted by country and year.
    Data(DataArgs),
    /// Everything above, one section after another.
    Report(ReportArgs),
}

#[derive(Args, Clone)]
struct InputArgs {
    /// CSV file with columns country,country_code,year,value.
    #[arg(long, short)]
    input: PathBuf,

    /// Indicator key (e.g. "gdp", "inflation_rate"); drives formatting and event matching.
    #[arg(long, short = 'k')]
    indicator: String,

    /// Print results as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StatsArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Also print the year-over-year growth series.
    #[arg(long)]
    growth: bool,
}

#[derive(Args)]
struct MovementArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Rises and dips to keep per country. Overrides `analysis.top_n`.
    #[arg(long)]
    top_n: Option<usize>,
}

#[derive(Args)]
struct ForecastArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Years to predict with bounds. Defaults to the configured horizon after the latest year.
    #[arg(long, num_args = 1..)]
    years: Vec<i32>,

    /// Print the model summary of this country only.
    #[arg(long)]
    country: Option<String>,
}

#[derive(Args)]
struct CompareArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Years to compare. Defaults to the last 3 years in the panel.
    #[arg(long, num_args = 1..)]
    years: Vec<i32>,
}

#[derive(Args)]
struct DataArgs {
    /// CSV file with columns country,country_code,year,value.
    #[arg(long, short)]
    input: PathBuf,

    /// Where to write the CSV. Defaults to stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long)]
    top_n: Option<usize>,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn load(input: &InputArgs, config: &Config) -> Result<Panel> {
    loader::load_panel(&input.input, &config.panel)
}

fn print_json(value: serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn handle_stats(args: StatsArgs, config: &Config) -> Result<()> {
    let panel = load(&args.input, config)?;
    let key = args.input.indicator.as_str();
    let format = ValueFormat::for_indicator(key);
    let engine = StatisticsEngine::new();

    let latest = panel.latest();
    let statistics = engine.summarize(&panel);
    let cagr = engine.cagr(&panel);
    let ranking = engine.rank_latest(&panel);
    let growth = args.growth.then(|| engine.growth_rates(&panel));

    if args.input.json {
        return print_json(json!({
            "indicator": key,
            "latest": latest,
            "statistics": statistics,
            "cagr": cagr,
            "ranking": ranking,
            "growth": growth,
        }));
    }

    println!("== Latest values ({key}) ==");
    println!("{}", report::latest_table(&latest, format));
    println!("\n== Statistical summary ==");
    println!("{}", report::statistics_table(&statistics, format));
    println!("\n== Compound annual growth rate ==");
    if cagr.is_empty() {
        println!("CAGR is undefined for every country in this panel.");
    } else {
        println!("{}", report::cagr_table(&cagr, key));
    }
    if let Some(first) = ranking.first() {
        println!("\n== Country ranking ({}) ==", first.year);
        println!("{}", report::ranking_table(&ranking, format));
    }
    if let Some(growth) = growth {
        println!("\n== Year-over-year growth ==");
        println!("{}", report::growth_table(&growth));
    }
    Ok(())
}

fn handle_movements(args: MovementArgs, config: &Config) -> Result<()> {
    let panel = load(&args.input, config)?;
    let key = args.input.indicator.as_str();
    let top_n = args.top_n.unwrap_or(config.analysis.top_n);

    if args.input.json {
        let movements = ExtremeMovementDetector::new().detect(&panel, top_n)?;
        let entries = ContextualAnnotator::new().annotate(&movements, key);
        return print_json(json!({
            "indicator": key,
            "top_n": top_n,
            "explanations": entries,
        }));
    }

    let lines = explain(&panel, key, top_n, config.analysis.min_abs_change_pct)?;
    println!("== Dips & rises: contextual explanations ({key}) ==");
    for line in lines {
        println!("- {line}");
    }
    Ok(())
}

fn handle_forecast(args: ForecastArgs, config: &Config) -> Result<()> {
    let panel = load(&args.input, config)?;
    let key = args.input.indicator.as_str();
    let format = ValueFormat::for_indicator(key);

    let mut predictor = TrendPredictor::new();
    predictor.train(&panel);
    let next_year = predictor.predict_next_year(&panel);

    let years = if args.years.is_empty() {
        default_forecast_years(&panel, config.forecast.horizon)?
    } else {
        args.years.clone()
    };
    let intervals = predictor.predict_with_confidence(&panel, &years, config.forecast.confidence);
    info!(
        models = predictor.models().len(),
        years = ?years,
        "Forecast complete"
    );

    let summaries = match &args.country {
        Some(country) => vec![predictor.summary(country)?],
        None => predictor.models().values().map(|m| m.summary()).collect(),
    };

    if args.input.json {
        return print_json(json!({
            "indicator": key,
            "models": predictor.models().values().collect::<Vec<_>>(),
            "next_year": next_year,
            "confidence": config.forecast.confidence,
            "intervals": intervals,
        }));
    }

    if !predictor.is_trained() {
        println!("Not enough data to train a trend model for any country (need at least 3 years).");
        return Ok(());
    }

    println!("== Trend models ({key}) ==");
    println!("{}", report::models_table(predictor.models().values()));
    println!("\n== Next year predictions ==");
    println!("{}", report::predictions_table(&next_year, format));
    println!("\n== Predictions with bounds (± 2 × MAE) ==");
    println!("{}", report::intervals_table(&intervals, format));
    for summary in summaries {
        println!("\n{summary}");
    }
    Ok(())
}

fn handle_compare(args: CompareArgs, config: &Config) -> Result<()> {
    let panel = load(&args.input, config)?;
    let key = args.input.indicator.as_str();
    let engine = StatisticsEngine::new();

    let mut years = if args.years.is_empty() {
        engine.default_comparison_years(&panel)
    } else {
        args.years
    };
    years.sort_unstable();
    years.dedup();
    let rows = engine.compare_years(&panel, &years);

    if args.input.json {
        return print_json(json!({
            "indicator": key,
            "years": years,
            "rows": rows,
        }));
    }

    if rows.is_empty() {
        println!("No observations in the selected years.");
        return Ok(());
    }
    println!("== Multi-year comparison ({key}) ==");
    println!(
        "{}",
        report::comparison_table(&rows, &years, ValueFormat::for_indicator(key))
    );
    Ok(())
}

fn handle_data(args: DataArgs, config: &Config) -> Result<()> {
    let panel = loader::load_panel(&args.input, &config.panel)?;

    let written = match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            loader::write_observations(file, &panel)?
        }
        None => loader::write_observations(std::io::stdout().lock(), &panel)?,
    };
    info!(rows = written, output = ?args.output, "Panel exported");
    Ok(())
}

/// `horizon` consecutive years after the panel's latest year.
fn default_forecast_years(panel: &Panel, horizon: u32) -> Result<Vec<i32>> {
    let Some(last) = panel.max_year() else {
        return Ok(Vec::new());
    };
    let horizon = i32::try_from(horizon)
        .with_context(|| format!("Forecast horizon {horizon} does not fit a year"))?;

    (1..=horizon)
        .map(|offset| {
            last.checked_add(offset)
                .ok_or_else(|| anyhow!("Forecast year {last} + {offset} overflows"))
        })
        .collect()
}
