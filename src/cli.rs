//! Command-line interface for `calckit`.

use clap::{Args, Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::api::run_http_server;
use crate::config::{ConfigError, Settings};
use crate::core::{
    EvalError, Evaluation, GoalSolveConfig, GoalSolveResult, InputRecord, InputValue, SolveError,
    calculators, evaluate, find_calculator, solve_goal,
};

#[derive(Parser, Debug)]
#[command(
    name = "calckit",
    about = "Catalog of formula calculators for conversions, finance, health and home projects",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every calculator.
    List,
    /// Print a calculator's fields as JSON.
    Describe(DescribeArgs),
    /// Evaluate a calculator.
    Eval(EvalArgs),
    /// Find the input value that makes an output hit a target.
    Solve(SolveArgs),
    /// Serve the JSON API over HTTP.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct EvalArgs {
    pub id: String,

    /// Input assignment, e.g. `--set bar=2` or `--set cash_flows=100,200`.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub inputs: Vec<(String, InputValue)>,

    /// Print the evaluation as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SolveArgs {
    pub id: String,

    /// Numeric input to vary.
    #[arg(long)]
    pub field: String,

    /// Numeric output to drive to the target.
    #[arg(long)]
    pub output: String,

    #[arg(long, allow_negative_numbers = true)]
    pub target: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub min: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub max: f64,

    #[arg(long)]
    pub tolerance: Option<f64>,

    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Fixed inputs, same syntax as `eval --set`.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub inputs: Vec<(String, InputValue)>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// TOML settings file (default: ./calckit.toml if present).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

fn parse_assignment(raw: &str) -> Result<(String, InputValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing input name in '{raw}'"));
    }
    Ok((name.to_string(), InputValue::parse(value)))
}

pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Serve(args) => serve(args).await,
        command => {
            init_tracing(&offline_log_filter()?);
            print!("{}", run_offline(command)?);
            Ok(())
        }
    }
}

// Commands other than `serve` take no --config flag, so only ./calckit.toml
// and CALCKIT_* apply.
fn offline_log_filter() -> Result<String, ConfigError> {
    Ok(Settings::load(None)?.log_filter)
}

/// Runs every command except `serve`, returning what should be printed.
pub fn run_offline(command: Commands) -> Result<String, CliError> {
    match command {
        Commands::List => Ok(render_catalog()),
        Commands::Describe(args) => {
            let calculator =
                find_calculator(&args.id).ok_or(EvalError::UnknownCalculator(args.id))?;
            Ok(serde_json::to_string_pretty(&calculator.info())? + "\n")
        }
        Commands::Eval(args) => {
            let record: InputRecord = args.inputs.into_iter().collect();
            let evaluation = evaluate(&args.id, &record)?;
            if args.json {
                Ok(serde_json::to_string_pretty(&evaluation)? + "\n")
            } else {
                Ok(render_evaluation(&evaluation))
            }
        }
        Commands::Solve(args) => {
            let record: InputRecord = args.inputs.into_iter().collect();
            let mut config = GoalSolveConfig::new(&args.field, &args.output, args.target, args.min, args.max);
            if let Some(tolerance) = args.tolerance {
                config.tolerance = tolerance;
            }
            if let Some(max_iterations) = args.max_iterations {
                config.max_iterations = max_iterations;
            }
            let result = solve_goal(&args.id, &record, &config)?;
            debug!(iterations = result.iterations.len(), "solve finished");
            Ok(render_solve(&result))
        }
        Commands::Serve(_) => Ok(String::new()),
    }
}

async fn serve(args: ServeArgs) -> Result<(), CliError> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    init_tracing(&settings.log_filter);
    run_http_server(&settings).await?;
    Ok(())
}

fn render_catalog() -> String {
    let width = calculators().map(|c| c.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for calculator in calculators() {
        let _ = writeln!(
            out,
            "{:<width$}  {:<10}  {}",
            calculator.id,
            format!("{:?}", calculator.category).to_lowercase(),
            calculator.title
        );
    }
    out
}

fn render_evaluation(evaluation: &Evaluation) -> String {
    let mut out = String::new();
    for output in &evaluation.outputs {
        let _ = writeln!(out, "{}: {}", output.label, output.display());
    }
    for classification in &evaluation.classifications {
        let _ = writeln!(out, "{}: {}", classification.label, classification.advice);
    }
    out
}

fn render_solve(result: &GoalSolveResult) -> String {
    let mut out = String::new();
    match (result.solved_value, result.achieved_output) {
        (Some(value), Some(achieved)) if result.feasible => {
            let _ = writeln!(out, "{} = {value:.6}", result.field);
            let _ = writeln!(out, "{} = {achieved:.6} (target {})", result.output, result.target);
        }
        _ => {}
    }
    let _ = writeln!(
        out,
        "{} ({} iterations)",
        result.message,
        result.iterations.len()
    );
    out
}
