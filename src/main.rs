//! Gridcalc - evaluate spreadsheet grids from the command line

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use gridcalc_core::storage::markdown_content;
use gridcalc_core::{Document, GridReply, GridRequest, GridService};
use gridcalc_engine::engine::format_number;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_CELL_ERRORS: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "gridcalc", version, about = "Evaluate spreadsheet grids with arithmetic formulas")]
struct Cli {
    /// Spreadsheet file to open (.grd)
    file: Option<PathBuf>,

    /// Export the evaluated grid to a markdown file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the evaluation result as JSON
    #[arg(long)]
    json: bool,

    /// Evaluate a single formula against the grid and print the result
    #[arg(short = 'c', long = "command", value_name = "EXPR")]
    command: Option<String>,

    /// Check a formula's syntax and print its references as JSON
    #[arg(long, value_name = "FORMULA")]
    validate: Option<String>,

    /// Apply a JSON array of grid requests and print the replies
    #[arg(long, value_name = "FILE")]
    requests: Option<PathBuf>,

    /// Rows of a fresh grid (ignored when FILE is given)
    #[arg(long)]
    rows: Option<usize>,

    /// Columns of a fresh grid (ignored when FILE is given)
    #[arg(long)]
    cols: Option<usize>,

    /// Write the grid back out as .grd
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Exit with status 2 when any cell fails to evaluate
    #[arg(long)]
    strict: bool,

    /// Read settings from this file instead of the user config
    #[arg(long, value_name = "FILE", conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore any config file
    #[arg(long)]
    no_config: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(config_filter: Option<&str>, verbose: bool) {
    let fallback = if verbose {
        "debug"
    } else {
        config_filter.unwrap_or("warn")
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_document(cli: &Cli, rows: usize, cols: usize) -> Result<Document> {
    match &cli.file {
        Some(path) => Document::load_grd(path)
            .with_context(|| format!("Failed to load {}", path.display())),
        None => Document::new(rows, cols).context("Failed to create grid"),
    }
}

fn run_requests(cli: &Cli, path: &Path, doc: Document) -> Result<ExitCode> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let requests: Vec<GridRequest> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse requests in {}", path.display()))?;

    let mut service = GridService::new(doc);
    let replies: Vec<GridReply> = requests.into_iter().map(|r| service.handle(r)).collect();
    println!("{}", serde_json::to_string_pretty(&replies)?);

    if let Some(save) = &cli.save {
        service
            .document()
            .save_grd(save)
            .with_context(|| format!("Failed to save {}", save.display()))?;
    }
    Ok(ExitCode::SUCCESS)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let (config, warnings) = if cli.no_config {
        (config::Config::default(), Vec::new())
    } else {
        config::load_config(cli.config.as_deref())
    };
    init_tracing(config.log_filter.as_deref(), cli.verbose);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    if let Some(formula) = &cli.validate {
        let result = GridService::default().validate_formula(formula);
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(if result.is_valid {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let rows = cli.rows.unwrap_or(config.rows);
    let cols = cli.cols.unwrap_or(config.cols);
    tracing::debug!(file = ?cli.file, rows, cols, "opening grid");
    let mut doc = open_document(&cli, rows, cols)?;

    if let Some(path) = &cli.requests {
        return run_requests(&cli, path, doc);
    }

    let result = doc.evaluate();

    if let Some(expr) = &cli.command {
        let formula = if expr.starts_with('=') {
            expr.clone()
        } else {
            format!("={}", expr)
        };
        return Ok(match doc.evaluate_formula(&formula) {
            Ok(n) => {
                println!("{}", format_number(n));
                ExitCode::SUCCESS
            }
            Err(e) => {
                println!("#ERR: {}", e);
                ExitCode::FAILURE
            }
        });
    }

    if let Some(save) = &cli.save {
        doc.save_grd(save)
            .with_context(|| format!("Failed to save {}", save.display()))?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(output) = &cli.output {
        doc.export_markdown(output)
            .with_context(|| format!("Failed to export {}", output.display()))?;
        eprintln!("Exported to {}", output.display());
    } else {
        print!("{}", markdown_content(&doc));
    }

    if cli.strict && !result.success {
        for report in &result.errors {
            eprintln!("{}: {}", report.cell_id, report.error);
        }
        return Ok(ExitCode::from(EXIT_CELL_ERRORS));
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
