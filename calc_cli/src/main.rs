//! # Yardstick CLI
//!
//! Command-line front end for the `calc_core` estimators.
//!
//! ## Commands
//!
//! - `list`: show every tool with its id and category
//! - `example <tool>`: print a default JSON request to start from
//! - `run <file|->`: evaluate one request or an array of requests
//! - `phrases`: generate alliterative phrases
//!
//! Logs go to stderr; set `RUST_LOG` or pass `-v` for more detail.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{fmt, EnvFilter};

use calc_core::format::{Breakdown, ResultRow};
use calc_core::tools::alliteration::{self, PhraseRequest, PhraseStyle};
use calc_core::{catalog, parse_requests, CalcError, CalcResult, EstimateRequest, NumericField, Settings};

/// Yardstick - material quantity and cost estimators
#[derive(Parser)]
#[command(name = "calc_cli")]
#[command(version)]
#[command(about = "Material quantity and cost estimators")]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available tools
    List,
    /// Print a default request for a tool
    Example {
        /// Tool id, as shown by `list`
        tool: String,
    },
    /// Evaluate requests from a JSON file, or stdin with `-`
    Run {
        input: String,
        /// Print reports as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Generate alliterative phrases
    Phrases {
        #[arg(short, long, default_value = "A")]
        letter: String,
        /// general, funny, business or kids
        #[arg(short, long, default_value = "general")]
        style: String,
        /// Number of phrases (defaults to the configured count)
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Seed for repeatable output
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CalcResult<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::List => {
            for tool in catalog() {
                println!("  {:<16} {:<36} {:?}", tool.id, tool.name, tool.category);
            }
        }
        Commands::Example { tool } => {
            let json = if tool.trim() == alliteration::TOOL_ID {
                serde_json::to_string_pretty(&PhraseRequest::default())?
            } else {
                serde_json::to_string_pretty(&EstimateRequest::example(&tool)?)?
            };
            println!("{}", json);
        }
        Commands::Run { input, json } => {
            let text = read_input(&input)?;
            let requests = parse_requests(&text)?;
            tracing::info!(count = requests.len(), "evaluating requests");

            let reports = requests
                .iter()
                .map(|request| request.evaluate(&settings))
                .collect::<CalcResult<Vec<_>>>()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    print_rows(&report.name, &report.rows);
                }
            }
        }
        Commands::Phrases {
            letter,
            style,
            count,
            seed,
            json,
        } => {
            let request = PhraseRequest {
                letter,
                style: PhraseStyle::from_key(&style)?,
                count: NumericField::from(count.unwrap_or(settings.default_phrase_count) as f64),
            };
            let batch = match seed {
                Some(seed) => alliteration::generate(&request, &mut StdRng::seed_from_u64(seed))?,
                None => alliteration::generate(&request, &mut rand::thread_rng())?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&batch)?);
            } else {
                print_rows(alliteration::TOOL_NAME, &batch.rows(&settings));
            }
        }
    }
    Ok(())
}

fn read_input(source: &str) -> CalcResult<String> {
    let mut text = String::new();
    let result = if source == "-" {
        std::io::stdin().read_to_string(&mut text)
    } else {
        std::fs::File::open(Path::new(source)).and_then(|mut file| file.read_to_string(&mut text))
    };
    result.map_err(|e| CalcError::invalid_input("input", source, e.to_string()))?;
    Ok(text)
}

fn print_rows(title: &str, rows: &[ResultRow]) {
    let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    println!("═══════════════════════════════════════");
    println!("  {}", title.to_uppercase());
    println!("═══════════════════════════════════════");
    for row in rows {
        println!("  {:<width$}  {}", row.label, row.value, width = width);
    }
    println!();
}
