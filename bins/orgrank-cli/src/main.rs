//! orgrank: organization reward calculator.
//!
//! Loads an exported project file, computes subtree metrics and per-member
//! rewards, and prints them as a table or JSON.

mod config;
mod format;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use orgrank_core::{MiningRate, Project};
use orgrank_engine::{compute_metrics, compute_report};
use orgrank_engine::metrics::unreached;
use tracing::{info, warn};

use crate::config::{ensure_computable, load_projects, select_project, Config};
use crate::format::{
    metrics_rows, rate_label, render_metrics, render_rewards, render_search, RewardSort,
};

/// Organization reward calculator.
#[derive(Parser, Debug)]
#[command(name = "orgrank", version, about = "Rank tiers and rewards for an organization tree")]
struct Cli {
    /// Project file (default: $ORGRANK_PROJECT, then ~/.orgrank/project.json)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Project id or title when the file holds several (default: the first)
    #[arg(long, global = true)]
    select: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reward table: mining, referral, and community rewards per member.
    Report(ReportArgs),
    /// Subtree totals and rank tiers per member.
    Metrics(OutputArgs),
    /// Members whose name or recommender contains the query.
    Search(SearchArgs),
    /// Mining rate presets.
    Rates,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Mining rate, e.g. 0.008 or 0.8% (default: $ORGRANK_MINING_RATE, then 0.7%)
    #[arg(short, long)]
    rate: Option<MiningRate>,

    /// Row order.
    #[arg(short, long, value_enum, default_value_t = RewardSort::Level)]
    sort: RewardSort,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Case-insensitive text; empty lists every member.
    #[arg(default_value = "")]
    query: String,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    match cli.command {
        Commands::Rates => {
            show_rates();
            Ok(())
        }
        Commands::Report(args) => {
            let config = Config::from_env(cli.project, args.rate)?;
            let project = open_project(&config, cli.select.as_deref())?;
            show_report(&project, config.mining_rate, args.sort, args.output.format)
        }
        Commands::Metrics(args) => {
            let config = Config::from_env(cli.project, None)?;
            let project = open_project(&config, cli.select.as_deref())?;
            show_metrics(&project, args.format)
        }
        Commands::Search(args) => {
            let config = Config::from_env(cli.project, None)?;
            let project = open_project(&config, cli.select.as_deref())?;
            show_search(&project, &args.query, args.output.format)
        }
    }
}

fn open_project(config: &Config, selector: Option<&str>) -> Result<Project> {
    let projects = load_projects(&config.project_path)?;
    let project = select_project(projects, selector)?;
    ensure_computable(&project)?;
    info!(
        project = %project.title,
        members = project.tree.len(),
        rate = %config.mining_rate,
        "project opened"
    );
    Ok(project)
}

fn show_report(
    project: &Project,
    rate: MiningRate,
    sort: RewardSort,
    format: OutputFormat,
) -> Result<()> {
    let (metrics, report) = compute_report(&project.tree, rate);
    let orphans = unreached(&project.tree, &metrics);
    if !orphans.is_empty() {
        warn!(count = orphans.len(), "members not reachable from the root");
    }

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!("{} (mining rate {})\n", project.title, rate_label(rate));
            print!("{}", render_rewards(&report, sort));
        }
    }
    Ok(())
}

fn show_metrics(project: &Project, format: OutputFormat) -> Result<()> {
    let metrics = compute_metrics(&project.tree);
    let rows = metrics_rows(&project.tree, &metrics);
    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => print!("{}", render_metrics(&rows)),
    }
    Ok(())
}

fn show_search(project: &Project, query: &str, format: OutputFormat) -> Result<()> {
    let hits = project.tree.search(query);
    match format {
        OutputFormat::Json => print_json(&hits)?,
        OutputFormat::Table => print!("{}", render_search(&hits)),
    }
    Ok(())
}

fn show_rates() {
    let default = MiningRate::default();
    for rate in MiningRate::presets() {
        let marker = if rate == default { " (default)" } else { "" };
        println!("{rate}{marker}");
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode JSON output")?;
    println!("{json}");
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr so table and JSON output on stdout stay clean.
/// `RUST_LOG` takes precedence over `level_str`.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
