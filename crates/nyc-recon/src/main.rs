mod config;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use nyc_recon_core::io::{load_and_clean, load_csv};
use nyc_recon_core::{agency_key_coverage, inspect_raw_frame, reconcile, Dataset, KeyCoverage};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{resolve_inputs, ReconConfig};
use crate::output::{preview_table, write_frame, OutputFormat};

#[derive(Parser, Debug)]
#[command(author, version, about = "Normalize and reconcile municipal payroll and spending CSVs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean one payroll or spending CSV into agency_key / fiscal_year / amount
    Clean(CleanArgs),
    /// Report every input-contract violation in a raw CSV
    Check(CheckArgs),
    /// Clean both datasets and join them on agency key and fiscal year
    Reconcile(ReconcileArgs),
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Which layout the file uses (payroll or spending)
    dataset: Dataset,
    /// Raw CSV file
    path: PathBuf,
    /// Write the cleaned frame here instead of printing a preview
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format; inferred from the extension when omitted
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Rows to show in the preview
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

#[derive(Args, Debug)]
struct CheckArgs {
    dataset: Dataset,
    path: PathBuf,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ReconcileArgs {
    /// TOML file with [inputs] and [output] sections
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    payroll: Option<PathBuf>,
    #[arg(long)]
    spending: Option<PathBuf>,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Print key coverage as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Clean(args) => handle_clean(args),
        Command::Check(args) => handle_check(args),
        Command::Reconcile(args) => handle_reconcile(args),
    }
}

fn handle_clean(args: CleanArgs) -> Result<()> {
    let cleaned = clean_file(&args.path, args.dataset)?;

    match args.output {
        Some(path) => write_frame(&cleaned, &path, args.format)?,
        None => {
            println!("{}", preview_table(&cleaned, args.limit));
            if cleaned.height() > args.limit {
                println!("... {} more rows", cleaned.height() - args.limit);
            }
        }
    }

    Ok(())
}

fn handle_check(args: CheckArgs) -> Result<()> {
    let raw = load_csv(&args.path)
        .with_context(|| format!("failed to load {}", args.path.display()))?;
    let report = inspect_raw_frame(&raw, args.dataset)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} rows checked in {} ({})",
            report.rows,
            args.path.display(),
            args.dataset
        );
        for column in &report.missing_columns {
            println!("  missing column: {column}");
        }
        print_rows("blank agency", &report.blank_agency_rows);
        print_rows("unparseable fiscal year", &report.bad_fiscal_year_rows);
        print_rows(
            args.dataset.amount_source_column(),
            &report.bad_amount_rows,
        );
    }

    if !report.is_clean() {
        bail!("{} contract violation(s) found", report.issue_count());
    }

    Ok(())
}

fn handle_reconcile(args: ReconcileArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ReconConfig::load(path)?,
        None => ReconConfig::default(),
    };
    let inputs = resolve_inputs(config, args.payroll, args.spending, args.output, args.format)?;

    let payroll = clean_file(&inputs.payroll, Dataset::Payroll)?;
    let spending = clean_file(&inputs.spending, Dataset::Spending)?;

    let coverage = agency_key_coverage(&payroll, &spending)?;
    if !coverage.is_exact_match() {
        warn!(
            payroll_only = coverage.payroll_only.len(),
            spending_only = coverage.spending_only.len(),
            "agency keys differ between datasets"
        );
    }

    let joined = reconcile(&payroll, &spending)?;

    if args.json {
        let summary = ReconcileSummary {
            payroll_rows: payroll.height(),
            spending_rows: spending.height(),
            joined_rows: joined.height(),
            coverage: &coverage,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", coverage_table(&coverage));
        if inputs.output.is_none() {
            println!("{}", preview_table(&joined, 20));
        }
    }

    if let Some((path, format)) = inputs.output {
        write_frame(&joined, &path, format)?;
    }

    Ok(())
}

#[derive(Serialize)]
struct ReconcileSummary<'a> {
    payroll_rows: usize,
    spending_rows: usize,
    joined_rows: usize,
    coverage: &'a KeyCoverage,
}

fn clean_file(path: &Path, dataset: Dataset) -> Result<DataFrame> {
    let cleaned = load_and_clean(path, dataset)
        .with_context(|| format!("failed to clean {dataset} file {}", path.display()))?;
    info!(dataset = %dataset, path = %path.display(), rows = cleaned.height(), "cleaned input");
    Ok(cleaned)
}

fn coverage_table(coverage: &KeyCoverage) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["agency_key", "payroll", "spending"]);

    let rows = coverage
        .shared
        .iter()
        .map(|key| (key, "yes", "yes"))
        .chain(coverage.payroll_only.iter().map(|key| (key, "yes", "")))
        .chain(coverage.spending_only.iter().map(|key| (key, "", "yes")));

    for (key, payroll, spending) in rows {
        table.add_row(vec![key.as_str(), payroll, spending]);
    }

    table
}

fn print_rows(label: &str, rows: &[usize]) {
    if rows.is_empty() {
        return;
    }
    let listed: Vec<String> = rows.iter().take(10).map(usize::to_string).collect();
    let suffix = if rows.len() > 10 { ", ..." } else { "" };
    println!("  {label}: {} row(s) [{}{suffix}]", rows.len(), listed.join(", "));
}
