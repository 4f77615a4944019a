//! Batch command - parse many quotation text files in parallel.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, error, warn};

use cabquote_core::{ParsedQuote, QuoteParser, QuoteSnapshot, ReconciliationStatus};

use super::parse::{OutputFormat, format_quote};
use crate::store;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input text files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of parsing a single file.
struct FileResult {
    path: PathBuf,
    quote: Option<ParsedQuote>,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = store::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to parse",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // One snapshot and one compiled parser shared read-only by every worker
    let snapshot = store::load_snapshot(config)?;
    let parser = snapshot.parser()?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.max(1))
        .build()?;

    let results: Vec<FileResult> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let result = parse_file(path, &snapshot, &parser);
                pb.inc(1);
                match result {
                    Ok(quote) => FileResult {
                        path: path.clone(),
                        quote: Some(quote),
                        error: None,
                    },
                    Err(e) => {
                        warn!("Failed to parse {}: {}", path.display(), e);
                        FileResult {
                            path: path.clone(),
                            quote: None,
                            error: Some(e.to_string()),
                        }
                    }
                }
            })
            .collect()
    });

    pb.finish_and_clear();

    let failed: Vec<&FileResult> = results.iter().filter(|r| r.error.is_some()).collect();
    if !failed.is_empty() && !args.continue_on_error {
        for result in &failed {
            error!(
                "Failed to parse {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
        anyhow::bail!("{} of {} files failed", failed.len(), results.len());
    }

    // Write outputs
    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Some(quote) = &result.quote {
                let output_path = output_path(output_dir, &result.path, args.format);
                fs::write(&output_path, format_quote(quote, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    // Print summary
    println!(
        "{:<40} {:>8} {:>14}  {}",
        "File", "Records", "Total", "Status"
    );
    for result in &results {
        let name = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match &result.quote {
            Some(quote) => {
                let status = match quote.reconciliation.status {
                    ReconciliationStatus::Match => style("MATCH").green(),
                    ReconciliationStatus::Mismatch => style("MISMATCH").red(),
                    ReconciliationStatus::Unknown => style("UNKNOWN").yellow(),
                };
                println!(
                    "{:<40} {:>8} {:>14}  {}",
                    name,
                    quote.records.len(),
                    quote.reconciliation.computed_total.round_dp(2),
                    status
                );
            }
            None => println!(
                "{:<40} {:>8} {:>14}  {}",
                name,
                "-",
                "-",
                style("ERROR").red()
            ),
        }
    }

    let successful = results.len() - failed.len();
    eprintln!();
    eprintln!(
        "{} Parsed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    Ok(())
}

fn parse_file(
    path: &Path,
    snapshot: &QuoteSnapshot,
    parser: &QuoteParser,
) -> anyhow::Result<ParsedQuote> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        anyhow::bail!("File is empty");
    }
    Ok(snapshot.parse_with(parser, &text))
}

fn output_path(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("quote");
    output_dir.join(format!("{}.{}", stem, format.extension()))
}
