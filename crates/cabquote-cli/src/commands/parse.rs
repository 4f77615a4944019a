//! Parse command - recover line items from a single quotation text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cabquote_core::quote::rules::format_amount;
use cabquote_core::{ParsedQuote, ReconciliationStatus};

use crate::store;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file (output of the PDF text extractor)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// SKU rule set to use instead of the configured one
    #[arg(long)]
    rule_set: Option<String>,

    /// Exit with an error when the totals do not match
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text table
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = store::load_config(config_path)?;
    if let Some(rule_set) = &args.rule_set {
        config.sku.pdf_rule_set = rule_set.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    pb.set_message("Loading rules and catalog...");
    let snapshot = store::load_snapshot(config)?;

    pb.set_message("Parsing quotation...");
    let text = fs::read_to_string(&args.input)?;
    let quote = snapshot.parse(&text)?;

    pb.finish_and_clear();

    for warning in &quote.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = format_quote(&quote, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if args.strict && quote.reconciliation.status == ReconciliationStatus::Mismatch {
        anyhow::bail!("Reconciliation failed: {}", quote.reconciliation.message);
    }

    Ok(())
}

pub fn format_quote(quote: &ParsedQuote, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(quote)?),
        OutputFormat::Text => Ok(format_text(quote)),
    }
}

fn format_text(quote: &ParsedQuote) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:>5}  {:<24} {:>4} {:>12}  {:<6} {}\n",
        "Seq", "SKU", "Qty", "Unit price", "Color", "Description"
    ));

    for record in &quote.records {
        output.push_str(&format!(
            "{:>5}  {:<24} {:>4} {:>12}  {:<6} {}\n",
            record.sequence_number,
            record.sku,
            record.quantity,
            format_amount(record.unit_price),
            record.context_label,
            record.description
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Records: {} ({} single-line, {} multi-line, {} skipped)\n",
        quote.records.len(),
        quote.stats.single_line_records,
        quote.stats.multi_line_records,
        quote.stats.skipped_lines
    ));
    output.push_str(&format!(
        "Computed total: {}\n",
        format_amount(quote.reconciliation.computed_total)
    ));
    if let Some(total) = quote.reconciliation.document_total {
        output.push_str(&format!("Document total: {}\n", format_amount(total)));
    }

    let status = match quote.reconciliation.status {
        ReconciliationStatus::Match => style("MATCH").green(),
        ReconciliationStatus::Mismatch => style("MISMATCH").red(),
        ReconciliationStatus::Unknown => style("UNKNOWN").yellow(),
    };
    output.push_str(&format!(
        "Reconciliation: {} - {}\n",
        status, quote.reconciliation.message
    ));

    output
}
