//! SKU command - resolve a code or look up a manual entry.

use clap::{Args, Subcommand};
use serde::Serialize;

use cabquote_core::models::quote::NO_CONTEXT;
use cabquote_core::ManualQuery;

use crate::store;

/// Arguments for the sku command.
#[derive(Args)]
pub struct SkuArgs {
    #[command(subcommand)]
    command: SkuCommand,
}

#[derive(Subcommand)]
enum SkuCommand {
    /// Generate the SKU for a quotation line
    Resolve(ResolveArgs),

    /// Find a catalog SKU for a manually entered product
    Lookup(LookupArgs),
}

#[derive(Args)]
struct ResolveArgs {
    /// User code from the quotation line
    #[arg(long)]
    code: String,

    /// Line description
    #[arg(long)]
    description: String,

    /// Door color in effect for the line
    #[arg(long, default_value = NO_CONTEXT)]
    context: String,

    /// SKU rule set to use instead of the configured one
    #[arg(long)]
    rule_set: Option<String>,
}

#[derive(Args)]
struct LookupArgs {
    /// Product category label
    #[arg(long)]
    category: String,

    /// Product name or code
    #[arg(long)]
    product: String,

    /// Box material variant
    #[arg(long, default_value = "")]
    box_variant: String,

    /// Door color variant
    #[arg(long, default_value = "")]
    door_variant: String,
}

#[derive(Serialize)]
struct Resolution<'a> {
    code: &'a str,
    description: &'a str,
    context: &'a str,
    generated: String,
    sku: String,
    unit_price: Option<rust_decimal::Decimal>,
}

pub fn run(args: SkuArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        SkuCommand::Resolve(resolve_args) => resolve(resolve_args, config_path),
        SkuCommand::Lookup(lookup_args) => lookup(lookup_args, config_path),
    }
}

fn resolve(args: ResolveArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = store::load_config(config_path)?;
    if let Some(rule_set) = &args.rule_set {
        config.sku.pdf_rule_set = rule_set.clone();
    }
    let snapshot = store::load_snapshot(config)?;
    let resolver = snapshot.resolver();

    let generated = resolver
        .engine()
        .generate(&args.code, &args.description, &args.context);
    let sku = resolver.resolve(&args.code, &args.description, &args.context);

    let resolution = Resolution {
        code: &args.code,
        description: &args.description,
        context: &args.context,
        unit_price: snapshot.catalog.price_for(&sku),
        generated,
        sku,
    };

    println!("{}", serde_json::to_string_pretty(&resolution)?);
    Ok(())
}

fn lookup(args: LookupArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = store::load_config(config_path)?;
    let snapshot = store::load_snapshot(config)?;

    let query = ManualQuery::new(args.category, args.product)
        .with_box_variant(args.box_variant)
        .with_door_variant(args.door_variant);

    let result = snapshot.lookup(&query);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
