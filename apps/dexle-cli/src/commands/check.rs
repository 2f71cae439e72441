use anyhow::Result;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use super::print_json;
use crate::catalog_io::load_catalog;

#[derive(Args, Clone)]
pub struct CheckArgs {
    /// Catalog file (CSV, or JSON when the extension is .json)
    #[arg(long)]
    pub catalog: PathBuf,
    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,
}

pub fn cmd_check(args: &CheckArgs) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let (low, high) = catalog.generation_span();
    let repeated: Vec<_> = catalog
        .repeated_trait_entities()
        .iter()
        .map(|e| e.name.clone())
        .collect();
    let missing_measurements = catalog
        .entities()
        .iter()
        .filter(|e| e.height.is_none() || e.weight.is_none())
        .count();
    print_json(
        &json!({
            "entities": catalog.len(),
            "generation_span": [low, high],
            "missing_measurements": missing_measurements,
            "repeated_traits": repeated,
            "cross_slot_exclusion_safe": repeated.is_empty(),
        }),
        args.pretty,
    );
    Ok(())
}
