pub mod check;
pub mod config;
pub mod evaluate;
pub mod play;
pub mod simulate;

use anyhow::Result;
use clap::Args;
use dexle_engine::{load_effective_params, Catalog, SessionParams};
use std::path::PathBuf;

use crate::catalog_io::load_catalog;

#[derive(Args, Clone)]
pub struct SessionArgs {
    /// Catalog file (CSV, or JSON when the extension is .json)
    #[arg(long)]
    pub catalog: PathBuf,
    /// Session parameters (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the guess budget
    #[arg(long)]
    pub budget: Option<u32>,
}

impl SessionArgs {
    /// Load the catalog and the effective parameters for it.
    ///
    /// Cross-slot exclusion is switched off when the catalog repeats a trait
    /// across both slots of one entity.
    pub fn load(&self) -> Result<(Catalog, SessionParams)> {
        let catalog = load_catalog(&self.catalog)?;
        let mut params = load_effective_params(self.config.as_deref())?;
        if let Some(budget) = self.budget {
            params.guess_budget = budget;
        }
        params.validate()?;
        if params.cross_slot_exclusion && !catalog.allows_cross_slot_exclusion() {
            let repeated: Vec<_> = catalog
                .repeated_trait_entities()
                .iter()
                .map(|e| e.name.clone())
                .collect();
            tracing::warn!(
                ?repeated,
                "catalog repeats traits across slots; disabling cross-slot exclusion"
            );
            params.cross_slot_exclusion = false;
        }
        Ok((catalog, params))
    }
}

pub fn print_json(value: &serde_json::Value, pretty: bool) {
    if pretty {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        );
    } else {
        println!("{}", value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "id,name,generation,type1,type2,height,weight\n";

    fn args_for(rows: &str) -> (tempfile::TempDir, SessionArgs) {
        let dir = tempdir().expect("tmpdir");
        let path = dir.path().join("dex.csv");
        fs::write(&path, format!("{HEADER}{rows}")).expect("write");
        let args = SessionArgs {
            catalog: path,
            config: None,
            budget: None,
        };
        (dir, args)
    }

    #[test]
    fn repeated_traits_disable_cross_slot_exclusion() {
        let (_dir, args) = args_for("1,Plain,1,Ice,,1.0,2.0\n2,Twin,2,Ice,Ice,1.5,3.0\n");
        let (catalog, params) = args.load().expect("load");
        assert_eq!(catalog.len(), 2);
        assert!(!params.cross_slot_exclusion);
    }

    #[test]
    fn distinct_traits_keep_cross_slot_exclusion() {
        let (_dir, args) = args_for("1,Plain,1,Ice,,1.0,2.0\n2,Mixed,2,Ice,Rock,1.5,3.0\n");
        let (_, params) = args.load().expect("load");
        assert!(params.cross_slot_exclusion);
    }

    #[test]
    fn budget_flag_overrides_and_is_validated() {
        let (_dir, mut args) = args_for("1,Plain,1,Ice,,1.0,2.0\n");
        args.budget = Some(3);
        assert_eq!(args.load().expect("load").1.guess_budget, 3);
        args.budget = Some(0);
        assert!(args.load().is_err());
    }
}
