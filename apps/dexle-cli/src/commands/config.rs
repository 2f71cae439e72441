use anyhow::Result;
use clap::{Args, Subcommand};
use dexle_engine::{load_effective_params, params_schema_json};
use std::path::PathBuf;

use super::print_json;

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Print the session-parameter JSON schema
    Schema(SchemaArgs),
    /// Print the effective session parameters (file + environment)
    Show(ShowArgs),
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Session parameters (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,
}

pub fn cmd_config(cmd: &ConfigCmd) -> Result<()> {
    match cmd {
        ConfigCmd::Schema(args) => print_json(&params_schema_json(), args.pretty),
        ConfigCmd::Show(args) => {
            let params = load_effective_params(args.config.as_deref())?;
            print_json(&serde_json::to_value(params)?, args.pretty);
        }
    }
    Ok(())
}
