use anyhow::{Context, Result};
use clap::Args;
use dexle_engine::{Oracle, Session};
use serde_json::json;

use super::{print_json, SessionArgs};

#[derive(Args, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Name of the hidden target
    #[arg(long)]
    pub target: String,
    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,
}

pub fn cmd_simulate(args: &SimulateArgs) -> Result<()> {
    let (catalog, params) = args.session.load()?;
    let target = catalog
        .find_by_name(&args.target)
        .with_context(|| format!("{:?} is not in the catalog", args.target))?;
    let mut session = Session::new(&catalog, params)?;
    let mut guesses: Vec<String> = Vec::new();
    let report = session.run(&mut guesses, &mut Oracle::new(target))?;
    print_json(
        &json!({
            "target": target.name,
            "guesses": guesses,
            "report": report,
        }),
        args.pretty,
    );
    Ok(())
}
