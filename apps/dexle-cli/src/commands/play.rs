use anyhow::Result;
use clap::Args;
use dexle_engine::{Session, SessionOutcome};
use std::io;

use super::SessionArgs;
use crate::terminal::{TerminalSink, TerminalSource};

#[derive(Args, Clone)]
pub struct PlayArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

pub fn cmd_play(args: &PlayArgs) -> Result<()> {
    let (catalog, params) = args.session.load()?;
    println!(
        "{} candidates, {} guesses. Enter clues as: generation trait1 trait2 height weight",
        catalog.len(),
        params.guess_budget
    );
    let mut session = Session::new(&catalog, params)?;
    let mut sink = TerminalSink::new(io::stdout());
    let mut source = TerminalSource::new(io::stdin().lock(), io::stdout());
    let report = session.run(&mut sink, &mut source)?;
    match &report.outcome {
        SessionOutcome::Solved { name, .. } => {
            println!("Solved: {} in {} guesses", name, report.guesses)
        }
        SessionOutcome::Exhausted => {
            let remaining: Vec<_> = session.pool().iter().map(|e| e.name.as_str()).collect();
            println!(
                "Out of guesses after {}; still possible: {}",
                report.guesses,
                remaining.join(", ")
            );
        }
        SessionOutcome::Stuck => {
            println!("Stuck: no candidate fits the clues ({})", report.state);
        }
    }
    Ok(())
}
