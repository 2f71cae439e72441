use anyhow::Result;
use clap::Args;
use dexle_engine::{Catalog, Oracle, Session, SessionOutcome, SessionParams};
use serde::Serialize;
use std::collections::BTreeMap;

use super::{print_json, SessionArgs};

#[derive(Args, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub session: SessionArgs,
    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Aggregate results of playing every catalog entity as the target.
#[derive(Debug, Default, Serialize)]
pub struct Evaluation {
    pub targets: usize,
    pub solved: usize,
    pub exhausted: usize,
    pub stuck: usize,
    /// All-correct rounds on an entity other than the target.
    pub misidentified: usize,
    pub mean_guesses: f64,
    pub max_guesses: u32,
    /// Guesses needed -> number of solved targets.
    pub histogram: BTreeMap<u32, usize>,
    pub failures: Vec<String>,
}

pub fn evaluate(catalog: &Catalog, params: SessionParams) -> Result<Evaluation> {
    let mut eval = Evaluation {
        targets: catalog.len(),
        ..Evaluation::default()
    };
    let mut total_guesses = 0u64;
    for target in catalog.entities() {
        let mut session = Session::new(catalog, params)?;
        let mut guesses: Vec<String> = Vec::new();
        let report = session.run(&mut guesses, &mut Oracle::new(target))?;
        match report.outcome {
            SessionOutcome::Solved { id, .. } if id == target.id => {
                eval.solved += 1;
                total_guesses += u64::from(report.guesses);
                eval.max_guesses = eval.max_guesses.max(report.guesses);
                *eval.histogram.entry(report.guesses).or_default() += 1;
            }
            SessionOutcome::Solved { .. } => {
                eval.misidentified += 1;
                eval.failures.push(target.name.clone());
            }
            SessionOutcome::Exhausted => {
                eval.exhausted += 1;
                eval.failures.push(target.name.clone());
            }
            SessionOutcome::Stuck => {
                tracing::warn!(entity = %target.name, state = %report.state, "stuck on faithful feedback");
                eval.stuck += 1;
                eval.failures.push(target.name.clone());
            }
        }
    }
    if eval.solved > 0 {
        eval.mean_guesses = total_guesses as f64 / eval.solved as f64;
    }
    Ok(eval)
}

pub fn cmd_evaluate(args: &EvaluateArgs) -> Result<()> {
    let (catalog, params) = args.session.load()?;
    let eval = evaluate(&catalog, params)?;
    print_json(&serde_json::to_value(&eval)?, args.pretty);
    Ok(())
}
