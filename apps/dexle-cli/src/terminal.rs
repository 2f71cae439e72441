//! Terminal stand-ins for the game: guesses go to stdout, clues come from stdin.

use anyhow::{anyhow, Result};
use dexle_engine::{Clue, Entity, FeedbackSource, GuessSink, RoundFeedback};
use std::io::{BufRead, Write};

pub struct TerminalSink<W> {
    out: W,
    count: u32,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, count: 0 }
    }
}

impl<W: Write> GuessSink for TerminalSink<W> {
    fn submit(&mut self, guess: &Entity) -> Result<()> {
        self.count += 1;
        writeln!(
            self.out,
            "Guess #{}: {} (gen {}, {}/{}, {} m, {} kg)",
            self.count,
            guess.name,
            guess.generation,
            guess.trait1,
            guess.trait2,
            fmt_measure(guess.height),
            fmt_measure(guess.weight),
        )?;
        self.out.flush()?;
        Ok(())
    }
}

fn fmt_measure(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "?".into())
}

/// Reads one line of five clue words per round, re-prompting on bad input.
pub struct TerminalSource<R, W> {
    input: R,
    prompt: W,
}

impl<R: BufRead, W: Write> TerminalSource<R, W> {
    pub fn new(input: R, prompt: W) -> Self {
        Self { input, prompt }
    }
}

impl<R: BufRead, W: Write> FeedbackSource for TerminalSource<R, W> {
    fn feedback(&mut self, guess: &Entity) -> Result<[Clue; 5]> {
        loop {
            write!(
                self.prompt,
                "clues for {} (generation trait1 trait2 height weight)> ",
                guess.name
            )?;
            self.prompt.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(anyhow!("input closed before clues for {}", guess.name));
            }
            match RoundFeedback::parse(&line) {
                Ok(feedback) => return Ok(feedback.clues()),
                Err(err) => {
                    tracing::warn!(%err, "rejected clue line");
                    writeln!(
                        self.prompt,
                        "{err}; use correct/wrong/wrongpos/up/down (or c/w/p/u/d)"
                    )?;
                }
            }
        }
    }
}
