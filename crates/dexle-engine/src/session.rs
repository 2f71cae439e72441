//! Session loop: one guess outstanding at a time until the target is found,
//! the guess budget runs out, or no candidate is left.
//!
//! ```text
//! AwaitingFirstGuess -> Guessing -> AwaitingFeedback -> Updating
//!                          ^                               |
//!                          +-------------------------------+--> Solved | Exhausted | Stuck
//! ```

use anyhow::Result;
use serde::Serialize;

use crate::catalog::{Catalog, Entity, EntityId};
use crate::config::SessionParams;
use crate::constraints::ConstraintState;
use crate::error::{EngineError, EngineResult};
use crate::feedback::{grade, Clue, Interpreter, RoundFeedback};
use crate::picker::{Pick, Picker};
use crate::pool::{filter, CandidatePool};

/// Receives each guess, e.g. by typing the display name into the game.
pub trait GuessSink {
    fn submit(&mut self, guess: &Entity) -> Result<()>;
}

/// Returns the five raw clues the game reported for the submitted guess.
pub trait FeedbackSource {
    fn feedback(&mut self, guess: &Entity) -> Result<[Clue; 5]>;
}

/// Records submitted display names.
impl GuessSink for Vec<String> {
    fn submit(&mut self, guess: &Entity) -> Result<()> {
        self.push(guess.name.clone());
        Ok(())
    }
}

impl<F> FeedbackSource for F
where
    F: FnMut(&Entity) -> Result<[Clue; 5]>,
{
    fn feedback(&mut self, guess: &Entity) -> Result<[Clue; 5]> {
        self(guess)
    }
}

/// Grades guesses against a known target; drives simulations.
#[derive(Clone, Copy, Debug)]
pub struct Oracle<'c> {
    target: &'c Entity,
}

impl<'c> Oracle<'c> {
    pub fn new(target: &'c Entity) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &'c Entity {
        self.target
    }
}

impl FeedbackSource for Oracle<'_> {
    fn feedback(&mut self, guess: &Entity) -> Result<[Clue; 5]> {
        Ok(grade(self.target, guess).clues())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingFirstGuess,
    Guessing,
    AwaitingFeedback,
    Updating,
    Solved,
    Exhausted,
    Stuck,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Solved | Phase::Exhausted | Phase::Stuck)
    }
}

enum Stage<'c> {
    AwaitingFirstGuess,
    Guessing(Pick<'c>),
    AwaitingFeedback(Pick<'c>),
    Updating(Pick<'c>, RoundFeedback),
    Solved(&'c Entity),
    Exhausted,
    Stuck,
}

impl Stage<'_> {
    fn phase(&self) -> Phase {
        match self {
            Stage::AwaitingFirstGuess => Phase::AwaitingFirstGuess,
            Stage::Guessing(_) => Phase::Guessing,
            Stage::AwaitingFeedback(_) => Phase::AwaitingFeedback,
            Stage::Updating(..) => Phase::Updating,
            Stage::Solved(_) => Phase::Solved,
            Stage::Exhausted => Phase::Exhausted,
            Stage::Stuck => Phase::Stuck,
        }
    }
}

/// One completed guess/feedback exchange.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Round {
    pub number: u32,
    pub guess: EntityId,
    pub name: String,
    pub cost: f64,
    pub pool_before: usize,
    pub feedback: RoundFeedback,
    pub pool_after: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionOutcome {
    Solved { id: EntityId, name: String },
    /// Guess budget spent without a fully correct round.
    Exhausted,
    /// No candidate left; the constraint state in the report explains why.
    Stuck,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub guesses: u32,
    pub rounds: Vec<Round>,
    pub state: ConstraintState,
}

pub struct Session<'c> {
    catalog: &'c Catalog,
    params: SessionParams,
    picker: Picker,
    interpreter: Interpreter,
    state: ConstraintState,
    stage: Stage<'c>,
    guesses: u32,
    rounds: Vec<Round>,
}

impl<'c> Session<'c> {
    pub fn new(catalog: &'c Catalog, params: SessionParams) -> EngineResult<Self> {
        params.validate()?;
        Ok(Self {
            catalog,
            params,
            picker: Picker::new(params.weights),
            interpreter: params.interpreter(),
            state: ConstraintState::for_catalog(catalog),
            stage: Stage::AwaitingFirstGuess,
            guesses: 0,
            rounds: Vec::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.stage.phase()
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn state(&self) -> &ConstraintState {
        &self.state
    }

    pub fn guesses(&self) -> u32 {
        self.guesses
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Fresh candidate pool for the current state.
    pub fn pool(&self) -> CandidatePool<'c> {
        filter(self.catalog, &self.state)
    }

    /// The pick waiting to be submitted or graded, if any.
    pub fn current_pick(&self) -> Option<&Pick<'c>> {
        match &self.stage {
            Stage::Guessing(pick) | Stage::AwaitingFeedback(pick) | Stage::Updating(pick, _) => {
                Some(pick)
            }
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        match &self.stage {
            Stage::Solved(entity) => Some(SessionOutcome::Solved {
                id: entity.id,
                name: entity.name.clone(),
            }),
            Stage::Exhausted => Some(SessionOutcome::Exhausted),
            Stage::Stuck => Some(SessionOutcome::Stuck),
            _ => None,
        }
    }

    /// Advance by one transition and return the new phase.
    ///
    /// Sink, source and malformed-feedback failures leave both the phase and
    /// the constraint state as they were, so the call can be retried.
    pub fn step(
        &mut self,
        sink: &mut dyn GuessSink,
        source: &mut dyn FeedbackSource,
    ) -> EngineResult<Phase> {
        match &self.stage {
            Stage::AwaitingFirstGuess => self.select_next()?,
            Stage::Guessing(pick) => {
                sink.submit(pick.entity).map_err(EngineError::Sink)?;
                self.guesses += 1;
                let pick = pick.clone();
                tracing::debug!(guess = %pick.entity.name, number = self.guesses, "submitted guess");
                self.stage = Stage::AwaitingFeedback(pick);
            }
            Stage::AwaitingFeedback(pick) => {
                let clues = source.feedback(pick.entity).map_err(EngineError::Source)?;
                let feedback = RoundFeedback::from_clues(clues)?;
                self.stage = Stage::Updating(pick.clone(), feedback);
            }
            Stage::Updating(..) => self.update()?,
            Stage::Solved(_) | Stage::Exhausted | Stage::Stuck => {}
        }
        Ok(self.phase())
    }

    /// Run rounds until a terminal phase is reached.
    pub fn run(
        &mut self,
        sink: &mut dyn GuessSink,
        source: &mut dyn FeedbackSource,
    ) -> EngineResult<SessionReport> {
        loop {
            if let Some(report) = self.report() {
                return Ok(report);
            }
            self.step(sink, source)?;
        }
    }

    /// Final report, or `None` while the session is still running.
    pub fn report(&self) -> Option<SessionReport> {
        Some(SessionReport {
            outcome: self.outcome()?,
            guesses: self.guesses,
            rounds: self.rounds.clone(),
            state: self.state.clone(),
        })
    }

    fn update(&mut self) -> EngineResult<()> {
        let Stage::Updating(pick, feedback) = std::mem::replace(&mut self.stage, Stage::Stuck)
        else {
            return Ok(());
        };
        self.interpreter.apply(&mut self.state, pick.entity, &feedback);
        let pool_after = self.pool().len();
        self.rounds.push(Round {
            number: self.guesses,
            guess: pick.entity.id,
            name: pick.entity.name.clone(),
            cost: pick.cost,
            pool_before: pick.stats.size,
            feedback,
            pool_after,
        });

        if feedback.is_solved() {
            tracing::info!(answer = %pick.entity.name, guesses = self.guesses, "solved");
            self.stage = Stage::Solved(pick.entity);
        } else if self.guesses >= self.params.guess_budget {
            tracing::info!(guesses = self.guesses, remaining = pool_after, "guess budget exhausted");
            self.stage = Stage::Exhausted;
        } else {
            self.select_next()?;
        }
        Ok(())
    }

    fn select_next(&mut self) -> EngineResult<()> {
        let pool = self.pool();
        match self.picker.pick(&pool, &self.state) {
            Ok(pick) => {
                self.stage = Stage::Guessing(pick);
                Ok(())
            }
            Err(err @ EngineError::ExhaustedCandidates { .. }) => {
                tracing::warn!(%err, "no candidates left");
                self.stage = Stage::Stuck;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
