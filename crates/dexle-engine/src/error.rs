use crate::constraints::ConstraintState;
use crate::feedback::Slot;

/// Errors surfaced by the guess-selection engine.
///
/// Running out of guesses is not an error; see [`crate::session::SessionOutcome`].
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// The candidate pool was empty when a pick was required.
    #[error("no candidates remain consistent with the feedback so far ({state})")]
    ExhaustedCandidates { state: Box<ConstraintState> },
    #[error("malformed feedback: {clue:?} is not a valid clue for the {slot} slot")]
    MalformedFeedback { slot: Slot, clue: String },
    #[error("malformed feedback: expected {expected} clues, got {got}")]
    ClueCount { expected: usize, got: usize },
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("invalid session parameters: {0}")]
    InvalidParams(String),
    #[error("guess sink failed: {0:#}")]
    Sink(anyhow::Error),
    #[error("feedback source failed: {0:#}")]
    Source(anyhow::Error),
}

impl EngineError {
    /// Constraint snapshot attached to an [`EngineError::ExhaustedCandidates`] failure.
    pub fn constraint_state(&self) -> Option<&ConstraintState> {
        match self {
            EngineError::ExhaustedCandidates { state } => Some(state),
            _ => None,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
