//! Guess-selection engine for attribute-feedback guessing games.
//!
//! Given a fixed catalog, the engine keeps the set of entities consistent with
//! every clue received so far, folds each round's per-slot feedback into a
//! constraint state, and proposes the candidate most typical of what remains.
//! Catalog retrieval, guess submission and clue scraping are supplied by the
//! caller through [`GuessSink`] and [`FeedbackSource`].

pub mod catalog;
mod config;
pub mod constraints;
mod error;
pub mod feedback;
pub mod picker;
pub mod pool;
pub mod scorer;
pub mod session;
pub mod stats;

pub use catalog::{Catalog, Entity, EntityId, Trait};
pub use config::{
    load_effective_params, load_params, params_schema_json, parse_bool_flag, parse_params,
    SessionParams, ENV_CROSS_SLOT_EXCLUSION, ENV_GUESS_BUDGET, ENV_TOLERANCE,
};
pub use constraints::{ConstraintState, Interval, TraitSlot};
pub use error::{EngineError, EngineResult};
pub use feedback::{
    grade, CategoricalFeedback, Clue, Interpreter, OrdinalFeedback, RoundFeedback, Slot,
};
pub use picker::{Pick, Picker};
pub use pool::{filter, CandidatePool};
pub use scorer::{score, ScoreBreakdown, ScoreWeights};
pub use session::{
    FeedbackSource, GuessSink, Oracle, Phase, Round, Session, SessionOutcome, SessionReport,
};
pub use stats::{summarize, PopulationStats};
