//! Feedback vocabulary and the interpreter that turns one round of feedback
//! into constraint updates.
//!
//! Raw clues arrive in the game's wire vocabulary (`wrong`, `correct`,
//! `wrongpos`, `up`, `down`). They are checked against each slot's vocabulary
//! before any state is touched, so a malformed round never half-applies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::Entity;
use crate::constraints::{ConstraintState, Interval, TraitSlot};
use crate::error::{EngineError, EngineResult};

/// The five independently graded attributes, in feedback order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Generation,
    Trait1,
    Trait2,
    Height,
    Weight,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Generation,
        Slot::Trait1,
        Slot::Trait2,
        Slot::Height,
        Slot::Weight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Generation => "generation",
            Slot::Trait1 => "trait1",
            Slot::Trait2 => "trait2",
            Slot::Height => "height",
            Slot::Weight => "weight",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire-level clue as reported by the game for a single slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clue {
    Wrong,
    Correct,
    WrongPos,
    /// The target's value is above the guess.
    Up,
    /// The target's value is below the guess.
    Down,
}

impl Clue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Clue::Wrong => "wrong",
            Clue::Correct => "correct",
            Clue::WrongPos => "wrongpos",
            Clue::Up => "up",
            Clue::Down => "down",
        }
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Clue {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "wrong" | "w" | "x" => Ok(Clue::Wrong),
            "correct" | "c" | "ok" => Ok(Clue::Correct),
            "wrongpos" | "wrong_pos" | "wrong_slot" | "wrongslot" | "p" => Ok(Clue::WrongPos),
            "up" | "u" | "too_low" | "higher" => Ok(Clue::Up),
            "down" | "d" | "too_high" | "lower" => Ok(Clue::Down),
            _ => Err(raw.trim().to_string()),
        }
    }
}

/// Feedback for `generation`, `height` and `weight`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdinalFeedback {
    Correct,
    /// The true value is below the guess.
    TooHigh,
    /// The true value is above the guess.
    TooLow,
}

impl OrdinalFeedback {
    fn from_clue(slot: Slot, clue: Clue) -> EngineResult<Self> {
        match clue {
            Clue::Correct => Ok(OrdinalFeedback::Correct),
            Clue::Down => Ok(OrdinalFeedback::TooHigh),
            Clue::Up => Ok(OrdinalFeedback::TooLow),
            Clue::Wrong | Clue::WrongPos => Err(malformed(slot, clue.as_str())),
        }
    }

    fn clue(self) -> Clue {
        match self {
            OrdinalFeedback::Correct => Clue::Correct,
            OrdinalFeedback::TooHigh => Clue::Down,
            OrdinalFeedback::TooLow => Clue::Up,
        }
    }

    fn compare(target: f64, guess: f64) -> Self {
        if (target - guess).abs() <= MEASURE_EQ_EPSILON {
            OrdinalFeedback::Correct
        } else if target < guess {
            OrdinalFeedback::TooHigh
        } else {
            OrdinalFeedback::TooLow
        }
    }
}

/// Feedback for `trait1` and `trait2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalFeedback {
    Correct,
    /// The value occupies neither slot of the target.
    Wrong,
    /// The value belongs to the target's other slot.
    WrongSlot,
}

impl CategoricalFeedback {
    fn from_clue(slot: Slot, clue: Clue) -> EngineResult<Self> {
        match clue {
            Clue::Correct => Ok(CategoricalFeedback::Correct),
            Clue::Wrong => Ok(CategoricalFeedback::Wrong),
            Clue::WrongPos => Ok(CategoricalFeedback::WrongSlot),
            Clue::Up | Clue::Down => Err(malformed(slot, clue.as_str())),
        }
    }

    fn clue(self) -> Clue {
        match self {
            CategoricalFeedback::Correct => Clue::Correct,
            CategoricalFeedback::Wrong => Clue::Wrong,
            CategoricalFeedback::WrongSlot => Clue::WrongPos,
        }
    }
}

fn malformed(slot: Slot, clue: &str) -> EngineError {
    EngineError::MalformedFeedback {
        slot,
        clue: clue.to_string(),
    }
}

/// Two measurements closer than this are reported as equal by [`grade`].
const MEASURE_EQ_EPSILON: f64 = 1e-9;

/// One round of validated per-slot feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundFeedback {
    pub generation: OrdinalFeedback,
    pub trait1: CategoricalFeedback,
    pub trait2: CategoricalFeedback,
    pub height: OrdinalFeedback,
    pub weight: OrdinalFeedback,
}

impl RoundFeedback {
    pub fn solved() -> Self {
        Self {
            generation: OrdinalFeedback::Correct,
            trait1: CategoricalFeedback::Correct,
            trait2: CategoricalFeedback::Correct,
            height: OrdinalFeedback::Correct,
            weight: OrdinalFeedback::Correct,
        }
    }

    /// Check five raw clues (in [`Slot::ALL`] order) against each slot's vocabulary.
    pub fn from_clues(clues: [Clue; 5]) -> EngineResult<Self> {
        let [generation, trait1, trait2, height, weight] = clues;
        Ok(Self {
            generation: OrdinalFeedback::from_clue(Slot::Generation, generation)?,
            trait1: CategoricalFeedback::from_clue(Slot::Trait1, trait1)?,
            trait2: CategoricalFeedback::from_clue(Slot::Trait2, trait2)?,
            height: OrdinalFeedback::from_clue(Slot::Height, height)?,
            weight: OrdinalFeedback::from_clue(Slot::Weight, weight)?,
        })
    }

    /// Parse five clue words separated by whitespace or commas.
    pub fn parse(line: &str) -> EngineResult<Self> {
        let words: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|w| !w.is_empty())
            .collect();
        if words.len() != Slot::ALL.len() {
            return Err(EngineError::ClueCount {
                expected: Slot::ALL.len(),
                got: words.len(),
            });
        }
        let mut clues = [Clue::Wrong; 5];
        for ((clue, word), slot) in clues.iter_mut().zip(&words).zip(Slot::ALL) {
            *clue = word.parse().map_err(|raw: String| malformed(slot, &raw))?;
        }
        Self::from_clues(clues)
    }

    pub fn clues(&self) -> [Clue; 5] {
        [
            self.generation.clue(),
            self.trait1.clue(),
            self.trait2.clue(),
            self.height.clue(),
            self.weight.clue(),
        ]
    }

    pub fn is_solved(&self) -> bool {
        *self == Self::solved()
    }
}

impl fmt::Display for RoundFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = self.clues().iter().map(Clue::as_str).collect();
        f.write_str(&words.join(" "))
    }
}

/// The feedback the game returns for `guess` when the hidden target is `target`.
///
/// Absent measurements on either side grade as `Correct`.
pub fn grade(target: &Entity, guess: &Entity) -> RoundFeedback {
    let measure = |t: Option<f64>, g: Option<f64>| match (t, g) {
        (Some(t), Some(g)) => OrdinalFeedback::compare(t, g),
        _ => OrdinalFeedback::Correct,
    };
    let categorical = |slot: TraitSlot| {
        let value = slot.value_of(guess);
        if slot.value_of(target) == value {
            CategoricalFeedback::Correct
        } else if slot.other().value_of(target) == value {
            CategoricalFeedback::WrongSlot
        } else {
            CategoricalFeedback::Wrong
        }
    };
    RoundFeedback {
        generation: OrdinalFeedback::compare(
            f64::from(target.generation),
            f64::from(guess.generation),
        ),
        trait1: categorical(TraitSlot::First),
        trait2: categorical(TraitSlot::Second),
        height: measure(target.height, guess.height),
        weight: measure(target.weight, guess.weight),
    }
}

/// Applies validated feedback to the constraint state.
#[derive(Clone, Copy, Debug)]
pub struct Interpreter {
    /// Measurement resolution; excluded boundary values shift by this much.
    pub tolerance: f64,
    /// Whether a WRONG trait is also excluded from the opposite slot.
    pub cross_slot_exclusion: bool,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            cross_slot_exclusion: true,
        }
    }
}

impl Interpreter {
    pub fn new(tolerance: f64, cross_slot_exclusion: bool) -> Self {
        Self {
            tolerance,
            cross_slot_exclusion,
        }
    }

    /// Fold one round of feedback for `guess` into `state`.
    ///
    /// Infallible once feedback is validated; the guess is always marked as
    /// guessed afterwards.
    pub fn apply(&self, state: &mut ConstraintState, guess: &Entity, feedback: &RoundFeedback) {
        let generation = state.generation_range_mut();
        match feedback.generation {
            OrdinalFeedback::TooHigh => generation.narrow_high(guess.generation.saturating_sub(1)),
            OrdinalFeedback::TooLow => generation.narrow_low(guess.generation.saturating_add(1)),
            OrdinalFeedback::Correct => generation.pin(guess.generation),
        }

        self.apply_trait(state, TraitSlot::First, guess, feedback.trait1);
        self.apply_trait(state, TraitSlot::Second, guess, feedback.trait2);

        if let Some(height) = guess.height {
            self.apply_measure(state.height_range_mut(), height, feedback.height);
        }
        if let Some(weight) = guess.weight {
            self.apply_measure(state.weight_range_mut(), weight, feedback.weight);
        }

        state.mark_guessed(guess.id);
        tracing::debug!(
            guess = %guess.name,
            feedback = %feedback,
            state = %state,
            "applied feedback"
        );
    }

    fn apply_measure(&self, range: &mut Interval<f64>, value: f64, feedback: OrdinalFeedback) {
        match feedback {
            OrdinalFeedback::TooHigh => range.narrow_high(value - self.tolerance),
            OrdinalFeedback::TooLow => range.narrow_low(value + self.tolerance),
            OrdinalFeedback::Correct => range.pin(value),
        }
    }

    fn apply_trait(
        &self,
        state: &mut ConstraintState,
        slot: TraitSlot,
        guess: &Entity,
        feedback: CategoricalFeedback,
    ) {
        let value = slot.value_of(guess);
        match feedback {
            CategoricalFeedback::Wrong => {
                state.exclude(slot, value);
                if self.cross_slot_exclusion {
                    state.exclude(slot.other(), value);
                }
            }
            CategoricalFeedback::WrongSlot => {
                state.exclude(slot, value);
                state.exclude_all_but(slot.other(), value);
            }
            CategoricalFeedback::Correct => state.exclude_all_but(slot, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Trait;

    fn entity(id: u32, generation: u32, t1: Trait, t2: Trait, h: f64, w: f64) -> Entity {
        Entity::new(id, format!("e{id}"), generation, t1, t2, Some(h), Some(w))
    }

    #[test]
    fn clue_words_parse_case_insensitively() {
        assert_eq!("WRONGPOS".parse::<Clue>(), Ok(Clue::WrongPos));
        assert_eq!(" up ".parse::<Clue>(), Ok(Clue::Up));
        assert_eq!("too_high".parse::<Clue>(), Ok(Clue::Down));
        assert_eq!("maybe".parse::<Clue>(), Err("maybe".to_string()));
    }

    #[test]
    fn from_clues_rejects_out_of_vocabulary_slots() {
        let err = RoundFeedback::from_clues([
            Clue::Wrong,
            Clue::Correct,
            Clue::Correct,
            Clue::Correct,
            Clue::Correct,
        ])
        .expect_err("ordinal slot cannot be wrong");
        assert!(matches!(
            err,
            EngineError::MalformedFeedback { slot: Slot::Generation, .. }
        ));

        let err = RoundFeedback::from_clues([
            Clue::Correct,
            Clue::Correct,
            Clue::Up,
            Clue::Correct,
            Clue::Correct,
        ])
        .expect_err("categorical slot cannot be up");
        assert!(matches!(
            err,
            EngineError::MalformedFeedback { slot: Slot::Trait2, .. }
        ));
    }

    #[test]
    fn parse_reads_five_words() {
        let feedback = RoundFeedback::parse("up, wrongpos wrong down correct").expect("parse");
        assert_eq!(feedback.generation, OrdinalFeedback::TooLow);
        assert_eq!(feedback.trait1, CategoricalFeedback::WrongSlot);
        assert_eq!(feedback.trait2, CategoricalFeedback::Wrong);
        assert_eq!(feedback.height, OrdinalFeedback::TooHigh);
        assert_eq!(feedback.weight, OrdinalFeedback::Correct);
        assert_eq!(feedback.to_string(), "up wrongpos wrong down correct");

        let err = RoundFeedback::parse("up up").expect_err("too few clues");
        assert!(matches!(err, EngineError::ClueCount { expected: 5, got: 2 }));
        assert_eq!(err.to_string(), "malformed feedback: expected 5 clues, got 2");
        assert!(matches!(
            RoundFeedback::parse("c c c c c c"),
            Err(EngineError::ClueCount { got: 6, .. })
        ));
        assert!(matches!(
            RoundFeedback::parse("up correct purple correct correct"),
            Err(EngineError::MalformedFeedback { slot: Slot::Trait2, clue }) if clue == "purple"
        ));
    }

    #[test]
    fn grade_matches_game_rules() {
        let target = entity(1, 3, Trait::Water, Trait::Flying, 1.2, 40.0);
        let guess = entity(2, 5, Trait::Flying, Trait::Ice, 1.2, 12.5);
        let feedback = grade(&target, &guess);
        assert_eq!(feedback.generation, OrdinalFeedback::TooHigh);
        assert_eq!(feedback.trait1, CategoricalFeedback::WrongSlot);
        assert_eq!(feedback.trait2, CategoricalFeedback::Wrong);
        assert_eq!(feedback.height, OrdinalFeedback::Correct);
        assert_eq!(feedback.weight, OrdinalFeedback::TooLow);
        assert!(grade(&target, &target).is_solved());
    }

    #[test]
    fn ordinal_rules_narrow_bounds() {
        let guess = entity(7, 4, Trait::Bug, Trait::None, 1.0, 30.0);
        let mut state = ConstraintState::new((1, 8));
        let feedback = RoundFeedback {
            generation: OrdinalFeedback::TooHigh,
            trait1: CategoricalFeedback::Correct,
            trait2: CategoricalFeedback::Correct,
            height: OrdinalFeedback::TooLow,
            weight: OrdinalFeedback::Correct,
        };
        Interpreter::default().apply(&mut state, &guess, &feedback);
        assert_eq!(state.generation_range(), Interval::new(1, 3));
        assert!((state.height_range().low - 1.05).abs() < 1e-12);
        assert_eq!(state.weight_range(), Interval::new(30.0, 30.0));
        assert!(state.guessed().contains(&7));
    }

    #[test]
    fn wrong_trait_excludes_both_slots_unless_disabled() {
        let guess = entity(1, 1, Trait::Fire, Trait::Water, 0.5, 9.0);
        let feedback = RoundFeedback {
            trait1: CategoricalFeedback::Wrong,
            trait2: CategoricalFeedback::Wrong,
            ..RoundFeedback::solved()
        };

        let mut state = ConstraintState::new((1, 8));
        Interpreter::default().apply(&mut state, &guess, &feedback);
        for slot in [TraitSlot::First, TraitSlot::Second] {
            let excluded = state.excluded(slot);
            assert!(excluded.contains(&Trait::Fire));
            assert!(excluded.contains(&Trait::Water));
            assert_eq!(excluded.len(), 2);
        }

        let mut state = ConstraintState::new((1, 8));
        Interpreter::new(0.05, false).apply(&mut state, &guess, &feedback);
        let first: Vec<_> = state.excluded(TraitSlot::First).iter().copied().collect();
        let second: Vec<_> = state.excluded(TraitSlot::Second).iter().copied().collect();
        assert_eq!(first, vec![Trait::Fire]);
        assert_eq!(second, vec![Trait::Water]);
    }

    #[test]
    fn wrong_slot_pins_the_other_slot() {
        let guess = entity(1, 1, Trait::Grass, Trait::Poison, 0.5, 9.0);
        let feedback = RoundFeedback {
            trait1: CategoricalFeedback::Wrong,
            trait2: CategoricalFeedback::WrongSlot,
            ..RoundFeedback::solved()
        };
        let mut state = ConstraintState::new((1, 8));
        Interpreter::default().apply(&mut state, &guess, &feedback);
        let second = state.excluded(TraitSlot::Second);
        assert!(second.contains(&Trait::Poison));
        assert!(second.contains(&Trait::Grass));
        let first = state.excluded(TraitSlot::First);
        assert_eq!(first.len(), Trait::ALL.len() - 1);
        assert!(!first.contains(&Trait::Poison));
    }

    #[test]
    fn absent_guess_measurement_leaves_range_untouched() {
        let guess = Entity::new(3, "Blank", 2, Trait::Bug, Trait::None, None, None);
        let mut state = ConstraintState::new((1, 8));
        let feedback = RoundFeedback {
            height: OrdinalFeedback::TooHigh,
            ..RoundFeedback::solved()
        };
        Interpreter::default().apply(&mut state, &guess, &feedback);
        assert_eq!(state.height_range(), Interval::unbounded_measure());
    }
}
