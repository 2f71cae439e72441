//! Candidate cost: distance from the pool's centre plus trait unpopularity.
//!
//! ```text
//! cost = W_gen    * (median_gen    - gen)^2
//!      +            (N - count1[trait1])^2 / N
//!      +            (N - count2[trait2])^2 / N
//!      + W_height * (median_height - height)^2
//!      + W_weight * (median_weight - weight)^2
//! ```
//!
//! Lower is better. A candidate typical of the remaining pool splits it most
//! evenly whichever clue comes back.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::Entity;
use crate::constraints::TraitSlot;
use crate::stats::PopulationStats;

/// Weights of the three ordinal terms. The trait terms are unweighted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreWeights {
    #[serde(default = "default_generation_weight")]
    pub generation: f64,
    #[serde(default = "default_height_weight")]
    pub height: f64,
    #[serde(default = "default_weight_weight")]
    pub weight: f64,
}

fn default_generation_weight() -> f64 {
    500.0
}

fn default_height_weight() -> f64 {
    100.0
}

fn default_weight_weight() -> f64 {
    10.0
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            generation: default_generation_weight(),
            height: default_height_weight(),
            weight: default_weight_weight(),
        }
    }
}

/// Per-term contributions to a candidate's cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub generation: f64,
    pub trait1: f64,
    pub trait2: f64,
    pub height: f64,
    pub weight: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.generation + self.trait1 + self.trait2 + self.height + self.weight
    }
}

/// Score `candidate` against the statistics of its (non-empty) pool.
pub fn score(candidate: &Entity, stats: &PopulationStats, weights: &ScoreWeights) -> f64 {
    breakdown(candidate, stats, weights).total()
}

pub fn breakdown(
    candidate: &Entity,
    stats: &PopulationStats,
    weights: &ScoreWeights,
) -> ScoreBreakdown {
    let n = stats.size as f64;
    let popularity = |slot: TraitSlot| {
        let held = stats.trait_count(slot, slot.value_of(candidate)) as f64;
        (n - held).powi(2) / n
    };
    ScoreBreakdown {
        generation: weights.generation
            * (stats.median_generation - f64::from(candidate.generation)).powi(2),
        trait1: popularity(TraitSlot::First),
        trait2: popularity(TraitSlot::Second),
        height: weights.height
            * squared_gap(stats.median_height, candidate.height, stats.height_spread),
        weight: weights.weight
            * squared_gap(stats.median_weight, candidate.weight, stats.weight_spread),
    }
}

// A candidate without the measurement learns nothing from its clue, so it
// pays the pool's worst gap.
fn squared_gap(median: Option<f64>, value: Option<f64>, spread: f64) -> f64 {
    match (median, value) {
        (Some(m), Some(v)) => (m - v).powi(2),
        (Some(_), None) => spread,
        (None, _) => 0.0,
    }
}
