//! Population statistics over the live candidate pool.

use serde::Serialize;

use crate::catalog::Trait;
use crate::constraints::TraitSlot;
use crate::pool::CandidatePool;

/// Medians and trait frequencies of one candidate pool.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PopulationStats {
    pub size: usize,
    pub median_generation: f64,
    /// `None` when no pool member has a height.
    pub median_height: Option<f64>,
    pub median_weight: Option<f64>,
    /// Largest squared distance of any pool height from the median.
    pub height_spread: f64,
    pub weight_spread: f64,
    trait1_counts: [usize; Trait::ALL.len()],
    trait2_counts: [usize; Trait::ALL.len()],
}

impl PopulationStats {
    /// Number of pool members holding `value` in `slot`.
    pub fn trait_count(&self, slot: TraitSlot, value: Trait) -> usize {
        let counts = match slot {
            TraitSlot::First => &self.trait1_counts,
            TraitSlot::Second => &self.trait2_counts,
        };
        counts[value.code() as usize]
    }
}

/// Summarize a non-empty pool. Returns `None` for an empty pool.
pub fn summarize(pool: &CandidatePool<'_>) -> Option<PopulationStats> {
    if pool.is_empty() {
        return None;
    }
    let mut trait1_counts = [0usize; Trait::ALL.len()];
    let mut trait2_counts = [0usize; Trait::ALL.len()];
    let mut generations = Vec::with_capacity(pool.len());
    let mut heights = Vec::with_capacity(pool.len());
    let mut weights = Vec::with_capacity(pool.len());
    for entity in pool.iter() {
        trait1_counts[entity.trait1.code() as usize] += 1;
        trait2_counts[entity.trait2.code() as usize] += 1;
        generations.push(f64::from(entity.generation));
        heights.extend(entity.height);
        weights.extend(entity.weight);
    }
    let median_height = median(&mut heights);
    let median_weight = median(&mut weights);
    Some(PopulationStats {
        size: pool.len(),
        median_generation: median(&mut generations)?,
        median_height,
        median_weight,
        height_spread: spread(&heights, median_height),
        weight_spread: spread(&weights, median_weight),
        trait1_counts,
        trait2_counts,
    })
}

/// Ordinal median: middle value, or the mean of the two middle values.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

fn spread(values: &[f64], centre: Option<f64>) -> f64 {
    let Some(centre) = centre else {
        return 0.0;
    };
    values
        .iter()
        .map(|v| (v - centre).powi(2))
        .fold(0.0, f64::max)
}
