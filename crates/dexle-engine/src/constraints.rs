//! Constraint state accumulated from feedback.
//!
//! Every mutation here is monotone: interval bounds only move inward,
//! exclusion sets and the guessed set only grow. The candidate pool is derived
//! from this state on demand and never cached.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::catalog::{Catalog, Entity, EntityId, Trait};

/// Closed interval `[low, high]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Interval<T> {
    pub low: T,
    pub high: T,
}

impl<T: PartialOrd + Copy> Interval<T> {
    pub fn new(low: T, high: T) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.low && value <= self.high
    }

    /// Raise the low bound; a lower value is ignored.
    pub fn narrow_low(&mut self, value: T) {
        if value > self.low {
            self.low = value;
        }
    }

    /// Lower the high bound; a higher value is ignored.
    pub fn narrow_high(&mut self, value: T) {
        if value < self.high {
            self.high = value;
        }
    }

    /// Collapse onto a single value (intersected with the current bounds).
    pub fn pin(&mut self, value: T) {
        self.narrow_low(value);
        self.narrow_high(value);
    }

    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }

    /// True when `self` lies within `outer`.
    pub fn within(&self, outer: &Self) -> bool {
        self.low >= outer.low && self.high <= outer.high
    }
}

impl Interval<f64> {
    pub fn unbounded_measure() -> Self {
        Self::new(0.0, f64::INFINITY)
    }
}

/// One of the two categorical slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitSlot {
    First,
    Second,
}

impl TraitSlot {
    pub fn other(self) -> Self {
        match self {
            TraitSlot::First => TraitSlot::Second,
            TraitSlot::Second => TraitSlot::First,
        }
    }

    pub fn value_of(self, entity: &Entity) -> Trait {
        match self {
            TraitSlot::First => entity.trait1,
            TraitSlot::Second => entity.trait2,
        }
    }
}

/// Everything learned from feedback during one session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConstraintState {
    generation_range: Interval<u32>,
    trait1_excluded: BTreeSet<Trait>,
    trait2_excluded: BTreeSet<Trait>,
    height_range: Interval<f64>,
    weight_range: Interval<f64>,
    guessed: BTreeSet<EntityId>,
}

impl ConstraintState {
    /// Unconstrained state covering the given generation span.
    pub fn new(generation_span: (u32, u32)) -> Self {
        Self {
            generation_range: Interval::new(generation_span.0, generation_span.1),
            trait1_excluded: BTreeSet::new(),
            trait2_excluded: BTreeSet::new(),
            height_range: Interval::unbounded_measure(),
            weight_range: Interval::unbounded_measure(),
            guessed: BTreeSet::new(),
        }
    }

    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self::new(catalog.generation_span())
    }

    pub fn generation_range(&self) -> Interval<u32> {
        self.generation_range
    }

    pub fn height_range(&self) -> Interval<f64> {
        self.height_range
    }

    pub fn weight_range(&self) -> Interval<f64> {
        self.weight_range
    }

    pub fn excluded(&self, slot: TraitSlot) -> &BTreeSet<Trait> {
        match slot {
            TraitSlot::First => &self.trait1_excluded,
            TraitSlot::Second => &self.trait2_excluded,
        }
    }

    pub fn guessed(&self) -> &BTreeSet<EntityId> {
        &self.guessed
    }

    pub(crate) fn generation_range_mut(&mut self) -> &mut Interval<u32> {
        &mut self.generation_range
    }

    pub(crate) fn height_range_mut(&mut self) -> &mut Interval<f64> {
        &mut self.height_range
    }

    pub(crate) fn weight_range_mut(&mut self) -> &mut Interval<f64> {
        &mut self.weight_range
    }

    pub(crate) fn exclude(&mut self, slot: TraitSlot, value: Trait) {
        self.excluded_mut(slot).insert(value);
    }

    /// Exclude every trait except `value` from `slot`.
    ///
    /// Earlier exclusions are kept, so a contradictory round can empty the
    /// slot but never widen it.
    pub(crate) fn exclude_all_but(&mut self, slot: TraitSlot, value: Trait) {
        let set = self.excluded_mut(slot);
        set.extend(Trait::ALL.iter().copied().filter(|t| *t != value));
    }

    pub(crate) fn mark_guessed(&mut self, id: EntityId) {
        self.guessed.insert(id);
    }

    fn excluded_mut(&mut self, slot: TraitSlot) -> &mut BTreeSet<Trait> {
        match slot {
            TraitSlot::First => &mut self.trait1_excluded,
            TraitSlot::Second => &mut self.trait2_excluded,
        }
    }

    /// Whether `entity` is consistent with every constraint and not yet guessed.
    pub fn admits(&self, entity: &Entity) -> bool {
        !self.guessed.contains(&entity.id)
            && self.generation_range.contains(entity.generation)
            && !self.trait1_excluded.contains(&entity.trait1)
            && !self.trait2_excluded.contains(&entity.trait2)
            && entity.height.is_none_or(|h| self.height_range.contains(h))
            && entity.weight.is_none_or(|w| self.weight_range.contains(w))
    }

    /// True when `self` is at least as narrow as `earlier` on every constraint.
    pub fn refines(&self, earlier: &ConstraintState) -> bool {
        self.generation_range.within(&earlier.generation_range)
            && self.height_range.within(&earlier.height_range)
            && self.weight_range.within(&earlier.weight_range)
            && self.trait1_excluded.is_superset(&earlier.trait1_excluded)
            && self.trait2_excluded.is_superset(&earlier.trait2_excluded)
            && self.guessed.is_superset(&earlier.guessed)
    }
}

fn join_traits(set: &BTreeSet<Trait>) -> String {
    if set.is_empty() {
        return "-".into();
    }
    set.iter().map(Trait::as_str).collect::<Vec<_>>().join(",")
}

impl fmt::Display for ConstraintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation=[{}, {}] height=[{}, {}] weight=[{}, {}] trait1_excluded={} trait2_excluded={} guessed={:?}",
            self.generation_range.low,
            self.generation_range.high,
            self.height_range.low,
            self.height_range.high,
            self.weight_range.low,
            self.weight_range.high,
            join_traits(&self.trait1_excluded),
            join_traits(&self.trait2_excluded),
            self.guessed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_narrowing_is_monotone() {
        let mut range = Interval::new(1u32, 9);
        range.narrow_low(4);
        range.narrow_low(2);
        assert_eq!(range, Interval::new(4, 9));
        range.narrow_high(7);
        range.narrow_high(8);
        assert_eq!(range, Interval::new(4, 7));
        range.pin(5);
        assert_eq!(range, Interval::new(5, 5));
        assert!(range.contains(5));
        assert!(!range.contains(6));
    }

    #[test]
    fn pin_outside_bounds_empties_interval() {
        let mut range = Interval::new(2.0, 3.0);
        range.pin(5.0);
        assert!(range.is_empty());
    }

    #[test]
    fn exclude_all_but_keeps_prior_exclusions() {
        let mut state = ConstraintState::new((1, 8));
        state.exclude(TraitSlot::First, Trait::Fire);
        state.exclude_all_but(TraitSlot::First, Trait::Fire);
        assert_eq!(state.excluded(TraitSlot::First).len(), Trait::ALL.len());

        let mut state = ConstraintState::new((1, 8));
        state.exclude_all_but(TraitSlot::Second, Trait::Water);
        assert_eq!(state.excluded(TraitSlot::Second).len(), Trait::ALL.len() - 1);
        assert!(!state.excluded(TraitSlot::Second).contains(&Trait::Water));
    }

    #[test]
    fn admits_ignores_absent_measurements() {
        let mut state = ConstraintState::new((1, 8));
        state.height_range_mut().narrow_high(1.0);
        let missing = Entity::new(1, "Blank", 2, Trait::Bug, Trait::None, None, None);
        let tall = Entity::new(2, "Tall", 2, Trait::Bug, Trait::None, Some(2.0), None);
        assert!(state.admits(&missing));
        assert!(!state.admits(&tall));
        state.mark_guessed(1);
        assert!(!state.admits(&missing));
    }

    #[test]
    fn refines_detects_widening() {
        let base = ConstraintState::new((1, 8));
        let mut next = base.clone();
        next.generation_range_mut().narrow_low(3);
        next.exclude(TraitSlot::Second, Trait::Ice);
        assert!(next.refines(&base));
        assert!(!base.refines(&next));
    }

    #[test]
    fn display_lists_exclusions() {
        let mut state = ConstraintState::new((1, 8));
        state.exclude(TraitSlot::First, Trait::Fire);
        state.mark_guessed(4);
        let text = state.to_string();
        assert!(text.contains("trait1_excluded=Fire"));
        assert!(text.contains("trait2_excluded=-"));
        assert!(text.contains("guessed={4}"));
    }
}
