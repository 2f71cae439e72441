//! Candidate pool: the catalog filtered through the current constraint state.

use crate::catalog::{Catalog, Entity, EntityId};
use crate::constraints::ConstraintState;

/// Entities still consistent with all feedback, in catalog order.
///
/// Borrowed from the catalog and rebuilt after every state change.
#[derive(Clone, Debug)]
pub struct CandidatePool<'c> {
    members: Vec<&'c Entity>,
}

impl<'c> CandidatePool<'c> {
    pub fn members(&self) -> &[&'c Entity] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &'c Entity> + '_ {
        self.members.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.iter().any(|e| e.id == id)
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.members.iter().map(|e| e.id).collect()
    }
}

/// Select every catalog entity admitted by `state`.
pub fn filter<'c>(catalog: &'c Catalog, state: &ConstraintState) -> CandidatePool<'c> {
    CandidatePool {
        members: catalog
            .entities()
            .iter()
            .filter(|e| state.admits(e))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Trait;
    use crate::constraints::TraitSlot;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Entity::new(1, "Alpha", 1, Trait::Fire, Trait::None, Some(0.5), Some(9.0)),
            Entity::new(2, "Beta", 1, Trait::Water, Trait::None, Some(0.3), Some(9.0)),
            Entity::new(3, "Gamma", 2, Trait::Fire, Trait::Flying, Some(1.7), Some(90.5)),
            Entity::new(4, "Delta", 3, Trait::Grass, Trait::Poison, None, None),
        ])
        .expect("catalog")
    }

    #[test]
    fn unconstrained_state_admits_everything() {
        let catalog = catalog();
        let state = ConstraintState::for_catalog(&catalog);
        let pool = filter(&catalog, &state);
        assert_eq!(pool.ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn filter_applies_every_predicate() {
        let catalog = catalog();
        let mut state = ConstraintState::for_catalog(&catalog);
        state.exclude(TraitSlot::First, Trait::Water);
        state.generation_range_mut().narrow_high(2);
        state.weight_range_mut().narrow_high(50.0);
        let pool = filter(&catalog, &state);
        assert_eq!(pool.ids(), vec![1]);

        state.mark_guessed(1);
        let pool = filter(&catalog, &state);
        assert!(pool.is_empty());
    }

    #[test]
    fn absent_measurements_stay_in_pool() {
        let catalog = catalog();
        let mut state = ConstraintState::for_catalog(&catalog);
        state.height_range_mut().narrow_low(10.0);
        let pool = filter(&catalog, &state);
        assert_eq!(pool.ids(), vec![4]);
        assert!(pool.contains(4));
        assert!(!pool.contains(3));
    }
}
