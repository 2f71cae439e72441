use serde::Serialize;

use crate::catalog::Entity;
use crate::constraints::ConstraintState;
use crate::error::{EngineError, EngineResult};
use crate::pool::CandidatePool;
use crate::scorer::{score, ScoreWeights};
use crate::stats::{summarize, PopulationStats};

/// The chosen guess together with the statistics it was scored against.
#[derive(Clone, Debug, Serialize)]
pub struct Pick<'c> {
    pub entity: &'c Entity,
    pub cost: f64,
    pub stats: PopulationStats,
}

/// Picks the minimum-cost pool member.
#[derive(Clone, Copy, Debug, Default)]
pub struct Picker {
    weights: ScoreWeights,
}

impl Picker {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Score every member of `pool` and return the cheapest.
    ///
    /// Ties go to the earlier catalog entry (lowest identifier). An empty pool
    /// fails with [`EngineError::ExhaustedCandidates`] carrying `state`.
    pub fn pick<'c>(
        &self,
        pool: &CandidatePool<'c>,
        state: &ConstraintState,
    ) -> EngineResult<Pick<'c>> {
        let mut members = pool.iter();
        let (Some(mut entity), Some(stats)) = (members.next(), summarize(pool)) else {
            return Err(EngineError::ExhaustedCandidates {
                state: Box::new(state.clone()),
            });
        };
        let mut cost = score(entity, &stats, &self.weights);
        for candidate in members {
            let candidate_cost = score(candidate, &stats, &self.weights);
            if candidate_cost < cost {
                entity = candidate;
                cost = candidate_cost;
            }
        }
        tracing::debug!(pick = %entity.name, cost, pool = pool.len(), "picked candidate");
        Ok(Pick {
            entity,
            cost,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Trait};
    use crate::pool::filter;

    #[test]
    fn ties_break_on_lowest_identifier() {
        let catalog = Catalog::new(vec![
            Entity::new(5, "Later", 1, Trait::Bug, Trait::None, Some(1.0), Some(1.0)),
            Entity::new(2, "Earlier", 1, Trait::Bug, Trait::None, Some(1.0), Some(1.0)),
        ])
        .expect("catalog");
        let state = ConstraintState::for_catalog(&catalog);
        let pick = Picker::default()
            .pick(&filter(&catalog, &state), &state)
            .expect("pick");
        assert_eq!(pick.entity.id, 2);
        assert_eq!(pick.cost, 0.0);
    }

    #[test]
    fn cheapest_member_wins_over_catalog_order() {
        let catalog = Catalog::new(vec![
            Entity::new(1, "Outlier", 4, Trait::Ice, Trait::Rock, Some(6.0), Some(300.0)),
            Entity::new(2, "Typical", 1, Trait::Bug, Trait::None, Some(1.0), Some(10.0)),
            Entity::new(3, "Close", 1, Trait::Bug, Trait::None, Some(1.1), Some(11.0)),
        ])
        .expect("catalog");
        let state = ConstraintState::for_catalog(&catalog);
        let pool = filter(&catalog, &state);
        let pick = Picker::default().pick(&pool, &state).expect("pick");
        assert_eq!(pick.entity.name, "Close");
        assert_eq!(pick.stats.size, 3);
        for member in pool.iter() {
            assert!(pick.cost <= score(member, &pick.stats, &ScoreWeights::default()));
        }
    }

    #[test]
    fn empty_pool_reports_state() {
        let catalog = Catalog::new(vec![Entity::new(
            1,
            "Only",
            1,
            Trait::Bug,
            Trait::None,
            None,
            None,
        )])
        .expect("catalog");
        let mut state = ConstraintState::for_catalog(&catalog);
        state.mark_guessed(1);
        let err = Picker::default()
            .pick(&filter(&catalog, &state), &state)
            .expect_err("empty pool");
        assert_eq!(err.constraint_state(), Some(&state));
    }
}
