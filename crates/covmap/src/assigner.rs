//! Assignment pipeline - classify, search, build tables.

use rand::Rng;
use tracing::{info, warn};

use covmap_assign::{build_tables, search_params, AssignError, AssignmentPlan, SearchConfig};
use covmap_cfg::{classify, Cfg};

use crate::Result;

/// Slot assigner for one compilation unit.
///
/// Runs the three phases in order and hands the emission phase a complete
/// [`AssignmentPlan`]. Either the full plan is produced or the unit fails;
/// no partial state escapes.
pub struct Assigner {
    config: SearchConfig,
}

impl Assigner {
    /// Create an assigner with the given search configuration.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Create an assigner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SearchConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Assign a slot source to every edge of `cfg`.
    ///
    /// The RNG drives block-key assignment only; a fixed seed makes the
    /// whole run reproducible.
    pub fn assign<R: Rng>(&self, cfg: &Cfg, rng: &mut R) -> Result<AssignmentPlan> {
        let map_size = self.config.map_size();

        // Keys are unique per block, so more blocks than slots can never
        // be assigned collision-free.
        if cfg.len() as u64 > u64::from(map_size) {
            return Err(AssignError::CapacityExceeded {
                required: cfg.len(),
                map_size,
            }
            .into());
        }

        let classified = classify(cfg, map_size, rng);
        let outcome = search_params(cfg, &classified, &self.config);
        if outcome.budget_exhausted {
            warn!(
                unsolved = outcome.unsolved.len(),
                "search budget exhausted, unsolved edges go to the fallback table"
            );
        }
        let (fallback, single) = build_tables(cfg, &classified, &outcome, map_size)?;

        info!(
            blocks = cfg.len(),
            edges = cfg.edge_count(),
            solved = outcome.solved.len(),
            fallback = fallback.len(),
            single = single.len(),
            rounds = outcome.rounds,
            "slot assignment complete"
        );

        Ok(AssignmentPlan {
            keys: classified.keys,
            params: outcome.params,
            fallback,
            single,
            slot_mask: self.config.slot_mask(),
            rounds: outcome.rounds,
            budget_exhausted: outcome.budget_exhausted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covmap_cfg::BlockId;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_too_many_blocks_for_map() {
        let mut cfg = Cfg::new();
        for i in 0..10 {
            cfg.add_block(BlockId(i));
        }
        let assigner = Assigner::new(SearchConfig::new(2));

        let err = assigner
            .assign(&cfg, &mut SmallRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Assign(AssignError::CapacityExceeded {
                required: 10,
                map_size: 4,
            })
        ));
    }

    #[test]
    fn test_empty_graph() {
        let cfg = Cfg::new();
        let assigner = Assigner::with_defaults();
        let plan = assigner
            .assign(&cfg, &mut SmallRng::seed_from_u64(0))
            .unwrap();
        assert!(plan.keys.is_empty());
        assert_eq!(plan.explicit_count(), 0);
    }
}
