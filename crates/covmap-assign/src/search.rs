//! Hash-parameter search for multi-predecessor blocks.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use covmap_cfg::{BlockId, Cfg, Classified};

use crate::{HashParams, SearchConfig};

/// Result of the parameter search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchOutcome {
    /// Accepted parameters per solved block.
    pub params: FxHashMap<BlockId, HashParams>,
    /// Solved blocks, in CFG order.
    pub solved: Vec<BlockId>,
    /// Blocks left for the fallback table, in CFG order.
    pub unsolved: Vec<BlockId>,
    /// Slots claimed by solved blocks' edge hashes.
    pub used_slots: FxHashSet<u32>,
    /// Rounds run, one per shared `y` shift.
    pub rounds: u32,
    /// Whether the probe budget ran out mid-round.
    pub budget_exhausted: bool,
}

impl SearchOutcome {
    fn unsolved_fraction(&self) -> f64 {
        let total = self.solved.len() + self.unsolved.len();
        if total == 0 {
            return 0.0;
        }
        self.unsolved.len() as f64 / total as f64
    }
}

/// One completed round's partition.
struct Round {
    params: FxHashMap<BlockId, HashParams>,
    solved: Vec<BlockId>,
    unsolved: Vec<BlockId>,
    used: FxHashSet<u32>,
}

/// Search hash parameters for every multi-predecessor block.
///
/// One round per shared shift `y` in `[1, map_size_bits)`. Within a round
/// each block takes the first `(x, z)` pair whose predecessor hashes are
/// pairwise distinct and disjoint from the slots claimed earlier in the
/// round; blocks with no acceptable pair stay unsolved. Rounds stop once
/// the unsolved count or fraction drops under the configured thresholds,
/// and the last round's partition is what carries forward.
///
/// Every `(x, z)` candidate consumes one unit of the probe budget. If the
/// budget runs out mid-round, the incomplete round is discarded and the
/// best completed partition is kept instead; this degrades to more
/// fallback-table entries, never to an error.
pub fn search_params(cfg: &Cfg, classified: &Classified, config: &SearchConfig) -> SearchOutcome {
    let bits = config.map_size_bits;
    let mask = config.slot_mask();

    if classified.multi.is_empty() {
        return SearchOutcome::default();
    }

    let mut probes_left = config.probe_budget;
    let mut best: Option<SearchOutcome> = None;
    let mut best_fraction = f64::INFINITY;
    let mut last = SearchOutcome::default();

    for y in 1..bits {
        let Some(round) = run_round(cfg, classified, y, bits, mask, &mut probes_left) else {
            warn!(y, "probe budget exhausted, keeping best completed round");
            let mut outcome = best.unwrap_or_else(|| SearchOutcome {
                unsolved: classified.multi.clone(),
                ..Default::default()
            });
            outcome.rounds = y;
            outcome.budget_exhausted = true;
            return outcome;
        };

        last = SearchOutcome {
            params: round.params,
            solved: round.solved,
            unsolved: round.unsolved,
            used_slots: round.used,
            rounds: y,
            budget_exhausted: false,
        };

        let fraction = last.unsolved_fraction();
        debug!(
            y,
            solved = last.solved.len(),
            unsolved = last.unsolved.len(),
            fraction,
            "search round finished"
        );

        if fraction < best_fraction {
            best_fraction = fraction;
            best = Some(last.clone());
        }

        if last.unsolved.len() < config.delta || fraction < config.sigma {
            break;
        }
    }

    last
}

/// Run one round with a fixed `y`. `None` if the probe budget ran out
/// before the round finished.
fn run_round(
    cfg: &Cfg,
    classified: &Classified,
    y: u32,
    bits: u32,
    mask: u32,
    probes_left: &mut u64,
) -> Option<Round> {
    let mut round = Round {
        params: FxHashMap::default(),
        solved: Vec::new(),
        unsolved: Vec::new(),
        used: FxHashSet::default(),
    };
    let mut scratch: FxHashSet<u32> = FxHashSet::default();

    for &block in &classified.multi {
        let cur = classified.keys[&block];
        let preds = cfg.preds(block);

        let mut accepted = None;
        'candidates: for x in 1..bits {
            for z in 1..bits {
                if *probes_left == 0 {
                    return None;
                }
                *probes_left -= 1;

                let candidate = HashParams { x, y, z };
                scratch.clear();
                let mut collision_free = true;
                for &pred in preds {
                    let slot = candidate.slot(cur, classified.keys[&pred], mask);
                    if round.used.contains(&slot) || !scratch.insert(slot) {
                        collision_free = false;
                        break;
                    }
                }
                if collision_free {
                    accepted = Some(candidate);
                    break 'candidates;
                }
            }
        }

        // A true partition: a block is solved or unsolved, never both.
        match accepted {
            Some(params) => {
                round.params.insert(block, params);
                round.solved.push(block);
                round.used.extend(scratch.iter().copied());
            }
            None => round.unsolved.push(block),
        }
    }

    Some(round)
}
