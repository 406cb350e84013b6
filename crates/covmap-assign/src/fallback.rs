//! Explicit slot tables for unsolved and single-predecessor blocks.

use rustc_hash::FxHashSet;
use tracing::debug;

use covmap_cfg::{Cfg, Classified};

use crate::{AssignError, FallbackTable, Result, SearchOutcome, SingleTable};

/// Build the explicit slot tables.
///
/// Every unsolved block's edge and every single-predecessor block claims
/// the lowest slot not already used by a solved block's hashes or an
/// earlier table entry. Used slots only accumulate, so the scan cursor
/// never moves backwards.
///
/// Fails with [`AssignError::CapacityExceeded`] if the map runs out of
/// free slots; silently reusing a slot would break collision-freedom.
pub fn build_tables(
    cfg: &Cfg,
    classified: &Classified,
    outcome: &SearchOutcome,
    map_size: u32,
) -> Result<(FallbackTable, SingleTable)> {
    let mut used = outcome.used_slots.clone();
    let mut cursor = 0u32;

    let mut fallback = FallbackTable::default();
    for &block in &outcome.unsolved {
        let cur = classified.keys[&block];
        for &pred in cfg.preds(block) {
            let slot = claim_slot(&mut used, &mut cursor, map_size)?;
            fallback.insert((cur, classified.keys[&pred]), slot);
        }
    }

    let mut single = SingleTable::default();
    for &block in &classified.single {
        let slot = claim_slot(&mut used, &mut cursor, map_size)?;
        single.insert(classified.keys[&block], slot);
    }

    debug!(
        fallback = fallback.len(),
        single = single.len(),
        "explicit tables built"
    );

    Ok((fallback, single))
}

/// Claim the lowest free slot at or above the cursor.
fn claim_slot(used: &mut FxHashSet<u32>, cursor: &mut u32, map_size: u32) -> Result<u32> {
    while *cursor < map_size && used.contains(cursor) {
        *cursor += 1;
    }
    if *cursor >= map_size {
        return Err(AssignError::CapacityExceeded {
            required: map_size as usize + 1,
            map_size,
        });
    }
    let slot = *cursor;
    used.insert(slot);
    *cursor += 1;
    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use covmap_cfg::BlockId;

    fn merge_cfg() -> Cfg {
        // A -> C, B -> C
        let mut cfg = Cfg::new();
        cfg.add_block(BlockId(0));
        cfg.add_block(BlockId(1));
        cfg.add_block(BlockId(2));
        cfg.add_edge(BlockId(0), BlockId(2)).unwrap();
        cfg.add_edge(BlockId(1), BlockId(2)).unwrap();
        cfg
    }

    fn classified_for(cfg: &Cfg, keys: &[(BlockId, u32)]) -> Classified {
        let mut classified = Classified::default();
        for &(block, key) in keys {
            classified.keys.insert(block, key);
        }
        for &block in cfg.blocks() {
            if cfg.preds(block).len() > 1 {
                classified.multi.push(block);
            } else {
                classified.single.push(block);
            }
        }
        classified
    }

    #[test]
    fn test_unsolved_edges_get_distinct_slots() {
        let cfg = merge_cfg();
        let classified =
            classified_for(&cfg, &[(BlockId(0), 5), (BlockId(1), 9), (BlockId(2), 20)]);
        let outcome = SearchOutcome {
            unsolved: vec![BlockId(2)],
            ..Default::default()
        };

        let (fallback, single) = build_tables(&cfg, &classified, &outcome, 64).unwrap();

        assert_eq!(fallback[&(20, 5)], 0);
        assert_eq!(fallback[&(20, 9)], 1);
        // Single blocks continue from the next free slot
        assert_eq!(single[&5], 2);
        assert_eq!(single[&9], 3);
    }

    #[test]
    fn test_skips_slots_claimed_by_search() {
        let cfg = merge_cfg();
        let classified =
            classified_for(&cfg, &[(BlockId(0), 5), (BlockId(1), 9), (BlockId(2), 20)]);
        let mut outcome = SearchOutcome {
            unsolved: vec![BlockId(2)],
            ..Default::default()
        };
        outcome.used_slots.extend([0, 1, 3]);

        let (fallback, single) = build_tables(&cfg, &classified, &outcome, 64).unwrap();

        assert_eq!(fallback[&(20, 5)], 2);
        assert_eq!(fallback[&(20, 9)], 4);
        assert_eq!(single[&5], 5);
        assert_eq!(single[&9], 6);
    }

    #[test]
    fn test_capacity_exceeded() {
        let cfg = merge_cfg();
        let classified =
            classified_for(&cfg, &[(BlockId(0), 0), (BlockId(1), 1), (BlockId(2), 2)]);
        let outcome = SearchOutcome {
            unsolved: vec![BlockId(2)],
            ..Default::default()
        };

        // 2 fallback edges + 2 single blocks need 4 slots; the map has 2.
        let err = build_tables(&cfg, &classified, &outcome, 2).unwrap_err();
        assert!(matches!(err, AssignError::CapacityExceeded { map_size: 2, .. }));
    }
}
