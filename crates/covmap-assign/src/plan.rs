//! Assignment plan consumed by the instrumentation emitter.

use rustc_hash::FxHashMap;

use covmap_cfg::BlockId;

/// Per-block edge-hash parameters, each in `[1, map_size_bits)`.
///
/// A solved block's edge slot is recomputed inline at instrumentation
/// time instead of being looked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashParams {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl HashParams {
    /// Slot for the edge `pred -> cur` under these parameters:
    /// `((cur >> x) ^ ((pred >> y) + z)) & mask`.
    pub const fn slot(self, cur: u32, pred: u32, mask: u32) -> u32 {
        ((cur >> self.x) ^ (pred >> self.y).wrapping_add(self.z)) & mask
    }
}

/// Explicit (cur key, pred key) -> slot table for unsolved
/// multi-predecessor blocks.
pub type FallbackTable = FxHashMap<(u32, u32), u32>;

/// Explicit cur key -> slot table for single-predecessor blocks.
pub type SingleTable = FxHashMap<u32, u32>;

/// Complete slot assignment for one compilation unit.
///
/// Read-only once built. Per block, the emitter either recomputes the
/// inline hash from `params` or emits a lookup into `fallback`/`single`.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentPlan {
    /// Unique random key per block.
    pub keys: FxHashMap<BlockId, u32>,
    /// Hash parameters for solved multi-predecessor blocks.
    pub params: FxHashMap<BlockId, HashParams>,
    /// Explicit entries for unsolved multi-predecessor edges.
    pub fallback: FallbackTable,
    /// Explicit entries for single-predecessor blocks.
    pub single: SingleTable,
    /// Mask folding hashes into the map index space.
    pub slot_mask: u32,
    /// Search rounds run.
    pub rounds: u32,
    /// Whether the probe budget ran out before the search converged.
    pub budget_exhausted: bool,
}

impl AssignmentPlan {
    /// Slot for the edge `pred -> block`, whichever way it was assigned.
    ///
    /// `None` if the edge does not belong to the planned graph.
    pub fn slot_for_edge(&self, block: BlockId, pred: BlockId) -> Option<u32> {
        let cur = *self.keys.get(&block)?;
        let pre = *self.keys.get(&pred)?;
        if let Some(params) = self.params.get(&block) {
            return Some(params.slot(cur, pre, self.slot_mask));
        }
        if let Some(&slot) = self.fallback.get(&(cur, pre)) {
            return Some(slot);
        }
        self.single.get(&cur).copied()
    }

    /// Slot for a single-predecessor block, keyed by the block itself.
    /// This also covers entry blocks, which have no incoming edge.
    pub fn slot_for_block(&self, block: BlockId) -> Option<u32> {
        let cur = self.keys.get(&block)?;
        self.single.get(cur).copied()
    }

    /// Number of blocks whose edges are recomputed inline.
    pub fn solved_count(&self) -> usize {
        self.params.len()
    }

    /// Number of explicit table entries (fallback plus single).
    pub fn explicit_count(&self) -> usize {
        self.fallback.len() + self.single.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_params_slot() {
        let params = HashParams { x: 1, y: 1, z: 1 };
        // ((20 >> 1) ^ ((5 >> 1) + 1)) & 63 = (10 ^ 3) & 63 = 9
        assert_eq!(params.slot(20, 5, 63), 9);
        // ((20 >> 1) ^ ((9 >> 1) + 1)) & 63 = (10 ^ 5) & 63 = 15
        assert_eq!(params.slot(20, 9, 63), 15);
    }

    #[test]
    fn test_hash_masked_into_map() {
        let params = HashParams { x: 1, y: 1, z: 3 };
        let slot = params.slot(u32::MAX, u32::MAX, 63);
        assert!(slot < 64);
    }

    #[test]
    fn test_slot_lookup_precedence() {
        let mut plan = AssignmentPlan {
            keys: FxHashMap::default(),
            params: FxHashMap::default(),
            fallback: FallbackTable::default(),
            single: SingleTable::default(),
            slot_mask: 63,
            rounds: 1,
            budget_exhausted: false,
        };
        plan.keys.insert(BlockId(0), 5);
        plan.keys.insert(BlockId(1), 9);
        plan.keys.insert(BlockId(2), 20);
        plan.params.insert(BlockId(2), HashParams { x: 1, y: 1, z: 1 });
        plan.single.insert(5, 0);
        plan.single.insert(9, 1);

        // Solved block: inline hash
        assert_eq!(plan.slot_for_edge(BlockId(2), BlockId(0)), Some(9));
        assert_eq!(plan.slot_for_edge(BlockId(2), BlockId(1)), Some(15));
        // Single-predecessor blocks: table lookup
        assert_eq!(plan.slot_for_block(BlockId(0)), Some(0));
        assert_eq!(plan.slot_for_block(BlockId(1)), Some(1));
        // Unknown block
        assert_eq!(plan.slot_for_edge(BlockId(9), BlockId(0)), None);
    }
}
