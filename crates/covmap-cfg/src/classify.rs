//! Block classification and random key assignment.

use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::{BlockId, Cfg};

/// Classifier output: per-block keys plus the single/multi partition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classified {
    /// Unique random key per block, drawn uniformly over `[0, map_size)`.
    pub keys: FxHashMap<BlockId, u32>,
    /// Blocks with at most one predecessor, in CFG order. Entry blocks
    /// (no predecessors) land here.
    pub single: Vec<BlockId>,
    /// Blocks with two or more predecessors, in CFG order.
    pub multi: Vec<BlockId>,
}

/// Assign each block a unique random key and partition blocks by
/// predecessor count.
///
/// Keys double as the lookup keys of the explicit slot tables, so they are
/// drawn without replacement. The caller must guarantee
/// `cfg.len() <= map_size`; unique keys cannot exist otherwise.
pub fn classify<R: Rng>(cfg: &Cfg, map_size: u32, rng: &mut R) -> Classified {
    debug_assert!(cfg.len() as u64 <= u64::from(map_size));

    let mut classified = Classified::default();
    let mut issued: FxHashSet<u32> = FxHashSet::default();

    for &block in cfg.blocks() {
        let key = loop {
            let candidate = rng.gen_range(0..map_size);
            if issued.insert(candidate) {
                break candidate;
            }
        };
        classified.keys.insert(block, key);

        if cfg.preds(block).len() > 1 {
            classified.multi.push(block);
        } else {
            classified.single.push(block);
        }
    }

    debug!(
        blocks = cfg.len(),
        single = classified.single.len(),
        multi = classified.multi.len(),
        "classified blocks"
    );

    classified
}
