//! Control flow graph input model.

use rustc_hash::FxHashMap;

use crate::{CfgError, Result};

/// Opaque basic-block identifier, stable across one compilation unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// Control flow graph: ordered blocks plus per-block predecessor lists.
///
/// Block order and predecessor order are insertion order. Neither carries
/// meaning, but every downstream phase iterates them, so they must be
/// stable for reproducible assignments.
#[derive(Clone, Debug, Default)]
pub struct Cfg {
    blocks: Vec<BlockId>,
    preds: FxHashMap<BlockId, Vec<BlockId>>,
}

impl Cfg {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block. Re-adding an existing block is a no-op.
    pub fn add_block(&mut self, block: BlockId) {
        if !self.preds.contains_key(&block) {
            self.blocks.push(block);
            self.preds.insert(block, Vec::new());
        }
    }

    /// Add the edge `pred -> succ`.
    ///
    /// Both endpoints must already exist. Parallel edges collapse to one;
    /// coverage counts edges, not arcs.
    pub fn add_edge(&mut self, pred: BlockId, succ: BlockId) -> Result<()> {
        if !self.preds.contains_key(&pred) {
            return Err(CfgError::UnknownBlock(pred));
        }
        let Some(preds) = self.preds.get_mut(&succ) else {
            return Err(CfgError::UnknownBlock(succ));
        };
        if !preds.contains(&pred) {
            preds.push(pred);
        }
        Ok(())
    }

    /// Blocks in insertion order.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Predecessors of `block`, in edge insertion order. Empty for entry
    /// blocks and for unknown blocks.
    pub fn preds(&self, block: BlockId) -> &[BlockId] {
        self.preds.get(&block).map_or(&[], Vec::as_slice)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the graph has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.preds.values().map(Vec::len).sum()
    }
}
