//! covmap - collision-free coverage-map slot assignment.
//!
//! Coverage-guided fuzzers index a fixed-size counter map with
//! `prev_loc ^ cur_loc` per executed edge; random per-block locations
//! collide at control-flow merge points. This crate assigns every edge of
//! a compilation unit a distinct map slot: multi-predecessor blocks get a
//! searched hash-parameter triple recomputed inline at instrumentation
//! time, everything else gets an explicit perfect-hash table entry.
//!
//! # Example
//!
//! ```ignore
//! use covmap::{Assigner, BlockId, Cfg, SearchConfig};
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let mut cfg = Cfg::new();
//! // ... add_block / add_edge from the host compiler's CFG ...
//! let assigner = Assigner::new(SearchConfig::default());
//! let plan = assigner.assign(&cfg, &mut SmallRng::seed_from_u64(0))?;
//! ```

// Re-export from sub-crates
pub use covmap_assign::{
    build_tables, search_params, AssignError, AssignmentPlan, FallbackTable, HashParams,
    SearchConfig, SearchOutcome, SingleTable, DEFAULT_DELTA, DEFAULT_MAP_SIZE_BITS,
    DEFAULT_PROBE_BUDGET, DEFAULT_SIGMA,
};
pub use covmap_cfg::{classify, BlockId, Cfg, CfgError, Classified};

mod assigner;
pub use assigner::*;

use thiserror::Error;

/// Slot assignment errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("CFG error: {0}")]
    Cfg(#[from] CfgError),
    #[error("assignment error: {0}")]
    Assign(#[from] AssignError),
}

pub type Result<T> = std::result::Result<T, Error>;
