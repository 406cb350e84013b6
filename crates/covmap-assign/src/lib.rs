//! Slot assignment for coverage-map instrumentation.
//!
//! Multi-predecessor blocks get a per-block hash-parameter triple found by
//! search; blocks the search cannot solve, and all single-predecessor
//! blocks, get explicit perfect-hash table entries instead. Together every
//! edge of the compilation unit maps to a distinct slot of the fixed-size
//! coverage counter map.

mod config;
mod fallback;
mod plan;
mod search;

pub use config::*;
pub use fallback::*;
pub use plan::*;
pub use search::*;

use thiserror::Error;

/// Assignment errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    #[error("coverage map capacity exceeded: {required} slots required, map holds {map_size}")]
    CapacityExceeded { required: usize, map_size: u32 },
}

pub type Result<T> = std::result::Result<T, AssignError>;
