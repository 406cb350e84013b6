//! Control flow graph model and block classification for coverage-map
//! slot assignment.

mod classify;
mod graph;

pub use classify::*;
pub use graph::*;

use thiserror::Error;

/// CFG input errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CfgError {
    #[error("edge references unknown block {0:?}")]
    UnknownBlock(BlockId),
}

pub type Result<T> = std::result::Result<T, CfgError>;
