//! # Error reporting
//!
//! Errors are only used for situations in which the caller did something that can't be done, or
//! in which the LP solver backend failed. Resource limits and invalid certificates are regular
//! outcomes of a solve and are reported through `SolveOutcome`.
use thiserror::Error;

use crate::interface::SolverError;

/// The highest error in the hierarchy of this crate.
#[derive(Error, Debug)]
pub enum LpError {
    /// Memory for an LP object could not be reserved.
    #[error("allocation failed: {0}")]
    Allocation(String),
    /// The requested operation is not allowed on the data it was called with.
    ///
    /// Examples are changing a coefficient of a locked row, or merging a row that is already
    /// linked into the LP.
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// The LP solver backend reported an error.
    #[error(transparent)]
    Solver(#[from] SolverError),
    /// A solution value was requested, but the LP is not solved.
    #[error("no solution available: {0}")]
    NoSolution(String),
    /// The backend ended in a state that none of the outcome predicates describes.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type used throughout the crate.
pub type LpResult<T> = Result<T, LpError>;

impl LpError {
    pub(crate) fn invalid(description: impl Into<String>) -> Self {
        Self::InvalidData(description.into())
    }
}
