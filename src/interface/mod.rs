//! # LP solver backends
//!
//! The exact LP doesn't implement a simplex method itself. It keeps an exact LP solver backend in
//! sync with its columns and rows and queries it for solutions and certificates. This module
//! describes what such a backend should be capable of.
//!
//! Positions used in the calls are the positions in the backend: columns and rows are numbered
//! in the order in which they were added, and deleting a range shifts everything after it.
use std::fmt::Debug;
use std::ops::{Range, RangeInclusive};

use thiserror::Error;

use crate::data::linear_program::elements::BasisStatus;
use crate::data::number_types::exact::Exact;

pub mod dense;

/// Something went wrong inside a backend.
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum SolverError {
    #[error("{kind} index {index} is out of range, the solver has {len}")]
    OutOfRange { kind: &'static str, index: usize, len: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no solution is available")]
    NoSolution,
    #[error("parameter {0:?} is not supported")]
    UnsupportedParameter(String),
    #[error("solve failed: {0}")]
    Failed(String),
}

/// Result type of the backend calls.
pub type SolverResult<T> = Result<T, SolverError>;

/// Columns to add, in compressed sparse column format.
///
/// The coefficients of column `i` are at positions `begin[i]..begin[i + 1]` (or up to the end for
/// the last column) of `indices` and `values`. The indices refer to rows already in the backend.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ColumnBatch {
    /// Objective coefficient per column.
    pub objective: Vec<Exact>,
    /// Lower bound per column.
    pub lower: Vec<Exact>,
    /// Upper bound per column.
    pub upper: Vec<Exact>,
    /// Start of the coefficients of each column.
    pub begin: Vec<usize>,
    /// Row positions.
    pub indices: Vec<usize>,
    /// Coefficients.
    pub values: Vec<Exact>,
}

impl ColumnBatch {
    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objective.len()
    }

    /// Whether no columns are in the batch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objective.is_empty()
    }

    /// Positions of the coefficients of a column in `indices` and `values`.
    #[must_use]
    pub fn entries(&self, column: usize) -> Range<usize> {
        entry_range(&self.begin, self.indices.len(), column)
    }
}

/// Rows to add, in compressed sparse row format.
///
/// The sides are the sides of the row minus its constant.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RowBatch {
    /// Left-hand side per row.
    pub lhs: Vec<Exact>,
    /// Right-hand side per row.
    pub rhs: Vec<Exact>,
    /// Start of the coefficients of each row.
    pub begin: Vec<usize>,
    /// Column positions.
    pub indices: Vec<usize>,
    /// Coefficients.
    pub values: Vec<Exact>,
}

impl RowBatch {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lhs.len()
    }

    /// Whether no rows are in the batch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lhs.is_empty()
    }

    /// Positions of the coefficients of a row in `indices` and `values`.
    #[must_use]
    pub fn entries(&self, row: usize) -> Range<usize> {
        entry_range(&self.begin, self.indices.len(), row)
    }
}

fn entry_range(begin: &[usize], len: usize, index: usize) -> Range<usize> {
    begin[index]..begin.get(index + 1).copied().unwrap_or(len)
}

/// Rule to select the pivot column or row.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Pricing {
    #[default]
    Auto,
    Dantzig,
    SteepestEdge,
    Devex,
}

impl Pricing {
    /// Value of the `Pricing` integer parameter.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Auto => 0,
            Self::Dantzig => 1,
            Self::SteepestEdge => 2,
            Self::Devex => 3,
        }
    }

    /// Read the value of the `Pricing` integer parameter.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Auto),
            1 => Some(Self::Dantzig),
            2 => Some(Self::SteepestEdge),
            3 => Some(Self::Devex),
            _ => None,
        }
    }
}

/// Integer valued parameters.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IntParameter {
    /// Nonzero to ignore the warm start information on the next solve.
    FromScratch,
    /// Maximum number of simplex iterations, `i64::MAX` for no limit.
    IterationLimit,
    /// Code of a `Pricing` rule.
    Pricing,
    /// Nonzero to scale the LP before solving.
    Scaling,
}

/// Real valued parameters.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RealParameter {
    /// Seconds a solve may take, infinity for no limit.
    TimeLimit,
    /// Stop when the objective value provably exceeds this value, infinity for no limit.
    ObjectiveLimit,
}

/// Values of the last solve, by backend position.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Solution {
    /// Objective value.
    pub objective_value: Exact,
    /// Value per column.
    pub primal: Vec<Exact>,
    /// Dual value per row.
    pub dual: Vec<Exact>,
    /// Activity per row, without the row constant.
    pub activity: Vec<Exact>,
    /// Reduced cost per column.
    pub reduced_cost: Vec<Exact>,
}

/// Capabilities of an exact LP solver.
///
/// The LP is `min c x` subject to `lhs <= A x <= rhs` and `lower <= x <= upper`.
pub trait LpSolver {
    /// Opaque information to warm start a later solve.
    type State: Clone + Debug;

    /// Append columns.
    fn add_columns(&mut self, batch: &ColumnBatch) -> SolverResult<()>;
    /// Append rows.
    fn add_rows(&mut self, batch: &RowBatch) -> SolverResult<()>;
    /// Delete a range of columns, shifting the later ones down.
    fn delete_columns(&mut self, range: RangeInclusive<usize>) -> SolverResult<()>;
    /// Delete a range of rows, shifting the later ones down.
    fn delete_rows(&mut self, range: RangeInclusive<usize>) -> SolverResult<()>;

    /// Set new objective coefficients.
    fn change_objective(&mut self, indices: &[usize], values: &[Exact]) -> SolverResult<()>;
    /// Set new column bounds.
    fn change_bounds(&mut self, indices: &[usize], lower: &[Exact], upper: &[Exact]) -> SolverResult<()>;
    /// Set new row sides.
    fn change_sides(&mut self, indices: &[usize], lhs: &[Exact], rhs: &[Exact]) -> SolverResult<()>;

    /// Set the basis to start the next solve from.
    fn set_basis(&mut self, columns: &[BasisStatus], rows: &[BasisStatus]) -> SolverResult<()>;
    /// Current basis of the columns and the rows.
    fn basis(&self) -> SolverResult<(Vec<BasisStatus>, Vec<BasisStatus>)>;

    /// Read an integer parameter.
    fn int_parameter(&self, parameter: IntParameter) -> SolverResult<i64>;
    /// Set an integer parameter.
    fn set_int_parameter(&mut self, parameter: IntParameter, value: i64) -> SolverResult<()>;
    /// Read a real parameter.
    fn real_parameter(&self, parameter: RealParameter) -> SolverResult<Exact>;
    /// Set a real parameter.
    fn set_real_parameter(&mut self, parameter: RealParameter, value: Exact) -> SolverResult<()>;

    /// Solve with the primal simplex method.
    fn solve_primal(&mut self) -> SolverResult<()>;
    /// Solve with the dual simplex method.
    fn solve_dual(&mut self) -> SolverResult<()>;

    /// Whether the LP was solved since the last modification.
    fn was_solved(&self) -> bool;
    /// Whether an optimal solution was found.
    fn is_optimal(&self) -> bool;
    /// Whether the objective value exceeds the objective limit.
    fn is_objective_limit_exceeded(&self) -> bool;
    /// Whether the LP was proven infeasible.
    fn is_primal_infeasible(&self) -> bool;
    /// Whether the LP was proven unbounded.
    fn is_primal_unbounded(&self) -> bool;
    /// Whether the dual LP was proven infeasible.
    fn is_dual_infeasible(&self) -> bool;
    /// Whether the current solution is primal feasible.
    fn is_primal_feasible(&self) -> bool;
    /// Whether the current solution is dual feasible.
    fn is_dual_feasible(&self) -> bool;
    /// Whether a primal ray is available.
    fn has_primal_ray(&self) -> bool;
    /// Whether a dual ray (a Farkas proof) is available.
    fn has_dual_ray(&self) -> bool;
    /// Whether the solve stopped on the iteration limit.
    fn is_iteration_limit_exceeded(&self) -> bool;
    /// Whether the solve stopped on the time limit.
    fn is_time_limit_exceeded(&self) -> bool;

    /// Objective value of the last solve.
    fn objective_value(&self) -> SolverResult<Exact>;
    /// All solution values of the last solve.
    fn solution(&self) -> SolverResult<Solution>;
    /// Primal ray, one value per column.
    fn primal_ray(&self) -> SolverResult<Vec<Exact>>;
    /// Dual Farkas multipliers, one value per row.
    fn dual_farkas(&self) -> SolverResult<Vec<Exact>>;

    /// Warm start information.
    fn state(&self) -> SolverResult<Self::State>;
    /// Restore warm start information.
    fn set_state(&mut self, state: &Self::State) -> SolverResult<()>;

    /// Number of iterations of the last solve.
    fn iterations(&self) -> usize;
    /// Values at least this large in absolute value are treated as infinite.
    fn infinity(&self) -> Exact;
    /// Number of columns.
    fn nr_columns(&self) -> usize;
    /// Number of rows.
    fn nr_rows(&self) -> usize;
}
