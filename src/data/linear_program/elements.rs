//! # Building blocks to describe linear programs.
use std::fmt;
use std::ops::Not;

use enum_map::Enum;

/// Direction of a bound.
///
/// For a column this is the lower or upper bound of its variable. For a row it is the left-hand
/// side (`Lower`) or the right-hand side (`Upper`) of the constraint `lhs <= a x + c <= rhs`.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BoundDirection {
    /// Lower bound, or left-hand side.
    Lower,
    /// Upper bound, or right-hand side.
    Upper,
}

impl Not for BoundDirection {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Lower => Self::Upper,
            Self::Upper => Self::Lower,
        }
    }
}

/// A variable is either continuous or integer.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VariableType {
    Continuous,
    Integer,
}

impl Not for VariableType {
    type Output = VariableType;

    fn not(self) -> VariableType {
        match self {
            VariableType::Continuous => VariableType::Integer,
            VariableType::Integer => VariableType::Continuous,
        }
    }
}

/// Position of a column or row relative to the basis of the simplex method.
///
/// The numeric codes are the ones exchanged with LP solver backends.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BasisStatus {
    /// Nonbasic at the lower bound (or left-hand side).
    Lower = 0,
    /// In the basis.
    Basic = 1,
    /// Nonbasic at the upper bound (or right-hand side).
    Upper = 2,
    /// Free and nonbasic, at value zero.
    Zero = 3,
}

impl BasisStatus {
    /// Status code as exchanged with solver backends.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Read a status code.
    ///
    /// # Return value
    ///
    /// `None` if the code is not one of `0..=3`.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Lower),
            1 => Some(Self::Basic),
            2 => Some(Self::Upper),
            3 => Some(Self::Zero),
            _ => None,
        }
    }
}

impl Default for BasisStatus {
    fn default() -> Self {
        Self::Zero
    }
}

/// Solution status of the exact LP.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LpStatus {
    /// No solve happened since the last modification.
    NotSolved,
    /// Solved to optimality.
    Optimal,
    /// The LP has no feasible solution.
    Infeasible,
    /// The LP has a primal ray, its objective is unbounded.
    UnboundedRay,
    /// The objective value exceeds the cutoff bound.
    ObjectiveLimit,
    /// The solver stopped after too many iterations.
    IterationLimit,
    /// The solver stopped because the time budget ran out.
    TimeLimit,
    /// The solver failed twice.
    Error,
}

impl LpStatus {
    /// Whether a solver result for this status was obtained.
    #[must_use]
    pub fn is_solved(self) -> bool {
        !matches!(self, Self::NotSolved | Self::Error)
    }
}

impl Default for LpStatus {
    fn default() -> Self {
        Self::NotSolved
    }
}

impl fmt::Display for LpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotSolved => "not_solved",
            Self::Optimal => "optimal",
            Self::Infeasible => "infeasible",
            Self::UnboundedRay => "unbounded_ray",
            Self::ObjectiveLimit => "objective_limit",
            Self::IterationLimit => "iteration_limit",
            Self::TimeLimit => "time_limit",
            Self::Error => "error",
        })
    }
}
