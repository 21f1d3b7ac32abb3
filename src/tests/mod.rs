//! # Tests of the exact LP as a whole
//!
//! Most tests start from the same LP:
//!
//! ```text
//! min  -x - 2y
//! s.t.  x +  y <= 10
//!       x -  y >= -4
//!       x, y >= 0
//! ```
//!
//! of which the unique optimum is `x = 3`, `y = 7` with objective value `-17` and duals `-3/2` and
//! `1/2`.
use crate::algorithm::lp::{ExactLp, Settings};
use crate::data::linear_program::elements::VariableType;
use crate::data::linear_program::handle::{ColumnId, RowId};
use crate::data::linear_program::problem::Problem;
use crate::data::number_types::exact::Exact;
use crate::interface::LpSolver;
use crate::R;

mod flush;
mod lifecycle;
mod properties;

/// An exact LP together with the handles of its objects.
pub struct Scenario<S: LpSolver> {
    pub problem: Problem,
    pub lp: ExactLp<S>,
    pub columns: Vec<ColumnId>,
    pub rows: Vec<RowId>,
}

/// The LP of the module documentation, with all objects in the LP but nothing flushed.
pub fn two_by_two<S: LpSolver>(solver: S, settings: Settings) -> Scenario<S> {
    let mut problem = Problem::new();
    let mut lp = ExactLp::new(solver, settings).unwrap();

    let x = problem.add_variable("x", R!(-1), R!(0), Exact::Infinity, VariableType::Continuous);
    let y = problem.add_variable("y", R!(-2), R!(0), Exact::Infinity, VariableType::Continuous);
    let columns = vec![
        lp.create_column(&mut problem, x).unwrap(),
        lp.create_column(&mut problem, y).unwrap(),
    ];
    for &column in &columns {
        lp.add_column(column).unwrap();
    }

    let sum = lp.create_row("sum", Exact::NegativeInfinity, R!(10), R!(0)).unwrap();
    lp.add_row_coefficients(sum, &[(columns[0], R!(1)), (columns[1], R!(1))]).unwrap();
    let difference = lp.create_row("difference", R!(-4), Exact::Infinity, R!(0)).unwrap();
    lp.add_row_coefficients(difference, &[(columns[0], R!(1)), (columns[1], R!(-1))]).unwrap();
    let rows = vec![sum, difference];
    for &row in &rows {
        lp.add_row(row).unwrap();
    }

    Scenario { problem, lp, columns, rows }
}

/// A free variable `x` with rows `x >= 1` and `-x >= 0`.
pub fn infeasible<S: LpSolver>(solver: S) -> Scenario<S> {
    let mut problem = Problem::new();
    let mut lp = ExactLp::new(solver, Settings::default()).unwrap();

    let x = problem.add_variable("x", R!(0), Exact::NegativeInfinity, Exact::Infinity, VariableType::Continuous);
    let column = lp.create_column(&mut problem, x).unwrap();
    lp.add_column(column).unwrap();

    let at_least_one = lp.create_row("at_least_one", R!(1), Exact::Infinity, R!(0)).unwrap();
    lp.add_row_coefficient(at_least_one, column, R!(1)).unwrap();
    let at_most_zero = lp.create_row("at_most_zero", R!(0), Exact::Infinity, R!(0)).unwrap();
    lp.add_row_coefficient(at_most_zero, column, R!(-1)).unwrap();
    for row in [at_least_one, at_most_zero] {
        lp.add_row(row).unwrap();
    }

    Scenario { problem, lp, columns: vec![column], rows: vec![at_least_one, at_most_zero] }
}
