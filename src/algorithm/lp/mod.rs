//! # The exact LP
//!
//! A rational mirror of the LP relaxation of a branch-and-bound search. Columns and rows are
//! edited incrementally; the edits are collected and only sent to the backend when the LP is
//! flushed, right before it is solved.
//!
//! The objects of the LP are created once and can be added to, and removed from, the active LP
//! any number of times. The active LP consists of the columns and rows in `columns()` and
//! `rows()`, in that order. The backend holds a copy of a prefix of these: everything before the
//! "first changed" positions is known to be identical.
use std::time::Instant;

use num_traits::Zero;
use tracing::{debug, trace};

use crate::algorithm::lp::diving::Dive;
use crate::algorithm::lp::objective::ObjectiveSum;
use crate::data::linear_program::column::Column;
use crate::data::linear_program::elements::{BoundDirection, LpStatus, VariableType};
use crate::data::linear_program::handle::{ColumnId, RowId, VariableId};
use crate::data::linear_program::matrix::Matrix;
use crate::data::linear_program::problem::Problem;
use crate::data::linear_program::row::Row;
use crate::data::number_types::exact::Exact;
use crate::error::{LpError, LpResult};
use crate::interface::{IntParameter, LpSolver};

mod certificate;
mod diving;
mod flush;
mod objective;
mod settings;
mod solution;
mod solve;

pub use settings::{BoundCertification, Settings};
pub use solution::StoredLp;
pub use solve::SolveOutcome;

/// What is known about the current solution.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Flags {
    /// The values of the last solve belong to the current LP.
    pub solved: bool,
    /// The current solution is primal feasible, as far as it was checked.
    pub primal_feasible: bool,
    /// The current solution is dual feasible, as far as it was checked.
    pub dual_feasible: bool,
    /// Primal feasibility was verified in exact arithmetic.
    pub primal_checked: bool,
    /// Dual feasibility was verified in exact arithmetic.
    pub dual_checked: bool,
}

/// The exact LP, coupled to a backend that solves it.
#[derive(Debug)]
pub struct ExactLp<S: LpSolver> {
    pub(crate) matrix: Matrix,
    pub(crate) solver: S,
    pub(crate) settings: Settings,

    /// Columns in the active LP, by LP position.
    pub(crate) lp_columns: Vec<ColumnId>,
    /// Rows in the active LP, by LP position.
    pub(crate) lp_rows: Vec<RowId>,
    /// Columns in the backend of which the objective or a bound changed since the last flush.
    pub(crate) changed_columns: Vec<ColumnId>,
    /// Rows in the backend of which a side changed since the last flush.
    pub(crate) changed_rows: Vec<RowId>,

    pub(crate) status: LpStatus,
    pub(crate) flags: Flags,
    /// Objective value reported by the backend, without the loose objective.
    pub(crate) objective_value: Exact,
    pub(crate) pseudo_objective: ObjectiveSum,
    pub(crate) loose_objective: ObjectiveSum,
    pub(crate) cutoff: Exact,

    /// Number of solves so far, used to tell whether cached solution values are current.
    pub(crate) lp_count: u64,
    pub(crate) stored: Option<StoredLp>,
    pub(crate) dive: Option<Dive<S::State>>,
    pub(crate) clock: Instant,
}

impl<S: LpSolver> ExactLp<S> {
    /// Create an empty LP on top of an empty backend.
    ///
    /// The time limit of the settings is counted from this moment.
    ///
    /// # Errors
    ///
    /// If the backend already holds columns or rows, or doesn't accept the settings.
    pub fn new(solver: S, settings: Settings) -> LpResult<Self> {
        if solver.nr_columns() > 0 || solver.nr_rows() > 0 {
            return Err(LpError::invalid("the backend should be empty"));
        }

        let mut lp = Self {
            matrix: Matrix::new(),
            solver,
            settings: Settings::default(),
            lp_columns: Vec::new(),
            lp_rows: Vec::new(),
            changed_columns: Vec::new(),
            changed_rows: Vec::new(),
            status: LpStatus::NotSolved,
            flags: Flags::default(),
            objective_value: Exact::zero(),
            pseudo_objective: ObjectiveSum::new(),
            loose_objective: ObjectiveSum::new(),
            cutoff: Exact::Infinity,
            lp_count: 0,
            stored: None,
            dive: None,
            clock: Instant::now(),
        };
        lp.set_settings(settings)?;

        Ok(lp)
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings, passing the relevant ones on to the backend.
    ///
    /// # Errors
    ///
    /// If the backend doesn't support one of the parameters.
    pub fn set_settings(&mut self, settings: Settings) -> LpResult<()> {
        self.solver.set_int_parameter(IntParameter::Pricing, settings.pricing.code())?;
        self.solver.set_int_parameter(IntParameter::Scaling, i64::from(settings.scaling))?;
        self.settings = settings;

        Ok(())
    }

    /// The backend.
    #[must_use]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Columns and rows of the LP.
    #[must_use]
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Column of a handle.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> &Column {
        self.matrix.column(id)
    }

    /// Row of a handle.
    ///
    /// # Errors
    ///
    /// If the row was freed.
    pub fn row(&self, id: RowId) -> LpResult<&Row> {
        self.matrix.row(id)
    }

    /// Columns in the active LP.
    #[must_use]
    pub fn columns(&self) -> &[ColumnId] {
        &self.lp_columns
    }

    /// Rows in the active LP.
    #[must_use]
    pub fn rows(&self) -> &[RowId] {
        &self.lp_rows
    }

    /// Status of the last solve.
    #[must_use]
    pub fn status(&self) -> LpStatus {
        self.status
    }

    /// What is known about the current solution.
    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Whether the backend reflects all modifications.
    #[must_use]
    pub fn is_flushed(&self) -> bool {
        self.matrix.flushed
    }

    /// Number of solves so far.
    #[must_use]
    pub fn lp_count(&self) -> u64 {
        self.lp_count
    }

    /// Current value of a coefficient.
    ///
    /// # Errors
    ///
    /// If the row doesn't exist or delays sorting.
    pub fn coefficient(&mut self, column: ColumnId, row: RowId) -> LpResult<Exact> {
        self.matrix.coefficient(column, row)
    }

    pub(crate) fn mark_unsolved(&mut self) {
        self.flags.solved = false;
        self.status = LpStatus::NotSolved;
    }

    /// Create the column of a variable.
    ///
    /// # Errors
    ///
    /// If the variable already has a column, or its bounds or objective are invalid.
    pub fn create_column(&mut self, problem: &mut Problem, variable_id: VariableId) -> LpResult<ColumnId> {
        let variable = problem.variable_mut(variable_id);
        if variable.column.is_some() {
            return Err(LpError::invalid(format!("variable {} already has a column", variable.name)));
        }
        let lower = &variable.bounds[BoundDirection::Lower];
        let upper = &variable.bounds[BoundDirection::Upper];
        if variable.objective.is_infinite() || lower > upper || *lower == Exact::Infinity || *upper == Exact::NegativeInfinity {
            return Err(LpError::invalid(format!("variable {} has invalid bounds or objective", variable.name)));
        }

        let column = Column::new(
            variable_id,
            variable.variable_type == VariableType::Integer,
            variable.objective.clone(),
            lower.clone(),
            upper.clone(),
        );
        let contribution = column.pseudo_contribution();
        self.pseudo_objective.add(contribution.as_ref());
        self.loose_objective.add(contribution.as_ref());
        let id = self.matrix.push_column(column);
        variable.column = Some(id);
        trace!(component = "lpexact", operation = "create_column", column = %id, variable = %variable.name);

        Ok(id)
    }

    /// Create a row `lhs <= a x + constant <= rhs` without coefficients.
    ///
    /// The row starts with one use, which belongs to the caller.
    ///
    /// # Errors
    ///
    /// If the sides are inconsistent or the constant is infinite.
    pub fn create_row(&mut self, name: impl Into<String>, lhs: Exact, rhs: Exact, constant: Exact) -> LpResult<RowId> {
        let name = name.into();
        if lhs > rhs || lhs == Exact::Infinity || rhs == Exact::NegativeInfinity || constant.is_infinite() {
            return Err(LpError::invalid(format!("row {} has invalid sides or constant", name)));
        }

        let mut row = Row::new(name, lhs, rhs, constant);
        row.nr_uses = 1;
        let id = self.matrix.push_row(row);
        trace!(component = "lpexact", operation = "create_row", row = %id);

        Ok(id)
    }

    /// Add a use to a row.
    pub fn capture_row(&mut self, id: RowId) -> LpResult<()> {
        self.matrix.row_mut(id)?.nr_uses += 1;
        Ok(())
    }

    /// Drop a use of a row, freeing it when no uses remain.
    ///
    /// # Errors
    ///
    /// If the row has no uses, or if this is its last use while it is in the LP.
    pub fn release_row(&mut self, id: RowId) -> LpResult<()> {
        let row = self.matrix.row_mut(id)?;
        match row.nr_uses {
            0 => return Err(LpError::invalid(format!("row {} has no uses to release", id))),
            1 if row.lp_position.is_some() => {
                return Err(LpError::invalid(format!("row {} is in the LP, its last use can't be released", id)));
            },
            _ => {},
        }
        row.nr_uses -= 1;

        if row.nr_uses == 0 {
            trace!(component = "lpexact", operation = "free_row", row = %id);
            self.matrix.free_row(id)?;
        }

        Ok(())
    }

    /// Lock a row against coefficient changes.
    pub fn lock_row(&mut self, id: RowId) -> LpResult<()> {
        self.matrix.row_mut(id)?.nr_locks += 1;
        Ok(())
    }

    /// Undo a `lock_row`.
    ///
    /// # Errors
    ///
    /// If the row isn't locked.
    pub fn unlock_row(&mut self, id: RowId) -> LpResult<()> {
        let row = self.matrix.row_mut(id)?;
        if row.nr_locks == 0 {
            return Err(LpError::invalid(format!("row {} is not locked", id)));
        }
        row.nr_locks -= 1;

        Ok(())
    }

    /// Append a column to the active LP.
    ///
    /// # Errors
    ///
    /// If the column is already in the LP.
    pub fn add_column(&mut self, id: ColumnId) -> LpResult<()> {
        let column = self.matrix.column(id);
        if column.lp_position.is_some() {
            return Err(LpError::invalid(format!("column {} is already in the LP", id)));
        }
        let contribution = column.pseudo_contribution();

        self.matrix.set_column_lp_position(id, Some(self.lp_columns.len()))?;
        self.lp_columns.push(id);
        self.loose_objective.remove(contribution.as_ref());

        self.matrix.flushed = false;
        self.flags.dual_feasible = false;
        self.flags.dual_checked = false;
        self.mark_unsolved();

        Ok(())
    }

    /// Append a row to the active LP, capturing it.
    ///
    /// A row that delays sorting is merged first.
    ///
    /// # Errors
    ///
    /// If the row is already in the LP.
    pub fn add_row(&mut self, id: RowId) -> LpResult<()> {
        self.matrix.force_row_sort(id)?;
        if self.matrix.row(id)?.lp_position.is_some() {
            return Err(LpError::invalid(format!("row {} is already in the LP", id)));
        }

        self.capture_row(id)?;
        self.matrix.set_row_lp_position(id, Some(self.lp_rows.len()))?;
        self.lp_rows.push(id);

        self.matrix.flushed = false;
        self.flags.primal_feasible = false;
        self.flags.primal_checked = false;
        self.mark_unsolved();

        Ok(())
    }

    /// Remove all columns from position `nr_columns` on from the active LP.
    pub fn shrink_columns(&mut self, nr_columns: usize) -> LpResult<()> {
        if nr_columns >= self.lp_columns.len() {
            return Ok(());
        }

        let removed = self.lp_columns.split_off(nr_columns);
        for &id in removed.iter().rev() {
            self.matrix.set_column_lp_position(id, None)?;
            let contribution = self.matrix.column(id).pseudo_contribution();
            self.loose_objective.add(contribution.as_ref());
        }
        debug!(component = "lpexact", operation = "shrink_columns", removed = removed.len());

        self.matrix.first_changed_column = self.matrix.first_changed_column.min(nr_columns);
        self.matrix.flushed = false;
        self.mark_unsolved();

        Ok(())
    }

    /// Remove all rows from position `nr_rows` on from the active LP, releasing them.
    pub fn shrink_rows(&mut self, nr_rows: usize) -> LpResult<()> {
        if nr_rows >= self.lp_rows.len() {
            return Ok(());
        }

        let removed = self.lp_rows.split_off(nr_rows);
        for &id in removed.iter().rev() {
            self.matrix.set_row_lp_position(id, None)?;
            self.release_row(id)?;
        }
        debug!(component = "lpexact", operation = "shrink_rows", removed = removed.len());

        self.matrix.first_changed_row = self.matrix.first_changed_row.min(nr_rows);
        self.matrix.flushed = false;
        self.mark_unsolved();

        Ok(())
    }

    /// Remove the rows of the active LP that are marked in `mask`, releasing them.
    ///
    /// # Arguments
    ///
    /// * `mask`: One value for each row in the active LP, `true` for the rows to remove.
    ///
    /// # Errors
    ///
    /// If the mask doesn't have one value for each row in the LP.
    pub fn delete_rowset(&mut self, mask: &[bool]) -> LpResult<()> {
        if mask.len() != self.lp_rows.len() {
            return Err(LpError::invalid(format!(
                "mask has length {}, but the LP has {} rows", mask.len(), self.lp_rows.len(),
            )));
        }
        let positions = mask.iter().enumerate()
            .filter(|&(_, &delete)| delete)
            .map(|(position, _)| position)
            .collect::<Vec<_>>();
        let Some(&first) = positions.first() else {
            return Ok(());
        };

        let removed = positions.iter().map(|&position| self.lp_rows[position]).collect::<Vec<_>>();
        index_utils::remove_indices(&mut self.lp_rows, &positions);
        for &id in &removed {
            self.matrix.set_row_lp_position(id, None)?;
        }
        let moved = self.lp_rows[first..].to_vec();
        for (offset, id) in moved.into_iter().enumerate() {
            self.matrix.set_row_lp_position(id, Some(first + offset))?;
        }
        for id in removed {
            self.release_row(id)?;
        }
        debug!(component = "lpexact", operation = "delete_rowset", removed = positions.len(), first);

        self.matrix.first_changed_row = self.matrix.first_changed_row.min(first);
        self.matrix.flushed = false;
        self.mark_unsolved();

        Ok(())
    }

    /// Remove all columns and rows from the active LP.
    pub fn clear(&mut self) -> LpResult<()> {
        self.shrink_columns(0)?;
        self.shrink_rows(0)
    }

    /// Queue a column for the next flush, if the backend has it.
    fn column_changed(&mut self, id: ColumnId, change: impl FnOnce(&mut Column)) {
        let column = self.matrix.column_mut(id);
        if column.solver_position.is_some() {
            let queued = column.objective_changed || column.bound_changed.values().any(|&changed| changed);
            change(column);
            if !queued {
                self.changed_columns.push(id);
            }
            self.matrix.flushed = false;
        }
    }

    /// Queue a row for the next flush, if the backend has it.
    fn row_changed(&mut self, id: RowId, directions: &[BoundDirection]) -> LpResult<()> {
        let row = self.matrix.row_mut(id)?;
        if row.solver_position.is_some() {
            let queued = row.side_changed.values().any(|&changed| changed);
            for &direction in directions {
                row.side_changed[direction] = true;
            }
            if !queued {
                self.changed_rows.push(id);
            }
            self.matrix.flushed = false;
        }

        Ok(())
    }

    /// Change the objective coefficient of a column.
    ///
    /// # Errors
    ///
    /// If the value is infinite.
    pub fn change_column_objective(&mut self, id: ColumnId, objective: Exact) -> LpResult<()> {
        if objective.is_infinite() {
            return Err(LpError::invalid(format!("objective of {} can't be infinite", id)));
        }
        if self.matrix.column(id).objective == objective {
            return Ok(());
        }

        self.update_column(id, |column| column.objective = objective);
        self.column_changed(id, |column| column.objective_changed = true);
        if self.matrix.column(id).lp_position.is_some() {
            self.flags.dual_feasible = false;
            self.flags.dual_checked = false;
            self.mark_unsolved();
        }

        Ok(())
    }

    /// Change the lower or upper bound of a column.
    ///
    /// # Errors
    ///
    /// If a lower bound is infinity or an upper bound is negative infinity.
    pub fn change_column_bound(&mut self, id: ColumnId, direction: BoundDirection, value: Exact) -> LpResult<()> {
        let invalid = match direction {
            BoundDirection::Lower => value == Exact::Infinity,
            BoundDirection::Upper => value == Exact::NegativeInfinity,
        };
        if invalid {
            return Err(LpError::invalid(format!("{:?} bound of {} can't be {}", direction, id, value)));
        }
        if self.matrix.column(id).bounds[direction] == value {
            return Ok(());
        }

        self.update_column(id, |column| column.bounds[direction] = value);
        self.column_changed(id, |column| column.bound_changed[direction] = true);
        if self.matrix.column(id).lp_position.is_some() {
            self.flags.primal_feasible = false;
            self.flags.primal_checked = false;
            self.mark_unsolved();
        }

        Ok(())
    }

    /// Change the left-hand side (`Lower`) or right-hand side (`Upper`) of a row.
    ///
    /// While diving, the old value is recorded to be restored when the dive ends.
    ///
    /// # Errors
    ///
    /// If a left-hand side is infinity or a right-hand side is negative infinity.
    pub fn change_row_side(&mut self, id: RowId, direction: BoundDirection, value: Exact) -> LpResult<()> {
        let invalid = match direction {
            BoundDirection::Lower => value == Exact::Infinity,
            BoundDirection::Upper => value == Exact::NegativeInfinity,
        };
        if invalid {
            return Err(LpError::invalid(format!("{:?} side of {} can't be {}", direction, id, value)));
        }
        let row = self.matrix.row_mut(id)?;
        if row.sides[direction] == value {
            return Ok(());
        }

        let old = std::mem::replace(&mut row.sides[direction], value);
        let in_lp = row.lp_position.is_some();
        if let Some(dive) = &mut self.dive {
            dive.side_log.push((id, direction, old));
        }
        self.row_changed(id, &[direction])?;
        if in_lp {
            self.flags.primal_feasible = false;
            self.flags.primal_checked = false;
            self.mark_unsolved();
        }

        Ok(())
    }

    /// Change the constant term of a row.
    ///
    /// # Errors
    ///
    /// If the row is locked or the constant is infinite.
    pub fn change_row_constant(&mut self, id: RowId, constant: Exact) -> LpResult<()> {
        if constant.is_infinite() {
            return Err(LpError::invalid(format!("constant of {} can't be infinite", id)));
        }
        let row = self.matrix.row_mut(id)?;
        if row.nr_locks > 0 {
            return Err(LpError::invalid(format!("row {} is locked", id)));
        }
        if row.constant == constant {
            return Ok(());
        }

        row.integral = row.integral && constant.is_integral();
        row.constant = constant;
        row.valid_activity_lp = None;
        let in_lp = row.lp_position.is_some();
        self.row_changed(id, &[BoundDirection::Lower, BoundDirection::Upper])?;
        if in_lp {
            self.flags.primal_feasible = false;
            self.flags.primal_checked = false;
            self.mark_unsolved();
        }

        Ok(())
    }

    /// Invalidate the solution if a coefficient that the backend sees changed.
    fn coefficient_edited(&mut self, column: ColumnId, row: RowId) -> LpResult<()> {
        if self.matrix.column(column).lp_position.is_some() && self.matrix.row(row)?.lp_position.is_some() {
            self.flags.primal_feasible = false;
            self.flags.dual_feasible = false;
            self.flags.primal_checked = false;
            self.flags.dual_checked = false;
            self.mark_unsolved();
        }

        Ok(())
    }

    /// Add a coefficient that doesn't exist yet, starting from the column.
    pub fn add_column_coefficient(&mut self, column: ColumnId, row: RowId, value: Exact) -> LpResult<()> {
        self.matrix.add_column_coefficient(column, row, value)?;
        self.coefficient_edited(column, row)
    }

    /// Set a coefficient, starting from the column.
    pub fn change_column_coefficient(&mut self, column: ColumnId, row: RowId, value: Exact) -> LpResult<()> {
        self.matrix.change_coefficient(column, row, value)?;
        self.coefficient_edited(column, row)
    }

    /// Remove a coefficient, starting from the column.
    pub fn delete_column_coefficient(&mut self, column: ColumnId, row: RowId) -> LpResult<()> {
        self.matrix.delete_coefficient(column, row)?;
        self.coefficient_edited(column, row)
    }

    /// Add a coefficient that doesn't exist yet, starting from the row.
    pub fn add_row_coefficient(&mut self, row: RowId, column: ColumnId, value: Exact) -> LpResult<()> {
        self.matrix.add_row_coefficient(row, column, value)?;
        self.coefficient_edited(column, row)
    }

    /// Add a value to a coefficient.
    pub fn increase_row_coefficient(&mut self, row: RowId, column: ColumnId, increment: Exact) -> LpResult<()> {
        self.matrix.increase_row_coefficient(row, column, increment)?;
        self.coefficient_edited(column, row)
    }

    /// Set a coefficient, starting from the row.
    pub fn change_row_coefficient(&mut self, row: RowId, column: ColumnId, value: Exact) -> LpResult<()> {
        self.matrix.change_coefficient(column, row, value)?;
        self.coefficient_edited(column, row)
    }

    /// Remove a coefficient, starting from the row.
    pub fn delete_row_coefficient(&mut self, row: RowId, column: ColumnId) -> LpResult<()> {
        self.matrix.delete_coefficient(column, row)?;
        self.coefficient_edited(column, row)
    }

    /// Add a batch of coefficients to a row.
    ///
    /// A row that is not linked to anything collects the coefficients unsorted and is merged
    /// afterwards, such that repeated columns are summed.
    pub fn add_row_coefficients(&mut self, row: RowId, coefficients: &[(ColumnId, Exact)]) -> LpResult<()> {
        let current = self.matrix.row(row)?;
        let batch = !current.delay_sort
            && current.lp_position.is_none()
            && current.entries.nr_unlinked() == current.entries.len();

        if batch {
            self.matrix.delay_row_sort(row)?;
        }
        for (column, value) in coefficients {
            self.add_row_coefficient(row, *column, value.clone())?;
        }
        if batch {
            self.matrix.force_row_sort(row)?;
        }

        Ok(())
    }

    /// Start collecting coefficients of a row without sorting.
    pub fn delay_row_sort(&mut self, row: RowId) -> LpResult<()> {
        self.matrix.delay_row_sort(row)
    }

    /// Merge the coefficients collected since `delay_row_sort`.
    pub fn force_row_sort(&mut self, row: RowId) -> LpResult<()> {
        self.matrix.force_row_sort(row)
    }

    /// Whether all invariants of the LP hold.
    ///
    /// Expensive, meant for tests.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let prefix = |active: &[usize], solver: &[usize], first_changed: usize| {
            first_changed <= active.len().min(solver.len())
                && active[..first_changed] == solver[..first_changed]
        };
        let active_columns = self.lp_columns.iter().map(|id| id.0).collect::<Vec<_>>();
        let solver_columns = self.matrix.solver_columns.iter().map(|id| id.0).collect::<Vec<_>>();
        let active_rows = self.lp_rows.iter().map(|id| id.0).collect::<Vec<_>>();
        let solver_rows = self.matrix.solver_rows.iter().map(|id| id.0).collect::<Vec<_>>();

        let positions = self.lp_columns.iter().enumerate()
            .all(|(position, &id)| self.matrix.column(id).lp_position == Some(position))
            && self.lp_rows.iter().enumerate()
                .all(|(position, &id)| self.matrix.row(id).is_ok_and(|row| row.lp_position == Some(position)));
        let no_zeros = self.matrix.columns.iter().all(|column| column.entries.iter().all(|(_, value, _)| !value.is_zero()))
            && self.matrix.rows.iter().flatten().all(|row| row.entries.iter().all(|(_, value, _)| !value.is_zero()));

        [
            self.matrix.is_consistent(),
            prefix(&active_columns, &solver_columns, self.matrix.first_changed_column),
            prefix(&active_rows, &solver_rows, self.matrix.first_changed_row),
            positions,
            no_zeros,
            self.solver.nr_columns() == self.matrix.solver_columns.len(),
            self.solver.nr_rows() == self.matrix.solver_rows.len(),
        ].iter().all(|v| *v)
    }
}
