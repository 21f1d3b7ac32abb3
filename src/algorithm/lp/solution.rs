//! # Solution values
//!
//! Queries on the last solution, saving and restoring it, and rounding it into the floating point
//! shadow.
use std::cmp::Ordering;

use num_traits::Zero;

use crate::algorithm::lp::{ExactLp, Flags};
use crate::data::linear_program::column::Column;
use crate::data::linear_program::elements::{BoundDirection, LpStatus};
use crate::data::linear_program::handle::{ColumnId, RowId};
use crate::data::linear_program::matrix::row_in_mut;
use crate::data::linear_program::shadow::ShadowLp;
use crate::data::number_types::exact::{Exact, RoundingMode};
use crate::error::{LpError, LpResult};
use crate::interface::LpSolver;

/// LP-wide part of a saved solution. The values of the columns and rows are saved in the objects
/// themselves.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoredLp {
    /// Status at the moment of saving.
    pub status: LpStatus,
    /// Backend objective value at the moment of saving.
    pub objective_value: Exact,
    /// What was known about the solution.
    pub flags: Flags,
}

/// Value of a column in the pseudo solution. An infinite best bound counts as zero.
fn pseudo_value(column: &Column) -> Exact {
    let direction = if column.objective.is_negative() {
        BoundDirection::Upper
    } else {
        BoundDirection::Lower
    };
    let bound = &column.bounds[direction];

    if bound.is_finite() { bound.clone() } else { Exact::zero() }
}

impl<S: LpSolver> ExactLp<S> {
    /// Whether the columns and rows hold values of a solution of the current LP.
    #[must_use]
    pub fn has_solution(&self) -> bool {
        self.flags.solved && matches!(self.status, LpStatus::Optimal | LpStatus::ObjectiveLimit)
    }

    /// Save the current solution, such that it can be restored after the LP was modified and
    /// solved again.
    pub fn store_solution(&mut self) -> LpResult<()> {
        for &id in &self.lp_columns {
            self.matrix.columns[id.0].store_solution();
        }
        for &id in &self.lp_rows {
            row_in_mut(&mut self.matrix.rows, id)?.store_solution();
        }
        self.stored = Some(StoredLp {
            status: self.status,
            objective_value: self.objective_value.clone(),
            flags: self.flags,
        });

        Ok(())
    }

    /// Bring back the solution saved by `store_solution`.
    ///
    /// The restored values count as values of the latest solve.
    ///
    /// # Errors
    ///
    /// If no solution was saved.
    pub fn restore_solution(&mut self) -> LpResult<()> {
        let stored = self.stored.take()
            .ok_or_else(|| LpError::NoSolution("no solution was stored".to_string()))?;

        let lp_count = self.lp_count;
        for &id in &self.lp_columns {
            self.matrix.columns[id.0].restore_solution(lp_count);
        }
        for &id in &self.lp_rows {
            row_in_mut(&mut self.matrix.rows, id)?.restore_solution(lp_count);
        }
        self.status = stored.status;
        self.objective_value = stored.objective_value;
        self.flags = stored.flags;

        Ok(())
    }

    /// Activity of a row in the current solution, including its constant.
    ///
    /// # Errors
    ///
    /// If the LP has no solution, or the row doesn't exist.
    pub fn row_activity(&mut self, id: RowId) -> LpResult<Exact> {
        if !self.has_solution() {
            return Err(LpError::NoSolution(format!("activity of {} requested", id)));
        }
        let lp_count = self.lp_count;
        let row = self.matrix.row(id)?;
        if row.valid_activity_lp == Some(lp_count) {
            return Ok(row.activity.clone());
        }

        let mut activity = row.constant.clone();
        for (column, value, _) in row.entries.iter() {
            let column = self.matrix.column(column);
            if column.lp_position.is_some() {
                activity.add_product(value, &column.primal);
            }
        }

        let row = self.matrix.row_mut(id)?;
        row.activity = activity.clone();
        row.valid_activity_lp = Some(lp_count);

        Ok(activity)
    }

    /// Activity of a row in the pseudo solution, including its constant.
    pub fn row_pseudo_activity(&self, id: RowId) -> LpResult<Exact> {
        let row = self.matrix.row(id)?;
        let mut activity = row.constant.clone();
        for (column, value, _) in row.entries.iter() {
            activity.add_product(value, &pseudo_value(self.matrix.column(column)));
        }

        Ok(activity)
    }

    /// Smallest activity of a row within the column bounds, including its constant.
    pub fn row_min_activity(&self, id: RowId) -> LpResult<Exact> {
        self.row_extreme_activity(id, BoundDirection::Lower)
    }

    /// Largest activity of a row within the column bounds, including its constant.
    pub fn row_max_activity(&self, id: RowId) -> LpResult<Exact> {
        self.row_extreme_activity(id, BoundDirection::Upper)
    }

    fn row_extreme_activity(&self, id: RowId, extreme: BoundDirection) -> LpResult<Exact> {
        let row = self.matrix.row(id)?;
        let mut activity = row.constant.clone();
        for (column, value, _) in row.entries.iter() {
            let direction = if value.is_positive() { extreme } else { !extreme };
            activity.add_product(value, &self.matrix.column(column).bounds[direction]);
        }

        Ok(activity)
    }

    /// Distance of the activity of a row to its nearest side, negative if the row is violated.
    ///
    /// # Errors
    ///
    /// If the LP has no solution, or the row doesn't exist.
    pub fn row_feasibility(&mut self, id: RowId) -> LpResult<Exact> {
        let activity = self.row_activity(id)?;
        let row = self.matrix.row(id)?;
        let to_rhs = &row.sides[BoundDirection::Upper] - &activity;
        let to_lhs = &activity - &row.sides[BoundDirection::Lower];

        Ok(to_rhs.min(to_lhs))
    }

    /// Whether the reduced cost of a column has the right sign for its primal value: a positive
    /// reduced cost requires the column at its lower bound, a negative one at its upper bound.
    ///
    /// # Errors
    ///
    /// If the LP has no solution.
    pub fn column_reduced_cost_feasibility(&self, id: ColumnId) -> LpResult<bool> {
        if !self.has_solution() {
            return Err(LpError::NoSolution(format!("reduced cost of {} requested", id)));
        }
        let column = self.matrix.column(id);
        let at = |direction: BoundDirection| column.primal == column.bounds[direction];

        Ok(match column.reduced_cost.sign() {
            Ordering::Greater => at(BoundDirection::Lower),
            Ordering::Less => at(BoundDirection::Upper),
            Ordering::Equal => true,
        })
    }

    /// Write the current values, rounded to the nearest float, into the shadow. The objective
    /// value is rounded down, such that it remains a valid bound.
    pub fn overwrite_shadow(&self, shadow: &mut ShadowLp) {
        for &id in &self.lp_columns {
            let column = self.matrix.column(id);
            let values = shadow.column_mut(id);
            values.primal = column.primal.to_f64(RoundingMode::Nearest);
            values.reduced_cost = column.reduced_cost.to_f64(RoundingMode::Nearest);
            values.farkas_coefficient = column.farkas_coefficient.to_f64(RoundingMode::Nearest);
            values.basis = Some(column.basis);
        }
        for &id in &self.lp_rows {
            if let Ok(row) = self.matrix.row(id) {
                let values = shadow.row_mut(id);
                values.dual = row.dual.to_f64(RoundingMode::Nearest);
                values.activity = row.activity.to_f64(RoundingMode::Nearest);
                values.dual_farkas = row.dual_farkas.to_f64(RoundingMode::Nearest);
                values.basis = Some(row.basis);
            }
        }
        shadow.objective_value = self.objective_value().to_f64(RoundingMode::Down);
        shadow.status = self.status;
        shadow.solved = self.flags.solved;
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::lp::solution::pseudo_value;
    use crate::data::linear_program::column::Column;
    use crate::data::linear_program::handle::VariableId;
    use crate::data::number_types::exact::Exact;
    use crate::R;

    #[test]
    fn pseudo_values() {
        let column = Column::new(VariableId(0), false, R!(1), R!(-2), R!(5));
        assert_eq!(pseudo_value(&column), R!(-2));
        let column = Column::new(VariableId(0), false, R!(-1), R!(-2), R!(5));
        assert_eq!(pseudo_value(&column), R!(5));
        let column = Column::new(VariableId(0), false, R!(0), Exact::NegativeInfinity, R!(5));
        assert_eq!(pseudo_value(&column), R!(0));
    }
}
