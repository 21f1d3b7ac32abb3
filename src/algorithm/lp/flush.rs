//! # Flushing
//!
//! Bring the backend in line with the active LP. The steps are ordered: deletions come first,
//! because they shift the positions of everything after them, and rows are deleted before any
//! column is added, such that the coefficients of new columns never refer to a stale row.
use std::mem;

use enum_map::EnumMap;
use tracing::{debug, trace};

use crate::algorithm::lp::ExactLp;
use crate::data::linear_program::adjacency::Partition;
use crate::data::linear_program::elements::BoundDirection;
use crate::data::linear_program::matrix::row_in_mut;
use crate::data::number_types::exact::Exact;
use crate::error::LpResult;
use crate::interface::{ColumnBatch, LpSolver, RowBatch};

impl<S: LpSolver> ExactLp<S> {
    /// Apply all pending modifications to the backend.
    ///
    /// Flushing an LP that is already flushed doesn't call the backend.
    ///
    /// # Errors
    ///
    /// If the backend rejects a modification.
    pub fn flush(&mut self) -> LpResult<()> {
        if self.matrix.flushed {
            trace!(component = "lpexact", operation = "flush", "nothing to flush");
            return Ok(());
        }

        self.flush_deleted_columns()?;
        self.flush_deleted_rows()?;
        self.flush_changed_columns()?;
        self.flush_changed_rows()?;
        self.flush_added_columns()?;
        self.flush_added_rows()?;

        self.matrix.flushed = true;
        debug!(
            component = "lpexact",
            operation = "flush",
            columns = self.matrix.solver_columns.len(),
            rows = self.matrix.solver_rows.len(),
        );
        debug_assert_eq!(self.matrix.solver_columns, self.lp_columns);
        debug_assert_eq!(self.matrix.solver_rows, self.lp_rows);

        Ok(())
    }

    /// A value as the backend should see it, with infinities replaced by its sentinel.
    fn to_solver(&self, value: &Exact) -> Exact {
        match value {
            Exact::Infinity => self.solver.infinity(),
            Exact::NegativeInfinity => -self.solver.infinity(),
            Exact::Finite(_) => value.clone(),
        }
    }

    fn flush_deleted_columns(&mut self) -> LpResult<()> {
        let nr_solver = self.matrix.solver_columns.len();
        let mut first = self.matrix.first_changed_column;
        while first < nr_solver
            && first < self.lp_columns.len()
            && self.matrix.solver_columns[first] == self.lp_columns[first]
            && !self.matrix.column(self.lp_columns[first]).coefficient_changed {
            first += 1;
        }

        if first < nr_solver {
            trace!(component = "lpexact", operation = "delete_columns", first, last = nr_solver - 1);
            self.solver.delete_columns(first..=nr_solver - 1)?;
            for id in self.matrix.solver_columns.split_off(first) {
                self.matrix.column_mut(id).detach_from_solver();
            }
            self.mark_unsolved();
        }
        self.matrix.first_changed_column = first;

        Ok(())
    }

    fn flush_deleted_rows(&mut self) -> LpResult<()> {
        let nr_solver = self.matrix.solver_rows.len();
        let mut first = self.matrix.first_changed_row;
        while first < nr_solver
            && first < self.lp_rows.len()
            && self.matrix.solver_rows[first] == self.lp_rows[first]
            && !self.matrix.row(self.lp_rows[first])?.coefficient_changed {
            first += 1;
        }

        if first < nr_solver {
            trace!(component = "lpexact", operation = "delete_rows", first, last = nr_solver - 1);
            self.solver.delete_rows(first..=nr_solver - 1)?;
            // Rows that were released in the meantime are gone already.
            for id in self.matrix.solver_rows.split_off(first) {
                if let Ok(row) = self.matrix.row_mut(id) {
                    row.detach_from_solver();
                }
            }
            self.mark_unsolved();
        }
        self.matrix.first_changed_row = first;

        Ok(())
    }

    fn flush_changed_columns(&mut self) -> LpResult<()> {
        let mut objective_indices = Vec::new();
        let mut objective = Vec::new();
        let mut bound_indices = Vec::new();
        let mut lower = Vec::new();
        let mut upper = Vec::new();

        for &id in &self.changed_columns {
            let column = self.matrix.column(id);
            if let Some(position) = column.solver_position {
                if column.objective_changed && column.objective != column.flushed_objective {
                    objective_indices.push(position);
                    objective.push(column.objective.clone());
                }
                if column.bound_changed.values().any(|&changed| changed) && column.bounds != column.flushed_bounds {
                    bound_indices.push(position);
                    lower.push(self.to_solver(&column.bounds[BoundDirection::Lower]));
                    upper.push(self.to_solver(&column.bounds[BoundDirection::Upper]));
                }
            }
        }

        if !objective_indices.is_empty() {
            trace!(component = "lpexact", operation = "change_objective", count = objective_indices.len());
            self.solver.change_objective(&objective_indices, &objective)?;
            self.mark_unsolved();
        }
        if !bound_indices.is_empty() {
            trace!(component = "lpexact", operation = "change_bounds", count = bound_indices.len());
            self.solver.change_bounds(&bound_indices, &lower, &upper)?;
            self.mark_unsolved();
        }

        // Only what the backend accepted counts as flushed; a failed call leaves the queue for the
        // next flush.
        for id in mem::take(&mut self.changed_columns) {
            let column = self.matrix.column_mut(id);
            column.flushed_objective = column.objective.clone();
            column.flushed_bounds = column.bounds.clone();
            column.objective_changed = false;
            column.bound_changed = Default::default();
        }

        Ok(())
    }

    fn flush_changed_rows(&mut self) -> LpResult<()> {
        let mut indices = Vec::new();
        let mut lhs = Vec::new();
        let mut rhs = Vec::new();

        for &id in &self.changed_rows {
            let Ok(row) = self.matrix.row(id) else {
                continue;
            };
            if let Some(position) = row.solver_position {
                if sides_differ(&row.sides, &row.flushed_sides) || row.constant != row.flushed_constant {
                    indices.push(position);
                    lhs.push(self.to_solver(&row.solver_side(BoundDirection::Lower)));
                    rhs.push(self.to_solver(&row.solver_side(BoundDirection::Upper)));
                }
            }
        }

        if !indices.is_empty() {
            trace!(component = "lpexact", operation = "change_sides", count = indices.len());
            self.solver.change_sides(&indices, &lhs, &rhs)?;
            self.mark_unsolved();
        }

        for id in mem::take(&mut self.changed_rows) {
            if let Ok(row) = self.matrix.row_mut(id) {
                row.flushed_sides = row.sides.clone();
                row.flushed_constant = row.constant.clone();
                row.side_changed = Default::default();
            }
        }

        Ok(())
    }

    fn flush_added_columns(&mut self) -> LpResult<()> {
        let start = self.matrix.solver_columns.len();
        debug_assert_eq!(start, self.matrix.first_changed_column);
        if start == self.lp_columns.len() {
            return Ok(());
        }

        let mut batch = ColumnBatch::default();
        for position in start..self.lp_columns.len() {
            let id = self.lp_columns[position];
            self.matrix.link_column(id)?;

            let column = self.matrix.column(id);
            batch.objective.push(column.objective.clone());
            batch.lower.push(self.to_solver(&column.bounds[BoundDirection::Lower]));
            batch.upper.push(self.to_solver(&column.bounds[BoundDirection::Upper]));
            batch.begin.push(batch.indices.len());
            for entry in column.entries.range(Partition::Lp) {
                let row = self.matrix.row(column.entries.partner(entry))?;
                if let Some(row_position) = row.solver_position {
                    batch.indices.push(row_position);
                    batch.values.push(column.entries.value(entry).clone());
                }
            }

        }

        trace!(component = "lpexact", operation = "add_columns", count = batch.len(), nonzeros = batch.indices.len());
        self.solver.add_columns(&batch)?;
        for position in start..self.lp_columns.len() {
            let id = self.lp_columns[position];
            let column = self.matrix.column_mut(id);
            column.solver_position = Some(position);
            column.flushed_objective = column.objective.clone();
            column.flushed_bounds = column.bounds.clone();
            column.objective_changed = false;
            column.bound_changed = Default::default();
            column.coefficient_changed = false;
            self.matrix.solver_columns.push(id);
        }
        self.matrix.first_changed_column = self.lp_columns.len();
        self.flags.dual_feasible = false;
        self.flags.dual_checked = false;
        self.mark_unsolved();

        Ok(())
    }

    fn flush_added_rows(&mut self) -> LpResult<()> {
        let start = self.matrix.solver_rows.len();
        debug_assert_eq!(start, self.matrix.first_changed_row);
        if start == self.lp_rows.len() {
            return Ok(());
        }

        let mut batch = RowBatch::default();
        for position in start..self.lp_rows.len() {
            let id = self.lp_rows[position];
            self.matrix.link_row(id)?;

            let row = self.matrix.row(id)?;
            batch.lhs.push(self.to_solver(&row.solver_side(BoundDirection::Lower)));
            batch.rhs.push(self.to_solver(&row.solver_side(BoundDirection::Upper)));
            batch.begin.push(batch.indices.len());
            for entry in row.entries.range(Partition::Lp) {
                let column = self.matrix.column(row.entries.partner(entry));
                if let Some(column_position) = column.solver_position {
                    batch.indices.push(column_position);
                    batch.values.push(row.entries.value(entry).clone());
                }
            }

        }

        trace!(component = "lpexact", operation = "add_rows", count = batch.len(), nonzeros = batch.indices.len());
        self.solver.add_rows(&batch)?;
        for position in start..self.lp_rows.len() {
            let id = self.lp_rows[position];
            let row = row_in_mut(&mut self.matrix.rows, id)?;
            row.solver_position = Some(position);
            row.flushed_sides = row.sides.clone();
            row.flushed_constant = row.constant.clone();
            row.side_changed = Default::default();
            row.coefficient_changed = false;
            self.matrix.solver_rows.push(id);
        }
        self.matrix.first_changed_row = self.lp_rows.len();
        self.flags.primal_feasible = false;
        self.flags.primal_checked = false;
        self.mark_unsolved();

        Ok(())
    }
}

/// Whether the sides of a row have to be sent to the backend again.
///
/// The pair is sent as soon as one of them differs from the value last sent.
fn sides_differ(sides: &EnumMap<BoundDirection, Exact>, flushed: &EnumMap<BoundDirection, Exact>) -> bool {
    sides[BoundDirection::Lower] != flushed[BoundDirection::Lower]
        || sides[BoundDirection::Upper] != flushed[BoundDirection::Upper]
}

#[cfg(test)]
mod test {
    use enum_map::enum_map;

    use crate::algorithm::lp::flush::sides_differ;
    use crate::data::linear_program::elements::BoundDirection;
    use crate::data::number_types::exact::Exact;
    use crate::R;

    #[test]
    fn side_comparison() {
        let flushed = enum_map! { BoundDirection::Lower => R!(0), BoundDirection::Upper => R!(1) };
        let neither = flushed.clone();
        let lhs = enum_map! { BoundDirection::Lower => R!(-1), BoundDirection::Upper => R!(1) };
        let rhs = enum_map! { BoundDirection::Lower => R!(0), BoundDirection::Upper => Exact::Infinity };
        let both = enum_map! { BoundDirection::Lower => R!(-1), BoundDirection::Upper => R!(2) };

        assert!(!sides_differ(&neither, &flushed));
        assert!(sides_differ(&lhs, &flushed));
        assert!(sides_differ(&rhs, &flushed));
        assert!(sides_differ(&both, &flushed));
    }
}
