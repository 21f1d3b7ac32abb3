//! # Diving
//!
//! A dive temporarily changes objective coefficients, column bounds and row sides, and appends
//! rows, to explore a part of the search space with the LP. Ending the dive brings everything
//! back to the state at its start.
use tracing::{debug, warn};

use crate::algorithm::lp::solve::iteration_limit_code;
use crate::algorithm::lp::{ExactLp, Flags};
use crate::data::linear_program::elements::BoundDirection;
use crate::data::linear_program::handle::{ColumnId, RowId};
use crate::data::linear_program::problem::Problem;
use crate::data::number_types::exact::Exact;
use crate::error::{LpError, LpResult};
use crate::interface::{IntParameter, LpSolver};

/// What is needed to undo a dive.
#[derive(Clone, Debug)]
pub(crate) struct Dive<St> {
    /// Warm start information of the backend at the start.
    state: St,
    flags: Flags,
    /// Whether the solution at the start was saved.
    stored: bool,
    nr_rows: usize,
    iteration_limit: Option<usize>,
    /// Row sides before they were changed, in the order of the changes.
    pub(crate) side_log: Vec<(RowId, BoundDirection, Exact)>,
}

impl<S: LpSolver> ExactLp<S> {
    /// Whether a dive is in progress.
    #[must_use]
    pub fn is_diving(&self) -> bool {
        self.dive.is_some()
    }

    /// Start a dive.
    ///
    /// # Arguments
    ///
    /// * `store_solution`: Whether to save the current solution, such that it is available again
    /// after the dive without solving. Only a solved LP has a solution to save.
    ///
    /// # Errors
    ///
    /// If a dive is already in progress, or the LP can't be flushed.
    pub fn start_dive(&mut self, store_solution: bool) -> LpResult<()> {
        if self.dive.is_some() {
            return Err(LpError::invalid("a dive is already in progress"));
        }

        self.flush()?;
        let state = self.solver.state()?;
        let stored = store_solution && self.flags.solved;
        if stored {
            self.store_solution()?;
        }
        self.dive = Some(Dive {
            state,
            flags: self.flags,
            stored,
            nr_rows: self.lp_rows.len(),
            iteration_limit: self.settings.iteration_limit,
            side_log: Vec::new(),
        });
        debug!(component = "lpexact", operation = "start_dive", rows = self.lp_rows.len(), store_solution);

        Ok(())
    }

    /// Limit the number of iterations of the solves within a dive. The limit of the settings is
    /// restored when the dive ends.
    pub fn set_iteration_limit(&mut self, limit: Option<usize>) {
        self.settings.iteration_limit = limit;
    }

    /// End the dive.
    ///
    /// Objective coefficients and bounds of all columns are reset to those of the variables. Row
    /// sides are reset to their values at the start, rows added during the dive are removed, and
    /// the solution at the start is restored if it was saved.
    ///
    /// # Errors
    ///
    /// If no dive is in progress, or the LP can't be flushed. In the latter case the dive stays in
    /// progress, and ending it can be tried again.
    pub fn end_dive(&mut self, problem: &Problem) -> LpResult<()> {
        let dive = self.dive.take()
            .ok_or_else(|| LpError::invalid("no dive is in progress"))?;

        if let Err(error) = self.undo_dive(problem, &dive) {
            warn!(component = "lpexact", operation = "end_dive", %error, "dive not undone");
            self.dive = Some(dive);
            return Err(error);
        }

        self.settings.iteration_limit = dive.iteration_limit;
        if let Err(error) = self.solver.set_state(&dive.state) {
            warn!(component = "lpexact", operation = "end_dive", %error, "warm start information not restored");
        }

        if dive.stored {
            self.restore_solution()?;
        } else {
            self.mark_unsolved();
            self.flags = Flags {
                solved: false,
                ..dive.flags
            };
        }
        debug!(component = "lpexact", operation = "end_dive", side_changes = dive.side_log.len(), status = %self.status);

        Ok(())
    }

    /// Bring the LP and the backend back to the start of a dive. Every step can be repeated.
    fn undo_dive(&mut self, problem: &Problem, dive: &Dive<S::State>) -> LpResult<()> {
        for index in 0..self.matrix.columns.len() {
            let id = ColumnId(index);
            let variable = problem.variable(self.matrix.columns[index].variable);
            self.change_column_objective(id, variable.objective.clone())?;
            for direction in [BoundDirection::Lower, BoundDirection::Upper] {
                self.change_column_bound(id, direction, variable.bounds[direction].clone())?;
            }
        }

        for (id, direction, value) in dive.side_log.iter().rev() {
            // Rows that were released during the dive don't need their sides back.
            if self.matrix.row(*id).is_ok() {
                self.change_row_side(*id, *direction, value.clone())?;
            }
        }

        self.shrink_rows(dive.nr_rows)?;
        self.flush()?;
        self.solver.set_int_parameter(IntParameter::IterationLimit, iteration_limit_code(dive.iteration_limit))?;

        Ok(())
    }
}
