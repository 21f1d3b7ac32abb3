//! # Solving
//!
//! One exact solve: flush, configure the backend, run it, and turn its answer into a status with a
//! certificate.
use tracing::{debug, error, warn};

use crate::algorithm::lp::ExactLp;
use crate::data::linear_program::elements::LpStatus;
use crate::data::linear_program::shadow::ShadowLp;
use crate::data::number_types::exact::Exact;
use crate::error::{LpError, LpResult};
use crate::interface::{IntParameter, LpSolver, Pricing, RealParameter};

/// Result of a call to `ExactLp::solve`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SolveOutcome {
    /// Status of the LP after the solve.
    pub status: LpStatus,
    /// The backend failed, also after the fallback.
    pub solve_error: bool,
    /// The objective value (or infeasibility) was certified in exact arithmetic.
    pub proved_bound: bool,
    /// The backend gave an answer that couldn't be certified. The caller should resolve in a
    /// different way, for example from scratch and without bound certification shortcuts.
    pub needs_recovery: bool,
}

impl SolveOutcome {
    fn new(status: LpStatus) -> Self {
        Self {
            status,
            solve_error: false,
            proved_bound: false,
            needs_recovery: false,
        }
    }
}

/// Value of the iteration limit parameter.
pub(crate) fn iteration_limit_code(limit: Option<usize>) -> i64 {
    limit.map_or(i64::MAX, |limit| i64::try_from(limit).unwrap_or(i64::MAX))
}

impl<S: LpSolver> ExactLp<S> {
    /// Solve the LP, writing the solution into the shadow if the settings say so.
    ///
    /// # Errors
    ///
    /// If flushing fails, or if the backend ends up in a state that none of the outcomes describes.
    /// Failures of the solve itself are reported through `SolveOutcome::solve_error`.
    pub fn solve(&mut self, shadow: &mut ShadowLp) -> LpResult<SolveOutcome> {
        let overwrite = self.settings.overwrite_shadow;
        self.solve_and_overwrite(shadow, overwrite)
    }

    /// Solve the LP.
    ///
    /// # Arguments
    ///
    /// * `shadow`: Provides the basis to warm start from.
    /// * `overwrite`: Whether to write the exact solution, rounded, into the shadow.
    pub fn solve_and_overwrite(&mut self, shadow: &mut ShadowLp, overwrite: bool) -> LpResult<SolveOutcome> {
        self.flush()?;

        let time_limit = match self.settings.time_limit {
            Some(limit) => {
                let remaining = limit - self.clock.elapsed().as_secs_f64();
                if remaining <= 0. {
                    debug!(component = "lpexact", operation = "solve", "time budget exhausted before solving");
                    self.status = LpStatus::TimeLimit;
                    self.flags.solved = true;
                    return Ok(SolveOutcome::new(LpStatus::TimeLimit));
                }
                Exact::from_f64(remaining).unwrap_or(Exact::Infinity)
            },
            None => Exact::Infinity,
        };
        self.solver.set_real_parameter(RealParameter::TimeLimit, time_limit)?;
        self.warm_start(shadow)?;
        let limit = self.objective_limit();
        self.solver.set_real_parameter(RealParameter::ObjectiveLimit, limit.clone())?;
        self.solver.set_int_parameter(IntParameter::IterationLimit, iteration_limit_code(self.settings.iteration_limit))?;

        if !self.run_solver()? {
            self.status = LpStatus::Error;
            self.flags.solved = false;
            return Ok(SolveOutcome {
                solve_error: true,
                ..SolveOutcome::new(LpStatus::Error)
            });
        }
        self.lp_count += 1;

        let mut status = self.classify().ok_or_else(|| {
            error!(component = "lpexact", operation = "solve", "backend reports no known outcome");
            LpError::Internal("the backend reports no known outcome".to_string())
        });
        if status.is_err() {
            self.mark_unsolved();
        }
        if matches!(status, Ok(LpStatus::ObjectiveLimit)) && self.solver.objective_value()? < limit {
            status = self.resolve_objective_limit(&limit);
        }

        let outcome = self.interpret(status?, &limit, shadow, overwrite)?;
        if overwrite {
            shadow.status = self.status;
            shadow.solved = self.flags.solved;
        }
        debug!(
            component = "lpexact",
            operation = "solve",
            status = %outcome.status,
            proved = outcome.proved_bound,
            iterations = self.solver.iterations(),
            lp_count = self.lp_count,
        );

        Ok(outcome)
    }

    /// Give the backend the basis of the shadow, or let it start from scratch.
    fn warm_start(&mut self, shadow: &ShadowLp) -> LpResult<()> {
        let basis = if self.settings.from_scratch {
            None
        } else {
            shadow.basis(&self.matrix.solver_columns, &self.matrix.solver_rows)
        };

        match basis {
            Some((columns, rows)) => {
                self.solver.set_basis(&columns, &rows)?;
                self.solver.set_int_parameter(IntParameter::FromScratch, 0)?;
            },
            None => self.solver.set_int_parameter(IntParameter::FromScratch, 1)?,
        }

        Ok(())
    }

    /// Solve with the dual simplex method, and if that fails, with the primal simplex method from
    /// scratch.
    ///
    /// # Return value
    ///
    /// Whether one of the two succeeded.
    fn run_solver(&mut self) -> LpResult<bool> {
        match self.solver.solve_dual() {
            Ok(()) => return Ok(true),
            Err(error) => warn!(
                component = "lpexact",
                operation = "solve",
                %error,
                "dual simplex failed, retrying with primal simplex from scratch",
            ),
        }

        self.solver.set_int_parameter(IntParameter::FromScratch, 1)?;
        match self.solver.solve_primal() {
            Ok(()) => Ok(true),
            Err(error) => {
                error!(component = "lpexact", operation = "solve", %error, "primal simplex failed as well");
                Ok(false)
            },
        }
    }

    /// The outcome that the backend reports, if it reports one.
    fn classify(&self) -> Option<LpStatus> {
        let solver = &self.solver;
        if solver.is_objective_limit_exceeded() {
            Some(LpStatus::ObjectiveLimit)
        } else if solver.is_optimal() {
            Some(LpStatus::Optimal)
        } else if solver.is_primal_infeasible() {
            Some(LpStatus::Infeasible)
        } else if solver.is_primal_unbounded() {
            Some(LpStatus::UnboundedRay)
        } else if solver.is_iteration_limit_exceeded() {
            Some(LpStatus::IterationLimit)
        } else if solver.is_time_limit_exceeded() {
            Some(LpStatus::TimeLimit)
        } else {
            None
        }
    }

    /// The backend stopped on the objective limit, but its objective value doesn't exceed it.
    ///
    /// Some backends stop before the last pivot that moves the objective value beyond the limit.
    /// That pivot is made by a single dual simplex iteration from the current basis, with steepest
    /// edge pricing and without a limit.
    fn resolve_objective_limit(&mut self, limit: &Exact) -> LpResult<LpStatus> {
        warn!(component = "lpexact", operation = "solve", %limit, "objective limit reported below the limit, resolving");

        let from_scratch = self.solver.int_parameter(IntParameter::FromScratch)?;
        let pricing = self.solver.int_parameter(IntParameter::Pricing)?;
        let iteration_limit = self.solver.int_parameter(IntParameter::IterationLimit)?;
        self.solver.set_real_parameter(RealParameter::ObjectiveLimit, Exact::Infinity)?;
        self.solver.set_int_parameter(IntParameter::FromScratch, 0)?;
        self.solver.set_int_parameter(IntParameter::Pricing, Pricing::SteepestEdge.code())?;
        self.solver.set_int_parameter(IntParameter::IterationLimit, 1)?;

        let solved = self.solver.solve_dual();

        self.solver.set_real_parameter(RealParameter::ObjectiveLimit, limit.clone())?;
        self.solver.set_int_parameter(IntParameter::FromScratch, from_scratch)?;
        self.solver.set_int_parameter(IntParameter::Pricing, pricing)?;
        self.solver.set_int_parameter(IntParameter::IterationLimit, iteration_limit)?;

        let status = match solved {
            Ok(()) => self.classify(),
            Err(error) => {
                error!(component = "lpexact", operation = "solve", %error, "resolve for the objective limit failed");
                None
            },
        };
        match status {
            Some(status @ (LpStatus::Optimal | LpStatus::ObjectiveLimit | LpStatus::Infeasible | LpStatus::UnboundedRay)) => Ok(status),
            _ => {
                self.mark_unsolved();
                Err(LpError::Internal("the objective limit could not be confirmed".to_string()))
            },
        }
    }

    /// Extract the certificate belonging to a status.
    fn interpret(&mut self, status: LpStatus, limit: &Exact, shadow: &mut ShadowLp, overwrite: bool) -> LpResult<SolveOutcome> {
        self.status = status;
        self.flags.solved = true;

        let proved = match status {
            LpStatus::Optimal => {
                let proved = self.get_solution(shadow, overwrite, None)?;
                if limit.is_finite() && self.objective_value > *limit {
                    debug!(component = "lpexact", operation = "solve", "optimal value exceeds the objective limit");
                    self.status = LpStatus::ObjectiveLimit;
                }
                Some(proved)
            },
            LpStatus::ObjectiveLimit => Some(self.get_solution(shadow, overwrite, Some(limit))?),
            LpStatus::Infeasible => Some(self.get_dual_farkas(shadow, overwrite)?),
            LpStatus::UnboundedRay => Some(self.primal_ray_certificate()?),
            _ => None,
        };

        let mut outcome = SolveOutcome::new(self.status);
        match proved {
            Some(true) => outcome.proved_bound = true,
            Some(false) => {
                warn!(
                    component = "lpexact",
                    operation = "solve",
                    %status,
                    project_and_shift = self.settings.bound_certification.project_and_shift,
                    bound_shift = self.settings.bound_certification.bound_shift,
                    "solution could not be certified",
                );
                self.mark_unsolved();
                outcome.status = LpStatus::NotSolved;
                outcome.needs_recovery = true;
            },
            None => {},
        }

        Ok(outcome)
    }
}
