//! # Certificates
//!
//! The backend answers in exact arithmetic, but its answer is only trusted after it is verified
//! here. An optimal solution is accepted when its primal and dual bounds enclose the objective
//! value. Infeasibility is accepted when the Farkas multipliers aggregate the rows into an
//! inequality that no point within the column bounds satisfies.
use std::cmp::Ordering;

use num_traits::Zero;
use tracing::{debug, warn};

use crate::algorithm::lp::ExactLp;
use crate::data::linear_program::adjacency::Partition;
use crate::data::linear_program::elements::BoundDirection;
use crate::data::linear_program::matrix::{row_in, row_in_mut};
use crate::data::linear_program::shadow::ShadowLp;
use crate::data::number_types::exact::Exact;
use crate::error::LpResult;
use crate::interface::LpSolver;

impl<S: LpSolver> ExactLp<S> {
    /// Read the solution of the backend, verify it and store it in the columns and rows.
    ///
    /// Reduced costs are recomputed from the duals as `c - A^T y`, activities from the primal
    /// values. The dual bound is `sum y side + sum d bound`, in which every dual value and reduced
    /// cost is paired with the side or bound that its sign selects.
    ///
    /// # Arguments
    ///
    /// * `limit`: The objective limit, if the backend stopped on it. Its basis is then only dual
    /// feasible, and what needs proof is that the dual bound reaches the limit.
    ///
    /// # Return value
    ///
    /// Whether the objective value is proven: the solution is primal and dual feasible, and the
    /// primal bound is at most and the dual bound at least the objective value. With a limit,
    /// whether the dual bound is finite and at least the limit.
    pub(crate) fn get_solution(&mut self, shadow: &mut ShadowLp, overwrite: bool, limit: Option<&Exact>) -> LpResult<bool> {
        let solution = self.solver.solution()?;
        let (column_basis, row_basis) = self.solver.basis()?;
        let check_primal = self.settings.check_primal_feasibility;
        let check_dual = self.settings.check_dual_feasibility;
        let lp_count = self.lp_count;

        let mut primal_feasible = true;
        let mut dual_feasible = true;
        let mut primal_bound = Exact::zero();
        let mut dual_bound = Exact::zero();

        for (position, &id) in self.matrix.solver_rows.iter().enumerate() {
            let row = row_in_mut(&mut self.matrix.rows, id)?;
            let dual = solution.dual[position].clone();

            let mut activity = Exact::zero();
            for entry in row.entries.range(Partition::Lp) {
                let column = &self.matrix.columns[row.entries.partner(entry).0];
                if let Some(column_position) = column.solver_position {
                    activity.add_product(row.entries.value(entry), &solution.primal[column_position]);
                }
            }

            let lhs = row.solver_side(BoundDirection::Lower);
            let rhs = row.solver_side(BoundDirection::Upper);
            if check_primal && (activity < lhs || activity > rhs) {
                primal_feasible = false;
            }
            let side = match dual.sign() {
                Ordering::Greater => Some(lhs),
                Ordering::Less => Some(rhs),
                Ordering::Equal => None,
            };
            if let Some(side) = side {
                if side.is_infinite() {
                    dual_feasible = false;
                    dual_bound = Exact::NegativeInfinity;
                } else {
                    if check_dual && activity != side {
                        dual_feasible = false;
                    }
                    dual_bound.add_product(&dual, &side);
                }
            }

            row.activity = &activity + &row.constant;
            row.dual = dual;
            row.basis = row_basis[position];
            row.valid_activity_lp = Some(lp_count);
        }

        for (position, &id) in self.matrix.solver_columns.iter().enumerate() {
            let column = &self.matrix.columns[id.0];
            let primal = solution.primal[position].clone();

            let mut reduced_cost = column.objective.clone();
            for entry in column.entries.range(Partition::Lp) {
                let row = row_in(&self.matrix.rows, column.entries.partner(entry))?;
                if let Some(row_position) = row.solver_position {
                    reduced_cost -= &(column.entries.value(entry) * &solution.dual[row_position]);
                }
            }

            let lower = &column.bounds[BoundDirection::Lower];
            let upper = &column.bounds[BoundDirection::Upper];
            if check_primal && (primal < *lower || primal > *upper) {
                primal_feasible = false;
            }
            let bound = match reduced_cost.sign() {
                Ordering::Greater => Some(lower),
                Ordering::Less => Some(upper),
                Ordering::Equal => None,
            };
            if let Some(bound) = bound {
                if bound.is_infinite() {
                    dual_feasible = false;
                    dual_bound = Exact::NegativeInfinity;
                } else {
                    if check_dual && primal != *bound {
                        dual_feasible = false;
                    }
                    dual_bound.add_product(&reduced_cost, bound);
                }
            }
            primal_bound.add_product(&column.objective, &primal);

            let column = &mut self.matrix.columns[id.0];
            column.primal = primal;
            column.reduced_cost = reduced_cost;
            column.basis = column_basis[position];
            column.valid_solution_lp = Some(lp_count);
        }

        let objective = solution.objective_value;
        let proved = match limit {
            Some(limit) => dual_bound.is_finite() && dual_bound >= *limit,
            None => primal_feasible && dual_feasible && primal_bound <= objective && dual_bound >= objective,
        };
        if proved {
            debug!(component = "lpexact", operation = "get_solution", %objective, %dual_bound, "objective value proven");
        } else {
            warn!(
                component = "lpexact",
                operation = "get_solution",
                %objective,
                %primal_bound,
                %dual_bound,
                primal_feasible,
                dual_feasible,
                "objective value not proven",
            );
        }

        self.objective_value = objective;
        self.flags.primal_feasible = primal_feasible;
        self.flags.dual_feasible = dual_feasible;
        self.flags.primal_checked = check_primal;
        self.flags.dual_checked = check_dual;
        if overwrite {
            self.overwrite_shadow(shadow);
        }

        Ok(proved)
    }

    /// Read the Farkas multipliers of the backend, verify them and store them in the columns and
    /// rows.
    ///
    /// The multipliers `y` aggregate the rows into `(y^T A) x >= y^T side`, where every multiplier
    /// picks the side that its sign selects. The proof is valid if no `x` within the column bounds
    /// reaches that left-hand side.
    ///
    /// # Return value
    ///
    /// Whether infeasibility is proven.
    pub(crate) fn get_dual_farkas(&mut self, shadow: &mut ShadowLp, overwrite: bool) -> LpResult<bool> {
        let multipliers = self.solver.dual_farkas()?;
        let lp_count = self.lp_count;

        let mut coefficients = vec![Exact::zero(); self.matrix.solver_columns.len()];
        let mut aggregated_side = Exact::zero();
        let mut valid = true;
        for (position, &id) in self.matrix.solver_rows.iter().enumerate() {
            let row = row_in_mut(&mut self.matrix.rows, id)?;
            let multiplier = &multipliers[position];
            row.dual_farkas = multiplier.clone();
            row.valid_farkas_lp = Some(lp_count);

            let direction = match multiplier.sign() {
                Ordering::Greater => BoundDirection::Lower,
                Ordering::Less => BoundDirection::Upper,
                Ordering::Equal => continue,
            };
            let side = row.solver_side(direction);
            if side.is_infinite() {
                debug!(component = "lpexact", operation = "get_dual_farkas", row = %id, "multiplier selects an infinite side");
                valid = false;
                continue;
            }
            aggregated_side.add_product(multiplier, &side);

            for entry in row.entries.range(Partition::Lp) {
                let column = &self.matrix.columns[row.entries.partner(entry).0];
                if let Some(column_position) = column.solver_position {
                    coefficients[column_position].add_product(multiplier, row.entries.value(entry));
                }
            }
        }

        let mut max_activity = Exact::zero();
        for (position, (&id, coefficient)) in self.matrix.solver_columns.iter().zip(coefficients).enumerate() {
            debug_assert_eq!(self.matrix.columns[id.0].solver_position, Some(position));
            let column = &mut self.matrix.columns[id.0];
            let direction = match coefficient.sign() {
                Ordering::Greater => Some(BoundDirection::Upper),
                Ordering::Less => Some(BoundDirection::Lower),
                Ordering::Equal => None,
            };
            if let Some(direction) = direction {
                max_activity.add_product(&coefficient, &column.bounds[direction]);
            }
            column.farkas_coefficient = coefficient;
            column.valid_farkas_lp = Some(lp_count);
        }

        let proved = valid && aggregated_side.is_finite() && aggregated_side > max_activity;
        if proved {
            debug!(component = "lpexact", operation = "get_dual_farkas", "infeasibility proven");
        } else {
            warn!(
                component = "lpexact",
                operation = "get_dual_farkas",
                %aggregated_side,
                %max_activity,
                "Farkas proof rejected",
            );
        }

        self.flags.primal_feasible = false;
        self.flags.primal_checked = proved;
        if overwrite {
            self.overwrite_shadow(shadow);
        }

        Ok(proved)
    }

    /// Unbounded rays are not certified, the caller should recover in another way.
    pub(crate) fn primal_ray_certificate(&mut self) -> LpResult<bool> {
        debug!(
            component = "lpexact",
            operation = "primal_ray",
            has_ray = self.solver.has_primal_ray(),
            "unbounded rays are not certified",
        );

        Ok(false)
    }
}
