//! # Dense exact simplex
//!
//! A bounded-variable simplex method on a dense tableau in rational arithmetic. It is meant for
//! small LPs: the tableau is rebuilt at every solve and every pivot touches the whole tableau.
//!
//! Rows are turned into equalities by a slack variable per row, `A x - s = 0`, where slack `i` is
//! bounded by the sides of row `i`. A solve first restores primal feasibility with a dual simplex
//! over a zero objective, and then optimizes with a primal simplex. Both use Bland's rule, so they
//! don't cycle.
use std::ops::RangeInclusive;
use std::time::Instant;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use tracing::trace;

use crate::data::linear_program::elements::BasisStatus;
use crate::data::number_types::exact::{Exact, RoundingMode};
use crate::interface::{
    ColumnBatch, IntParameter, LpSolver, Pricing, RealParameter, RowBatch, Solution, SolverError,
    SolverResult,
};

/// How a solve ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Outcome {
    Optimal,
    ObjectiveLimit,
    Infeasible,
    Unbounded,
    IterationLimit,
    TimeLimit,
}

/// Which bound of a basic variable is violated.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Violation {
    BelowLower,
    AboveUpper,
}

#[derive(Clone, Debug)]
struct SolveResult {
    outcome: Outcome,
    /// Structural values followed by slack values.
    values: Vec<BigRational>,
    reduced_costs: Vec<BigRational>,
    objective: BigRational,
    farkas: Option<Vec<BigRational>>,
    ray: Option<Vec<BigRational>>,
}

/// Basis to warm start from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DenseState {
    columns: Vec<BasisStatus>,
    rows: Vec<BasisStatus>,
}

#[derive(Clone, Debug)]
struct Parameters {
    from_scratch: bool,
    iteration_limit: Option<usize>,
    pricing: Pricing,
    scaling: bool,
    time_limit: Exact,
    objective_limit: Exact,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            from_scratch: false,
            iteration_limit: None,
            pricing: Pricing::Auto,
            scaling: false,
            time_limit: Exact::Infinity,
            objective_limit: Exact::Infinity,
        }
    }
}

/// Exact LP solver on a dense tableau.
#[derive(Clone, Debug)]
pub struct DenseSimplex {
    objective: Vec<BigRational>,
    lower: Vec<Option<BigRational>>,
    upper: Vec<Option<BigRational>>,
    /// Coefficients, by row.
    coefficients: Vec<Vec<BigRational>>,
    lhs: Vec<Option<BigRational>>,
    rhs: Vec<Option<BigRational>>,

    warm: DenseState,
    parameters: Parameters,
    infinity: BigRational,

    result: Option<SolveResult>,
    iterations: usize,
}

impl DenseSimplex {
    /// Create a solver without columns and rows.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objective: Vec::new(),
            lower: Vec::new(),
            upper: Vec::new(),
            coefficients: Vec::new(),
            lhs: Vec::new(),
            rhs: Vec::new(),
            warm: DenseState::default(),
            parameters: Parameters::default(),
            infinity: BigRational::from_integer(num_traits::pow(BigInt::from(10), 20)),
            result: None,
            iterations: 0,
        }
    }

    /// A finite value, or `None` if the value is at least the infinity sentinel in magnitude.
    fn bound(&self, value: &Exact) -> Option<BigRational> {
        value.finite()
            .filter(|value| value.abs() < self.infinity)
            .cloned()
    }

    fn coefficient(&self, value: &Exact) -> SolverResult<BigRational> {
        self.bound(value)
            .ok_or_else(|| SolverError::InvalidInput(format!("coefficient {} is not finite", value)))
    }

    fn modified(&mut self) {
        self.result = None;
    }

    fn check_indices(&self, kind: &'static str, indices: &[usize], len: usize, nr_values: &[usize]) -> SolverResult<()> {
        if nr_values.iter().any(|&nr| nr != indices.len()) {
            return Err(SolverError::InvalidInput(format!("{} indices and values differ in length", kind)));
        }
        match indices.iter().find(|&&index| index >= len) {
            Some(&index) => Err(SolverError::OutOfRange { kind, index, len }),
            None => Ok(()),
        }
    }

    fn check_range(kind: &'static str, range: &RangeInclusive<usize>, len: usize) -> SolverResult<()> {
        if *range.end() >= len || range.start() > range.end() {
            Err(SolverError::OutOfRange { kind, index: *range.end(), len })
        } else {
            Ok(())
        }
    }

    fn solve(&mut self) -> SolverResult<()> {
        let mut tableau = Tableau::new(self);
        if !self.parameters.from_scratch {
            tableau.crash(&self.warm);
        }
        let mut budget = Budget {
            start: Instant::now(),
            time_limit: self.parameters.time_limit.finite().map(|_| self.parameters.time_limit.to_f64(RoundingMode::Nearest)),
            iteration_limit: self.parameters.iteration_limit,
            iterations: 0,
        };

        let objective_limit = self.bound(&self.parameters.objective_limit);

        let outcome = tableau.restore_feasibility(&mut budget)
            .or_else(|| tableau.optimize(&mut budget, objective_limit.as_ref()))
            .unwrap_or(Outcome::Optimal);
        trace!(component = "dense_simplex", ?outcome, iterations = budget.iterations, "solve finished");

        self.iterations = budget.iterations;
        self.warm = tableau.state();
        self.result = Some(tableau.into_result(outcome));

        Ok(())
    }

    fn result(&self) -> SolverResult<&SolveResult> {
        self.result.as_ref().ok_or(SolverError::NoSolution)
    }

    fn has_outcome(&self, outcome: Outcome) -> bool {
        self.result.as_ref().is_some_and(|result| result.outcome == outcome)
    }
}

impl Default for DenseSimplex {
    fn default() -> Self {
        Self::new()
    }
}

fn initial_status(lower: Option<&BigRational>, upper: Option<&BigRational>) -> BasisStatus {
    match (lower, upper) {
        (Some(_), _) => BasisStatus::Lower,
        (None, Some(_)) => BasisStatus::Upper,
        (None, None) => BasisStatus::Zero,
    }
}

fn to_exact(values: &[BigRational]) -> Vec<Exact> {
    values.iter().cloned().map(Exact::Finite).collect()
}

impl LpSolver for DenseSimplex {
    type State = DenseState;

    fn add_columns(&mut self, batch: &ColumnBatch) -> SolverResult<()> {
        let nr_rows = self.nr_rows();
        self.check_indices("row", &batch.indices, nr_rows, &[batch.values.len()])?;
        if batch.lower.len() != batch.len() || batch.upper.len() != batch.len() || batch.begin.len() != batch.len() {
            return Err(SolverError::InvalidInput("column batch fields differ in length".to_string()));
        }

        for column in 0..batch.len() {
            let objective = self.coefficient(&batch.objective[column])?;
            let lower = self.bound(&batch.lower[column]);
            let upper = self.bound(&batch.upper[column]);
            let mut values = vec![BigRational::zero(); nr_rows];
            for entry in batch.entries(column) {
                values[batch.indices[entry]] = self.coefficient(&batch.values[entry])?;
            }

            self.warm.columns.push(initial_status(lower.as_ref(), upper.as_ref()));
            self.objective.push(objective);
            self.lower.push(lower);
            self.upper.push(upper);
            for (row, value) in self.coefficients.iter_mut().zip(values) {
                row.push(value);
            }
        }
        self.modified();

        Ok(())
    }

    fn add_rows(&mut self, batch: &RowBatch) -> SolverResult<()> {
        let nr_columns = self.nr_columns();
        self.check_indices("column", &batch.indices, nr_columns, &[batch.values.len()])?;
        if batch.rhs.len() != batch.len() || batch.begin.len() != batch.len() {
            return Err(SolverError::InvalidInput("row batch fields differ in length".to_string()));
        }

        for row in 0..batch.len() {
            let mut values = vec![BigRational::zero(); nr_columns];
            for entry in batch.entries(row) {
                values[batch.indices[entry]] = self.coefficient(&batch.values[entry])?;
            }

            self.warm.rows.push(BasisStatus::Basic);
            self.lhs.push(self.bound(&batch.lhs[row]));
            self.rhs.push(self.bound(&batch.rhs[row]));
            self.coefficients.push(values);
        }
        self.modified();

        Ok(())
    }

    fn delete_columns(&mut self, range: RangeInclusive<usize>) -> SolverResult<()> {
        Self::check_range("column", &range, self.nr_columns())?;

        self.objective.drain(range.clone());
        self.lower.drain(range.clone());
        self.upper.drain(range.clone());
        for row in &mut self.coefficients {
            row.drain(range.clone());
        }
        if self.warm.columns.len() > *range.end() {
            self.warm.columns.drain(range);
        }
        self.modified();

        Ok(())
    }

    fn delete_rows(&mut self, range: RangeInclusive<usize>) -> SolverResult<()> {
        Self::check_range("row", &range, self.nr_rows())?;

        self.lhs.drain(range.clone());
        self.rhs.drain(range.clone());
        self.coefficients.drain(range.clone());
        if self.warm.rows.len() > *range.end() {
            self.warm.rows.drain(range);
        }
        self.modified();

        Ok(())
    }

    fn change_objective(&mut self, indices: &[usize], values: &[Exact]) -> SolverResult<()> {
        self.check_indices("column", indices, self.nr_columns(), &[values.len()])?;

        for (&index, value) in indices.iter().zip(values) {
            self.objective[index] = self.coefficient(value)?;
        }
        self.modified();

        Ok(())
    }

    fn change_bounds(&mut self, indices: &[usize], lower: &[Exact], upper: &[Exact]) -> SolverResult<()> {
        self.check_indices("column", indices, self.nr_columns(), &[lower.len(), upper.len()])?;

        for (&index, lower, upper) in itertools::izip!(indices, lower, upper) {
            self.lower[index] = self.bound(lower);
            self.upper[index] = self.bound(upper);
        }
        self.modified();

        Ok(())
    }

    fn change_sides(&mut self, indices: &[usize], lhs: &[Exact], rhs: &[Exact]) -> SolverResult<()> {
        self.check_indices("row", indices, self.nr_rows(), &[lhs.len(), rhs.len()])?;

        for (&index, lhs, rhs) in itertools::izip!(indices, lhs, rhs) {
            self.lhs[index] = self.bound(lhs);
            self.rhs[index] = self.bound(rhs);
        }
        self.modified();

        Ok(())
    }

    fn set_basis(&mut self, columns: &[BasisStatus], rows: &[BasisStatus]) -> SolverResult<()> {
        if columns.len() != self.nr_columns() || rows.len() != self.nr_rows() {
            return Err(SolverError::InvalidInput("basis size doesn't match the LP".to_string()));
        }

        self.warm = DenseState { columns: columns.to_vec(), rows: rows.to_vec() };
        Ok(())
    }

    fn basis(&self) -> SolverResult<(Vec<BasisStatus>, Vec<BasisStatus>)> {
        Ok((self.warm.columns.clone(), self.warm.rows.clone()))
    }

    fn int_parameter(&self, parameter: IntParameter) -> SolverResult<i64> {
        Ok(match parameter {
            IntParameter::FromScratch => i64::from(self.parameters.from_scratch),
            IntParameter::IterationLimit => self.parameters.iteration_limit
                .map_or(i64::MAX, |limit| i64::try_from(limit).unwrap_or(i64::MAX)),
            IntParameter::Pricing => self.parameters.pricing.code(),
            IntParameter::Scaling => i64::from(self.parameters.scaling),
        })
    }

    fn set_int_parameter(&mut self, parameter: IntParameter, value: i64) -> SolverResult<()> {
        match parameter {
            IntParameter::FromScratch => self.parameters.from_scratch = value != 0,
            IntParameter::IterationLimit => {
                self.parameters.iteration_limit = match value {
                    i64::MAX => None,
                    value => Some(usize::try_from(value)
                        .map_err(|_| SolverError::InvalidInput(format!("iteration limit {}", value)))?),
                };
            },
            IntParameter::Pricing => {
                self.parameters.pricing = Pricing::from_code(value)
                    .ok_or_else(|| SolverError::UnsupportedParameter(format!("pricing {}", value)))?;
            },
            IntParameter::Scaling => self.parameters.scaling = value != 0,
        }

        Ok(())
    }

    fn real_parameter(&self, parameter: RealParameter) -> SolverResult<Exact> {
        Ok(match parameter {
            RealParameter::TimeLimit => self.parameters.time_limit.clone(),
            RealParameter::ObjectiveLimit => self.parameters.objective_limit.clone(),
        })
    }

    fn set_real_parameter(&mut self, parameter: RealParameter, value: Exact) -> SolverResult<()> {
        match parameter {
            RealParameter::TimeLimit => self.parameters.time_limit = value,
            RealParameter::ObjectiveLimit => self.parameters.objective_limit = value,
        }

        Ok(())
    }

    fn solve_primal(&mut self) -> SolverResult<()> {
        self.solve()
    }

    fn solve_dual(&mut self) -> SolverResult<()> {
        self.solve()
    }

    fn was_solved(&self) -> bool {
        self.result.is_some()
    }

    fn is_optimal(&self) -> bool {
        self.has_outcome(Outcome::Optimal)
    }

    fn is_objective_limit_exceeded(&self) -> bool {
        self.has_outcome(Outcome::ObjectiveLimit)
    }

    fn is_primal_infeasible(&self) -> bool {
        self.has_outcome(Outcome::Infeasible)
    }

    fn is_primal_unbounded(&self) -> bool {
        self.has_outcome(Outcome::Unbounded)
    }

    fn is_dual_infeasible(&self) -> bool {
        self.has_outcome(Outcome::Unbounded)
    }

    fn is_primal_feasible(&self) -> bool {
        [Outcome::Optimal, Outcome::ObjectiveLimit, Outcome::Unbounded].into_iter()
            .any(|outcome| self.has_outcome(outcome))
    }

    fn is_dual_feasible(&self) -> bool {
        self.has_outcome(Outcome::Optimal) || self.has_outcome(Outcome::ObjectiveLimit)
    }

    fn has_primal_ray(&self) -> bool {
        self.has_outcome(Outcome::Unbounded)
    }

    fn has_dual_ray(&self) -> bool {
        self.has_outcome(Outcome::Infeasible)
    }

    fn is_iteration_limit_exceeded(&self) -> bool {
        self.has_outcome(Outcome::IterationLimit)
    }

    fn is_time_limit_exceeded(&self) -> bool {
        self.has_outcome(Outcome::TimeLimit)
    }

    fn objective_value(&self) -> SolverResult<Exact> {
        Ok(Exact::Finite(self.result()?.objective.clone()))
    }

    fn solution(&self) -> SolverResult<Solution> {
        let result = self.result()?;
        let n = self.nr_columns();

        Ok(Solution {
            objective_value: Exact::Finite(result.objective.clone()),
            primal: to_exact(&result.values[..n]),
            dual: to_exact(&result.reduced_costs[n..]),
            activity: to_exact(&result.values[n..]),
            reduced_cost: to_exact(&result.reduced_costs[..n]),
        })
    }

    fn primal_ray(&self) -> SolverResult<Vec<Exact>> {
        self.result()?.ray.as_deref().map(to_exact).ok_or(SolverError::NoSolution)
    }

    fn dual_farkas(&self) -> SolverResult<Vec<Exact>> {
        self.result()?.farkas.as_deref().map(to_exact).ok_or(SolverError::NoSolution)
    }

    fn state(&self) -> SolverResult<Self::State> {
        Ok(self.warm.clone())
    }

    fn set_state(&mut self, state: &Self::State) -> SolverResult<()> {
        self.set_basis(&state.columns, &state.rows)
    }

    fn iterations(&self) -> usize {
        self.iterations
    }

    fn infinity(&self) -> Exact {
        Exact::Finite(self.infinity.clone())
    }

    fn nr_columns(&self) -> usize {
        self.objective.len()
    }

    fn nr_rows(&self) -> usize {
        self.lhs.len()
    }
}

struct Budget {
    start: Instant,
    time_limit: Option<f64>,
    iteration_limit: Option<usize>,
    iterations: usize,
}

impl Budget {
    /// The limit that prevents another iteration, if any.
    fn exhausted(&self) -> Option<Outcome> {
        if self.iteration_limit.is_some_and(|limit| self.iterations >= limit) {
            Some(Outcome::IterationLimit)
        } else if self.time_limit.is_some_and(|limit| self.start.elapsed().as_secs_f64() >= limit) {
            Some(Outcome::TimeLimit)
        } else {
            None
        }
    }
}

/// The tableau `B^-1 [A | -I]` with the state of every variable.
struct Tableau {
    nr_columns: usize,
    rows: Vec<Vec<BigRational>>,
    basic: Vec<usize>,
    status: Vec<BasisStatus>,
    lower: Vec<Option<BigRational>>,
    upper: Vec<Option<BigRational>>,
    cost: Vec<BigRational>,
    farkas: Option<Vec<BigRational>>,
    ray: Option<Vec<BigRational>>,
}

impl Tableau {
    /// Start from the slack basis, for which the tableau is `[-A | I]`.
    fn new(solver: &DenseSimplex) -> Self {
        let n = solver.nr_columns();
        let m = solver.nr_rows();

        let rows = solver.coefficients.iter().enumerate()
            .map(|(i, coefficients)| {
                let mut row = coefficients.iter().map(|value| -value).collect::<Vec<_>>();
                row.extend((0..m).map(|j| if i == j { BigRational::from_integer(1.into()) } else { BigRational::zero() }));
                row
            })
            .collect();
        let status = (0..n)
            .map(|j| initial_status(solver.lower[j].as_ref(), solver.upper[j].as_ref()))
            .chain((0..m).map(|_| BasisStatus::Basic))
            .collect();

        Self {
            nr_columns: n,
            rows,
            basic: (n..(n + m)).collect(),
            status,
            lower: solver.lower.iter().chain(&solver.lhs).cloned().collect(),
            upper: solver.upper.iter().chain(&solver.rhs).cloned().collect(),
            cost: solver.objective.iter().cloned().chain((0..m).map(|_| BigRational::zero())).collect(),
            farkas: None,
            ray: None,
        }
    }

    fn nr_variables(&self) -> usize {
        self.status.len()
    }

    /// A nonbasic status that the variable can actually have, preferring the given one.
    fn feasible_status(&self, variable: usize, preferred: BasisStatus) -> BasisStatus {
        let lower = self.lower[variable].as_ref();
        let upper = self.upper[variable].as_ref();
        match preferred {
            BasisStatus::Lower if lower.is_some() => BasisStatus::Lower,
            BasisStatus::Upper if upper.is_some() => BasisStatus::Upper,
            BasisStatus::Zero if lower.is_none() && upper.is_none() => BasisStatus::Zero,
            _ => initial_status(lower, upper),
        }
    }

    /// Pivot towards a previously found basis.
    fn crash(&mut self, warm: &DenseState) {
        if warm.columns.len() != self.nr_columns || warm.rows.len() != self.rows.len() {
            return;
        }
        let target = warm.columns.iter().chain(&warm.rows).copied().collect::<Vec<_>>();

        for entering in 0..self.nr_variables() {
            if target[entering] != BasisStatus::Basic || self.status[entering] == BasisStatus::Basic {
                continue;
            }
            let row = (0..self.rows.len())
                .find(|&k| target[self.basic[k]] != BasisStatus::Basic && !self.rows[k][entering].is_zero());
            if let Some(k) = row {
                let leaving = self.pivot(k, entering);
                self.status[leaving] = BasisStatus::Lower;
            }
        }
        for variable in 0..self.nr_variables() {
            if self.status[variable] != BasisStatus::Basic {
                self.status[variable] = self.feasible_status(variable, target[variable]);
            }
        }
    }

    /// Make `entering` basic in row `k`.
    ///
    /// # Return value
    ///
    /// The variable that left the basis. Its status is still `Basic` and should be set by the
    /// caller.
    fn pivot(&mut self, k: usize, entering: usize) -> usize {
        let pivot = self.rows[k][entering].clone();
        debug_assert!(!pivot.is_zero());

        for value in &mut self.rows[k] {
            *value /= &pivot;
        }
        let pivot_row = self.rows[k].clone();
        for (r, row) in self.rows.iter_mut().enumerate() {
            if r == k || row[entering].is_zero() {
                continue;
            }
            let factor = row[entering].clone();
            for (value, pivot_value) in row.iter_mut().zip(&pivot_row) {
                *value -= &factor * pivot_value;
            }
        }

        let leaving = self.basic[k];
        self.basic[k] = entering;
        self.status[entering] = BasisStatus::Basic;
        leaving
    }

    fn nonbasic_value(&self, variable: usize) -> BigRational {
        let bound = match self.status[variable] {
            BasisStatus::Lower => self.lower[variable].as_ref(),
            BasisStatus::Upper => self.upper[variable].as_ref(),
            BasisStatus::Zero | BasisStatus::Basic => None,
        };
        bound.cloned().unwrap_or_else(BigRational::zero)
    }

    fn values(&self) -> Vec<BigRational> {
        let mut values = (0..self.nr_variables())
            .map(|j| if self.status[j] == BasisStatus::Basic { BigRational::zero() } else { self.nonbasic_value(j) })
            .collect::<Vec<_>>();
        for (k, row) in self.rows.iter().enumerate() {
            let mut value = BigRational::zero();
            for (j, coefficient) in row.iter().enumerate() {
                if self.status[j] != BasisStatus::Basic && !coefficient.is_zero() {
                    value -= coefficient * &values[j];
                }
            }
            values[self.basic[k]] = value;
        }
        values
    }

    fn reduced_costs(&self) -> Vec<BigRational> {
        (0..self.nr_variables())
            .map(|j| {
                let mut reduced = self.cost[j].clone();
                for (k, row) in self.rows.iter().enumerate() {
                    let basic_cost = &self.cost[self.basic[k]];
                    if !basic_cost.is_zero() && !row[j].is_zero() {
                        reduced -= basic_cost * &row[j];
                    }
                }
                reduced
            })
            .collect()
    }

    fn can_increase(&self, variable: usize) -> bool {
        match self.status[variable] {
            BasisStatus::Lower => match (&self.lower[variable], &self.upper[variable]) {
                (Some(lower), Some(upper)) => lower < upper,
                _ => true,
            },
            BasisStatus::Zero => true,
            BasisStatus::Upper | BasisStatus::Basic => false,
        }
    }

    fn can_decrease(&self, variable: usize) -> bool {
        match self.status[variable] {
            BasisStatus::Upper => match (&self.lower[variable], &self.upper[variable]) {
                (Some(lower), Some(upper)) => lower < upper,
                _ => true,
            },
            BasisStatus::Zero => true,
            BasisStatus::Lower | BasisStatus::Basic => false,
        }
    }

    fn violation(&self, variable: usize, value: &BigRational) -> Option<Violation> {
        if self.lower[variable].as_ref().is_some_and(|lower| value < lower) {
            Some(Violation::BelowLower)
        } else if self.upper[variable].as_ref().is_some_and(|upper| value > upper) {
            Some(Violation::AboveUpper)
        } else {
            None
        }
    }

    /// Dual simplex iterations over a zero objective until all basic variables are within their
    /// bounds.
    ///
    /// # Return value
    ///
    /// `None` if a feasible basis was found, the outcome of the solve otherwise.
    fn restore_feasibility(&mut self, budget: &mut Budget) -> Option<Outcome> {
        let mut farkas = None;
        let outcome = loop {
            let values = self.values();
            let infeasible = (0..self.rows.len())
                .filter_map(|k| self.violation(self.basic[k], &values[self.basic[k]]).map(|violation| (self.basic[k], k, violation)))
                .min_by_key(|&(variable, _, _)| variable);
            let Some((_, k, violation)) = infeasible else {
                break None;
            };

            let entering = (0..self.nr_variables())
                .filter(|&j| self.status[j] != BasisStatus::Basic)
                .find(|&j| {
                    let coefficient = &self.rows[k][j];
                    match violation {
                        Violation::BelowLower => {
                            (coefficient.is_negative() && self.can_increase(j))
                                || (coefficient.is_positive() && self.can_decrease(j))
                        },
                        Violation::AboveUpper => {
                            (coefficient.is_positive() && self.can_increase(j))
                                || (coefficient.is_negative() && self.can_decrease(j))
                        },
                    }
                });

            match entering {
                None => {
                    let n = self.nr_columns;
                    let multipliers = self.rows[k][n..].iter()
                        .map(|value| match violation {
                            Violation::BelowLower => value.clone(),
                            Violation::AboveUpper => -value,
                        })
                        .collect();
                    farkas = Some(multipliers);
                    break Some(Outcome::Infeasible);
                },
                Some(entering) => {
                    if let Some(limit) = budget.exhausted() {
                        break Some(limit);
                    }
                    let leaving = self.pivot(k, entering);
                    self.status[leaving] = match violation {
                        Violation::BelowLower => BasisStatus::Lower,
                        Violation::AboveUpper => BasisStatus::Upper,
                    };
                    budget.iterations += 1;
                },
            }
        };

        self.farkas = farkas;
        outcome
    }

    /// Primal simplex iterations from a feasible basis.
    fn optimize(&mut self, budget: &mut Budget, objective_limit: Option<&BigRational>) -> Option<Outcome> {
        loop {
            let reduced = self.reduced_costs();
            let entering = (0..self.nr_variables())
                .filter(|&j| self.status[j] != BasisStatus::Basic)
                .find(|&j| {
                    (reduced[j].is_negative() && self.can_increase(j))
                        || (reduced[j].is_positive() && self.can_decrease(j))
                });
            let Some(entering) = entering else {
                let objective = self.objective(&self.values());
                return Some(match objective_limit {
                    Some(limit) if &objective > limit => Outcome::ObjectiveLimit,
                    _ => Outcome::Optimal,
                });
            };
            if let Some(limit) = budget.exhausted() {
                return Some(limit);
            }

            let increase = reduced[entering].is_negative();
            let values = self.values();
            // Step length, and the row of the blocking basic variable with the bound it hits.
            let mut best: Option<(BigRational, usize, Option<(usize, BasisStatus)>)> = None;
            if let (Some(lower), Some(upper)) = (&self.lower[entering], &self.upper[entering]) {
                best = Some((upper - lower, entering, None));
            }
            for (k, row) in self.rows.iter().enumerate() {
                let rate = if increase { -&row[entering] } else { row[entering].clone() };
                let variable = self.basic[k];
                let candidate = if rate.is_positive() {
                    self.upper[variable].as_ref()
                        .map(|upper| ((upper - &values[variable]) / &rate, BasisStatus::Upper))
                } else if rate.is_negative() {
                    self.lower[variable].as_ref()
                        .map(|lower| ((lower - &values[variable]) / &rate, BasisStatus::Lower))
                } else {
                    None
                };
                if let Some((step, bound)) = candidate {
                    let better = best.as_ref().is_none_or(|(best_step, best_variable, _)| {
                        step < *best_step || (step == *best_step && variable < *best_variable)
                    });
                    if better {
                        best = Some((step, variable, Some((k, bound))));
                    }
                }
            }

            match best {
                None => {
                    let mut ray = vec![BigRational::zero(); self.nr_columns];
                    let sign = if increase { BigRational::from_integer(1.into()) } else { BigRational::from_integer((-1).into()) };
                    if entering < self.nr_columns {
                        ray[entering] = sign.clone();
                    }
                    for (k, row) in self.rows.iter().enumerate() {
                        if self.basic[k] < self.nr_columns {
                            ray[self.basic[k]] = -&row[entering] * &sign;
                        }
                    }
                    self.ray = Some(ray);
                    return Some(Outcome::Unbounded);
                },
                Some((_, _, None)) => {
                    self.status[entering] = match self.status[entering] {
                        BasisStatus::Lower => BasisStatus::Upper,
                        _ => BasisStatus::Lower,
                    };
                },
                Some((_, _, Some((k, bound)))) => {
                    let leaving = self.pivot(k, entering);
                    self.status[leaving] = bound;
                },
            }
            budget.iterations += 1;
        }
    }

    fn objective(&self, values: &[BigRational]) -> BigRational {
        self.cost.iter().zip(values)
            .filter(|(cost, _)| !cost.is_zero())
            .map(|(cost, value)| cost * value)
            .sum()
    }

    fn state(&self) -> DenseState {
        DenseState {
            columns: self.status[..self.nr_columns].to_vec(),
            rows: self.status[self.nr_columns..].to_vec(),
        }
    }

    fn into_result(self, outcome: Outcome) -> SolveResult {
        let values = self.values();
        SolveResult {
            outcome,
            reduced_costs: self.reduced_costs(),
            objective: self.objective(&values),
            values,
            farkas: self.farkas,
            ray: self.ray,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::BasisStatus;
    use crate::data::number_types::exact::Exact;
    use crate::interface::dense::DenseSimplex;
    use crate::interface::{ColumnBatch, IntParameter, LpSolver, RealParameter, RowBatch};
    use crate::R;

    /// min -x - 2y, x + y <= 10, x - y >= -4, x, y >= 0.
    fn scenario() -> DenseSimplex {
        let mut solver = DenseSimplex::new();
        solver.add_columns(&ColumnBatch {
            objective: vec![R!(-1), R!(-2)],
            lower: vec![R!(0), R!(0)],
            upper: vec![Exact::Infinity, Exact::Infinity],
            begin: vec![0, 0],
            indices: vec![],
            values: vec![],
        }).unwrap();
        solver.add_rows(&RowBatch {
            lhs: vec![Exact::NegativeInfinity, R!(-4)],
            rhs: vec![R!(10), Exact::Infinity],
            begin: vec![0, 2],
            indices: vec![0, 1, 0, 1],
            values: vec![R!(1), R!(1), R!(1), R!(-1)],
        }).unwrap();
        solver
    }

    #[test]
    fn optimal() {
        let mut solver = scenario();
        solver.solve_dual().unwrap();
        assert!(solver.is_optimal());
        assert!(solver.is_primal_feasible() && solver.is_dual_feasible());

        let solution = solver.solution().unwrap();
        assert_eq!(solution.objective_value, R!(-17));
        assert_eq!(solution.primal, vec![R!(3), R!(7)]);
        assert_eq!(solution.activity, vec![R!(10), R!(-4)]);
        assert_eq!(solution.dual, vec![R!(-3, 2), R!(1, 2)]);
        assert_eq!(solution.reduced_cost, vec![R!(0), R!(0)]);

        let (columns, _) = solver.basis().unwrap();
        assert_eq!(columns, vec![BasisStatus::Basic, BasisStatus::Basic]);
    }

    #[test]
    fn warm_start_needs_no_iterations() {
        let mut solver = scenario();
        solver.solve_primal().unwrap();
        assert!(solver.iterations() > 0);

        solver.change_objective(&[0], &[R!(-1)]).unwrap();
        assert!(!solver.was_solved());
        solver.solve_primal().unwrap();
        assert!(solver.is_optimal());
        assert_eq!(solver.iterations(), 0);

        solver.set_int_parameter(IntParameter::FromScratch, 1).unwrap();
        solver.solve_primal().unwrap();
        assert!(solver.iterations() > 0);
    }

    #[test]
    fn infeasible() {
        // x >= 1 and -x >= 0 for a free x.
        let mut solver = DenseSimplex::new();
        solver.add_columns(&ColumnBatch {
            objective: vec![R!(0)],
            lower: vec![Exact::NegativeInfinity],
            upper: vec![Exact::Infinity],
            begin: vec![0],
            ..ColumnBatch::default()
        }).unwrap();
        solver.add_rows(&RowBatch {
            lhs: vec![R!(1), R!(0)],
            rhs: vec![Exact::Infinity, Exact::Infinity],
            begin: vec![0, 1],
            indices: vec![0, 0],
            values: vec![R!(1), R!(-1)],
        }).unwrap();

        solver.solve_dual().unwrap();
        assert!(solver.is_primal_infeasible());
        assert!(solver.has_dual_ray());
        assert_eq!(solver.dual_farkas().unwrap(), vec![R!(1), R!(1)]);
        assert!(solver.primal_ray().is_err());
    }

    #[test]
    fn unbounded() {
        let mut solver = DenseSimplex::new();
        solver.add_columns(&ColumnBatch {
            objective: vec![R!(-1)],
            lower: vec![R!(0)],
            upper: vec![Exact::Infinity],
            begin: vec![0],
            ..ColumnBatch::default()
        }).unwrap();

        solver.solve_primal().unwrap();
        assert!(solver.is_primal_unbounded());
        assert_eq!(solver.primal_ray().unwrap(), vec![R!(1)]);
    }

    #[test]
    fn limits() {
        let mut solver = scenario();
        solver.set_int_parameter(IntParameter::IterationLimit, 1).unwrap();
        solver.solve_dual().unwrap();
        assert!(solver.is_iteration_limit_exceeded());
        assert_eq!(solver.iterations(), 1);

        solver.set_int_parameter(IntParameter::IterationLimit, i64::MAX).unwrap();
        solver.set_int_parameter(IntParameter::FromScratch, 1).unwrap();
        solver.set_real_parameter(RealParameter::ObjectiveLimit, R!(-20)).unwrap();
        solver.solve_dual().unwrap();
        assert!(solver.is_objective_limit_exceeded());

        solver.set_real_parameter(RealParameter::TimeLimit, R!(0)).unwrap();
        solver.solve_dual().unwrap();
        assert!(solver.is_time_limit_exceeded());
    }

    #[test]
    fn delete_rows_and_columns() {
        let mut solver = scenario();
        solver.delete_rows(1..=1).unwrap();
        assert_eq!(solver.nr_rows(), 1);
        solver.delete_columns(0..=0).unwrap();
        assert_eq!(solver.nr_columns(), 1);

        // min -2y, y <= 10
        solver.solve_dual().unwrap();
        assert_eq!(solver.objective_value().unwrap(), R!(-20));
        assert!(solver.delete_rows(1..=1).is_err());
    }

    #[test]
    fn infinity_sentinel() {
        let mut solver = DenseSimplex::new();
        let infinity = solver.infinity();
        solver.add_columns(&ColumnBatch {
            objective: vec![R!(1)],
            lower: vec![-&infinity],
            upper: vec![infinity],
            begin: vec![0],
            ..ColumnBatch::default()
        }).unwrap();

        solver.solve_primal().unwrap();
        assert!(solver.is_primal_unbounded());
    }
}
