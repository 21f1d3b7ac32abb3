//! # Columns
//!
//! The exact counterpart of a variable in the LP relaxation.
use enum_map::{enum_map, EnumMap};
use num_traits::Zero;

use crate::data::linear_program::adjacency::Adjacency;
use crate::data::linear_program::elements::{BasisStatus, BoundDirection};
use crate::data::linear_program::handle::{RowId, VariableId};
use crate::data::number_types::exact::Exact;

/// Solution values of a column, saved to be restored later.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnSolution {
    /// Primal value.
    pub primal: Exact,
    /// Reduced cost.
    pub reduced_cost: Exact,
    /// Basis status.
    pub basis: BasisStatus,
    /// Solve in which the values were computed.
    pub valid_lp: Option<u64>,
}

/// A column of the exact LP.
#[derive(Clone, Debug)]
pub struct Column {
    pub(crate) variable: VariableId,
    pub(crate) integral: bool,

    pub(crate) objective: Exact,
    pub(crate) bounds: EnumMap<BoundDirection, Exact>,
    /// Values as they were last sent to the solver.
    pub(crate) flushed_objective: Exact,
    pub(crate) flushed_bounds: EnumMap<BoundDirection, Exact>,

    pub(crate) entries: Adjacency<RowId>,

    pub(crate) lp_position: Option<usize>,
    pub(crate) solver_position: Option<usize>,

    pub(crate) objective_changed: bool,
    pub(crate) bound_changed: EnumMap<BoundDirection, bool>,
    pub(crate) coefficient_changed: bool,

    pub(crate) primal: Exact,
    pub(crate) reduced_cost: Exact,
    pub(crate) farkas_coefficient: Exact,
    pub(crate) valid_solution_lp: Option<u64>,
    pub(crate) valid_farkas_lp: Option<u64>,
    pub(crate) basis: BasisStatus,
    pub(crate) stored: Option<ColumnSolution>,
}

impl Column {
    pub(crate) fn new(
        variable: VariableId,
        integral: bool,
        objective: Exact,
        lower: Exact,
        upper: Exact,
    ) -> Self {
        debug_assert!(lower <= upper);

        Self {
            variable,
            integral,
            flushed_objective: objective.clone(),
            flushed_bounds: enum_map! {
                BoundDirection::Lower => lower.clone(),
                BoundDirection::Upper => upper.clone(),
            },
            objective,
            bounds: enum_map! {
                BoundDirection::Lower => lower.clone(),
                BoundDirection::Upper => upper.clone(),
            },
            entries: Adjacency::new(),
            lp_position: None,
            solver_position: None,
            objective_changed: false,
            bound_changed: EnumMap::default(),
            coefficient_changed: false,
            primal: Exact::zero(),
            reduced_cost: Exact::zero(),
            farkas_coefficient: Exact::zero(),
            valid_solution_lp: None,
            valid_farkas_lp: None,
            basis: BasisStatus::Zero,
            stored: None,
        }
    }

    /// Variable this column represents.
    #[must_use]
    pub fn variable(&self) -> VariableId {
        self.variable
    }

    /// Whether the variable is integral.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.integral
    }

    /// Objective coefficient.
    #[must_use]
    pub fn objective(&self) -> &Exact {
        &self.objective
    }

    /// Lower or upper bound.
    #[must_use]
    pub fn bound(&self, direction: BoundDirection) -> &Exact {
        &self.bounds[direction]
    }

    /// Coefficients of this column.
    #[must_use]
    pub fn entries(&self) -> &Adjacency<RowId> {
        &self.entries
    }

    /// Position in the active LP, if the column is in the LP.
    #[must_use]
    pub fn lp_position(&self) -> Option<usize> {
        self.lp_position
    }

    /// Position in the solver, if the column was flushed.
    #[must_use]
    pub fn solver_position(&self) -> Option<usize> {
        self.solver_position
    }

    /// Primal value of the last solve.
    #[must_use]
    pub fn primal(&self) -> &Exact {
        &self.primal
    }

    /// Reduced cost of the last solve.
    #[must_use]
    pub fn reduced_cost(&self) -> &Exact {
        &self.reduced_cost
    }

    /// Coefficient of this column in the last Farkas proof.
    #[must_use]
    pub fn farkas_coefficient(&self) -> &Exact {
        &self.farkas_coefficient
    }

    /// Basis status of the last solve.
    #[must_use]
    pub fn basis(&self) -> BasisStatus {
        self.basis
    }

    /// Contribution to the pseudo objective: the objective at the bound that is best for a
    /// minimization.
    ///
    /// # Return value
    ///
    /// `None` if that bound is infinite, in which case the contribution is negative infinity.
    pub(crate) fn pseudo_contribution(&self) -> Option<Exact> {
        let bound = if self.objective.is_positive() {
            &self.bounds[BoundDirection::Lower]
        } else if self.objective.is_negative() {
            &self.bounds[BoundDirection::Upper]
        } else {
            return Some(Exact::zero());
        };

        bound.is_finite().then(|| &self.objective * bound)
    }

    pub(crate) fn store_solution(&mut self) {
        self.stored = Some(ColumnSolution {
            primal: self.primal.clone(),
            reduced_cost: self.reduced_cost.clone(),
            basis: self.basis,
            valid_lp: self.valid_solution_lp,
        });
    }

    pub(crate) fn restore_solution(&mut self, lp_count: u64) {
        if let Some(stored) = self.stored.take() {
            self.primal = stored.primal;
            self.reduced_cost = stored.reduced_cost;
            self.basis = stored.basis;
            self.valid_solution_lp = stored.valid_lp.map(|_| lp_count);
        }
    }

    /// Drop all solution values that depend on the solver position.
    pub(crate) fn detach_from_solver(&mut self) {
        self.solver_position = None;
        self.valid_solution_lp = None;
        self.valid_farkas_lp = None;
        self.coefficient_changed = false;
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::column::Column;
    use crate::data::linear_program::elements::BoundDirection;
    use crate::data::linear_program::handle::VariableId;
    use crate::data::number_types::exact::Exact;
    use crate::R;

    #[test]
    fn pseudo_contribution() {
        let column = Column::new(VariableId(0), false, R!(2), R!(-1), R!(3));
        assert_eq!(column.pseudo_contribution(), Some(R!(-2)));

        let column = Column::new(VariableId(0), false, R!(-2), R!(-1), R!(3));
        assert_eq!(column.pseudo_contribution(), Some(R!(-6)));

        let column = Column::new(VariableId(0), false, R!(-2), R!(0), Exact::Infinity);
        assert_eq!(column.pseudo_contribution(), None);

        let column = Column::new(VariableId(0), false, R!(0), Exact::NegativeInfinity, Exact::Infinity);
        assert_eq!(column.pseudo_contribution(), Some(R!(0)));
        assert_eq!(column.bound(BoundDirection::Lower), &Exact::NegativeInfinity);
    }

    #[test]
    fn store_and_restore() {
        let mut column = Column::new(VariableId(0), true, R!(1), R!(0), R!(1));
        column.primal = R!(1, 2);
        column.valid_solution_lp = Some(3);
        column.store_solution();

        column.primal = R!(1);
        column.restore_solution(7);
        assert_eq!(column.primal(), &R!(1, 2));
        assert_eq!(column.valid_solution_lp, Some(7));
    }
}
