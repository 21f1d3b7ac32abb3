//! # Rows
//!
//! The exact counterpart of a constraint `lhs <= a x + constant <= rhs` of the LP relaxation.
use enum_map::{enum_map, EnumMap};
use num_traits::Zero;

use crate::data::linear_program::adjacency::Adjacency;
use crate::data::linear_program::elements::{BasisStatus, BoundDirection};
use crate::data::linear_program::handle::ColumnId;
use crate::data::number_types::exact::Exact;

/// Solution values of a row, saved to be restored later.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RowSolution {
    /// Dual value.
    pub dual: Exact,
    /// Activity, including the constant.
    pub activity: Exact,
    /// Basis status.
    pub basis: BasisStatus,
    /// Solve in which the values were computed.
    pub valid_lp: Option<u64>,
}

/// A row of the exact LP.
#[derive(Clone, Debug)]
pub struct Row {
    pub(crate) name: String,
    pub(crate) entries: Adjacency<ColumnId>,
    pub(crate) constant: Exact,
    pub(crate) sides: EnumMap<BoundDirection, Exact>,
    /// Sides as they were last sent to the solver.
    pub(crate) flushed_sides: EnumMap<BoundDirection, Exact>,
    pub(crate) flushed_constant: Exact,
    pub(crate) side_changed: EnumMap<BoundDirection, bool>,
    pub(crate) coefficient_changed: bool,

    /// Whether `a x + constant` is integral for every integral solution.
    pub(crate) integral: bool,
    /// The row can't be modified while this is positive.
    pub(crate) nr_locks: usize,
    /// The row is freed when this reaches zero while it isn't in the LP.
    pub(crate) nr_uses: usize,
    /// Entries are appended without sorting or checking for duplicates until the row is merged.
    pub(crate) delay_sort: bool,

    pub(crate) lp_position: Option<usize>,
    pub(crate) solver_position: Option<usize>,

    pub(crate) dual: Exact,
    pub(crate) activity: Exact,
    pub(crate) dual_farkas: Exact,
    pub(crate) valid_activity_lp: Option<u64>,
    pub(crate) valid_farkas_lp: Option<u64>,
    pub(crate) basis: BasisStatus,
    pub(crate) stored: Option<RowSolution>,
}

impl Row {
    pub(crate) fn new(name: String, lhs: Exact, rhs: Exact, constant: Exact) -> Self {
        debug_assert!(lhs <= rhs);
        debug_assert!(constant.is_finite());

        Self {
            name,
            entries: Adjacency::new(),
            integral: constant.is_integral(),
            flushed_constant: constant.clone(),
            constant,
            flushed_sides: enum_map! {
                BoundDirection::Lower => lhs.clone(),
                BoundDirection::Upper => rhs.clone(),
            },
            sides: enum_map! {
                BoundDirection::Lower => lhs.clone(),
                BoundDirection::Upper => rhs.clone(),
            },
            side_changed: EnumMap::default(),
            coefficient_changed: false,
            nr_locks: 0,
            nr_uses: 0,
            delay_sort: false,
            lp_position: None,
            solver_position: None,
            dual: Exact::zero(),
            activity: Exact::zero(),
            dual_farkas: Exact::zero(),
            valid_activity_lp: None,
            valid_farkas_lp: None,
            basis: BasisStatus::Basic,
            stored: None,
        }
    }

    /// Name, for logging.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coefficients of this row.
    #[must_use]
    pub fn entries(&self) -> &Adjacency<ColumnId> {
        &self.entries
    }

    /// Constant term of the row activity.
    #[must_use]
    pub fn constant(&self) -> &Exact {
        &self.constant
    }

    /// Left-hand side (`Lower`) or right-hand side (`Upper`).
    #[must_use]
    pub fn side(&self, direction: BoundDirection) -> &Exact {
        &self.sides[direction]
    }

    /// Whether the activity is integral for integral solutions.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.integral
    }

    /// Whether the row is locked against modification.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.nr_locks > 0
    }

    /// Number of references to this row.
    #[must_use]
    pub fn nr_uses(&self) -> usize {
        self.nr_uses
    }

    /// Whether entries are currently appended unsorted.
    #[must_use]
    pub fn is_delay_sorted(&self) -> bool {
        self.delay_sort
    }

    /// Position in the active LP, if the row is in the LP.
    #[must_use]
    pub fn lp_position(&self) -> Option<usize> {
        self.lp_position
    }

    /// Position in the solver, if the row was flushed.
    #[must_use]
    pub fn solver_position(&self) -> Option<usize> {
        self.solver_position
    }

    /// Dual value of the last solve.
    #[must_use]
    pub fn dual(&self) -> &Exact {
        &self.dual
    }

    /// Activity of the last solve, including the constant.
    #[must_use]
    pub fn activity(&self) -> &Exact {
        &self.activity
    }

    /// Multiplier of this row in the last Farkas proof.
    #[must_use]
    pub fn dual_farkas(&self) -> &Exact {
        &self.dual_farkas
    }

    /// Basis status of the last solve.
    #[must_use]
    pub fn basis(&self) -> BasisStatus {
        self.basis
    }

    /// Sides with the constant moved to the other side, as they are given to the solver.
    pub(crate) fn solver_side(&self, direction: BoundDirection) -> Exact {
        &self.sides[direction] - &self.constant
    }

    pub(crate) fn store_solution(&mut self) {
        self.stored = Some(RowSolution {
            dual: self.dual.clone(),
            activity: self.activity.clone(),
            basis: self.basis,
            valid_lp: self.valid_activity_lp,
        });
    }

    pub(crate) fn restore_solution(&mut self, lp_count: u64) {
        if let Some(stored) = self.stored.take() {
            self.dual = stored.dual;
            self.activity = stored.activity;
            self.basis = stored.basis;
            self.valid_activity_lp = stored.valid_lp.map(|_| lp_count);
        }
    }

    pub(crate) fn detach_from_solver(&mut self) {
        self.solver_position = None;
        self.valid_activity_lp = None;
        self.valid_farkas_lp = None;
        self.coefficient_changed = false;
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::BoundDirection;
    use crate::data::linear_program::row::Row;
    use crate::data::number_types::exact::Exact;
    use crate::R;

    #[test]
    fn solver_side() {
        let row = Row::new("r".to_string(), Exact::NegativeInfinity, R!(10), R!(3));
        assert_eq!(row.solver_side(BoundDirection::Lower), Exact::NegativeInfinity);
        assert_eq!(row.solver_side(BoundDirection::Upper), R!(7));
        assert!(row.is_integral());

        let row = Row::new("r".to_string(), R!(0), R!(0), R!(1, 2));
        assert!(!row.is_integral());
    }
}
