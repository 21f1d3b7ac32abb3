//! # Objective values
//!
//! Besides the objective value reported by the backend, two aggregates are maintained
//! incrementally: the pseudo objective, in which every column sits at its best bound, and the
//! loose objective, the part of the pseudo objective of the columns that are not in the LP.
use num_traits::Zero;

use crate::algorithm::lp::ExactLp;
use crate::data::linear_program::column::Column;
use crate::data::linear_program::elements::LpStatus;
use crate::data::linear_program::handle::ColumnId;
use crate::data::number_types::exact::Exact;
use crate::interface::LpSolver;

/// Sum of contributions that may be negative infinity.
///
/// Infinite contributions are counted instead of added, such that removing one of them gives the
/// finite sum back.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ObjectiveSum {
    finite: Exact,
    nr_infinite: usize,
}

impl ObjectiveSum {
    pub(crate) fn new() -> Self {
        Self {
            finite: Exact::zero(),
            nr_infinite: 0,
        }
    }

    /// Add a contribution, `None` meaning negative infinity.
    pub(crate) fn add(&mut self, contribution: Option<&Exact>) {
        match contribution {
            Some(value) => self.finite += value,
            None => self.nr_infinite += 1,
        }
    }

    pub(crate) fn remove(&mut self, contribution: Option<&Exact>) {
        match contribution {
            Some(value) => self.finite -= value,
            None => {
                debug_assert!(self.nr_infinite > 0);
                self.nr_infinite -= 1;
            },
        }
    }

    pub(crate) fn value(&self) -> Exact {
        if self.nr_infinite > 0 {
            Exact::NegativeInfinity
        } else {
            self.finite.clone()
        }
    }

    pub(crate) fn is_infinite(&self) -> bool {
        self.nr_infinite > 0
    }
}

impl<S: LpSolver> ExactLp<S> {
    /// Modify a column while keeping the objective aggregates up to date.
    pub(crate) fn update_column<T>(&mut self, id: ColumnId, change: impl FnOnce(&mut Column) -> T) -> T {
        let column = self.matrix.column_mut(id);
        let before = column.pseudo_contribution();
        let result = change(column);
        let after = column.pseudo_contribution();
        let loose = column.lp_position.is_none();

        if before != after {
            self.pseudo_objective.remove(before.as_ref());
            self.pseudo_objective.add(after.as_ref());
            if loose {
                self.loose_objective.remove(before.as_ref());
                self.loose_objective.add(after.as_ref());
            }
        }

        result
    }

    /// Objective value of the pseudo solution, in which every column is at its best bound.
    #[must_use]
    pub fn pseudo_objective_value(&self) -> Exact {
        self.pseudo_objective.value()
    }

    /// Pseudo objective value of the columns that are not in the LP.
    #[must_use]
    pub fn loose_objective_value(&self) -> Exact {
        self.loose_objective.value()
    }

    /// Objective value of the last solve, including the loose objective.
    ///
    /// # Return value
    ///
    /// Infinity if the LP was found infeasible or exceeds the cutoff bound, negative infinity if
    /// it is unbounded, if no bound is known or if a loose column has an infinite best bound.
    #[must_use]
    pub fn objective_value(&self) -> Exact {
        if !self.flags.solved {
            return Exact::NegativeInfinity;
        }
        match self.status {
            LpStatus::Optimal if !self.loose_objective.is_infinite() => &self.objective_value + &self.loose_objective.value(),
            LpStatus::Infeasible | LpStatus::ObjectiveLimit => Exact::Infinity,
            _ => Exact::NegativeInfinity,
        }
    }

    /// Upper bound on the objective value, beyond which the LP doesn't need to be solved.
    #[must_use]
    pub fn cutoff_bound(&self) -> &Exact {
        &self.cutoff
    }

    /// Set the cutoff bound.
    ///
    /// When the bound increases, an objective limit found before is no longer valid.
    pub fn set_cutoff_bound(&mut self, cutoff: Exact) {
        if cutoff > self.cutoff && self.status == LpStatus::ObjectiveLimit {
            self.mark_unsolved();
        }
        self.cutoff = cutoff;
    }

    /// The objective limit for the backend: the cutoff bound minus what columns outside of the LP
    /// contribute at best.
    pub(crate) fn objective_limit(&self) -> Exact {
        if self.cutoff.is_infinite() || self.loose_objective.is_infinite() {
            Exact::Infinity
        } else {
            &self.cutoff - &self.loose_objective.value()
        }
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::lp::objective::ObjectiveSum;
    use crate::data::number_types::exact::Exact;
    use crate::R;

    #[test]
    fn infinite_contributions_are_counted() {
        let mut sum = ObjectiveSum::new();
        sum.add(Some(&R!(3)));
        sum.add(None);
        sum.add(Some(&R!(-1, 2)));
        assert_eq!(sum.value(), Exact::NegativeInfinity);

        sum.remove(None);
        assert_eq!(sum.value(), R!(5, 2));
        sum.remove(Some(&R!(3)));
        assert_eq!(sum.value(), R!(-1, 2));
    }
}
