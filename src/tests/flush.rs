use crate::algorithm::lp::Settings;
use crate::data::linear_program::elements::{BoundDirection, LpStatus, VariableType};
use crate::data::linear_program::shadow::ShadowLp;
use crate::data::number_types::exact::Exact;
use crate::interface::dense::DenseSimplex;
use crate::interface::LpSolver;
use crate::R;
use crate::tests::{two_by_two, Scenario};
use crate::tests::instrumented::Instrumented;

fn flushed() -> Scenario<Instrumented<DenseSimplex>> {
    let mut scenario = two_by_two(Instrumented::new(DenseSimplex::new()), Settings::default());
    scenario.lp.flush().unwrap();
    scenario.lp.solver.calls.clear();
    scenario
}

#[test]
fn first_flush_adds_everything() {
    let Scenario { mut lp, columns, rows, .. } = two_by_two(Instrumented::new(DenseSimplex::new()), Settings::default());
    assert!(!lp.is_flushed());

    lp.flush().unwrap();
    assert_eq!(lp.solver().calls[2..], ["add_columns(2)", "add_rows(2)"]);
    assert!(lp.is_flushed());
    assert!(lp.is_consistent());
    assert_eq!(lp.matrix().solver_columns(), &columns[..]);
    assert_eq!(lp.matrix().solver_rows(), &rows[..]);
    assert_eq!(lp.matrix().first_changed_column(), 2);
    assert_eq!(lp.matrix().first_changed_row(), 2);
    assert_eq!(lp.row(rows[1]).unwrap().solver_position(), Some(1));
    assert_eq!(lp.coefficient(columns[1], rows[1]).unwrap(), R!(-1));
}

#[test]
fn flush_is_idempotent() {
    let Scenario { mut lp, .. } = flushed();

    lp.flush().unwrap();
    assert!(lp.solver().calls.is_empty());
    assert!(lp.is_flushed());
}

#[test]
fn side_change_sends_both_sides() {
    let Scenario { mut lp, rows, .. } = flushed();

    lp.change_row_side(rows[0], BoundDirection::Upper, R!(12)).unwrap();
    assert!(!lp.is_flushed());
    lp.flush().unwrap();
    assert_eq!(lp.solver().calls, ["change_sides([0]; -100000000000000000000; 12)"]);
    assert!(lp.is_consistent());
}

#[test]
fn reverted_change_is_not_sent() {
    let Scenario { mut lp, columns, rows, .. } = flushed();

    lp.change_row_side(rows[1], BoundDirection::Lower, R!(-5)).unwrap();
    lp.change_row_side(rows[1], BoundDirection::Lower, R!(-4)).unwrap();
    lp.change_column_bound(columns[0], BoundDirection::Upper, R!(5)).unwrap();
    lp.change_column_bound(columns[0], BoundDirection::Upper, Exact::Infinity).unwrap();
    lp.flush().unwrap();

    assert!(lp.solver().calls.is_empty());
    assert!(lp.is_flushed());
}

#[test]
fn constant_shifts_the_sides() {
    let Scenario { mut lp, rows, .. } = flushed();

    lp.change_row_constant(rows[0], R!(2)).unwrap();
    lp.flush().unwrap();
    assert_eq!(lp.solver().calls, ["change_sides([0]; -100000000000000000000; 8)"]);

    let mut shadow = ShadowLp::new();
    lp.solve(&mut shadow).unwrap();
    assert_eq!(lp.objective_value(), R!(-14));
    assert_eq!(lp.row_activity(rows[0]).unwrap(), R!(10));
}

#[test]
fn column_changes_are_batched() {
    let Scenario { mut lp, columns, .. } = flushed();

    lp.change_column_objective(columns[1], R!(-3)).unwrap();
    lp.change_column_bound(columns[0], BoundDirection::Upper, R!(5)).unwrap();
    lp.change_column_bound(columns[0], BoundDirection::Upper, R!(6)).unwrap();
    lp.flush().unwrap();

    assert_eq!(lp.solver().calls, ["change_objective([1]; -3)", "change_bounds([0]; 0; 6)"]);
}

#[test]
fn changes_outside_of_the_backend_are_not_queued() {
    let Scenario { mut problem, mut lp, rows, .. } = flushed();
    let z = problem.add_variable("z", R!(1), R!(0), R!(1), VariableType::Continuous);
    let z = lp.create_column(&mut problem, z).unwrap();
    let spare = lp.create_row("spare", R!(0), R!(1), R!(0)).unwrap();

    lp.change_column_bound(z, BoundDirection::Upper, R!(2)).unwrap();
    lp.change_row_side(spare, BoundDirection::Upper, R!(2)).unwrap();
    assert!(lp.is_flushed());
    assert_eq!(lp.row(rows[0]).unwrap().nr_uses(), 2);
}

#[test]
fn changed_coefficient_resends_the_row() {
    let Scenario { mut lp, columns, rows, .. } = flushed();

    lp.change_row_coefficient(rows[1], columns[0], R!(2)).unwrap();
    assert_eq!(lp.matrix().first_changed_row(), 1);
    lp.flush().unwrap();
    assert_eq!(lp.solver().calls, ["delete_rows(1..=1)", "add_rows(1)"]);
    assert!(lp.is_consistent());

    let mut shadow = ShadowLp::new();
    lp.solve(&mut shadow).unwrap();
    assert_eq!(lp.objective_value(), R!(-18));
    assert_eq!(lp.column(columns[0]).primal(), &R!(2));
}

#[test]
fn deleted_rows_are_resent() {
    let Scenario { mut lp, columns, rows, .. } = flushed();
    let cap = lp.create_row("cap", Exact::NegativeInfinity, R!(8), R!(0)).unwrap();
    lp.add_row_coefficient(cap, columns[0], R!(1)).unwrap();
    lp.add_row(cap).unwrap();
    lp.flush().unwrap();
    lp.solver.calls.clear();

    lp.delete_rowset(&[false, true, false]).unwrap();
    assert_eq!(lp.rows(), &[rows[0], cap]);
    assert_eq!(lp.matrix().first_changed_row(), 1);
    assert_eq!(lp.row(cap).unwrap().lp_position(), Some(1));
    assert_eq!(lp.row(rows[1]).unwrap().nr_uses(), 1);
    assert_eq!(lp.row(rows[1]).unwrap().lp_position(), None);

    let cap_y = lp.create_row("cap_y", Exact::NegativeInfinity, R!(6), R!(0)).unwrap();
    lp.add_row_coefficient(cap_y, columns[1], R!(1)).unwrap();
    lp.add_row(cap_y).unwrap();
    lp.flush().unwrap();

    assert_eq!(lp.solver().calls, ["delete_rows(1..=2)", "add_rows(2)"]);
    assert_eq!(lp.matrix().solver_rows(), &[rows[0], cap, cap_y]);
    assert_eq!(lp.matrix().first_changed_row(), 3);
    assert_eq!(lp.row(cap).unwrap().solver_position(), Some(1));
    assert_eq!(lp.row(cap_y).unwrap().solver_position(), Some(2));
    assert_eq!(lp.row(rows[1]).unwrap().solver_position(), None);
    assert!(lp.is_consistent());

    let mut shadow = ShadowLp::new();
    assert_eq!(lp.solve(&mut shadow).unwrap().status, LpStatus::Optimal);
    assert_eq!(lp.objective_value(), R!(-16));

    lp.release_row(rows[1]).unwrap();
    assert!(lp.row(rows[1]).is_err());
    assert!(lp.release_row(rows[1]).is_err());
    assert!(lp.is_consistent());
}

#[test]
fn new_column_joins_existing_rows() {
    let Scenario { mut problem, mut lp, rows, .. } = flushed();
    let z = problem.add_variable("z", R!(1), R!(2), R!(3), VariableType::Integer);
    let z = lp.create_column(&mut problem, z).unwrap();
    lp.add_column_coefficient(z, rows[0], R!(1)).unwrap();
    lp.add_column(z).unwrap();
    lp.flush().unwrap();

    assert_eq!(lp.solver().calls, ["add_columns(1)"]);
    assert_eq!(lp.solver().nr_columns(), 3);
    assert_eq!(lp.column(z).solver_position(), Some(2));
    assert!(lp.is_consistent());

    let mut shadow = ShadowLp::new();
    lp.solve(&mut shadow).unwrap();
    assert_eq!(lp.objective_value(), R!(-12));
    assert_eq!(lp.column(z).primal(), &R!(2));
}

#[test]
fn shrinking_columns_deletes_the_suffix() {
    let Scenario { mut lp, columns, rows, .. } = flushed();

    lp.shrink_columns(1).unwrap();
    assert_eq!(lp.columns(), &columns[..1]);
    assert_eq!(lp.loose_objective_value(), Exact::NegativeInfinity);
    lp.flush().unwrap();
    assert_eq!(lp.solver().calls, ["delete_columns(1..=1)"]);
    assert!(lp.is_consistent());

    lp.add_column(columns[1]).unwrap();
    lp.flush().unwrap();
    assert_eq!(lp.coefficient(columns[1], rows[1]).unwrap(), R!(-1));
    assert_eq!(lp.loose_objective_value(), R!(0));
    assert!(lp.is_consistent());
}
