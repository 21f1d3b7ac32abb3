use crate::algorithm::lp::{ExactLp, Settings};
use crate::data::linear_program::elements::{BoundDirection, LpStatus, VariableType};
use crate::data::linear_program::problem::Problem;
use crate::data::linear_program::shadow::ShadowLp;
use crate::data::number_types::exact::Exact;
use crate::error::LpError;
use crate::interface::dense::DenseSimplex;
use crate::R;
use crate::tests::{two_by_two, Scenario};

#[test]
fn objects_are_created_once() {
    let Scenario { mut problem, mut lp, columns, rows } = two_by_two(DenseSimplex::new(), Settings::default());
    let x = lp.column(columns[0]).variable();
    assert_eq!(problem.variable(x).column(), Some(columns[0]));

    assert!(matches!(lp.create_column(&mut problem, x), Err(LpError::InvalidData(_))));
    assert!(lp.add_column(columns[0]).is_err());
    assert!(lp.add_row(rows[0]).is_err());
    assert_eq!(lp.row(rows[0]).unwrap().nr_uses(), 2);
}

#[test]
fn invalid_objects_are_rejected() {
    let mut problem = Problem::new();
    let mut lp = ExactLp::new(DenseSimplex::new(), Settings::default()).unwrap();

    assert!(lp.create_row("crossed", R!(2), R!(1), R!(0)).is_err());
    assert!(lp.create_row("unreachable", Exact::Infinity, Exact::Infinity, R!(0)).is_err());
    assert!(lp.create_row("shifted", R!(0), R!(1), Exact::Infinity).is_err());

    let crossed = problem.add_variable("crossed", R!(0), R!(0), R!(1), VariableType::Continuous);
    problem.variable_mut(crossed).bounds[BoundDirection::Lower] = R!(2);
    assert!(lp.create_column(&mut problem, crossed).is_err());
    let unbounded = problem.add_variable("unbounded", R!(0), R!(0), R!(1), VariableType::Continuous);
    problem.variable_mut(unbounded).objective = Exact::Infinity;
    assert!(lp.create_column(&mut problem, unbounded).is_err());
    assert_eq!(problem.variable(unbounded).column(), None);
}

#[test]
fn invalid_values_are_rejected() {
    let Scenario { mut lp, columns, rows, .. } = two_by_two(DenseSimplex::new(), Settings::default());

    assert!(lp.change_column_objective(columns[0], Exact::Infinity).is_err());
    assert!(lp.change_column_bound(columns[0], BoundDirection::Lower, Exact::Infinity).is_err());
    assert!(lp.change_row_side(rows[0], BoundDirection::Upper, Exact::NegativeInfinity).is_err());
    assert!(lp.change_row_constant(rows[0], Exact::NegativeInfinity).is_err());
    assert!(lp.delete_rowset(&[true]).is_err());
    assert_eq!(lp.rows(), &rows[..]);
}

#[test]
fn uses_keep_rows_alive() {
    let mut lp = ExactLp::new(DenseSimplex::new(), Settings::default()).unwrap();
    let row = lp.create_row("row", R!(0), R!(1), R!(0)).unwrap();

    lp.capture_row(row).unwrap();
    lp.release_row(row).unwrap();
    assert_eq!(lp.row(row).unwrap().nr_uses(), 1);

    lp.add_row(row).unwrap();
    lp.release_row(row).unwrap();
    lp.clear().unwrap();
    assert!(lp.row(row).is_err());
    assert!(lp.capture_row(row).is_err());

    let next = lp.create_row("next", R!(0), R!(1), R!(0)).unwrap();
    assert_eq!(lp.matrix().row_ids().collect::<Vec<_>>(), vec![next]);
    assert!(lp.is_consistent());
}

#[test]
fn active_rows_keep_their_last_use() {
    let Scenario { mut lp, rows, .. } = two_by_two(DenseSimplex::new(), Settings::default());

    lp.release_row(rows[0]).unwrap();
    assert!(matches!(lp.release_row(rows[0]), Err(LpError::InvalidData(_))));
    assert_eq!(lp.row(rows[0]).unwrap().nr_uses(), 1);
    assert_eq!(lp.rows(), &rows[..]);
    assert!(lp.is_consistent());

    let mut shadow = ShadowLp::new();
    lp.solve(&mut shadow).unwrap();
    assert_eq!(lp.objective_value(), R!(-17));

    lp.shrink_rows(0).unwrap();
    assert!(lp.row(rows[0]).is_err());
    assert!(lp.release_row(rows[0]).is_err());
}

#[test]
fn locked_rows_keep_their_coefficients() {
    let Scenario { mut problem, mut lp, columns, .. } = two_by_two(DenseSimplex::new(), Settings::default());
    let z = problem.add_variable("z", R!(0), R!(0), R!(1), VariableType::Continuous);
    let z = lp.create_column(&mut problem, z).unwrap();
    let cut = lp.create_row("cut", R!(0), R!(1), R!(0)).unwrap();
    lp.add_row_coefficient(cut, columns[0], R!(1)).unwrap();

    lp.lock_row(cut).unwrap();
    assert!(lp.row(cut).unwrap().is_locked());
    assert!(lp.add_row_coefficient(cut, z, R!(1)).is_err());
    assert!(lp.change_row_coefficient(cut, columns[0], R!(2)).is_err());
    assert!(lp.delete_column_coefficient(columns[0], cut).is_err());
    assert!(lp.change_row_constant(cut, R!(1)).is_err());
    lp.change_row_side(cut, BoundDirection::Upper, R!(3)).unwrap();

    lp.unlock_row(cut).unwrap();
    assert!(lp.unlock_row(cut).is_err());
    lp.add_row_coefficient(cut, z, R!(1)).unwrap();
    assert_eq!(lp.coefficient(z, cut).unwrap(), R!(1));
}

#[test]
fn zero_coefficients_are_not_stored() {
    let Scenario { mut lp, columns, rows, .. } = two_by_two(DenseSimplex::new(), Settings::default());
    let cut = lp.create_row("cut", R!(0), R!(1), R!(0)).unwrap();

    lp.add_row_coefficient(cut, columns[0], R!(0)).unwrap();
    assert!(lp.row(cut).unwrap().entries().is_empty());

    lp.change_row_coefficient(rows[1], columns[1], R!(0)).unwrap();
    assert_eq!(lp.coefficient(columns[1], rows[1]).unwrap(), R!(0));
    assert_eq!(lp.row(rows[1]).unwrap().entries().len(), 1);
    assert!(lp.delete_row_coefficient(rows[1], columns[1]).is_err());

    lp.increase_row_coefficient(rows[0], columns[0], R!(-1)).unwrap();
    assert_eq!(lp.row(rows[0]).unwrap().entries().len(), 1);
    assert!(lp.add_row_coefficient(rows[0], columns[1], R!(3)).is_err());
    assert!(lp.is_consistent());
}

#[test]
fn batched_coefficients_are_summed() {
    let Scenario { mut lp, columns, .. } = two_by_two(DenseSimplex::new(), Settings::default());
    let cut = lp.create_row("cut", Exact::NegativeInfinity, R!(5), R!(0)).unwrap();

    lp.add_row_coefficients(cut, &[(columns[1], R!(2)), (columns[0], R!(1)), (columns[1], R!(3))]).unwrap();
    assert!(!lp.row(cut).unwrap().is_delay_sorted());
    assert_eq!(lp.row(cut).unwrap().entries().len(), 2);
    assert_eq!(lp.coefficient(columns[1], cut).unwrap(), R!(5));

    lp.delay_row_sort(cut).unwrap();
    lp.add_row_coefficient(cut, columns[0], R!(-1)).unwrap();
    assert!(lp.coefficient(columns[0], cut).is_err());
    lp.add_row(cut).unwrap();
    assert_eq!(lp.row(cut).unwrap().entries().len(), 1);
    assert!(lp.is_consistent());

    let mut shadow = ShadowLp::new();
    lp.solve(&mut shadow).unwrap();
    assert_eq!(lp.objective_value(), R!(-11));
}

#[test]
fn pseudo_and_loose_objective() {
    let mut problem = Problem::new();
    let mut lp = ExactLp::new(DenseSimplex::new(), Settings::default()).unwrap();
    let x = problem.add_variable("x", R!(-1), R!(0), Exact::Infinity, VariableType::Continuous);
    let y = problem.add_variable("y", R!(2), R!(1), R!(5), VariableType::Integer);
    let x = lp.create_column(&mut problem, x).unwrap();
    lp.create_column(&mut problem, y).unwrap();
    assert_eq!(lp.pseudo_objective_value(), Exact::NegativeInfinity);
    assert_eq!(lp.loose_objective_value(), Exact::NegativeInfinity);

    lp.add_column(x).unwrap();
    assert_eq!(lp.loose_objective_value(), R!(2));

    lp.change_column_bound(x, BoundDirection::Upper, R!(4)).unwrap();
    assert_eq!(lp.pseudo_objective_value(), R!(-2));
    assert_eq!(lp.loose_objective_value(), R!(2));

    lp.shrink_columns(0).unwrap();
    assert_eq!(lp.loose_objective_value(), R!(-2));
    lp.change_column_objective(x, R!(1)).unwrap();
    assert_eq!(lp.loose_objective_value(), R!(2));
    assert_eq!(lp.pseudo_objective_value(), R!(2));
}

#[test]
fn cutoff_bound_invalidates_objective_limit() {
    let Scenario { mut lp, .. } = two_by_two(DenseSimplex::new(), Settings::default());
    assert_eq!(lp.cutoff_bound(), &Exact::Infinity);
    assert_eq!(lp.objective_value(), Exact::NegativeInfinity);

    lp.set_cutoff_bound(R!(-20));
    let mut shadow = ShadowLp::new();
    lp.solve(&mut shadow).unwrap();
    assert_eq!(lp.status(), LpStatus::ObjectiveLimit);

    lp.set_cutoff_bound(Exact::Infinity);
    assert_eq!(lp.status(), LpStatus::NotSolved);
    assert_eq!(lp.objective_value(), Exact::NegativeInfinity);
}

#[test]
fn solution_values_need_a_solve() {
    let Scenario { mut lp, columns, rows, .. } = two_by_two(DenseSimplex::new(), Settings::default());

    assert!(matches!(lp.row_activity(rows[0]), Err(LpError::NoSolution(_))));
    assert!(lp.row_feasibility(rows[0]).is_err());
    assert!(lp.column_reduced_cost_feasibility(columns[0]).is_err());

    assert_eq!(lp.row_pseudo_activity(rows[0]).unwrap(), R!(0));
    assert_eq!(lp.row_min_activity(rows[1]).unwrap(), Exact::NegativeInfinity);
    assert_eq!(lp.row_max_activity(rows[1]).unwrap(), Exact::Infinity);
}

#[test]
fn row_activity_ranges() {
    let mut problem = Problem::new();
    let mut lp = ExactLp::new(DenseSimplex::new(), Settings::default()).unwrap();
    let x = problem.add_variable("x", R!(1), R!(-1), R!(2), VariableType::Continuous);
    let y = problem.add_variable("y", R!(-1), R!(0), R!(3), VariableType::Continuous);
    let x = lp.create_column(&mut problem, x).unwrap();
    let y = lp.create_column(&mut problem, y).unwrap();
    let row = lp.create_row("row", R!(0), R!(4), R!(1, 2)).unwrap();
    lp.add_row_coefficients(row, &[(x, R!(2)), (y, R!(-1))]).unwrap();

    assert_eq!(lp.row_min_activity(row).unwrap(), R!(-9, 2));
    assert_eq!(lp.row_max_activity(row).unwrap(), R!(9, 2));
    assert_eq!(lp.row_pseudo_activity(row).unwrap(), R!(-9, 2));
}
