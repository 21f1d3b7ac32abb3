//! Random sequences of modifications, checked against a plain map of coefficients.
use std::collections::HashMap;

use proptest::prelude::*;

use crate::algorithm::lp::{ExactLp, Settings};
use crate::data::linear_program::elements::{LpStatus, VariableType};
use crate::data::linear_program::handle::{ColumnId, RowId};
use crate::data::linear_program::problem::Problem;
use crate::data::linear_program::shadow::ShadowLp;
use crate::data::number_types::exact::Exact;
use crate::interface::dense::DenseSimplex;
use crate::R;

const NR_COLUMNS: usize = 3;
const NR_ROWS: usize = 3;

#[derive(Clone, Debug)]
enum Operation {
    Change(usize, usize, i64),
    AddColumn(usize),
    AddRow(usize),
    ShrinkColumns(usize),
    ShrinkRows(usize),
    Flush,
    Solve,
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (0..NR_COLUMNS, 0..NR_ROWS, -2..=2i64).prop_map(|(column, row, value)| Operation::Change(column, row, value)),
        2 => (0..NR_COLUMNS).prop_map(Operation::AddColumn),
        2 => (0..NR_ROWS).prop_map(Operation::AddRow),
        1 => (0..NR_COLUMNS).prop_map(Operation::ShrinkColumns),
        1 => (0..NR_ROWS).prop_map(Operation::ShrinkRows),
        1 => Just(Operation::Flush),
        1 => Just(Operation::Solve),
    ]
}

fn setup() -> (ExactLp<DenseSimplex>, Vec<ColumnId>, Vec<RowId>) {
    let mut problem = Problem::new();
    let mut lp = ExactLp::new(DenseSimplex::new(), Settings::default()).unwrap();
    let columns = (0..NR_COLUMNS)
        .map(|index| {
            let variable = problem.add_variable(format!("x{}", index), R!(-1), R!(0), R!(10), VariableType::Continuous);
            lp.create_column(&mut problem, variable).unwrap()
        })
        .collect();
    let rows = (0..NR_ROWS)
        .map(|index| lp.create_row(format!("r{}", index), Exact::NegativeInfinity, R!(10), R!(0)).unwrap())
        .collect();

    (lp, columns, rows)
}

proptest! {
    #[test]
    fn modifications_keep_the_lp_consistent(operations in prop::collection::vec(operation(), 0..40)) {
        let (mut lp, columns, rows) = setup();
        let mut model = HashMap::new();
        let mut shadow = ShadowLp::new();

        for operation in operations {
            match operation {
                Operation::Change(column, row, value) => {
                    lp.change_row_coefficient(rows[row], columns[column], R!(value)).unwrap();
                    if value == 0 {
                        model.remove(&(column, row));
                    } else {
                        model.insert((column, row), R!(value));
                    }
                },
                Operation::AddColumn(column) => {
                    if lp.column(columns[column]).lp_position().is_none() {
                        lp.add_column(columns[column]).unwrap();
                    }
                },
                Operation::AddRow(row) => {
                    if lp.row(rows[row]).unwrap().lp_position().is_none() {
                        lp.add_row(rows[row]).unwrap();
                    }
                },
                Operation::ShrinkColumns(nr) => lp.shrink_columns(nr).unwrap(),
                Operation::ShrinkRows(nr) => lp.shrink_rows(nr).unwrap(),
                Operation::Flush => {
                    lp.flush().unwrap();
                    prop_assert!(lp.is_flushed());
                    prop_assert_eq!(lp.matrix().solver_rows(), lp.rows());
                },
                Operation::Solve => {
                    let outcome = lp.solve(&mut shadow).unwrap();
                    prop_assert_eq!(outcome.status, LpStatus::Optimal);
                    prop_assert!(outcome.proved_bound);
                    for &row in &lp.rows().to_vec() {
                        prop_assert!(lp.row_feasibility(row).unwrap() >= R!(0));
                    }
                },
            }

            prop_assert!(lp.is_consistent());
            for column in 0..NR_COLUMNS {
                for row in 0..NR_ROWS {
                    let expected = model.get(&(column, row)).cloned().unwrap_or_else(|| R!(0));
                    prop_assert_eq!(lp.coefficient(columns[column], rows[row]).unwrap(), expected);
                }
            }
        }
    }
}
