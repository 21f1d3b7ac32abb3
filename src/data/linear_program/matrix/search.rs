//! # Searching coefficients
//!
//! Partitions are sorted on demand, right before a binary search. Rows that delay sorting are
//! never sorted here: an unsorted partition of such a row is reported as not containing the
//! partner.
use crate::data::linear_program::adjacency::Partition;
use crate::data::linear_program::handle::{ColumnId, RowId};
use crate::data::linear_program::matrix::{fix_columns, fix_rows, row_in, row_in_mut, Matrix};
use crate::error::LpResult;

/// The partitions that may contain the entry of a partner.
///
/// A linked entry of a partner in the LP is in the `Lp` partition, all other entries are in the
/// `Other` partition.
fn candidates(partner_in_lp: bool, nr_unlinked: usize) -> impl Iterator<Item=Partition> {
    let lp = partner_in_lp.then_some(Partition::Lp);
    let other = (!partner_in_lp || nr_unlinked > 0).then_some(Partition::Other);
    lp.into_iter().chain(other)
}

impl Matrix {
    /// Position of the entry of `row_id` in a column.
    pub(crate) fn column_search(&mut self, column_id: ColumnId, row_id: RowId) -> LpResult<Option<usize>> {
        let row_in_lp = row_in(&self.rows, row_id)?.lp_position.is_some();
        let nr_unlinked = self.columns[column_id.0].entries.nr_unlinked();

        for partition in candidates(row_in_lp, nr_unlinked) {
            let fixups = self.columns[column_id.0].entries.sort(partition);
            fix_rows(&mut self.rows, fixups)?;
            if let Some(position) = self.columns[column_id.0].entries.find(partition, row_id) {
                return Ok(Some(position));
            }
        }

        Ok(None)
    }

    /// Position of the entry of `column_id` in a row.
    pub(crate) fn row_search(&mut self, row_id: RowId, column_id: ColumnId) -> LpResult<Option<usize>> {
        let column_in_lp = self.columns[column_id.0].lp_position.is_some();
        let row = row_in_mut(&mut self.rows, row_id)?;
        let nr_unlinked = row.entries.nr_unlinked();

        for partition in candidates(column_in_lp, nr_unlinked) {
            if !row.entries.is_sorted(partition) {
                if row.delay_sort {
                    continue;
                }
                let fixups = row.entries.sort(partition);
                fix_columns(&mut self.columns, fixups);
            }
            if let Some(position) = row.entries.find(partition, column_id) {
                return Ok(Some(position));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::adjacency::Partition;
    use crate::data::linear_program::column::Column;
    use crate::data::linear_program::handle::VariableId;
    use crate::data::linear_program::matrix::Matrix;
    use crate::data::linear_program::row::Row;
    use crate::R;

    #[test]
    fn sorts_lazily() {
        let mut matrix = Matrix::new();
        let columns = (0..4)
            .map(|i| matrix.push_column(Column::new(VariableId(i), false, R!(0), R!(0), R!(1))))
            .collect::<Vec<_>>();
        let row = matrix.push_row(Row::new("r".to_string(), R!(0), R!(1), R!(0)));
        for &column in columns.iter().rev() {
            matrix.add_row_coefficient(row, column, R!(column.index() as i64 + 1)).unwrap();
        }
        matrix.link_row(row).unwrap();

        assert!(!matrix.row(row).unwrap().entries().is_sorted(Partition::Other));
        assert_eq!(matrix.row_search(row, columns[2]).unwrap(), Some(2));
        assert!(matrix.row(row).unwrap().entries().is_sorted(Partition::Other));
        assert_eq!(matrix.coefficient(columns[2], row).unwrap(), R!(3));
        assert!(matrix.is_consistent());
    }

    #[test]
    fn delayed_rows_are_not_sorted() {
        let mut matrix = Matrix::new();
        let first = matrix.push_column(Column::new(VariableId(0), false, R!(0), R!(0), R!(1)));
        let second = matrix.push_column(Column::new(VariableId(1), false, R!(0), R!(0), R!(1)));
        let row = matrix.push_row(Row::new("r".to_string(), R!(0), R!(1), R!(0)));
        matrix.delay_row_sort(row).unwrap();
        matrix.add_row_coefficient(row, second, R!(1)).unwrap();
        matrix.add_row_coefficient(row, first, R!(1)).unwrap();

        assert_eq!(matrix.row_search(row, first).unwrap(), None);
        assert!(!matrix.row(row).unwrap().entries().is_sorted(Partition::Other));
    }
}
