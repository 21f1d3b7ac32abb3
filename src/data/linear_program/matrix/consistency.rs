//! # Consistency of the matrix
//!
//! An expensive check of all invariants that the linking engine maintains. Only meant to be
//! called from tests and debug assertions.
use crate::data::linear_program::matrix::Matrix;

impl Matrix {
    /// Whether both sides of the matrix agree.
    ///
    /// Checks, for every column and row:
    ///
    /// * the cached counts of each adjacency list;
    /// * that linked entries refer to each other and hold the same coefficient;
    /// * that an entry is in the `Lp` partition exactly when it is linked to a partner in the LP;
    /// * that every partner exists.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let columns_consistent = self.columns.iter().enumerate().all(|(index, column)| {
            column.entries.is_consistent()
                && column.entries.iter().enumerate().all(|(position, (row_id, value, link))| {
                    let Some(row) = self.rows.get(row_id.0).and_then(Option::as_ref) else {
                        return false;
                    };
                    let in_lp_partition = position < column.entries.nr_lp();
                    let should_be = link.is_some() && row.lp_position.is_some();
                    let link_consistent = link.is_none_or(|row_position| {
                        row_position < row.entries.len()
                            && row.entries.partner(row_position).0 == index
                            && row.entries.link(row_position) == Some(position)
                            && row.entries.value(row_position) == value
                    });

                    in_lp_partition == should_be && link_consistent
                })
        });

        let rows_consistent = self.rows.iter().enumerate().all(|(index, row)| {
            let Some(row) = row else { return true; };

            row.entries.is_consistent()
                && (!row.delay_sort || row.entries.nr_unlinked() == row.entries.len())
                && row.entries.iter().enumerate().all(|(position, (column_id, value, link))| {
                    let Some(column) = self.columns.get(column_id.0) else {
                        return false;
                    };
                    let in_lp_partition = position < row.entries.nr_lp();
                    let should_be = link.is_some() && column.lp_position.is_some();
                    let link_consistent = link.is_none_or(|column_position| {
                        column_position < column.entries.len()
                            && column.entries.partner(column_position).0 == index
                            && column.entries.link(column_position) == Some(position)
                            && column.entries.value(column_position) == value
                    });

                    in_lp_partition == should_be && link_consistent
                })
        });

        columns_consistent && rows_consistent
    }
}
