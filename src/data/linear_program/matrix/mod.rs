//! # The exact constraint matrix
//!
//! Columns and rows live in two arenas and refer to each other through their adjacency lists.
//! Every nonzero coefficient is stored at least once, on the side where it was added, and twice
//! once it is linked: then the column entry and the row entry know each other's position.
//!
//! Linking is lazy. An edit made while neither side is in the LP is stored on one side only, and
//! the entries are linked when the object is flushed to the solver. Entries linked to a partner
//! in the LP are kept in front of each adjacency list, such that the part of the matrix that the
//! solver sees can be iterated without filtering.
mod consistency;
mod link;
mod search;

use std::fmt::Debug;

use crate::data::linear_program::adjacency::{Adjacency, Fixup};
use crate::data::linear_program::column::Column;
use crate::data::linear_program::handle::{ColumnId, RowId};
use crate::data::linear_program::row::Row;
use crate::error::{LpError, LpResult};

/// Column and row arenas, together with the objects that the solver currently holds.
#[derive(Clone, Debug, Default)]
pub struct Matrix {
    pub(crate) columns: Vec<Column>,
    /// Rows are freed once unused; their handles are not reused.
    pub(crate) rows: Vec<Option<Row>>,

    /// Columns in the solver, by solver position.
    pub(crate) solver_columns: Vec<ColumnId>,
    /// Rows in the solver, by solver position.
    pub(crate) solver_rows: Vec<RowId>,
    /// Below this position, the active columns and the solver columns are identical.
    pub(crate) first_changed_column: usize,
    /// Below this position, the active rows and the solver rows are identical.
    pub(crate) first_changed_row: usize,
    /// Whether the solver reflects all modifications.
    pub(crate) flushed: bool,
}

impl Matrix {
    /// Create an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flushed: true,
            ..Self::default()
        }
    }

    /// Column of a handle.
    ///
    /// Column handles are only handed out by this matrix and stay valid.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id.0]
    }

    pub(crate) fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        &mut self.columns[id.0]
    }

    /// Row of a handle.
    ///
    /// # Errors
    ///
    /// If the row was freed.
    pub fn row(&self, id: RowId) -> LpResult<&Row> {
        row_in(&self.rows, id)
    }

    pub(crate) fn row_mut(&mut self, id: RowId) -> LpResult<&mut Row> {
        row_in_mut(&mut self.rows, id)
    }

    /// Number of columns ever created.
    #[must_use]
    pub fn nr_columns(&self) -> usize {
        self.columns.len()
    }

    /// Handles of all rows that were not freed.
    pub fn row_ids(&self) -> impl Iterator<Item=RowId> + '_ {
        self.rows.iter().enumerate()
            .filter(|(_, row)| row.is_some())
            .map(|(index, _)| RowId(index))
    }

    /// Columns currently in the solver, by solver position.
    #[must_use]
    pub fn solver_columns(&self) -> &[ColumnId] {
        &self.solver_columns
    }

    /// Rows currently in the solver, by solver position.
    #[must_use]
    pub fn solver_rows(&self) -> &[RowId] {
        &self.solver_rows
    }

    /// First active column position that may differ from the solver.
    #[must_use]
    pub fn first_changed_column(&self) -> usize {
        self.first_changed_column
    }

    /// First active row position that may differ from the solver.
    #[must_use]
    pub fn first_changed_row(&self) -> usize {
        self.first_changed_row
    }

    pub(crate) fn push_column(&mut self, column: Column) -> ColumnId {
        self.columns.push(column);
        ColumnId(self.columns.len() - 1)
    }

    pub(crate) fn push_row(&mut self, row: Row) -> RowId {
        self.rows.push(Some(row));
        RowId(self.rows.len() - 1)
    }

    /// Remove a row and every coefficient that refers to it.
    pub(crate) fn free_row(&mut self, id: RowId) -> LpResult<()> {
        debug_assert!(self.row(id)?.lp_position.is_none());

        self.unlink_row(id)?;
        for column in self.columns.iter_mut().filter(|column| column.entries.nr_unlinked() > 0) {
            let mut position = 0;
            while position < column.entries.len() {
                if column.entries.partner(position) == id && column.entries.link(position).is_none() {
                    let (_, fixups) = column.entries.remove(position);
                    fix_rows(&mut self.rows, fixups)?;
                } else {
                    position += 1;
                }
            }
        }
        self.rows[id.0] = None;

        Ok(())
    }

    /// Set the position of a column in the active LP.
    ///
    /// The entries of the rows that are linked to this column move to or from the `Lp` partition
    /// of those rows.
    pub(crate) fn set_column_lp_position(&mut self, id: ColumnId, lp_position: Option<usize>) -> LpResult<()> {
        let column = &mut self.columns[id.0];
        let entering = lp_position.is_some();
        let was_in_lp = column.lp_position.is_some();
        column.lp_position = lp_position;
        if entering == was_in_lp {
            return Ok(());
        }

        for position in 0..self.columns[id.0].entries.len() {
            let entries = &self.columns[id.0].entries;
            if let Some(row_position) = entries.link(position) {
                let row = row_in_mut(&mut self.rows, entries.partner(position))?;
                let fixups = move_partition(&mut row.entries, row_position, entering);
                fix_columns(&mut self.columns, fixups);
            }
        }

        Ok(())
    }

    /// Set the position of a row in the active LP.
    pub(crate) fn set_row_lp_position(&mut self, id: RowId, lp_position: Option<usize>) -> LpResult<()> {
        let row = row_in_mut(&mut self.rows, id)?;
        let entering = lp_position.is_some();
        let was_in_lp = row.lp_position.is_some();
        row.lp_position = lp_position;
        if entering == was_in_lp {
            return Ok(());
        }

        for position in 0..row_in(&self.rows, id)?.entries.len() {
            let entries = &row_in(&self.rows, id)?.entries;
            if let Some(column_position) = entries.link(position) {
                let column = &mut self.columns[entries.partner(position).0];
                let fixups = move_partition(&mut column.entries, column_position, entering);
                fix_rows(&mut self.rows, fixups)?;
            }
        }

        Ok(())
    }

    /// Announce that a coefficient between two objects changed.
    ///
    /// If both are in the solver, one of them has to be flushed again. That is the one for which
    /// the fewest solver positions need to be re-examined.
    pub(crate) fn coefficient_changed(&mut self, column_id: ColumnId, row_id: RowId) -> LpResult<()> {
        let nr_solver_columns = self.solver_columns.len();
        let nr_solver_rows = self.solver_rows.len();

        let row = row_in_mut(&mut self.rows, row_id)?;
        row.valid_activity_lp = None;
        let column = &mut self.columns[column_id.0];

        if let (Some(column_position), Some(row_position)) = (column.solver_position, row.solver_position) {
            if nr_solver_rows - row_position <= nr_solver_columns - column_position {
                row.coefficient_changed = true;
                self.first_changed_row = self.first_changed_row.min(row_position);
            } else {
                column.coefficient_changed = true;
                self.first_changed_column = self.first_changed_column.min(column_position);
            }
        }
        self.flushed = false;

        Ok(())
    }
}

/// Move the entry at `position` into the `Lp` partition, or out of it.
fn move_partition<K: Copy + Ord + Debug>(entries: &mut Adjacency<K>, position: usize, entering: bool) -> Vec<Fixup<K>> {
    if entering {
        let boundary = entries.nr_lp();
        debug_assert!(position >= boundary);
        let fixups = entries.swap(position, boundary);
        entries.set_nr_lp(boundary + 1);
        fixups
    } else {
        let last = entries.nr_lp() - 1;
        debug_assert!(position <= last);
        let fixups = entries.swap(position, last);
        entries.set_nr_lp(last);
        fixups
    }
}

pub(crate) fn row_in(rows: &[Option<Row>], id: RowId) -> LpResult<&Row> {
    rows.get(id.0)
        .and_then(Option::as_ref)
        .ok_or_else(|| LpError::invalid(format!("row {} does not exist", id)))
}

pub(crate) fn row_in_mut(rows: &mut [Option<Row>], id: RowId) -> LpResult<&mut Row> {
    rows.get_mut(id.0)
        .and_then(Option::as_mut)
        .ok_or_else(|| LpError::invalid(format!("row {} does not exist", id)))
}

fn fix_rows(rows: &mut [Option<Row>], fixups: Vec<Fixup<RowId>>) -> LpResult<()> {
    for fixup in fixups {
        row_in_mut(rows, fixup.partner)?.entries.relink(fixup.partner_position, fixup.position);
    }
    Ok(())
}

fn fix_columns(columns: &mut [Column], fixups: Vec<Fixup<ColumnId>>) {
    for fixup in fixups {
        columns[fixup.partner.0].entries.relink(fixup.partner_position, fixup.position);
    }
}
