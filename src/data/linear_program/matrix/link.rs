//! # Linking engine
//!
//! Insertion, removal and modification of coefficients, keeping the two sides of the matrix and
//! the partitions of every adjacency list consistent.
use num_traits::Zero;

use crate::data::linear_program::handle::{ColumnId, RowId};
use crate::data::linear_program::matrix::{fix_columns, fix_rows, move_partition, row_in, row_in_mut, Matrix};
use crate::data::number_types::exact::Exact;
use crate::error::{LpError, LpResult};

impl Matrix {
    /// Append an entry for `row_id` to a column.
    ///
    /// # Arguments
    ///
    /// * `link`: Position of the counterpart in the row, if the row already has one. In that case,
    /// the row's entry is completed as well: it gets linked and is moved into the `Lp` partition of
    /// the row if the column is in the LP.
    ///
    /// # Return value
    ///
    /// Final position of the new entry in the column.
    pub(super) fn column_insert(
        &mut self,
        column_id: ColumnId,
        row_id: RowId,
        value: Exact,
        link: Option<usize>,
    ) -> LpResult<usize> {
        check_coefficient(&value)?;

        let row_in_lp = row_in(&self.rows, row_id)?.lp_position.is_some();
        let column = &mut self.columns[column_id.0];
        let column_in_lp = column.lp_position.is_some();
        let mut position = column.entries.push(row_id, value.clone(), link);

        if let Some(row_position) = link {
            let row = row_in_mut(&mut self.rows, row_id)?;
            debug_assert_eq!(row.entries.partner(row_position), column_id);
            debug_assert!(row.entries.link(row_position).is_none());
            row.entries.set_link(row_position, Some(position));

            if row_in_lp {
                let fixups = move_partition(&mut self.columns[column_id.0].entries, position, true);
                position = self.columns[column_id.0].entries.nr_lp() - 1;
                fix_rows(&mut self.rows, fixups)?;
            }
            if column_in_lp {
                let row = row_in_mut(&mut self.rows, row_id)?;
                let fixups = move_partition(&mut row.entries, row_position, true);
                fix_columns(&mut self.columns, fixups);
            }
        } else if column_in_lp {
            let row_position = self.row_insert(row_id, column_id, value, Some(position))?;
            position = row_in(&self.rows, row_id)?.entries.link(row_position)
                .ok_or_else(|| LpError::Internal(format!("entry of {} in {} was not linked", column_id, row_id)))?;
        }

        Ok(position)
    }

    /// Append an entry for `column_id` to a row.
    ///
    /// The mirror image of `column_insert`.
    pub(super) fn row_insert(
        &mut self,
        row_id: RowId,
        column_id: ColumnId,
        value: Exact,
        link: Option<usize>,
    ) -> LpResult<usize> {
        check_coefficient(&value)?;

        let column_in_lp = self.columns[column_id.0].lp_position.is_some();
        let row = row_in_mut(&mut self.rows, row_id)?;
        let row_in_lp = row.lp_position.is_some();
        let mut position = row.entries.push(column_id, value.clone(), link);

        if let Some(column_position) = link {
            let column = &mut self.columns[column_id.0];
            debug_assert_eq!(column.entries.partner(column_position), row_id);
            debug_assert!(column.entries.link(column_position).is_none());
            column.entries.set_link(column_position, Some(position));

            if column_in_lp {
                let row = row_in_mut(&mut self.rows, row_id)?;
                let fixups = move_partition(&mut row.entries, position, true);
                position = row.entries.nr_lp() - 1;
                fix_columns(&mut self.columns, fixups);
            }
            if row_in_lp {
                let fixups = move_partition(&mut self.columns[column_id.0].entries, column_position, true);
                fix_rows(&mut self.rows, fixups)?;
            }
        } else if row_in_lp {
            let column_position = self.column_insert(column_id, row_id, value, Some(position))?;
            position = self.columns[column_id.0].entries.link(column_position)
                .ok_or_else(|| LpError::Internal(format!("entry of {} in {} was not linked", row_id, column_id)))?;
        }

        Ok(position)
    }

    /// Remove the entry at `position` from a column, leaving the row side untouched.
    ///
    /// # Return value
    ///
    /// Position of the counterpart in the row, if the entry was linked.
    pub(super) fn column_remove(&mut self, column_id: ColumnId, position: usize) -> LpResult<Option<usize>> {
        let ((_, _, link), fixups) = self.columns[column_id.0].entries.remove(position);
        fix_rows(&mut self.rows, fixups)?;

        Ok(link)
    }

    /// Remove the entry at `position` from a row, leaving the column side untouched.
    pub(super) fn row_remove(&mut self, row_id: RowId, position: usize) -> LpResult<Option<usize>> {
        let ((_, _, link), fixups) = row_in_mut(&mut self.rows, row_id)?.entries.remove(position);
        fix_columns(&mut self.columns, fixups);

        Ok(link)
    }

    /// Remove a coefficient from both sides, given the positions on the sides where it is stored.
    fn remove_pair(
        &mut self,
        column_id: ColumnId,
        row_id: RowId,
        column_position: Option<usize>,
        row_position: Option<usize>,
    ) -> LpResult<()> {
        let row_position = match column_position {
            Some(column_position) => self.column_remove(column_id, column_position)?,
            None => row_position,
        };
        if let Some(row_position) = row_position {
            let link = self.row_remove(row_id, row_position)?;
            debug_assert!(column_position.is_some() || link.is_none());
        }

        Ok(())
    }

    /// Link all unlinked entries of a column to their rows.
    pub(crate) fn link_column(&mut self, column_id: ColumnId) -> LpResult<()> {
        if self.columns[column_id.0].entries.nr_unlinked() == 0 {
            return Ok(());
        }

        // Linking may move the entry to the front; the entry that takes its place was visited.
        for position in 0..self.columns[column_id.0].entries.len() {
            let entries = &self.columns[column_id.0].entries;
            if entries.link(position).is_none() {
                let row_id = entries.partner(position);
                let value = entries.value(position).clone();
                self.row_insert(row_id, column_id, value, Some(position))?;
            }
        }
        debug_assert_eq!(self.columns[column_id.0].entries.nr_unlinked(), 0);

        Ok(())
    }

    /// Link all unlinked entries of a row to their columns.
    pub(crate) fn link_row(&mut self, row_id: RowId) -> LpResult<()> {
        if row_in(&self.rows, row_id)?.entries.nr_unlinked() == 0 {
            return Ok(());
        }

        for position in 0..row_in(&self.rows, row_id)?.entries.len() {
            let entries = &row_in(&self.rows, row_id)?.entries;
            if entries.link(position).is_none() {
                let column_id = entries.partner(position);
                let value = entries.value(position).clone();
                self.column_insert(column_id, row_id, value, Some(position))?;
            }
        }
        debug_assert_eq!(row_in(&self.rows, row_id)?.entries.nr_unlinked(), 0);

        Ok(())
    }

    /// Remove the counterparts of all linked entries of a column from their rows.
    pub(crate) fn unlink_column(&mut self, column_id: ColumnId) -> LpResult<()> {
        for position in 0..self.columns[column_id.0].entries.len() {
            let entries = &self.columns[column_id.0].entries;
            if let Some(row_position) = entries.link(position) {
                let row_id = entries.partner(position);
                self.row_remove(row_id, row_position)?;
                self.columns[column_id.0].entries.set_link(position, None);
            }
        }
        self.columns[column_id.0].entries.set_nr_lp(0);

        Ok(())
    }

    /// Remove the counterparts of all linked entries of a row from their columns.
    pub(crate) fn unlink_row(&mut self, row_id: RowId) -> LpResult<()> {
        for position in 0..row_in(&self.rows, row_id)?.entries.len() {
            let entries = &row_in(&self.rows, row_id)?.entries;
            if let Some(column_position) = entries.link(position) {
                let column_id = entries.partner(position);
                self.column_remove(column_id, column_position)?;
                row_in_mut(&mut self.rows, row_id)?.entries.set_link(position, None);
            }
        }
        row_in_mut(&mut self.rows, row_id)?.entries.set_nr_lp(0);

        Ok(())
    }

    fn check_unlocked(&self, row_id: RowId) -> LpResult<()> {
        if row_in(&self.rows, row_id)?.nr_locks > 0 {
            Err(LpError::invalid(format!("row {} is locked", row_id)))
        } else {
            Ok(())
        }
    }

    fn check_not_delayed(&self, row_id: RowId) -> LpResult<()> {
        if row_in(&self.rows, row_id)?.delay_sort {
            Err(LpError::invalid(format!("row {} delays sorting, its coefficients can't be searched", row_id)))
        } else {
            Ok(())
        }
    }

    fn update_integrality(&mut self, column_id: ColumnId, row_id: RowId, value: &Exact) -> LpResult<()> {
        let column_integral = self.columns[column_id.0].integral;
        let row = row_in_mut(&mut self.rows, row_id)?;
        row.integral = row.integral && column_integral && value.is_integral();

        Ok(())
    }

    /// Current value of a coefficient, zero if it isn't stored.
    ///
    /// # Errors
    ///
    /// If the row doesn't exist or delays sorting.
    pub fn coefficient(&mut self, column_id: ColumnId, row_id: RowId) -> LpResult<Exact> {
        self.check_not_delayed(row_id)?;

        if let Some(position) = self.column_search(column_id, row_id)? {
            return Ok(self.columns[column_id.0].entries.value(position).clone());
        }
        match self.row_search(row_id, column_id)? {
            Some(position) => Ok(row_in(&self.rows, row_id)?.entries.value(position).clone()),
            None => Ok(Exact::zero()),
        }
    }

    /// Store a coefficient that doesn't exist yet, starting at the column.
    ///
    /// Adding zero does nothing.
    ///
    /// # Errors
    ///
    /// If the row is locked, delays sorting, or already has a coefficient for the column.
    pub fn add_column_coefficient(&mut self, column_id: ColumnId, row_id: RowId, value: Exact) -> LpResult<()> {
        self.check_unlocked(row_id)?;
        if value.is_zero() {
            return Ok(());
        }
        self.check_not_delayed(row_id)?;
        if self.column_search(column_id, row_id)?.is_some() || self.row_search(row_id, column_id)?.is_some() {
            return Err(LpError::invalid(format!("{} already has a coefficient in {}", column_id, row_id)));
        }

        self.column_insert(column_id, row_id, value.clone(), None)?;
        self.update_integrality(column_id, row_id, &value)?;
        self.coefficient_changed(column_id, row_id)
    }

    /// Store a coefficient that doesn't exist yet, starting at the row.
    ///
    /// When the row delays sorting, duplicates are allowed and summed when the row is merged.
    ///
    /// # Errors
    ///
    /// If the row is locked or already has a coefficient for the column.
    pub fn add_row_coefficient(&mut self, row_id: RowId, column_id: ColumnId, value: Exact) -> LpResult<()> {
        self.check_unlocked(row_id)?;
        if value.is_zero() {
            return Ok(());
        }
        // The entries of a delayed row are summed when it is merged, only the column can't hold one.
        let delayed = row_in(&self.rows, row_id)?.delay_sort;
        if self.column_search(column_id, row_id)?.is_some()
            || (!delayed && self.row_search(row_id, column_id)?.is_some()) {
            return Err(LpError::invalid(format!("{} already has a coefficient for {}", row_id, column_id)));
        }

        self.row_insert(row_id, column_id, value.clone(), None)?;
        self.update_integrality(column_id, row_id, &value)?;
        self.coefficient_changed(column_id, row_id)
    }

    /// Add `increment` to a coefficient, storing it if it didn't exist.
    pub fn increase_row_coefficient(&mut self, row_id: RowId, column_id: ColumnId, increment: Exact) -> LpResult<()> {
        self.check_unlocked(row_id)?;
        if increment.is_zero() {
            return Ok(());
        }
        if row_in(&self.rows, row_id)?.delay_sort {
            return self.add_row_coefficient(row_id, column_id, increment);
        }

        let current = self.coefficient(column_id, row_id)?;
        self.change_coefficient(column_id, row_id, &current + &increment)
    }

    /// Set a coefficient to a new value.
    ///
    /// A zero value removes the coefficient, a coefficient that doesn't exist is created.
    ///
    /// # Errors
    ///
    /// If the row is locked or delays sorting.
    pub fn change_coefficient(&mut self, column_id: ColumnId, row_id: RowId, value: Exact) -> LpResult<()> {
        self.check_unlocked(row_id)?;
        self.check_not_delayed(row_id)?;
        if value.is_infinite() {
            return Err(LpError::invalid(format!("coefficient of {} in {} is infinite", column_id, row_id)));
        }

        let column_position = self.column_search(column_id, row_id)?;
        let row_position = match column_position {
            Some(position) => self.columns[column_id.0].entries.link(position),
            None => self.row_search(row_id, column_id)?,
        };

        if value.is_zero() {
            if column_position.is_none() && row_position.is_none() {
                return Ok(());
            }
            self.remove_pair(column_id, row_id, column_position, row_position)?;
        } else {
            match (column_position, row_position) {
                (None, None) => {
                    self.column_insert(column_id, row_id, value.clone(), None)?;
                },
                (column_position, row_position) => {
                    if let Some(position) = column_position {
                        self.columns[column_id.0].entries.set_value(position, value.clone());
                    }
                    if let Some(position) = row_position {
                        row_in_mut(&mut self.rows, row_id)?.entries.set_value(position, value.clone());
                    }
                },
            }
            self.update_integrality(column_id, row_id, &value)?;
        }

        self.coefficient_changed(column_id, row_id)
    }

    /// Remove a coefficient from both sides.
    ///
    /// # Errors
    ///
    /// If the row is locked or the coefficient doesn't exist.
    pub fn delete_coefficient(&mut self, column_id: ColumnId, row_id: RowId) -> LpResult<()> {
        self.check_unlocked(row_id)?;

        let column_position = self.column_search(column_id, row_id)?;
        let row_position = match column_position {
            Some(position) => self.columns[column_id.0].entries.link(position),
            None => self.row_search(row_id, column_id)?,
        };
        if column_position.is_none() && row_position.is_none() {
            return Err(LpError::invalid(format!("{} has no coefficient in {}", column_id, row_id)));
        }

        self.remove_pair(column_id, row_id, column_position, row_position)?;
        self.coefficient_changed(column_id, row_id)
    }

    /// Start appending coefficients to a row without sorting.
    ///
    /// # Errors
    ///
    /// If the row is in the LP or has linked entries.
    pub fn delay_row_sort(&mut self, row_id: RowId) -> LpResult<()> {
        let row = row_in_mut(&mut self.rows, row_id)?;
        if row.lp_position.is_some() || row.entries.nr_unlinked() != row.entries.len() {
            return Err(LpError::invalid(format!("row {} is linked and can't delay sorting", row_id)));
        }
        row.delay_sort = true;

        Ok(())
    }

    /// Stop delaying the sort of a row, merging its entries.
    pub fn force_row_sort(&mut self, row_id: RowId) -> LpResult<()> {
        if row_in(&self.rows, row_id)?.delay_sort {
            self.merge_row(row_id)
        } else {
            Ok(())
        }
    }

    /// Sort the entries of a row, summing duplicates and dropping zeros.
    ///
    /// The integrality of the row is recomputed from scratch.
    ///
    /// # Errors
    ///
    /// If any entry of the row is linked.
    pub fn merge_row(&mut self, row_id: RowId) -> LpResult<()> {
        let row = row_in_mut(&mut self.rows, row_id)?;
        if row.entries.nr_unlinked() != row.entries.len() {
            return Err(LpError::invalid(format!("row {} has linked entries and can't be merged", row_id)));
        }

        row.entries.merge();
        let columns = &self.columns;
        row.integral = row.constant.is_integral() && row.entries.iter()
            .all(|(column_id, value, _)| columns[column_id.0].integral && value.is_integral());
        row.delay_sort = false;
        row.valid_activity_lp = None;

        Ok(())
    }
}

fn check_coefficient(value: &Exact) -> LpResult<()> {
    if value.is_zero() || value.is_infinite() {
        Err(LpError::invalid(format!("{} can't be stored as a coefficient", value)))
    } else {
        Ok(())
    }
}
