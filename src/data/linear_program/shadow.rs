//! # Floating point shadow
//!
//! The floating point LP that the branch-and-bound search works with. The exact LP reads its
//! basis for warm starts, and writes rounded solution values into it when asked to.
use crate::data::linear_program::elements::{BasisStatus, LpStatus};
use crate::data::linear_program::handle::{ColumnId, RowId};

/// Approximate values of a column.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ShadowColumn {
    /// Primal value.
    pub primal: f64,
    /// Reduced cost.
    pub reduced_cost: f64,
    /// Coefficient in the last Farkas proof.
    pub farkas_coefficient: f64,
    /// Basis status, if known.
    pub basis: Option<BasisStatus>,
}

/// Approximate values of a row.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ShadowRow {
    /// Dual value.
    pub dual: f64,
    /// Activity.
    pub activity: f64,
    /// Multiplier in the last Farkas proof.
    pub dual_farkas: f64,
    /// Basis status, if known.
    pub basis: Option<BasisStatus>,
}

/// Floating point values for the objects of the exact LP, indexed by their handles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShadowLp {
    columns: Vec<ShadowColumn>,
    rows: Vec<ShadowRow>,
    /// Objective value, rounded down.
    pub objective_value: f64,
    /// Status of the last exact solve written into this shadow.
    pub status: LpStatus,
    /// Whether the values correspond to the current LP.
    pub solved: bool,
}

impl ShadowLp {
    /// Create a shadow without values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of a column.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> Option<&ShadowColumn> {
        self.columns.get(id.0)
    }

    /// Values of a column, created on first access.
    pub fn column_mut(&mut self, id: ColumnId) -> &mut ShadowColumn {
        if self.columns.len() <= id.0 {
            self.columns.resize_with(id.0 + 1, ShadowColumn::default);
        }
        &mut self.columns[id.0]
    }

    /// Values of a row.
    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&ShadowRow> {
        self.rows.get(id.0)
    }

    /// Values of a row, created on first access.
    pub fn row_mut(&mut self, id: RowId) -> &mut ShadowRow {
        if self.rows.len() <= id.0 {
            self.rows.resize_with(id.0 + 1, ShadowRow::default);
        }
        &mut self.rows[id.0]
    }

    /// Basis statuses of the given objects, if all of them are known.
    #[must_use]
    pub fn basis(&self, columns: &[ColumnId], rows: &[RowId]) -> Option<(Vec<BasisStatus>, Vec<BasisStatus>)> {
        let columns = columns.iter()
            .map(|&id| self.column(id).and_then(|column| column.basis))
            .collect::<Option<Vec<_>>>()?;
        let rows = rows.iter()
            .map(|&id| self.row(id).and_then(|row| row.basis))
            .collect::<Option<Vec<_>>>()?;

        Some((columns, rows))
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::BasisStatus;
    use crate::data::linear_program::handle::{ColumnId, RowId};
    use crate::data::linear_program::shadow::ShadowLp;

    #[test]
    fn basis_requires_all_statuses() {
        let mut shadow = ShadowLp::new();
        shadow.column_mut(ColumnId(1)).basis = Some(BasisStatus::Basic);
        shadow.row_mut(RowId(0)).basis = Some(BasisStatus::Lower);

        assert_eq!(shadow.basis(&[ColumnId(0), ColumnId(1)], &[RowId(0)]), None);

        shadow.column_mut(ColumnId(0)).basis = Some(BasisStatus::Upper);
        assert_eq!(
            shadow.basis(&[ColumnId(0), ColumnId(1)], &[RowId(0)]),
            Some((vec![BasisStatus::Upper, BasisStatus::Basic], vec![BasisStatus::Lower])),
        );
    }
}
