//! # Problem variables
//!
//! The variables of the problem hold the objective and bounds that are valid outside of diving.
//! Columns of the exact LP are created for them, and are reset to these values when a dive ends.
use enum_map::{enum_map, EnumMap};

use crate::data::linear_program::elements::{BoundDirection, VariableType};
use crate::data::linear_program::handle::{ColumnId, VariableId};
use crate::data::number_types::exact::Exact;

/// A variable of the problem.
#[derive(Clone, Debug)]
pub struct Variable {
    /// Name, for logging.
    pub name: String,
    /// Objective coefficient.
    pub objective: Exact,
    /// Lower and upper bound.
    pub bounds: EnumMap<BoundDirection, Exact>,
    /// Whether the variable should take integer values.
    pub variable_type: VariableType,
    pub(crate) column: Option<ColumnId>,
}

impl Variable {
    /// Column of the exact LP created for this variable.
    #[must_use]
    pub fn column(&self) -> Option<ColumnId> {
        self.column
    }
}

/// All variables of a problem.
#[derive(Clone, Debug, Default)]
pub struct Problem {
    variables: Vec<Variable>,
}

impl Problem {
    /// Create a problem without variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    ///
    /// # Arguments
    ///
    /// * `lower`: Should not be larger than `upper`.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        objective: Exact,
        lower: Exact,
        upper: Exact,
        variable_type: VariableType,
    ) -> VariableId {
        debug_assert!(objective.is_finite());
        debug_assert!(lower <= upper);

        self.variables.push(Variable {
            name: name.into(),
            objective,
            bounds: enum_map! {
                BoundDirection::Lower => lower.clone(),
                BoundDirection::Upper => upper.clone(),
            },
            variable_type,
            column: None,
        });
        VariableId(self.variables.len() - 1)
    }

    /// Variable of a handle.
    #[must_use]
    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.0]
    }

    /// Variable of a handle, to change values outside of diving.
    pub fn variable_mut(&mut self, id: VariableId) -> &mut Variable {
        &mut self.variables[id.0]
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether there are no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterate over the variables with their handles.
    pub fn iter(&self) -> impl Iterator<Item=(VariableId, &Variable)> {
        self.variables.iter().enumerate().map(|(index, variable)| (VariableId(index), variable))
    }
}
