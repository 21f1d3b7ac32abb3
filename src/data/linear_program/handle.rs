//! # Handles
//!
//! Columns, rows and variables are stored in arenas and refer to each other by index. The index
//! of a handle never changes during the lifetime of the object, which makes it suitable as the
//! key by which adjacency lists are sorted.
use std::fmt;

macro_rules! handle {
    ($name:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// Index into the arena that stores the object.
            #[must_use]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

handle!(ColumnId, "c", "Refers to a column of the exact LP.");
handle!(RowId, "r", "Refers to a row of the exact LP.");
handle!(VariableId, "x", "Refers to a variable of the problem.");
