//! # Representing the exact LP
//!
//! Columns and rows of the exact LP, the adjacency lists that connect them, and the objects the
//! exact LP is coupled to: the variables of the problem and the floating point shadow LP.
pub mod adjacency;
pub mod column;
pub mod elements;
pub mod handle;
pub mod matrix;
pub mod problem;
pub mod row;
pub mod shadow;
