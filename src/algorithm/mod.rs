//! # Algorithms
pub mod lp;
