//! # Exact LP management
//!
//! A rational-arithmetic mirror of the LP relaxation solved inside a branch-and-bound search. All
//! edits to the mirror are tracked incrementally, synchronized on demand with an exact LP solver
//! backend, and the backend's answer is turned into a certified dual bound or a validated
//! infeasibility proof.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;
pub mod error;
pub mod interface;

#[cfg(test)]
mod tests;
