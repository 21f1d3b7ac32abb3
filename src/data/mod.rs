//! # Storing of exact linear programs in memory
//!
//! This module provides the passive data structures: number types, the columns and rows of the
//! exact LP with their adjacency lists, the problem that owns the variables and the floating
//! point shadow LP. The procedures operating on them live in `algorithm`.

pub mod linear_program;
pub mod number_types;
