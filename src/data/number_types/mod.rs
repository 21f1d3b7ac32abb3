//! # Number types
//!
//! All values stored in the exact LP are arbitrary precision rationals, possibly infinite. The
//! only place where floating point numbers appear is at the boundary with the floating point
//! shadow LP, where values are rounded in a direction that keeps derived bounds valid.
pub mod exact;
