//! # Number types
//!
//! All solvers compute exactly with `Rational`. Floating point numbers only appear at the
//! boundaries: when reading decimal input and where a square root leaves the rationals.
pub mod rational;
