//! # Storing of problems in memory
//!
//! This module provides the data structures used to represent problems in memory. Algorithms
//! may introduce their specific data structures in `algorithm::my_algorithm`.
pub mod linear_algebra;
pub mod linear_program;
pub mod matrix_game;
pub mod number_types;
pub mod polynomial;
pub mod quadratic;
pub mod transportation;
