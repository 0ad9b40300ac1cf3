//! # Representing linear programs
//!
//! Linear programs are read in general form: named non-negative variables, an objective and any
//! mix of `<=`, `>=` and `=` constraints. Before solving, they are brought into a tableau by the
//! simplex module.
pub mod elements;
pub mod general_form;
pub mod solution;
