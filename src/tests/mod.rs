//! # End-to-end problems that require a look inside the crate.
//!
//! Each problem is followed from its text form through every intermediate representation, step
//! by step, and compared against values computed by hand.
mod problem_1;
mod problem_2;
