//! # Exact, step-by-step optimization
//!
//! Linear programs are solved with the two phase simplex method on a condensed tableau, matrix
//! games are reduced by dominance and solved in closed form or as a linear program, and
//! transportation problems are solved with the minimum cost method followed by the method of
//! potentials. All of these compute with exact rational numbers and report every step they take.
//!
//! Two smaller methods handle quadratic functions: critical points under an equality constraint
//! with Lagrange multipliers, and steepest descent.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;
pub mod io;

#[cfg(test)]
mod tests;
