//! # Algorithms
//!
//! Every solver runs to completion within a single call, operating on freshly constructed data. A
//! solver returns its result together with the log of steps it took, or an error describing why
//! no result exists (or why none was found).
use std::error::Error;
use std::fmt;

use crate::data::number_types::rational::ArithmeticError;

pub mod log;
pub mod matrix_game;
pub mod nonlinear;
pub mod simplex;
pub mod transportation;

/// Why a solver did not produce a result.
///
/// Input errors are not represented here; they are detected while reading a problem, before any
/// solver starts (see `crate::io::error`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SolveError {
    /// The objective can be improved without bound.
    Unbounded,
    /// There is no point satisfying all constraints.
    Infeasible,
    /// The solver did not finish within the configured number of iterations.
    ///
    /// This says nothing about whether a solution exists.
    IterationLimit {
        /// The limit that was exceeded.
        limit: usize,
    },
    /// An internal invariant was violated, such as a transportation basis that is not a tree.
    ///
    /// Should not occur for correctly constructed problems.
    Structural(String),
    /// Exact arithmetic failed, typically because a value grew too large.
    Arithmetic(ArithmeticError),
    /// The problem is of a shape for which no method is implemented.
    Unsupported(String),
    /// An input has the wrong number of components.
    Dimension {
        /// Number of components the problem has.
        expected: usize,
        /// Number of components given.
        found: usize,
    },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolveError::Unbounded => f.write_str("Problem is unbounded."),
            SolveError::Infeasible => f.write_str("Problem is not feasible."),
            SolveError::IterationLimit { limit } => {
                write!(f, "No solution found within the limit of {} iterations.", limit)
            },
            SolveError::Structural(description) => write!(f, "Internal solver error: {}", description),
            SolveError::Arithmetic(error) => write!(f, "Arithmetic error: {}", error),
            SolveError::Unsupported(description) => write!(f, "Unsupported problem: {}", description),
            SolveError::Dimension { expected, found } => {
                write!(f, "Expected {} components, got {}.", expected, found)
            },
        }
    }
}

impl Error for SolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SolveError::Arithmetic(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ArithmeticError> for SolveError {
    fn from(error: ArithmeticError) -> Self {
        SolveError::Arithmetic(error)
    }
}

/// Safeguards shared by all solvers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolverSettings {
    /// Maximum number of iterations of a single loop (a simplex phase, the transportation
    /// optimality loop, gradient descent).
    pub iteration_limit: usize,
    /// Only used where computations leave exact arithmetic: gradient norms and square roots.
    pub tolerance: f64,
}

impl SolverSettings {
    /// Replace the iteration limit.
    #[must_use]
    pub fn with_iteration_limit(self, iteration_limit: usize) -> Self {
        Self { iteration_limit, ..self }
    }

    /// Replace the tolerance.
    #[must_use]
    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            iteration_limit: 20,
            tolerance: 1e-9,
        }
    }
}
