//! # Transportation problems
//!
//! The transportation simplex method: an initial allocation from the minimum cost heuristic is
//! improved with the stepping stone method until no reduced cost is negative. All computations
//! are exact.
use std::fmt;

use itertools::Itertools;
use log::{debug, info, warn};

use crate::algorithm::{SolveError, SolverSettings};
use crate::algorithm::log::IterationLog;
use crate::algorithm::transportation::cycle::Cycle;
use crate::algorithm::transportation::potentials::{entering_cell, Potentials};
use crate::data::number_types::rational::Rational;
use crate::data::transportation::{Allocation, Dummy, TransportationProblem};

pub mod cycle;
pub mod initial;
pub mod potentials;

/// A source or a destination.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Line {
    /// A source.
    Row(usize),
    /// A destination.
    Column(usize),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Line::Row(row) => write!(f, "source {}", row + 1),
            Line::Column(column) => write!(f, "destination {}", column + 1),
        }
    }
}

/// Optimal allocation of a transportation problem.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransportationSolution {
    /// Including the dummy line, if one was added.
    pub allocation: Allocation,
    /// Cost of the allocation.
    pub total_cost: Rational,
    /// Which line was added to balance the problem.
    pub dummy: Option<Dummy>,
}

impl fmt::Display for TransportationSolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.allocation)?;
        if let Some(dummy) = self.dummy {
            writeln!(f, "The last line is a {}", dummy)?;
        }
        writeln!(f, "Total cost: {}", self.total_cost)
    }
}

/// What happened during a single step of solving a transportation problem.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransportationStep {
    /// Total supply and demand differed.
    Balance {
        /// The line that was added.
        dummy: Dummy,
        /// Its supply or demand.
        amount: Rational,
    },
    /// The minimum cost heuristic shipped over a route.
    Allocate {
        /// Source.
        row: usize,
        /// Destination.
        column: usize,
        /// Amount shipped.
        amount: Rational,
    },
    /// A cell was made basic at value zero to complete the basis tree.
    CompleteBasis {
        /// Source.
        row: usize,
        /// Destination.
        column: usize,
    },
    /// One iteration of the stepping stone method.
    Improve {
        /// State at the start of the iteration.
        allocation: Allocation,
        /// Potentials of the basis.
        potentials: Potentials,
        /// Of all cells, zero for basic cells.
        reduced_costs: Vec<Vec<Rational>>,
        /// Total cost at the start of the iteration.
        total_cost: Rational,
        /// Closed by the entering cell, which comes first.
        cycle: Cycle,
        /// Amount moved along the cycle.
        theta: Rational,
        /// The cell that stops being basic.
        leaving: (usize, usize),
    },
    /// No reduced cost is negative.
    Optimal {
        /// The optimal allocation.
        allocation: Allocation,
        /// Potentials of the optimal basis.
        potentials: Potentials,
        /// None of these is negative.
        reduced_costs: Vec<Vec<Rational>>,
        /// Optimal value.
        total_cost: Rational,
    },
}

impl fmt::Display for TransportationStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportationStep::Balance { dummy, amount } => {
                write!(f, "Supply and demand differ by {}, adding a {}", amount, dummy)
            },
            TransportationStep::Allocate { row, column, amount } => {
                write!(f, "Cheapest open route S{} → D{}: ship {}", row + 1, column + 1, amount)
            },
            TransportationStep::CompleteBasis { row, column } => {
                write!(f, "Route S{} → D{} becomes basic at zero", row + 1, column + 1)
            },
            TransportationStep::Improve {
                allocation, potentials, reduced_costs, total_cost, cycle, theta, leaving,
            } => {
                write!(f, "{}", allocation)?;
                writeln!(f, "Total cost: {}", total_cost)?;
                writeln!(f, "{}", potentials)?;
                write_reduced_costs(f, reduced_costs)?;
                writeln!(f, "Cycle: {}", cycle)?;
                write!(f, "θ = {}, leaving S{} → D{}", theta, leaving.0 + 1, leaving.1 + 1)
            },
            TransportationStep::Optimal { allocation, potentials, reduced_costs, total_cost } => {
                write!(f, "{}", allocation)?;
                writeln!(f, "{}", potentials)?;
                write_reduced_costs(f, reduced_costs)?;
                write!(f, "No reduced cost is negative, total cost {} is optimal", total_cost)
            },
        }
    }
}

fn write_reduced_costs(f: &mut fmt::Formatter, reduced_costs: &[Vec<Rational>]) -> fmt::Result {
    writeln!(f, "Reduced costs:")?;
    for row in reduced_costs {
        writeln!(f, "{}", row.iter().map(|cost| format!("{:>8}", cost.to_string())).join(""))?;
    }
    Ok(())
}

/// Find a cheapest allocation.
///
/// Unbalanced problems are balanced first with a dummy line at zero cost.
///
/// # Errors
///
/// When the iteration limit is reached, on overflow, or (should not happen) when the basis stops
/// being a spanning tree.
pub fn solve_transportation(
    problem: &TransportationProblem,
    settings: &SolverSettings,
) -> Result<(TransportationSolution, IterationLog<TransportationStep>), SolveError> {
    let mut log = IterationLog::new();

    let (problem, dummy) = problem.balance()?;
    if let Some((dummy, amount)) = dummy {
        warn!("Supply and demand differ, balancing with a {} of {}", dummy, amount);
        log.record(TransportationStep::Balance { dummy, amount });
    }

    let mut allocation = initial::minimum_cost(&problem, &mut log)?;
    let mut iterations = 0;
    loop {
        debug_assert_eq!(allocation.nr_basic(), problem.nr_sources() + problem.nr_destinations() - 1);

        let potentials = Potentials::compute(&allocation)?;
        let reduced_costs = potentials.reduced_costs(&allocation)?;
        let total_cost = allocation.total_cost()?;

        let Some(entering) = entering_cell(&reduced_costs) else {
            info!("Optimal after {} iterations with total cost {}", iterations, total_cost);
            log.record(TransportationStep::Optimal {
                allocation: allocation.clone(),
                potentials,
                reduced_costs,
                total_cost,
            });
            break;
        };
        if iterations == settings.iteration_limit {
            warn!("Iteration limit of {} reached", settings.iteration_limit);
            return Err(SolveError::IterationLimit { limit: settings.iteration_limit });
        }

        let cycle = Cycle::find(&allocation, entering)?;
        let (leaving, theta) = cycle.leaving_cell(&allocation);
        debug!("Cell {:?} enters, {:?} leaves, θ = {}", entering, leaving, theta);
        log.record(TransportationStep::Improve {
            allocation: allocation.clone(),
            potentials,
            reduced_costs,
            total_cost,
            cycle: cycle.clone(),
            theta,
            leaving,
        });

        for (row, column) in cycle.plus_cells() {
            let cell = allocation.cell_mut(row, column);
            cell.value = cell.value.checked_add(theta)?;
        }
        for (row, column) in cycle.minus_cells() {
            let cell = allocation.cell_mut(row, column);
            cell.value = cell.value.checked_sub(theta)?;
        }
        allocation.cell_mut(entering.0, entering.1).is_basic = true;
        allocation.cell_mut(leaving.0, leaving.1).is_basic = false;

        iterations += 1;
    }

    let total_cost = allocation.total_cost()?;
    let solution = TransportationSolution {
        allocation,
        total_cost,
        dummy: dummy.map(|(dummy, _)| dummy),
    };

    Ok((solution, log))
}
