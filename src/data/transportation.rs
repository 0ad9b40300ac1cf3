//! # Transportation problems
//!
//! Shipping goods from sources with a limited supply to destinations with a fixed demand, at a
//! cost per unit for each route.
use std::fmt;

use itertools::Itertools;
use num_traits::Zero;

use crate::data::number_types::rational::{ArithmeticError, Rational};
use crate::io::error::Inconsistency;

/// Supply, demand and the cost of each route.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransportationProblem {
    supply: Vec<Rational>,
    demand: Vec<Rational>,
    /// One row per source.
    costs: Vec<Vec<Rational>>,
}

/// Which line was added to balance a problem.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Dummy {
    /// A source absorbing the excess demand.
    Source,
    /// A destination absorbing the excess supply.
    Destination,
}

impl fmt::Display for Dummy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Dummy::Source => f.write_str("dummy source"),
            Dummy::Destination => f.write_str("dummy destination"),
        }
    }
}

impl TransportationProblem {
    /// Create a new problem.
    ///
    /// # Errors
    ///
    /// When there are no sources or destinations, when the dimensions of the cost matrix don't
    /// match, or when a supply or demand is negative.
    pub fn new(
        supply: Vec<Rational>,
        demand: Vec<Rational>,
        costs: Vec<Vec<Rational>>,
    ) -> Result<Self, Inconsistency> {
        if supply.is_empty() || demand.is_empty() {
            return Err(Inconsistency::new("A transportation problem needs at least one source and one destination"));
        }
        if costs.len() != supply.len() {
            return Err(Inconsistency::new(format!(
                "There are {} sources, but {} rows of costs", supply.len(), costs.len(),
            )));
        }
        if let Some(row) = costs.iter().position(|row| row.len() != demand.len()) {
            return Err(Inconsistency::new(format!(
                "Cost row {} has {} values, expected {}", row + 1, costs[row].len(), demand.len(),
            )));
        }
        if let Some(source) = supply.iter().position(|value| value.is_negative()) {
            return Err(Inconsistency::new(format!("Supply of source {} is negative", source + 1)));
        }
        if let Some(destination) = demand.iter().position(|value| value.is_negative()) {
            return Err(Inconsistency::new(format!("Demand of destination {} is negative", destination + 1)));
        }

        Ok(Self { supply, demand, costs })
    }

    /// Supply of each source.
    pub fn supply(&self) -> &[Rational] {
        &self.supply
    }

    /// Demand of each destination.
    pub fn demand(&self) -> &[Rational] {
        &self.demand
    }

    /// Cost per unit, one row per source.
    pub fn costs(&self) -> &[Vec<Rational>] {
        &self.costs
    }

    /// Cost per unit over a single route.
    pub fn cost(&self, source: usize, destination: usize) -> Rational {
        self.costs[source][destination]
    }

    /// Number of sources.
    pub fn nr_sources(&self) -> usize {
        self.supply.len()
    }

    /// Number of destinations.
    pub fn nr_destinations(&self) -> usize {
        self.demand.len()
    }

    /// Total supply.
    ///
    /// # Errors
    ///
    /// On overflow.
    pub fn total_supply(&self) -> Result<Rational, ArithmeticError> {
        checked_sum(&self.supply)
    }

    /// Total demand.
    ///
    /// # Errors
    ///
    /// On overflow.
    pub fn total_demand(&self) -> Result<Rational, ArithmeticError> {
        checked_sum(&self.demand)
    }

    /// Add a dummy line with zero costs such that supply equals demand.
    ///
    /// # Return value
    ///
    /// The balanced problem, and if a line was added, which one and how much it supplies or
    /// demands.
    ///
    /// # Errors
    ///
    /// On overflow.
    pub fn balance(&self) -> Result<(Self, Option<(Dummy, Rational)>), ArithmeticError> {
        let supply = self.total_supply()?;
        let demand = self.total_demand()?;
        let mut balanced = self.clone();

        let dummy = if supply > demand {
            let shortfall = supply.checked_sub(demand)?;
            balanced.demand.push(shortfall);
            for row in &mut balanced.costs {
                row.push(Rational::zero());
            }
            Some((Dummy::Destination, shortfall))
        } else if demand > supply {
            let shortfall = demand.checked_sub(supply)?;
            balanced.supply.push(shortfall);
            balanced.costs.push(vec![Rational::zero(); self.nr_destinations()]);
            Some((Dummy::Source, shortfall))
        } else {
            None
        };

        Ok((balanced, dummy))
    }
}

fn checked_sum(values: &[Rational]) -> Result<Rational, ArithmeticError> {
    values.iter().try_fold(Rational::zero(), |total, &value| total.checked_add(value))
}

impl fmt::Display for TransportationProblem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = 8;
        write!(f, "{:>width$}", "")?;
        for destination in 0..self.nr_destinations() {
            write!(f, "{:>width$}", format!("D{}", destination + 1))?;
        }
        writeln!(f, "{:>width$}", "supply")?;

        for (source, (row, supply)) in self.costs.iter().zip(&self.supply).enumerate() {
            write!(f, "{:>width$}", format!("S{}", source + 1))?;
            write!(f, "{}", row.iter().map(|cost| format!("{:>width$}", cost.to_string())).join(""))?;
            writeln!(f, "{:>width$}", supply.to_string())?;
        }

        write!(f, "{:>width$}", "demand")?;
        writeln!(f, "{}", self.demand.iter().map(|demand| format!("{:>width$}", demand.to_string())).join(""))
    }
}

/// A route in an allocation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Cell {
    /// Cost per unit.
    pub cost: Rational,
    /// Amount shipped over this route.
    pub value: Rational,
    /// Whether the cell is part of the basis tree.
    pub is_basic: bool,
}

/// Amounts shipped over each route, together with the current basis.
///
/// The basic cells of a valid allocation form a spanning tree over the sources and
/// destinations: there are exactly `m + n - 1` of them and they connect all lines.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Allocation {
    cells: Vec<Vec<Cell>>,
}

impl Allocation {
    /// Nothing shipped yet, no basic cells.
    pub fn empty(problem: &TransportationProblem) -> Self {
        Self {
            cells: problem.costs().iter()
                .map(|row| row.iter().map(|&cost| Cell { cost, value: Rational::zero(), is_basic: false }).collect())
                .collect(),
        }
    }

    /// Number of sources.
    pub fn nr_rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of destinations.
    pub fn nr_columns(&self) -> usize {
        self.cells[0].len()
    }

    /// A single route.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        &self.cells[row][column]
    }

    /// A single route, mutably.
    pub fn cell_mut(&mut self, row: usize, column: usize) -> &mut Cell {
        &mut self.cells[row][column]
    }

    /// All routes, one row per source.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Basic cells in row-major order.
    pub fn basic_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate()
                .filter(|(_, cell)| cell.is_basic)
                .map(move |(column, _)| (row, column))
        })
    }

    /// Number of basic cells.
    pub fn nr_basic(&self) -> usize {
        self.basic_cells().count()
    }

    /// Columns of the basic cells in a row.
    pub fn basic_in_row(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        self.cells[row].iter().positions(|cell| cell.is_basic)
    }

    /// Rows of the basic cells in a column.
    pub fn basic_in_column(&self, column: usize) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().positions(move |row| row[column].is_basic)
    }

    /// Amount shipped from a source.
    ///
    /// # Errors
    ///
    /// On overflow.
    pub fn row_sum(&self, row: usize) -> Result<Rational, ArithmeticError> {
        self.cells[row].iter().try_fold(Rational::zero(), |total, cell| total.checked_add(cell.value))
    }

    /// Amount shipped to a destination.
    ///
    /// # Errors
    ///
    /// On overflow.
    pub fn column_sum(&self, column: usize) -> Result<Rational, ArithmeticError> {
        self.cells.iter().try_fold(Rational::zero(), |total, row| total.checked_add(row[column].value))
    }

    /// Cost of shipping the allocated amounts.
    ///
    /// # Errors
    ///
    /// On overflow.
    pub fn total_cost(&self) -> Result<Rational, ArithmeticError> {
        self.cells.iter().flatten()
            .try_fold(Rational::zero(), |total, cell| total.checked_add(cell.cost.checked_mul(cell.value)?))
    }
}

impl fmt::Display for Allocation {
    /// Basic cells show their value, non-basic cells a dash.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = 8;
        write!(f, "{:>width$}", "")?;
        for column in 0..self.nr_columns() {
            write!(f, "{:>width$}", format!("D{}", column + 1))?;
        }
        writeln!(f)?;

        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{:>width$}", format!("S{}", row + 1))?;
            writeln!(f, "{}", cells.iter().map(|cell| {
                let text = if cell.is_basic { cell.value.to_string() } else { "-".to_string() };
                format!("{text:>width$}")
            }).join(""))?;
        }
        Ok(())
    }
}
