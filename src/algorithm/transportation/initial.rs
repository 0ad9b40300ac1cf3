//! # Initial basic feasible solution
//!
//! The minimum cost heuristic, followed by completing the basis to a spanning tree.
use log::warn;
use num_traits::Zero;

use crate::algorithm::log::IterationLog;
use crate::algorithm::transportation::TransportationStep;
use crate::data::number_types::rational::{ArithmeticError, Rational};
use crate::data::transportation::{Allocation, TransportationProblem};

/// Allocate greedily over the cheapest routes, then add zero valued basic cells until there are
/// `m + n - 1` of them.
///
/// The problem should be balanced.
pub fn minimum_cost(
    problem: &TransportationProblem,
    log: &mut IterationLog<TransportationStep>,
) -> Result<Allocation, ArithmeticError> {
    let mut allocation = Allocation::empty(problem);
    let mut supply = problem.supply().to_vec();
    let mut demand = problem.demand().to_vec();

    while let Some((row, column)) = cheapest_open_cell(problem, &supply, &demand) {
        let amount = supply[row].min(demand[column]);
        // A line is closed once nothing remains, so exhausting both at once closes both
        supply[row] = supply[row].checked_sub(amount)?;
        demand[column] = demand[column].checked_sub(amount)?;

        let cell = allocation.cell_mut(row, column);
        cell.value = amount;
        cell.is_basic = true;
        log.record(TransportationStep::Allocate { row, column, amount });
    }

    complete_basis(&mut allocation, log);

    Ok(allocation)
}

/// Cheapest cell with positive remaining supply and demand, first in row-major order on ties.
fn cheapest_open_cell(
    problem: &TransportationProblem,
    supply: &[Rational],
    demand: &[Rational],
) -> Option<(usize, usize)> {
    let mut cheapest: Option<(usize, usize)> = None;
    for row in (0..supply.len()).filter(|&row| supply[row].is_positive()) {
        for column in (0..demand.len()).filter(|&column| demand[column].is_positive()) {
            if cheapest.is_none_or(|(i, j)| problem.cost(row, column) < problem.cost(i, j)) {
                cheapest = Some((row, column));
            }
        }
    }
    cheapest
}

/// Make zero valued cells basic until the basic cells span all lines.
///
/// Candidates are tried from cheap to expensive, in row-major order on ties; a candidate is only
/// accepted if it connects two components of the basis forest.
fn complete_basis(allocation: &mut Allocation, log: &mut IterationLog<TransportationStep>) {
    let (m, n) = (allocation.nr_rows(), allocation.nr_columns());
    // Rows are nodes `0..m`, columns are nodes `m..m + n`
    let mut components = UnionFind::new(m + n);
    let mut nr_basic = 0;
    for (row, column) in allocation.basic_cells().collect::<Vec<_>>() {
        components.union(row, m + column);
        nr_basic += 1;
    }

    let mut candidates = (0..m)
        .flat_map(|row| (0..n).map(move |column| (row, column)))
        .filter(|&(row, column)| !allocation.cell(row, column).is_basic)
        .collect::<Vec<_>>();
    // Stable, so row-major order is kept among equal costs
    candidates.sort_by_key(|&(row, column)| allocation.cell(row, column).cost);

    for (row, column) in candidates {
        if nr_basic == m + n - 1 {
            break;
        }
        if components.union(row, m + column) {
            warn!("Degenerate allocation, cell ({}, {}) becomes basic at value zero", row + 1, column + 1);
            let cell = allocation.cell_mut(row, column);
            debug_assert!(cell.value.is_zero());
            cell.is_basic = true;
            nr_basic += 1;
            log.record(TransportationStep::CompleteBasis { row, column });
        }
    }

    debug_assert_eq!(nr_basic, m + n - 1);
}

/// Disjoint sets with path compression and union by rank.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Whether the two were in different sets.
    fn union(&mut self, x: usize, y: usize) -> bool {
        let (x, y) = (self.find(x), self.find(y));
        if x == y {
            return false;
        }

        match self.rank[x].cmp(&self.rank[y]) {
            std::cmp::Ordering::Less => self.parent[x] = y,
            std::cmp::Ordering::Greater => self.parent[y] = x,
            std::cmp::Ordering::Equal => {
                self.parent[y] = x;
                self.rank[x] += 1;
            },
        }
        true
    }
}
