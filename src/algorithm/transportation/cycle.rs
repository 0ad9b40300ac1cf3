//! # Stepping stone cycles
//!
//! Adding a non-basic cell to a basis tree closes exactly one cycle. Shipping more over the
//! entering cell means shipping alternately less and more over the other cells of that cycle.
use std::fmt;

use itertools::Itertools;

use crate::algorithm::SolveError;
use crate::algorithm::transportation::Line;
use crate::data::number_types::rational::Rational;
use crate::data::transportation::Allocation;

/// Cells of a cycle, starting at the entering cell.
///
/// Consecutive cells share a row or a column, alternately. Cells at even positions (including the
/// entering cell) receive a `+` sign, cells at odd positions a `-` sign.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cycle {
    cells: Vec<(usize, usize)>,
}

impl Cycle {
    /// Find the cycle that the entering cell closes in the basis tree.
    ///
    /// Searches depth first for the path through the basic cells from the entering row to the
    /// entering column.
    ///
    /// # Errors
    ///
    /// When there is no such path, which means that the basis is not a spanning tree.
    pub fn find(allocation: &Allocation, entering: (usize, usize)) -> Result<Self, SolveError> {
        let (entering_row, entering_column) = entering;
        debug_assert!(!allocation.cell(entering_row, entering_column).is_basic);

        // For each line, the line it was reached from and the cell connecting them
        let mut row_parent = vec![None; allocation.nr_rows()];
        let mut column_parent = vec![None; allocation.nr_columns()];
        let mut row_seen = vec![false; allocation.nr_rows()];
        let mut column_seen = vec![false; allocation.nr_columns()];

        let target = Line::Column(entering_column);
        let mut stack = vec![Line::Row(entering_row)];
        row_seen[entering_row] = true;
        let mut found = false;
        while let Some(line) = stack.pop() {
            if line == target {
                found = true;
                break;
            }

            match line {
                Line::Row(row) => {
                    for column in allocation.basic_in_row(row) {
                        if !column_seen[column] {
                            column_seen[column] = true;
                            column_parent[column] = Some(row);
                            stack.push(Line::Column(column));
                        }
                    }
                },
                Line::Column(column) => {
                    for row in allocation.basic_in_column(column) {
                        if !row_seen[row] {
                            row_seen[row] = true;
                            row_parent[row] = Some(column);
                            stack.push(Line::Row(row));
                        }
                    }
                },
            }
        }
        if !found {
            return Err(SolveError::Structural(format!(
                "no cycle through cell ({}, {})", entering_row + 1, entering_column + 1,
            )));
        }

        // Walk back from the entering column to the entering row
        let mut cells = vec![entering];
        let mut column = entering_column;
        loop {
            let row = column_parent[column].expect("Reached columns have a parent.");
            cells.push((row, column));
            if row == entering_row {
                break;
            }
            column = row_parent[row].expect("Reached rows other than the start have a parent.");
            cells.push((row, column));
        }

        debug_assert_eq!(cells.len() % 2, 0);
        Ok(Self { cells })
    }

    /// All cells, starting with the entering cell.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Cells that receive more, starting with the entering cell.
    pub fn plus_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().copied().step_by(2)
    }

    /// Cells that receive less.
    pub fn minus_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().copied().skip(1).step_by(2)
    }

    /// The `-` cell with the smallest value, first in row-major order on ties, and that value.
    pub fn leaving_cell(&self, allocation: &Allocation) -> ((usize, usize), Rational) {
        self.minus_cells()
            .map(|(row, column)| ((row, column), allocation.cell(row, column).value))
            .min_by_key(|&(cell, value)| (value, cell))
            .expect("A cycle has at least two cells.")
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let signs = ['+', '-'].into_iter().cycle();
        write!(f, "{}", self.cells.iter().zip(signs)
            .map(|(&(row, column), sign)| format!("{}({}, {})", sign, row + 1, column + 1))
            .join(" → "))
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::transportation::cycle::Cycle;
    use crate::data::transportation::{Allocation, TransportationProblem};
    use crate::R;

    fn allocation(basic: &[(usize, usize, i64)]) -> Allocation {
        let problem = TransportationProblem::new(
            vec![R!(20), R!(50), R!(30)],
            vec![R!(30), R!(20), R!(40), R!(10)],
            vec![
                vec![R!(2), R!(3), R!(11), R!(7)],
                vec![R!(1), R!(0), R!(6), R!(1)],
                vec![R!(5), R!(8), R!(15), R!(9)],
            ],
        ).unwrap();
        let mut allocation = Allocation::empty(&problem);
        for &(row, column, value) in basic {
            let cell = allocation.cell_mut(row, column);
            cell.value = R!(value);
            cell.is_basic = true;
        }
        allocation
    }

    #[test]
    fn long_cycle() {
        let allocation = allocation(&[(0, 2, 10), (0, 3, 10), (1, 0, 30), (1, 1, 20), (1, 3, 0), (2, 2, 30)]);
        let cycle = Cycle::find(&allocation, (2, 0)).unwrap();

        assert_eq!(cycle.cells(), [(2, 0), (1, 0), (1, 3), (0, 3), (0, 2), (2, 2)]);
        assert_eq!(cycle.minus_cells().collect::<Vec<_>>(), [(1, 0), (0, 3), (2, 2)]);
        assert_eq!(cycle.leaving_cell(&allocation), ((0, 3), R!(10)));
        assert_eq!(cycle.to_string(), "+(3, 1) → -(2, 1) → +(2, 4) → -(1, 4) → +(1, 3) → -(3, 3)");
    }

    #[test]
    fn degenerate_tie() {
        let allocation = allocation(&[(0, 1, 20), (1, 1, 0), (1, 2, 40), (1, 3, 10), (2, 0, 30), (2, 2, 0)]);
        let cycle = Cycle::find(&allocation, (2, 1)).unwrap();

        assert_eq!(cycle.cells().len(), 4);
        assert_eq!(cycle.plus_cells().next(), Some((2, 1)));
        // Both (1, 1) and (2, 2) are at zero
        assert_eq!(cycle.leaving_cell(&allocation), ((1, 1), R!(0)));
    }

    #[test]
    fn broken_basis() {
        let allocation = allocation(&[(0, 2, 10), (0, 3, 10), (1, 0, 30), (1, 1, 20), (2, 2, 30)]);
        assert!(Cycle::find(&allocation, (2, 0)).is_err());
    }
}
