//! # Matrix games
//!
//! Two player zero sum games in normal form. The row player receives the payoff, the column
//! player pays it.
use std::fmt;

use index_utils::remove_indices;
use itertools::Itertools;

use crate::data::number_types::rational::Rational;
use crate::io::error::Inconsistency;

/// Payoffs for the row player, which can be reduced by removing strategies.
///
/// Remembers for each remaining row and column which strategy of the original game it is.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayoffMatrix {
    /// Row major.
    values: Vec<Vec<Rational>>,
    /// Original index of each remaining row.
    rows: Vec<usize>,
    /// Original index of each remaining column.
    columns: Vec<usize>,
    nr_original_rows: usize,
    nr_original_columns: usize,
}

impl PayoffMatrix {
    /// Create a new payoff matrix.
    ///
    /// # Errors
    ///
    /// When the matrix is empty or when not all rows have the same length.
    pub fn new(values: Vec<Vec<Rational>>) -> Result<Self, Inconsistency> {
        let nr_columns = values.first().map_or(0, Vec::len);
        if nr_columns == 0 {
            return Err(Inconsistency::new("A payoff matrix needs at least one row and one column"));
        }
        if let Some(row) = values.iter().position(|row| row.len() != nr_columns) {
            return Err(Inconsistency::new(format!(
                "Row {} has {} payoffs, expected {}", row + 1, values[row].len(), nr_columns,
            )));
        }

        let nr_rows = values.len();
        Ok(Self {
            values,
            rows: (0..nr_rows).collect(),
            columns: (0..nr_columns).collect(),
            nr_original_rows: nr_rows,
            nr_original_columns: nr_columns,
        })
    }

    /// Number of remaining strategies of the row player.
    pub fn nr_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of remaining strategies of the column player.
    pub fn nr_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of strategies of the row player before any were removed.
    pub fn nr_original_rows(&self) -> usize {
        self.nr_original_rows
    }

    /// Number of strategies of the column player before any were removed.
    pub fn nr_original_columns(&self) -> usize {
        self.nr_original_columns
    }

    /// Original index of a remaining row.
    pub fn original_row(&self, row: usize) -> usize {
        self.rows[row]
    }

    /// Original index of a remaining column.
    pub fn original_column(&self, column: usize) -> usize {
        self.columns[column]
    }

    /// A single payoff.
    pub fn value(&self, row: usize, column: usize) -> Rational {
        self.values[row][column]
    }

    /// Payoffs of a row.
    pub fn row(&self, row: usize) -> &[Rational] {
        &self.values[row]
    }

    /// Payoffs of a column.
    pub fn column(&self, column: usize) -> impl Iterator<Item = Rational> + '_ {
        self.values.iter().map(move |row| row[column])
    }

    /// All remaining rows.
    pub fn rows(&self) -> &[Vec<Rational>] {
        &self.values
    }

    /// Smallest payoff.
    pub fn min(&self) -> Rational {
        self.values.iter().flatten().copied().min()
            .expect("A payoff matrix is never empty.")
    }

    /// For each row, the worst payoff for the row player.
    pub fn row_minima(&self) -> Vec<Rational> {
        self.values.iter()
            .map(|row| row.iter().copied().min().expect("A payoff matrix is never empty."))
            .collect()
    }

    /// For each column, the worst payoff for the column player.
    pub fn column_maxima(&self) -> Vec<Rational> {
        (0..self.nr_columns())
            .map(|column| self.column(column).max().expect("A payoff matrix is never empty."))
            .collect()
    }

    /// Remove strategies of the row player, given by sorted indices.
    pub fn remove_rows(&mut self, rows: &[usize]) {
        debug_assert!(rows.len() < self.nr_rows());

        remove_indices(&mut self.values, rows);
        remove_indices(&mut self.rows, rows);
    }

    /// Remove strategies of the column player, given by sorted indices.
    pub fn remove_columns(&mut self, columns: &[usize]) {
        debug_assert!(columns.len() < self.nr_columns());

        for row in &mut self.values {
            remove_indices(row, columns);
        }
        remove_indices(&mut self.columns, columns);
    }
}

impl fmt::Display for PayoffMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = 8;
        write!(f, "{:>width$}", "")?;
        for &column in &self.columns {
            write!(f, "{:>width$}", format!("B{}", column + 1))?;
        }
        writeln!(f)?;

        for (&row, values) in self.rows.iter().zip(&self.values) {
            write!(f, "{:>width$}", format!("A{}", row + 1))?;
            writeln!(f, "{}", values.iter().map(|value| format!("{:>width$}", value.to_string())).join(""))?;
        }
        Ok(())
    }
}
