//! # Dominance
//!
//! Removing strategies that are never better than another strategy, whatever the opponent does.
use log::debug;

use crate::algorithm::log::IterationLog;
use crate::algorithm::matrix_game::GameStep;
use crate::data::matrix_game::PayoffMatrix;

/// Remove dominated strategies until none are left.
///
/// A row is dominated by another row when each of its payoffs is at most as large. A column is
/// dominated by another column when each of its payoffs is at least as large. Of two identical
/// rows (or columns), the later one is removed. Rows are removed before columns, and this is
/// repeated until nothing changes.
///
/// # Return value
///
/// The number of removed strategies.
pub fn reduce(matrix: &mut PayoffMatrix, log: &mut IterationLog<GameStep>) -> usize {
    let mut removed = 0;
    loop {
        let before = removed;

        while let Some((row, by)) = dominated_row(matrix) {
            debug!("Row {} is dominated by row {}", matrix.original_row(row) + 1, matrix.original_row(by) + 1);
            log.record(GameStep::RemoveRow {
                matrix: matrix.clone(),
                row: matrix.original_row(row),
                dominated_by: matrix.original_row(by),
            });
            matrix.remove_rows(&[row]);
            removed += 1;
        }
        while let Some((column, by)) = dominated_column(matrix) {
            debug!("Column {} is dominated by column {}", matrix.original_column(column) + 1, matrix.original_column(by) + 1);
            log.record(GameStep::RemoveColumn {
                matrix: matrix.clone(),
                column: matrix.original_column(column),
                dominated_by: matrix.original_column(by),
            });
            matrix.remove_columns(&[column]);
            removed += 1;
        }

        if removed == before {
            break removed;
        }
    }
}

/// First row that is dominated, with the first row dominating it.
fn dominated_row(matrix: &PayoffMatrix) -> Option<(usize, usize)> {
    let rows = matrix.rows();
    (0..rows.len()).find_map(|row| {
        (0..rows.len())
            .filter(|&other| other != row)
            .find(|&other| {
                let at_most = rows[row].iter().zip(&rows[other]).all(|(value, competitor)| value <= competitor);
                at_most && (other < row || rows[row] != rows[other])
            })
            .map(|other| (row, other))
    })
}

/// First column that is dominated, with the first column dominating it.
fn dominated_column(matrix: &PayoffMatrix) -> Option<(usize, usize)> {
    let columns = (0..matrix.nr_columns())
        .map(|column| matrix.column(column).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    (0..columns.len()).find_map(|column| {
        (0..columns.len())
            .filter(|&other| other != column)
            .find(|&other| {
                let at_least = columns[column].iter().zip(&columns[other]).all(|(value, competitor)| value >= competitor);
                at_least && (other < column || columns[column] != columns[other])
            })
            .map(|other| (column, other))
    })
}
