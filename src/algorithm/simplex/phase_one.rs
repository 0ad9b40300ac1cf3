//! # Phase one
//!
//! Finding a feasible basis without artificial variables.
use log::{debug, warn};
use num_traits::{One, Zero};

use crate::algorithm::{SolveError, SolverSettings};
use crate::algorithm::log::IterationLog;
use crate::algorithm::simplex::{Phase, primal_with, SimplexStep};
use crate::algorithm::simplex::pivot_rule::PivotRule;
use crate::algorithm::simplex::tableau::Tableau;
use crate::data::number_types::rational::Rational;

/// Remove all artificial variables from the tableau.
///
/// Maximizes minus the sum of the artificial variables. Artificials that leave the basis are
/// dropped immediately. Artificials that are still basic at the optimum have value zero (or
/// the problem is infeasible) and are pivoted out; if their row has no entries for other
/// variables, it is redundant and removed.
///
/// Does nothing when there are no artificial variables.
pub(super) fn phase_one<PR: PivotRule>(
    tableau: &mut Tableau,
    settings: &SolverSettings,
    log: &mut IterationLog<SimplexStep>,
) -> Result<(), SolveError> {
    if !tableau.row_labels().iter().any(|label| label.is_artificial()) {
        return Ok(());
    }

    tableau.reprice(|label| if label.is_artificial() { -Rational::one() } else { Rational::zero() })?;
    primal_with::<PR, _>(tableau, Phase::One, settings, log, |tableau, column, log| {
        let label = tableau.column_labels()[column];
        if label.is_artificial() {
            log.record(SimplexStep::DropArtificial { name: tableau.name(label) });
            tableau.remove_column(column);
        }
    })?;

    if tableau.objective_value().is_negative() {
        debug!("Phase one optimum {} is negative", tableau.objective_value());
        return Err(SolveError::Infeasible);
    }

    drive_out_artificials(tableau, log)
}

/// Pivot out artificial variables that are basic at level zero.
fn drive_out_artificials(
    tableau: &mut Tableau,
    log: &mut IterationLog<SimplexStep>,
) -> Result<(), SolveError> {
    let mut redundant_rows = Vec::new();
    for row in 0..tableau.nr_rows() {
        let label = tableau.row_labels()[row];
        if !label.is_artificial() {
            continue;
        }
        debug_assert!(tableau.rhs(row).is_zero());

        let candidate = (0..tableau.nr_columns())
            .find(|&column| !tableau.column_labels()[column].is_artificial() && !tableau.entry(row, column).is_zero());
        match candidate {
            Some(column) => {
                let entering = tableau.name(tableau.column_labels()[column]);
                let leaving = tableau.name(label);
                log.record(SimplexStep::Pivot {
                    phase: Phase::One,
                    tableau: tableau.clone(),
                    row,
                    column,
                    pivot: tableau.entry(row, column),
                    entering: entering.clone(),
                    leaving: leaving.clone(),
                    justification: format!(
                        "Artificial variable {} is basic at level zero; {} replaces it without changing the solution",
                        leaving, entering,
                    ),
                });
                tableau.pivot(row, column)?;
                log.record(SimplexStep::DropArtificial { name: leaving });
                tableau.remove_column(column);
            },
            None => redundant_rows.push(row),
        }
    }

    if !redundant_rows.is_empty() {
        warn!("Removing {} redundant constraint(s)", redundant_rows.len());
        // Logged against the original row numbers
        for &row in &redundant_rows {
            log.record(SimplexStep::RemoveRedundantRow {
                tableau: tableau.clone(),
                row,
                name: tableau.name(tableau.row_labels()[row]),
            });
        }
        tableau.remove_rows(&redundant_rows);
    }

    Ok(())
}
