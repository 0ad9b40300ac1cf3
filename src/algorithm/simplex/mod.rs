//! # The simplex method
//!
//! Exact, two phase, primal simplex method on a condensed tableau. Linear programs are brought in
//! standard form by `Tableau::new`; when that introduces artificial variables, phase one searches
//! for a feasible basis first. Phase two then optimizes the original objective function.
use std::fmt;

use log::{debug, info, warn};
use num_traits::Zero;

use crate::algorithm::{SolveError, SolverSettings};
use crate::algorithm::log::IterationLog;
use crate::algorithm::simplex::phase_one::phase_one;
use crate::algorithm::simplex::pivot_rule::PivotRule;
use crate::algorithm::simplex::tableau::{Label, Tableau};
use crate::data::linear_program::elements::Objective;
use crate::data::linear_program::general_form::LinearProgram;
use crate::data::linear_program::solution::Solution;
use crate::data::number_types::rational::Rational;

mod phase_one;
pub mod pivot_rule;
pub mod tableau;

/// The two phases of the two phase method.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Minimizing the sum of the artificial variables.
    One,
    /// Optimizing the objective function of the problem.
    Two,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Phase::One => "phase one",
            Phase::Two => "phase two",
        })
    }
}

/// What happened during a single step of the simplex method.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SimplexStep {
    /// A basis change.
    Pivot {
        /// During which phase.
        phase: Phase,
        /// State before the pivot.
        tableau: Tableau,
        /// Row of the leaving variable.
        row: usize,
        /// Column of the entering variable.
        column: usize,
        /// Value of the pivot cell.
        pivot: Rational,
        /// Name of the variable entering the basis.
        entering: String,
        /// Name of the variable leaving the basis.
        leaving: String,
        /// Why this pivot was chosen.
        justification: String,
    },
    /// An artificial variable left the basis and its column was removed.
    DropArtificial {
        /// Name of the artificial variable.
        name: String,
    },
    /// An artificial variable remained basic at level zero, and its row has no non zero entries
    /// for the other variables: the constraint is implied by the others.
    RemoveRedundantRow {
        /// State before the removal.
        tableau: Tableau,
        /// The removed row.
        row: usize,
        /// Name of the basic artificial variable of that row.
        name: String,
    },
    /// No objective row entry is negative.
    Optimal {
        /// Which phase ended.
        phase: Phase,
        /// Final state of the phase.
        tableau: Tableau,
    },
}

impl fmt::Display for SimplexStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimplexStep::Pivot { phase, tableau, row, column, pivot, entering, leaving, justification } => {
                write!(f, "{}", tableau)?;
                writeln!(f, "{}: pivot on row {}, column {} (value {})", phase, row + 1, column + 1, pivot)?;
                writeln!(f, "{} enters, {} leaves the basis", entering, leaving)?;
                write!(f, "{}", justification)
            },
            SimplexStep::DropArtificial { name } => {
                write!(f, "Artificial variable {} left the basis; its column is removed", name)
            },
            SimplexStep::RemoveRedundantRow { tableau, row, name } => {
                write!(f, "{}", tableau)?;
                write!(f, "Row {} (basic variable {}) is redundant and removed", row + 1, name)
            },
            SimplexStep::Optimal { phase, tableau } => {
                write!(f, "{}", tableau)?;
                write!(f, "{}: no negative entry in the objective row, optimal", phase)
            },
        }
    }
}

/// Reduces the cost of the basic feasible solution to the minimum.
///
/// While calling this method, a number of requirements should be satisfied:
/// - The objective row should be priced for the current basis (see `Tableau::reprice`)
/// - All constraint values need to be non negative (primary feasibility)
///
/// # Errors
///
/// `Unbounded` when a column with a negative objective row entry has no positive entries,
/// `IterationLimit` when the tableau is not optimal after the configured number of pivots.
pub fn primal<PR: PivotRule>(
    tableau: &mut Tableau,
    settings: &SolverSettings,
    log: &mut IterationLog<SimplexStep>,
) -> Result<(), SolveError> {
    primal_with::<PR, _>(tableau, Phase::Two, settings, log, |_, _, _| {})
}

/// The primal loop, calling `after_pivot` with the column of the leaving variable after every
/// basis change.
fn primal_with<PR, F>(
    tableau: &mut Tableau,
    phase: Phase,
    settings: &SolverSettings,
    log: &mut IterationLog<SimplexStep>,
    mut after_pivot: F,
) -> Result<(), SolveError>
where
    PR: PivotRule,
    F: FnMut(&mut Tableau, usize, &mut IterationLog<SimplexStep>),
{
    let mut rule = PR::new();
    let mut iterations = 0;
    loop {
        debug_assert!(tableau.is_feasible());

        let Some(column) = rule.select_primal_pivot_column(tableau) else {
            debug!("{} optimal after {} pivots with value {}", phase, iterations, tableau.objective_value());
            log.record(SimplexStep::Optimal { phase, tableau: tableau.clone() });
            break Ok(());
        };
        if iterations == settings.iteration_limit {
            warn!("{} not optimal after {} pivots", phase, iterations);
            break Err(SolveError::IterationLimit { limit: settings.iteration_limit });
        }
        let row = tableau.select_primal_pivot_row(column)?.ok_or(SolveError::Unbounded)?;

        let entering = tableau.name(tableau.column_labels()[column]);
        let leaving = tableau.name(tableau.row_labels()[row]);
        let pivot = tableau.entry(row, column);
        let justification = format!(
            "{} has objective row entry {} < 0; {} limits its increase first, at {} / {} = {}",
            entering, tableau.relative_cost(column), leaving,
            tableau.rhs(row), pivot, tableau.rhs(row).checked_div(pivot)?,
        );
        debug!("{}: pivot on ({}, {}), {} enters, {} leaves", phase, row, column, entering, leaving);
        log.record(SimplexStep::Pivot {
            phase,
            tableau: tableau.clone(),
            row,
            column,
            pivot,
            entering,
            leaving,
            justification,
        });

        tableau.pivot(row, column)?;
        iterations += 1;
        after_pivot(tableau, column, log);
    }
}

/// Find an optimal basis for a linear program.
///
/// The returned tableau maximizes the objective function (or its negation, for a minimization
/// problem) and contains no artificial variables.
///
/// # Errors
///
/// `Infeasible`, `Unbounded`, `IterationLimit` (per phase) or an arithmetic error.
pub fn optimize<PR: PivotRule>(
    program: &LinearProgram,
    settings: &SolverSettings,
    log: &mut IterationLog<SimplexStep>,
) -> Result<Tableau, SolveError> {
    let mut tableau = Tableau::new(program)?;
    phase_one::<PR>(&mut tableau, settings, log)?;

    let cost = program.cost().iter()
        .map(|&cost| match program.objective() {
            Objective::Maximize => Ok(cost),
            Objective::Minimize => cost.checked_neg(),
        })
        .collect::<Result<Vec<_>, _>>()?;
    tableau.reprice(|label| match label {
        Label::Decision(index) => cost[index],
        _ => Rational::zero(),
    })?;
    primal::<PR>(&mut tableau, settings, log)?;

    Ok(tableau)
}

/// Solve a linear program with the two phase simplex method.
///
/// # Return value
///
/// The optimal objective value and variable values, in the order of the program's variables,
/// together with all steps taken.
///
/// # Errors
///
/// See `optimize`.
pub fn solve_linear_program<PR: PivotRule>(
    program: &LinearProgram,
    settings: &SolverSettings,
) -> Result<(Solution, IterationLog<SimplexStep>), SolveError> {
    let mut log = IterationLog::new();
    let tableau = optimize::<PR>(program, settings, &mut log)?;

    let value = match program.objective() {
        Objective::Maximize => tableau.objective_value(),
        Objective::Minimize => tableau.objective_value().checked_neg()?,
    };
    let objective_value = value.checked_add(program.objective_constant())?;
    let values = program.variables().iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), tableau.value_of(Label::Decision(index))))
        .collect();

    info!("Solved linear program with optimal value {} in {} steps", objective_value, log.len());
    Ok((Solution::new(objective_value, values), log))
}

#[cfg(test)]
mod test {
    use crate::algorithm::{SolveError, SolverSettings};
    use crate::algorithm::simplex::{Phase, SimplexStep, solve_linear_program};
    use crate::algorithm::simplex::pivot_rule::{FirstNegative, MostNegative};
    use crate::data::linear_program::general_form::LinearProgram;
    use crate::R;

    #[test]
    fn textbook_maximum() {
        let program = LinearProgram::parse(
            "maximize x1 + 2x2",
            &["2x1 + 3x2 <= 12", "x1 + 5x2 <= 15"],
        ).unwrap();
        let (solution, log) = solve_linear_program::<MostNegative>(&program, &SolverSettings::default()).unwrap();

        assert_eq!(solution.objective_value, R!(51, 7));
        assert_eq!(solution.value("x1"), Some(R!(15, 7)));
        assert_eq!(solution.value("x2"), Some(R!(18, 7)));
        // Two pivots and the optimality check
        assert_eq!(log.len(), 3);
        match log.iter().next() {
            Some(SimplexStep::Pivot { entering, leaving, pivot, .. }) => {
                assert_eq!(entering, "x2");
                assert_eq!(leaving, "s2");
                assert_eq!(*pivot, R!(5));
            },
            other => panic!("expected a pivot, got {:?}", other),
        }
        assert!(matches!(log.last(), Some(SimplexStep::Optimal { phase: Phase::Two, .. })));
    }

    #[test]
    fn same_optimum_with_bland() {
        let program = LinearProgram::parse(
            "maximize x1 + 2x2",
            &["2x1 + 3x2 <= 12", "x1 + 5x2 <= 15"],
        ).unwrap();
        let (solution, _) = solve_linear_program::<FirstNegative>(&program, &SolverSettings::default()).unwrap();
        assert_eq!(solution.objective_value, R!(51, 7));
    }

    #[test]
    fn minimize_with_artificials() {
        // Optimum at x = 2, y = 1
        let program = LinearProgram::parse(
            "minimize z = 3x + 2y + 1",
            &["x + y >= 3", "x - y = 1", "x <= 10"],
        ).unwrap();
        let (solution, log) = solve_linear_program::<MostNegative>(&program, &SolverSettings::default()).unwrap();

        assert_eq!(solution.objective_value, R!(9));
        assert_eq!(solution.value("x"), Some(R!(2)));
        assert_eq!(solution.value("y"), Some(R!(1)));
        assert!(log.iter().any(|step| matches!(step, SimplexStep::Optimal { phase: Phase::One, .. })));
        assert!(log.iter().any(|step| matches!(step, SimplexStep::DropArtificial { .. })));
    }

    #[test]
    fn redundant_equality() {
        let program = LinearProgram::parse(
            "max x + y",
            &["x + y = 2", "2x + 2y = 4", "x <= 1"],
        ).unwrap();
        let (solution, log) = solve_linear_program::<MostNegative>(&program, &SolverSettings::default()).unwrap();

        assert_eq!(solution.objective_value, R!(2));
        assert!(log.iter().any(|step| matches!(step, SimplexStep::RemoveRedundantRow { .. })));
    }

    #[test]
    fn artificial_at_level_zero() {
        let program = LinearProgram::parse("max x + y + w", &["-x - y = 0", "w <= 2"]).unwrap();
        let (solution, log) = solve_linear_program::<MostNegative>(&program, &SolverSettings::default()).unwrap();

        assert_eq!(solution.objective_value, R!(2));
        assert_eq!(solution.value("x"), Some(R!(0)));
        assert!(log.iter().any(|step| matches!(
            step,
            SimplexStep::Pivot { phase: Phase::One, leaving, .. } if leaving == "a1",
        )));
    }

    #[test]
    fn infeasible() {
        let program = LinearProgram::parse("max x", &["x + y <= 1", "x + y >= 2"]).unwrap();
        assert_eq!(
            solve_linear_program::<MostNegative>(&program, &SolverSettings::default()).map(|(solution, _)| solution),
            Err(SolveError::Infeasible),
        );
    }

    #[test]
    fn unbounded() {
        let program = LinearProgram::parse("max x + y", &["x - y <= 1"]).unwrap();
        assert_eq!(
            solve_linear_program::<MostNegative>(&program, &SolverSettings::default()).map(|(solution, _)| solution),
            Err(SolveError::Unbounded),
        );
    }

    #[test]
    fn iteration_limit() {
        let program = LinearProgram::parse(
            "maximize x1 + 2x2",
            &["2x1 + 3x2 <= 12", "x1 + 5x2 <= 15"],
        ).unwrap();
        let settings = SolverSettings::default().with_iteration_limit(1);
        assert_eq!(
            solve_linear_program::<MostNegative>(&program, &settings).map(|(solution, _)| solution),
            Err(SolveError::IterationLimit { limit: 1 }),
        );
    }

    #[test]
    fn feasibility_is_preserved() {
        let program = LinearProgram::parse(
            "max 3a + 2b + 4c",
            &["a + b + 2c <= 4", "2a + 3c <= 5", "2a + b + 3c <= 7"],
        ).unwrap();
        let (solution, log) = solve_linear_program::<MostNegative>(&program, &SolverSettings::default()).unwrap();

        for step in &log {
            if let SimplexStep::Pivot { tableau, .. } | SimplexStep::Optimal { tableau, .. } = step {
                assert!(tableau.is_feasible());
            }
        }
        assert!(matches!(log.last(), Some(SimplexStep::Optimal { tableau, .. }) if tableau.is_optimal()));
        assert_eq!(solution.objective_value, R!(21, 2));
    }
}
