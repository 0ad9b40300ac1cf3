//! # Matrix games
//!
//! Optimal mixed strategies for two player zero sum games. After removing dominated strategies,
//! a game either has a saddle point (a solution in pure strategies), is small enough for a closed
//! form, or is solved as a linear program with the simplex method.
use std::fmt;

use itertools::Itertools;
use log::{debug, info};
use num_traits::{One, Zero};

use crate::algorithm::{SolveError, SolverSettings};
use crate::algorithm::log::IterationLog;
use crate::algorithm::simplex::{optimize, SimplexStep};
use crate::algorithm::simplex::pivot_rule::PivotRule;
use crate::algorithm::simplex::tableau::Label;
use crate::data::linear_program::elements::{ConstraintType, Objective};
use crate::data::linear_program::general_form::{Constraint, LinearProgram};
use crate::data::matrix_game::PayoffMatrix;
use crate::data::number_types::rational::{ArithmeticError, Rational};

pub mod dominance;

/// How the optimal strategies were found.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SolutionKind {
    /// Saddle point: both players play a single strategy.
    Pure {
        /// Original index of the row player's strategy.
        row: usize,
        /// Original index of the column player's strategy.
        column: usize,
    },
    /// At least one player mixes strategies.
    Mixed,
}

/// Value of a game and optimal strategies for both players.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameSolution {
    /// Expected payoff when both players play optimally.
    pub value: Rational,
    /// Best payoff the row player can guarantee with a pure strategy (`α`).
    pub lower_value: Rational,
    /// Best payoff the column player can guarantee with a pure strategy (`β`).
    pub upper_value: Rational,
    /// Probability of each original row; removed rows have probability zero.
    pub row_strategy: Vec<Rational>,
    /// Probability of each original column; removed columns have probability zero.
    pub column_strategy: Vec<Rational>,
    /// Pure or mixed.
    pub kind: SolutionKind,
}

impl fmt::Display for GameSolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Game value: {}", self.value)?;
        writeln!(f, "Lower value: {}, upper value: {}", self.lower_value, self.upper_value)?;
        if let SolutionKind::Pure { row, column } = self.kind {
            writeln!(f, "Saddle point at A{}, B{}", row + 1, column + 1)?;
        }
        writeln!(f, "Player A: ({})", self.row_strategy.iter().join(", "))?;
        writeln!(f, "Player B: ({})", self.column_strategy.iter().join(", "))
    }
}

/// What happened during a single step of solving a game.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameStep {
    /// A dominated row was removed.
    RemoveRow {
        /// State before the removal.
        matrix: PayoffMatrix,
        /// Original index of the removed row.
        row: usize,
        /// Original index of the row that dominates it.
        dominated_by: usize,
    },
    /// A dominated column was removed.
    RemoveColumn {
        /// State before the removal.
        matrix: PayoffMatrix,
        /// Original index of the removed column.
        column: usize,
        /// Original index of the column that dominates it.
        dominated_by: usize,
    },
    /// Pure strategy bounds on the value of the game.
    Bounds {
        /// The reduced game.
        matrix: PayoffMatrix,
        /// Minimum of each row.
        row_minima: Vec<Rational>,
        /// Maximum of each column.
        column_maxima: Vec<Rational>,
        /// `α`, the largest row minimum.
        lower: Rational,
        /// `β`, the smallest column maximum.
        upper: Rational,
    },
    /// The remaining 2 x 2 game was solved directly.
    ClosedForm {
        /// `a - b - c + d`.
        denominator: Rational,
        /// Probability of the first row.
        p: Rational,
        /// Probability of the first column.
        q: Rational,
    },
    /// All payoffs were increased such that the value of the game is positive.
    Shift {
        /// Added to every payoff.
        amount: Rational,
    },
    /// Solving the linear program of the game.
    Simplex(SimplexStep),
}

impl From<SimplexStep> for GameStep {
    fn from(step: SimplexStep) -> Self {
        GameStep::Simplex(step)
    }
}

impl fmt::Display for GameStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameStep::RemoveRow { matrix, row, dominated_by } => {
                write!(f, "{}", matrix)?;
                write!(f, "Row A{} is dominated by row A{} and removed", row + 1, dominated_by + 1)
            },
            GameStep::RemoveColumn { matrix, column, dominated_by } => {
                write!(f, "{}", matrix)?;
                write!(f, "Column B{} is dominated by column B{} and removed", column + 1, dominated_by + 1)
            },
            GameStep::Bounds { matrix, row_minima, column_maxima, lower, upper } => {
                write!(f, "{}", matrix)?;
                writeln!(f, "Row minima: {}", row_minima.iter().join(", "))?;
                writeln!(f, "Column maxima: {}", column_maxima.iter().join(", "))?;
                write!(f, "α = {}, β = {}", lower, upper)?;
                if lower == upper {
                    write!(f, ": saddle point")?;
                }
                Ok(())
            },
            GameStep::ClosedForm { denominator, p, q } => {
                write!(f, "a - b - c + d = {}, p = (d - c) / {} = {}, q = (d - b) / {} = {}", denominator, denominator, p, denominator, q)
            },
            GameStep::Shift { amount } => write!(f, "Adding {} to every payoff", amount),
            GameStep::Simplex(step) => write!(f, "{}", step),
        }
    }
}

/// Solve a matrix game.
///
/// # Errors
///
/// Only when the simplex method fails, which happens when an exact value grows too large or when
/// the iteration limit is too small.
pub fn solve_game<PR: PivotRule>(
    payoffs: &PayoffMatrix,
    settings: &SolverSettings,
) -> Result<(GameSolution, IterationLog<GameStep>), SolveError> {
    let mut log = IterationLog::new();
    let mut matrix = payoffs.clone();
    let removed = dominance::reduce(&mut matrix, &mut log);
    debug!("Removed {} dominated strategies, {} x {} remain", removed, matrix.nr_rows(), matrix.nr_columns());

    let row_minima = matrix.row_minima();
    let column_maxima = matrix.column_maxima();
    let lower = *row_minima.iter().max().expect("A payoff matrix is never empty.");
    let upper = *column_maxima.iter().min().expect("A payoff matrix is never empty.");
    debug_assert!(lower <= upper);
    log.record(GameStep::Bounds {
        matrix: matrix.clone(),
        row_minima: row_minima.clone(),
        column_maxima: column_maxima.clone(),
        lower,
        upper,
    });

    let (value, row_strategy, column_strategy, kind) = if lower == upper {
        let row = row_minima.iter().position(|&minimum| minimum == lower).expect("Attained by definition.");
        let column = column_maxima.iter().position(|&maximum| maximum == upper).expect("Attained by definition.");
        let mut p = vec![Rational::zero(); matrix.nr_rows()];
        let mut q = vec![Rational::zero(); matrix.nr_columns()];
        p[row] = Rational::one();
        q[column] = Rational::one();
        let kind = SolutionKind::Pure { row: matrix.original_row(row), column: matrix.original_column(column) };

        (lower, p, q, kind)
    } else if matrix.nr_rows() == 2 && matrix.nr_columns() == 2 {
        let (value, p, q) = closed_form(&matrix, &mut log)?;
        (value, p, q, SolutionKind::Mixed)
    } else {
        let (value, p, q) = linear_program::<PR>(&matrix, settings, &mut log)?;
        (value, p, q, SolutionKind::Mixed)
    };

    let solution = GameSolution {
        value,
        lower_value: lower,
        upper_value: upper,
        row_strategy: expand(&row_strategy, matrix.nr_original_rows(), |row| matrix.original_row(row)),
        column_strategy: expand(&column_strategy, matrix.nr_original_columns(), |column| matrix.original_column(column)),
        kind,
    };
    info!("Solved {} x {} game with value {}", payoffs.nr_rows(), payoffs.nr_columns(), solution.value);

    Ok((solution, log))
}

/// Solve a 2 x 2 game without a saddle point by making each player indifferent.
fn closed_form(
    matrix: &PayoffMatrix,
    log: &mut IterationLog<GameStep>,
) -> Result<(Rational, Vec<Rational>, Vec<Rational>), ArithmeticError> {
    let (a, b) = (matrix.value(0, 0), matrix.value(0, 1));
    let (c, d) = (matrix.value(1, 0), matrix.value(1, 1));

    // Non zero without a saddle point
    let denominator = a.checked_sub(b)?.checked_sub(c)?.checked_add(d)?;
    let p = d.checked_sub(c)?.checked_div(denominator)?;
    let q = d.checked_sub(b)?.checked_div(denominator)?;
    let value = a.checked_mul(d)?.checked_sub(b.checked_mul(c)?)?.checked_div(denominator)?;
    log.record(GameStep::ClosedForm { denominator, p, q });

    let one = Rational::one();
    Ok((value, vec![p, one.checked_sub(p)?], vec![q, one.checked_sub(q)?]))
}

/// Solve the game as a linear program.
///
/// With all payoffs positive, the column player solves `max Σ y` subject to `Σ_j a_ij y_j <= 1`.
/// The value of the game is `1 / Z` and the strategies are `y` and the duals, scaled by the value.
fn linear_program<PR: PivotRule>(
    matrix: &PayoffMatrix,
    settings: &SolverSettings,
    log: &mut IterationLog<GameStep>,
) -> Result<(Rational, Vec<Rational>, Vec<Rational>), SolveError> {
    let minimum = matrix.min();
    let shift = if minimum.is_positive() {
        Rational::zero()
    } else {
        let amount = Rational::one().checked_sub(minimum)?;
        log.record(GameStep::Shift { amount });
        amount
    };

    let constraints = matrix.rows().iter()
        .map(|row| -> Result<_, ArithmeticError> {
            Ok(Constraint {
                coefficients: row.iter().map(|value| value.checked_add(shift)).collect::<Result<_, _>>()?,
                constraint_type: ConstraintType::Less,
                right_hand_side: Rational::one(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let variables = (0..matrix.nr_columns())
        .map(|column| format!("y{}", matrix.original_column(column) + 1))
        .collect();
    let program = LinearProgram::new(
        Objective::Maximize,
        variables,
        vec![Rational::one(); matrix.nr_columns()],
        Rational::zero(),
        constraints,
    ).map_err(|error| SolveError::Structural(error.to_string()))?;

    let mut simplex_log = IterationLog::new();
    let result = optimize::<PR>(&program, settings, &mut simplex_log);
    log.extend(simplex_log);
    let tableau = result?;

    // Positive, because all payoffs are positive
    let scale = tableau.objective_value().recip()?;
    let value = scale.checked_sub(shift)?;
    let p = (0..matrix.nr_rows())
        .map(|row| tableau.dual_value(Label::Slack(row)).checked_mul(scale))
        .collect::<Result<Vec<_>, _>>()?;
    let q = (0..matrix.nr_columns())
        .map(|column| tableau.value_of(Label::Decision(column)).checked_mul(scale))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((value, p, q))
}

/// Place the probabilities of the remaining strategies at their original indices.
fn expand(strategy: &[Rational], size: usize, original: impl Fn(usize) -> usize) -> Vec<Rational> {
    let mut expanded = vec![Rational::zero(); size];
    for (index, &probability) in strategy.iter().enumerate() {
        expanded[original(index)] = probability;
    }
    expanded
}
