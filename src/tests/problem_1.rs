//! Textbook linear program, only `<=` constraints.
//!
//! maximize x1 + 2x2 subject to 2x1 + 3x2 <= 12, x1 + 5x2 <= 15.
use crate::algorithm::SolverSettings;
use crate::algorithm::log::IterationLog;
use crate::algorithm::simplex::{primal, solve_linear_program};
use crate::algorithm::simplex::pivot_rule::{MostNegative, PivotRule};
use crate::algorithm::simplex::tableau::{Label, Tableau};
use crate::data::linear_program::elements::{ConstraintType, Objective};
use crate::data::linear_program::general_form::LinearProgram;
use crate::data::number_types::rational::Rational;
use crate::R;

const OBJECTIVE: &str = "maximize x1 + 2x2";
const CONSTRAINTS: [&str; 2] = ["2x1 + 3x2 <= 12", "x1 + 5x2 <= 15"];

fn general_form() -> LinearProgram {
    LinearProgram::parse(OBJECTIVE, &CONSTRAINTS).unwrap()
}

fn cost(label: Label) -> Rational {
    match label {
        Label::Decision(0) => R!(1),
        Label::Decision(1) => R!(2),
        _ => R!(0),
    }
}

#[test]
fn general_form_from_text() {
    let program = general_form();

    assert_eq!(program.objective(), Objective::Maximize);
    assert_eq!(program.variables(), ["x1", "x2"]);
    assert_eq!(program.cost(), [R!(1), R!(2)]);
    assert_eq!(program.objective_constant(), R!(0));
    let constraint = &program.constraints()[1];
    assert_eq!(constraint.coefficients, [R!(1), R!(5)]);
    assert_eq!(constraint.constraint_type, ConstraintType::Less);
    assert_eq!(constraint.right_hand_side, R!(15));
}

#[test]
fn pivot_by_pivot() {
    let mut tableau = Tableau::new(&general_form()).unwrap();
    assert_eq!(tableau.row_labels(), [Label::Slack(0), Label::Slack(1)]);
    assert_eq!(tableau.column_labels(), [Label::Decision(0), Label::Decision(1)]);
    assert!(tableau.is_feasible());

    tableau.reprice(cost).unwrap();
    assert_eq!(tableau.relative_cost(0), R!(-1));
    assert_eq!(tableau.relative_cost(1), R!(-2));
    assert_eq!(tableau.objective_value(), R!(0));

    // x2 enters, 15 / 5 < 12 / 3 so s2 leaves
    let mut rule = MostNegative::new();
    assert_eq!(rule.select_primal_pivot_column(&tableau), Some(1));
    assert_eq!(tableau.select_primal_pivot_row(1).unwrap(), Some(1));
    tableau.pivot(1, 1).unwrap();
    assert_eq!(tableau.row_labels(), [Label::Slack(0), Label::Decision(1)]);
    assert_eq!(tableau.column_labels(), [Label::Decision(0), Label::Slack(1)]);
    assert_eq!(tableau.entry(0, 0), R!(7, 5));
    assert_eq!(tableau.entry(0, 1), R!(-3, 5));
    assert_eq!(tableau.entry(1, 0), R!(1, 5));
    assert_eq!(tableau.entry(1, 1), R!(1, 5));
    assert_eq!(tableau.rhs(0), R!(3));
    assert_eq!(tableau.rhs(1), R!(3));
    assert_eq!(tableau.relative_cost(0), R!(-3, 5));
    assert_eq!(tableau.relative_cost(1), R!(2, 5));
    assert_eq!(tableau.objective_value(), R!(6));

    // x1 enters, 3 / (7/5) < 3 / (1/5) so s1 leaves
    assert_eq!(rule.select_primal_pivot_column(&tableau), Some(0));
    assert_eq!(tableau.select_primal_pivot_row(0).unwrap(), Some(0));
    tableau.pivot(0, 0).unwrap();
    assert!(tableau.is_optimal());
    assert_eq!(rule.select_primal_pivot_column(&tableau), None);
    assert_eq!(tableau.value_of(Label::Decision(0)), R!(15, 7));
    assert_eq!(tableau.value_of(Label::Decision(1)), R!(18, 7));
    assert_eq!(tableau.objective_value(), R!(51, 7));
    assert_eq!(tableau.dual_value(Label::Slack(0)), R!(3, 7));
    assert_eq!(tableau.dual_value(Label::Slack(1)), R!(1, 7));
}

#[test]
fn primal_loop_matches_manual_pivots() {
    let mut tableau = Tableau::new(&general_form()).unwrap();
    tableau.reprice(cost).unwrap();
    let mut log = IterationLog::new();
    primal::<MostNegative>(&mut tableau, &SolverSettings::default(), &mut log).unwrap();

    assert_eq!(tableau.objective_value(), R!(51, 7));
    assert_eq!(tableau.row_labels(), [Label::Decision(0), Label::Decision(1)]);
}

#[test]
fn strong_duality() {
    let program = general_form();
    let (solution, log) = solve_linear_program::<MostNegative>(&program, &SolverSettings::default()).unwrap();

    // 12 * 3/7 + 15 * 1/7
    assert_eq!(solution.objective_value, R!(12) * R!(3, 7) + R!(15) * R!(1, 7));
    assert!(!log.is_empty());
}
