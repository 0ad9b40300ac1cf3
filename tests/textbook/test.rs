use pivotal::algorithm::{SolveError, SolverSettings};
use pivotal::algorithm::matrix_game::{solve_game, SolutionKind};
use pivotal::algorithm::simplex::pivot_rule::{FirstNegative, MostNegative};
use pivotal::algorithm::simplex::solve_linear_program;
use pivotal::algorithm::transportation::solve_transportation;
use pivotal::data::matrix_game::PayoffMatrix;
use pivotal::data::number_types::rational::Rational;
use pivotal::data::transportation::{Dummy, TransportationProblem};
use pivotal::data::linear_program::general_form::LinearProgram;
use pivotal::io::{import, Problem};
use pivotal::io::error::Import;
use pivotal::R;

use super::{problem_file_directory, read};

fn game(name: &str) -> PayoffMatrix {
    match read(name) {
        Problem::Game(matrix) => matrix,
        other => panic!("expected a game, got {:?}", other),
    }
}

fn transportation(name: &str) -> TransportationProblem {
    match read(name) {
        Problem::Transportation(problem) => problem,
        other => panic!("expected a transportation problem, got {:?}", other),
    }
}

fn linear_program(name: &str) -> LinearProgram {
    match read(name) {
        Problem::LinearProgram(program) => program,
        other => panic!("expected a linear program, got {:?}", other),
    }
}

fn sum(values: &[Rational]) -> Rational {
    values.iter().copied().sum()
}

#[test]
fn saddle() {
    let (solution, _) = solve_game::<MostNegative>(&game("saddle.game"), &SolverSettings::default()).unwrap();

    assert_eq!(solution.value, R!(6));
    assert_eq!(solution.lower_value, solution.upper_value);
    assert_eq!(solution.kind, SolutionKind::Pure { row: 2, column: 1 });
}

#[test]
fn dominance() {
    let (solution, _) = solve_game::<MostNegative>(&game("dominance.game"), &SolverSettings::default()).unwrap();

    assert_eq!(solution.value, R!(9, 2));
    assert!(solution.lower_value <= solution.value && solution.value <= solution.upper_value);
    assert_eq!(sum(&solution.row_strategy), R!(1));
    assert_eq!(sum(&solution.column_strategy), R!(1));
    assert_eq!(solution.row_strategy[2], R!(0));
    assert_eq!(solution.column_strategy[3], R!(0));
}

#[test]
fn two_by_two() {
    let (solution, _) = solve_game::<FirstNegative>(&game("two_by_two.game"), &SolverSettings::default()).unwrap();

    assert_eq!(solution.value, R!(1));
    assert_eq!(solution.row_strategy, [R!(3, 5), R!(2, 5)]);
    assert_eq!(solution.column_strategy, [R!(1, 2), R!(1, 2)]);
}

#[test]
fn balanced() {
    let problem = transportation("balanced.transport");
    let (solution, log) = solve_transportation(&problem, &SolverSettings::default()).unwrap();

    assert_eq!(solution.total_cost, R!(460));
    assert_eq!(solution.dummy, None);
    assert_eq!(solution.allocation.nr_basic(), 6);
    assert!(log.len() > 1);
}

#[test]
fn unbalanced() {
    let problem = transportation("unbalanced.transport");
    let (solution, _) = solve_transportation(&problem, &SolverSettings::default()).unwrap();

    assert_eq!(solution.dummy, Some(Dummy::Destination));
    assert_eq!(solution.allocation.nr_columns(), 3);
    assert_eq!(solution.allocation.cell(0, 0).value, R!(20));
    assert_eq!(solution.allocation.cell(1, 1).value, R!(30));
    assert_eq!(solution.total_cost, R!(50));
}

#[test]
fn production() {
    let program = linear_program("production.lp");
    let (solution, _) = solve_linear_program::<MostNegative>(&program, &SolverSettings::default()).unwrap();

    assert_eq!(solution.objective_value, R!(51, 7));
    assert_eq!(solution.value("x1"), Some(R!(15, 7)));
    assert_eq!(solution.value("x2"), Some(R!(18, 7)));
}

#[test]
fn blend() {
    let program = linear_program("blend.lp");
    for result in [
        solve_linear_program::<MostNegative>(&program, &SolverSettings::default()),
        solve_linear_program::<FirstNegative>(&program, &SolverSettings::default()),
    ] {
        let (solution, _) = result.unwrap();
        assert_eq!(solution.objective_value, R!(9));
        assert_eq!(solution.value("x"), Some(R!(2)));
        assert_eq!(solution.value("y"), Some(R!(1)));
    }
}

#[test]
fn infeasible() {
    let program = linear_program("infeasible.lp");
    assert_eq!(
        solve_linear_program::<MostNegative>(&program, &SolverSettings::default()).map(|(solution, _)| solution),
        Err(SolveError::Infeasible),
    );
}

#[test]
fn import_errors() {
    let directory = problem_file_directory();

    assert!(matches!(import(&directory.join("missing.lp")), Err(Import::IO(_))));
    assert!(matches!(import(&directory.join("mod.rs")), Err(Import::FileExtension(_))));
    assert!(matches!(import(&directory.join("broken.game")), Err(Import::Inconsistency(_))));
}
