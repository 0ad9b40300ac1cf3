use std::error::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::{Parser, Subcommand};

use pivotal::algorithm::SolverSettings;
use pivotal::algorithm::log::IterationLog;
use pivotal::algorithm::matrix_game::solve_game;
use pivotal::algorithm::nonlinear::gradient_descent::{descend, StepRule};
use pivotal::algorithm::nonlinear::lagrange::critical_points;
use pivotal::algorithm::simplex::pivot_rule::{FirstNegative, MostNegative, PivotRule};
use pivotal::algorithm::simplex::solve_linear_program;
use pivotal::algorithm::transportation::solve_transportation;
use pivotal::io::{import, Problem};
use pivotal::io::problem::parse_quadratic_functions;

/// Exact, step-by-step solvers for linear programs, matrix games and transportation problems.
#[derive(Parser)]
#[command(version, author)]
struct Opts {
    #[command(subcommand)]
    command: Command,
    /// Maximum number of iterations of a single loop (default 20)
    #[arg(long, global = true)]
    iteration_limit: Option<usize>,
    /// Tolerance for computations that leave exact arithmetic (default 1e-9)
    #[arg(long, global = true)]
    tolerance: Option<f64>,
    /// Print every step taken
    #[arg(long, global = true)]
    steps: bool,
    /// Enter the first improving variable instead of the most improving one
    #[arg(long, global = true)]
    bland: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Solve the problem in a `.game`, `.transport` or `.lp` file
    Solve {
        /// File containing the problem description
        problem_file: PathBuf,
    },
    /// Find the critical points of a function under an equality constraint
    Lagrange {
        /// Function to optimize, like "x + y"
        objective: String,
        /// Constraint, like "x^2 + y^2 = 2"
        constraint: String,
    },
    /// Minimize a quadratic function with steepest descent
    #[command(allow_negative_numbers = true)]
    Descend {
        /// Function to minimize, like "x^2 + 10y^2"
        function: String,
        /// Starting point, one coordinate per variable in alphabetical order
        #[arg(long, value_delimiter = ',', required = true)]
        start: Vec<f64>,
        /// A fixed step size, or "exact" for exact line search
        #[arg(long, default_value = "exact", value_parser = parse_step_rule)]
        step: StepRule,
    },
}

fn parse_step_rule(text: &str) -> Result<StepRule, String> {
    if text == "exact" {
        return Ok(StepRule::ExactLineSearch);
    }

    match text.parse::<f64>() {
        Ok(size) if size > 0_f64 && size.is_finite() => Ok(StepRule::Fixed(size)),
        _ => Err(format!("expected \"exact\" or a positive step size, got \"{}\"", text)),
    }
}

fn main() {
    env_logger::init();
    let opts = Opts::parse();

    let mut settings = SolverSettings::default();
    if let Some(limit) = opts.iteration_limit {
        settings = settings.with_iteration_limit(limit);
    }
    if let Some(tolerance) = opts.tolerance {
        settings = settings.with_tolerance(tolerance);
    }

    let result = match &opts.command {
        Command::Solve { problem_file } => if opts.bland {
            solve::<FirstNegative>(problem_file, &settings, opts.steps)
        } else {
            solve::<MostNegative>(problem_file, &settings, opts.steps)
        },
        Command::Lagrange { objective, constraint } => {
            lagrange(objective, constraint, &settings, opts.steps)
        },
        Command::Descend { function, start, step } => {
            gradient_descent(function, start, *step, &settings, opts.steps)
        },
    };

    if let Err(error) = result {
        eprintln!("{}", error);
        exit(1);
    }
}

fn solve<PR: PivotRule>(
    problem_file: &Path,
    settings: &SolverSettings,
    steps: bool,
) -> Result<(), Box<dyn Error>> {
    println!("Reading problem file: \"{}\"...", problem_file.to_string_lossy());
    let problem = import(problem_file)?;
    println!("{}", problem);

    match problem {
        Problem::Game(matrix) => {
            let (solution, log) = solve_game::<PR>(&matrix, settings)?;
            report(&solution, &log, steps);
        },
        Problem::Transportation(problem) => {
            let (solution, log) = solve_transportation(&problem, settings)?;
            report(&solution, &log, steps);
        },
        Problem::LinearProgram(program) => {
            let (solution, log) = solve_linear_program::<PR>(&program, settings)?;
            report(&solution, &log, steps);
        },
    }

    Ok(())
}

fn lagrange(
    objective: &str,
    constraint: &str,
    settings: &SolverSettings,
    steps: bool,
) -> Result<(), Box<dyn Error>> {
    let functions = parse_quadratic_functions(&[objective, constraint])?;
    let (solution, log) = critical_points(&functions[0], &functions[1], settings)?;
    report(&solution, &log, steps);

    Ok(())
}

fn gradient_descent(
    function: &str,
    start: &[f64],
    rule: StepRule,
    settings: &SolverSettings,
    steps: bool,
) -> Result<(), Box<dyn Error>> {
    let functions = parse_quadratic_functions(&[function])?;
    let function = &functions[0];
    if start.len() != function.nr_variables() {
        return Err(format!(
            "Expected {} starting coordinates, for ({}), got {}",
            function.nr_variables(), function.variables().join(", "), start.len(),
        ).into());
    }

    let (result, log) = descend(function, start, rule, settings)?;
    report(&result, &log, steps);

    Ok(())
}

fn report<R: Display, S: Display>(result: &R, log: &IterationLog<S>, steps: bool) {
    if steps {
        print!("{}", log);
    }
    println!("Solution computed:");
    print!("{}", result);
}
