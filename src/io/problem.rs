//! # Problem files
//!
//! Plain text formats, one per kind of problem. Everything after a `#` is a comment, and blank
//! lines are ignored.
use std::iter::Peekable;

use crate::data::linear_program::elements::ConstraintType;
use crate::data::linear_program::general_form::LinearProgram;
use crate::data::matrix_game::PayoffMatrix;
use crate::data::number_types::rational::Rational;
use crate::data::polynomial::Polynomial;
use crate::data::quadratic::QuadraticFunction;
use crate::data::transportation::TransportationProblem;
use crate::io::error::{Import, Inconsistency, Parse, ParseResult};
use crate::io::expression::{parse, parse_relation};
use crate::io::number::parse_rational;

/// Non-empty lines without comments, with their line number.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.split('#').next().unwrap_or("").trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Numbers separated by whitespace, commas or semicolons.
fn numbers(line_number: usize, line: &str) -> ParseResult<Vec<Rational>> {
    line.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|token| !token.is_empty())
        .map(|token| parse_rational(token)
            .map_err(|error| Parse::wrap(format!("Line {}", line_number), error)))
        .collect()
}

/// Read a payoff matrix, one row of the game per line.
///
/// ```text
/// # Row player's payoffs
/// 3 -1
/// -2 4
/// ```
///
/// # Errors
///
/// When a payoff is not a number, or when the rows have different lengths.
pub fn parse_game(text: &str) -> Result<PayoffMatrix, Import> {
    let rows = content_lines(text)
        .map(|(line_number, line)| numbers(line_number, line))
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(PayoffMatrix::new(rows)?)
}

/// Read a transportation problem.
///
/// ```text
/// supply: 20 50 30
/// demand: 30 20 40 10
/// costs:
/// 2 3 11 7
/// 1 0 6 1
/// 5 8 15 9
/// ```
///
/// # Errors
///
/// When a section is missing or repeated, a value is not a number, or the dimensions don't match.
pub fn parse_transportation(text: &str) -> Result<TransportationProblem, Import> {
    let mut supply = None;
    let mut demand = None;
    let mut costs = None;

    let mut lines = content_lines(text).peekable();
    while let Some((line_number, line)) = lines.next() {
        let (keyword, rest) = line.split_once(':')
            .ok_or_else(|| Parse::new(format!("Line {}: expected \"supply:\", \"demand:\" or \"costs:\"", line_number)))?;
        let section = match keyword.trim().to_lowercase().as_str() {
            "supply" => &mut supply,
            "demand" => &mut demand,
            "costs" => {
                if costs.is_some() {
                    return Err(Parse::new(format!("Line {}: costs are given twice", line_number)).into());
                }
                let first = numbers(line_number, rest)?;
                costs = Some(cost_rows(first, &mut lines)?);
                continue;
            },
            other => return Err(Parse::new(format!("Line {}: unknown section \"{}\"", line_number, other)).into()),
        };
        if section.is_some() {
            return Err(Parse::new(format!("Line {}: \"{}\" is given twice", line_number, keyword.trim())).into());
        }
        *section = Some(numbers(line_number, rest)?);
    }

    let missing = |name: &str| Parse::new(format!("Missing \"{}:\" section", name));
    Ok(TransportationProblem::new(
        supply.ok_or_else(|| missing("supply"))?,
        demand.ok_or_else(|| missing("demand"))?,
        costs.ok_or_else(|| missing("costs"))?,
    )?)
}

/// Cost rows follow until the next section.
fn cost_rows<'a, I: Iterator<Item = (usize, &'a str)>>(
    first: Vec<Rational>,
    lines: &mut Peekable<I>,
) -> ParseResult<Vec<Vec<Rational>>> {
    let mut rows = Vec::new();
    if !first.is_empty() {
        rows.push(first);
    }
    while let Some((line_number, line)) = lines.next_if(|(_, line)| !line.contains(':')) {
        rows.push(numbers(line_number, line)?);
    }

    Ok(rows)
}

/// Read a linear program: the objective on the first line, a constraint on every other line.
///
/// ```text
/// maximize x1 + 2x2
/// 2x1 + 3x2 <= 12
/// x1 + 5x2 <= 15
/// ```
///
/// # Errors
///
/// When the objective or a constraint can't be parsed, or is not linear.
pub fn parse_linear_program(text: &str) -> Result<LinearProgram, Import> {
    let mut lines = content_lines(text).map(|(_, line)| line);
    let objective = lines.next().ok_or_else(|| Parse::new("Missing objective"))?;
    let constraints = lines.collect::<Vec<_>>();

    LinearProgram::parse(objective, &constraints)
}

/// Read functions over the same variables, like an objective and a constraint.
///
/// An equation `lhs = rhs` is read as the function `lhs - rhs`.
///
/// # Errors
///
/// When a text can't be parsed, is an inequality, or has a degree above two.
pub fn parse_quadratic_functions<S: AsRef<str>>(texts: &[S]) -> Result<Vec<QuadraticFunction>, Import> {
    let polynomials = texts.iter()
        .map(|text| polynomial(text.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let variables = QuadraticFunction::shared_variables(&polynomials.iter().collect::<Vec<_>>());

    polynomials.iter()
        .map(|polynomial| QuadraticFunction::from_polynomial(polynomial, &variables).map_err(Import::from))
        .collect()
}

fn polynomial(text: &str) -> Result<Polynomial, Import> {
    if !text.contains(['=', '<', '>']) {
        let expression = parse(text)
            .map_err(|error| Parse::wrap(format!("Invalid function \"{}\"", text), error))?;
        return Ok(expression.to_polynomial()?);
    }

    let relation = parse_relation(text)
        .map_err(|error| Parse::wrap(format!("Invalid equation \"{}\"", text), error))?;
    let (polynomial, constraint_type, right_hand_side) = relation.normalize()?;
    if constraint_type != ConstraintType::Equal {
        return Err(Inconsistency::new(format!("\"{}\" should be an equation", text)).into());
    }

    polynomial.checked_sub(&Polynomial::constant(right_hand_side))
        .map_err(|error| Inconsistency::new(format!("Could not normalize \"{}\": {}", text, error)).into())
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::Objective;
    use crate::io::error::Import;
    use crate::io::problem::{parse_game, parse_linear_program, parse_quadratic_functions, parse_transportation};
    use crate::R;

    #[test]
    fn game() {
        let matrix = parse_game("# payoffs\n3, -1\n\n-2; 4  # second row\n").unwrap();
        assert_eq!(matrix.rows(), [vec![R!(3), R!(-1)], vec![R!(-2), R!(4)]]);

        assert!(matches!(parse_game("1 2\n3"), Err(Import::Inconsistency(_))));
        assert!(matches!(parse_game("1 x"), Err(Import::Parse(_))));
    }

    #[test]
    fn transportation() {
        let problem = parse_transportation("
            supply: 20 50 30
            demand: 30 20 40 10
            costs:
            2 3 11 7
            1 0 6 1
            5 8 15 9
        ").unwrap();
        assert_eq!(problem.supply(), [R!(20), R!(50), R!(30)]);
        assert_eq!(problem.costs()[2], [R!(5), R!(8), R!(15), R!(9)]);
    }

    #[test]
    fn transportation_sections_in_any_order() {
        let problem = parse_transportation("costs: 1 2\n3 4\ndemand: 1 1\nsupply: 1.5 0.5").unwrap();
        assert_eq!(problem.cost(1, 0), R!(3));
        assert_eq!(problem.supply(), [R!(3, 2), R!(1, 2)]);
    }

    #[test]
    fn transportation_errors() {
        assert!(matches!(parse_transportation("supply: 1\ndemand: 1"), Err(Import::Parse(_))));
        assert!(matches!(parse_transportation("supply: 1\nsupply: 1"), Err(Import::Parse(_))));
        assert!(matches!(parse_transportation("supply: 1\ndemand: 1\ncosts:\n1 2"), Err(Import::Inconsistency(_))));
        assert!(matches!(parse_transportation("routes: 1"), Err(Import::Parse(_))));
    }

    #[test]
    fn linear_program() {
        let program = parse_linear_program("
            # textbook
            maximize x1 + 2x2
            2x1 + 3x2 <= 12
            x1 + 5x2 <= 15
        ").unwrap();
        assert_eq!(program.objective(), Objective::Maximize);
        assert_eq!(program.nr_constraints(), 2);
        assert!(parse_linear_program("\n# nothing\n").is_err());
    }

    #[test]
    fn quadratic_functions() {
        let functions = parse_quadratic_functions(&["x^2 + y^2", "x + y = 2"]).unwrap();
        assert_eq!(functions[1].variables(), ["x", "y"]);
        assert_eq!(functions[1].linear(), [R!(1), R!(1)]);
        assert_eq!(functions[1].constant(), R!(-2));

        assert!(parse_quadratic_functions(&["x + y <= 2"]).is_err());
        assert!(parse_quadratic_functions(&["x^3"]).is_err());
    }
}
