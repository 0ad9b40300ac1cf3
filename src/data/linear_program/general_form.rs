//! # Linear programs in general form
//!
//! Named, non-negative variables, a linear objective function and any number of linear
//! constraints of each `ConstraintType`. This is the form in which problems are read; the simplex
//! method brings it into standard form itself.
use std::fmt;

use num_traits::Zero;

use crate::data::linear_program::elements::{ConstraintType, Objective};
use crate::data::number_types::rational::Rational;
use crate::data::polynomial::{Monomial, Polynomial};
use crate::io::error::{Import, Inconsistency, Parse as ParseError};
use crate::io::expression::{parse, parse_relation};

/// A single linear constraint `Σ a_j x_j OP b`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Constraint {
    /// One coefficient per variable of the program, in the order of the program's variables.
    pub coefficients: Vec<Rational>,
    /// Comparison between the linear combination and the right hand side.
    pub constraint_type: ConstraintType,
    /// Right hand side.
    pub right_hand_side: Rational,
}

/// A linear program over named, non-negative variables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinearProgram {
    objective: Objective,
    /// Names, in order of first appearance (objective first).
    variables: Vec<String>,
    cost: Vec<Rational>,
    /// Constant term of the objective function, only added to the objective value.
    objective_constant: Rational,
    constraints: Vec<Constraint>,
}

impl LinearProgram {
    /// Create a linear program from its parts.
    ///
    /// # Errors
    ///
    /// When the dimensions don't match or a variable name is repeated.
    pub fn new(
        objective: Objective,
        variables: Vec<String>,
        cost: Vec<Rational>,
        objective_constant: Rational,
        constraints: Vec<Constraint>,
    ) -> Result<Self, Inconsistency> {
        if cost.len() != variables.len() {
            return Err(Inconsistency::new(format!(
                "There are {} variables but {} cost coefficients", variables.len(), cost.len(),
            )));
        }
        if let Some(index) = constraints.iter().position(|constraint| constraint.coefficients.len() != variables.len()) {
            return Err(Inconsistency::new(format!(
                "Constraint {} has {} coefficients, expected {}",
                index + 1, constraints[index].coefficients.len(), variables.len(),
            )));
        }
        for (index, name) in variables.iter().enumerate() {
            if variables[..index].contains(name) {
                return Err(Inconsistency::new(format!("Variable \"{}\" is defined twice", name)));
            }
        }

        Ok(Self { objective, variables, cost, objective_constant, constraints })
    }

    /// Read a linear program from an objective function and constraints.
    ///
    /// The objective text starts with `max`, `maximize`, `min` or `minimize`, optionally followed
    /// by a `:` and `z =`, like `"maximize z = x1 + 2x2"`. Each constraint compares two linear
    /// expressions, like `"2x1 + 3x2 <= 12"`. All variables are non-negative; constraints of the
    /// form `x >= 0` state just that and are skipped.
    ///
    /// # Errors
    ///
    /// A parse error when any text is not a valid objective or relation, and an inconsistency
    /// when an expression is not linear.
    pub fn parse<S: AsRef<str>>(objective_text: &str, constraint_texts: &[S]) -> Result<Self, Import> {
        let (objective, function_text) = split_objective(objective_text)?;
        let function = parse(function_text)
            .map_err(|error| ParseError::wrap(format!("Invalid objective \"{}\"", objective_text), error))?;
        let function_polynomial = linear(function.to_polynomial()?, objective_text)?;

        let mut variables = function.variables();
        let mut rows = Vec::with_capacity(constraint_texts.len());
        for text in constraint_texts {
            let text = text.as_ref();
            let relation = parse_relation(text)
                .map_err(|error| ParseError::wrap(format!("Invalid constraint \"{}\"", text), error))?;
            for name in relation.variables() {
                if !variables.contains(&name) {
                    variables.push(name);
                }
            }

            let (polynomial, constraint_type, right_hand_side) = relation.normalize()?;
            let polynomial = linear(polynomial, text)?;
            if !is_non_negativity_bound(&polynomial, constraint_type, right_hand_side) {
                rows.push((polynomial, constraint_type, right_hand_side));
            }
        }

        let coefficients = |polynomial: &Polynomial| variables.iter()
            .map(|name| polynomial.coefficient(&Monomial::variable(name.as_str())))
            .collect::<Vec<_>>();
        let cost = coefficients(&function_polynomial);
        let constraints = rows.iter()
            .map(|(polynomial, constraint_type, right_hand_side)| Constraint {
                coefficients: coefficients(polynomial),
                constraint_type: *constraint_type,
                right_hand_side: *right_hand_side,
            })
            .collect();

        Ok(Self::new(objective, variables, cost, function_polynomial.constant_term(), constraints)?)
    }

    /// Direction of optimization.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Variable names, in column order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Objective function coefficients, in column order.
    pub fn cost(&self) -> &[Rational] {
        &self.cost
    }

    /// Constant term of the objective function.
    pub fn objective_constant(&self) -> Rational {
        self.objective_constant
    }

    /// All constraints, not including the implicit non-negativity of the variables.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of variables.
    pub fn nr_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn nr_constraints(&self) -> usize {
        self.constraints.len()
    }
}

/// Separate the direction of optimization from the objective function.
fn split_objective(text: &str) -> Result<(Objective, &str), ParseError> {
    let trimmed = text.trim_start();
    let lower = trimmed.to_ascii_lowercase();
    let (objective, rest) = [
        ("maximize", Objective::Maximize),
        ("minimize", Objective::Minimize),
        ("max", Objective::Maximize),
        ("min", Objective::Minimize),
    ].into_iter()
        .find(|(keyword, _)| {
            lower.starts_with(keyword)
                && !lower[keyword.len()..].starts_with(|c: char| c.is_alphanumeric() || c == '_')
        })
        .map(|(keyword, objective)| (objective, &trimmed[keyword.len()..]))
        .ok_or_else(|| ParseError::new(format!(
            "Objective \"{}\" should start with \"max\", \"maximize\", \"min\" or \"minimize\"", text,
        )))?;

    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest).trim_start();
    // Optional name of the objective value, as in "z = x1 + x2"
    let rest = rest.strip_prefix(['z', 'Z'])
        .map(str::trim_start)
        .and_then(|after_name| after_name.strip_prefix('='))
        .filter(|function| !function.starts_with('='))
        .map(str::trim_start)
        .unwrap_or(rest);

    Ok((objective, rest))
}

fn linear(polynomial: Polynomial, text: &str) -> Result<Polynomial, Inconsistency> {
    if polynomial.degree() > 1 {
        Err(Inconsistency::new(format!("\"{}\" is not linear", text)))
    } else {
        Ok(polynomial)
    }
}

/// Whether a normalized constraint reads `x >= 0` (or `-x <= 0`) for a single variable.
fn is_non_negativity_bound(polynomial: &Polynomial, constraint_type: ConstraintType, right_hand_side: Rational) -> bool {
    if !right_hand_side.is_zero() {
        return false;
    }

    let mut terms = polynomial.terms();
    match (terms.next(), terms.next()) {
        (Some((_, coefficient)), None) => match constraint_type {
            ConstraintType::Greater => coefficient.is_positive(),
            ConstraintType::Less => coefficient.is_negative(),
            ConstraintType::Equal => false,
        },
        _ => false,
    }
}

fn write_linear_combination(f: &mut fmt::Formatter, coefficients: &[Rational], names: &[String]) -> fmt::Result {
    let mut first = true;
    for (coefficient, name) in coefficients.iter().zip(names) {
        if coefficient.is_zero() {
            continue;
        }

        let magnitude = coefficient.abs();
        match (first, coefficient.is_negative()) {
            (true, true) => f.write_str("-")?,
            (true, false) => {},
            (false, true) => f.write_str(" - ")?,
            (false, false) => f.write_str(" + ")?,
        }
        if magnitude == Rational::from_integer(1) {
            f.write_str(name)?;
        } else {
            write!(f, "{}*{}", magnitude, name)?;
        }
        first = false;
    }

    if first {
        f.write_str("0")?;
    }
    Ok(())
}

impl fmt::Display for LinearProgram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ", self.objective)?;
        write_linear_combination(f, &self.cost, &self.variables)?;
        if !self.objective_constant.is_zero() {
            if self.objective_constant.is_negative() {
                write!(f, " - {}", self.objective_constant.abs())?;
            } else {
                write!(f, " + {}", self.objective_constant)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "subject to")?;
        for constraint in &self.constraints {
            f.write_str("    ")?;
            write_linear_combination(f, &constraint.coefficients, &self.variables)?;
            writeln!(f, " {} {}", constraint.constraint_type, constraint.right_hand_side)?;
        }
        write!(f, "    {} >= 0", self.variables.join(", "))
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::{ConstraintType, Objective};
    use crate::data::linear_program::general_form::{Constraint, LinearProgram, split_objective};
    use crate::io::error::Import;
    use crate::R;

    #[test]
    fn objective_header() {
        assert_eq!(split_objective("max x1").unwrap(), (Objective::Maximize, "x1"));
        assert_eq!(split_objective("Maximize: z = x1 + x2").unwrap(), (Objective::Maximize, "x1 + x2"));
        assert_eq!(split_objective("  min Z= 3y").unwrap(), (Objective::Minimize, "3y"));
        assert_eq!(split_objective("minimize z + 1").unwrap(), (Objective::Minimize, "z + 1"));
        assert!(split_objective("maxx + y").is_err());
        assert!(split_objective("x + y").is_err());
    }

    #[test]
    fn textbook() {
        let program = LinearProgram::parse(
            "maximize x1 + 2x2",
            &["2x1 + 3x2 <= 12", "x1 + 5x2 <= 15", "x1 >= 0", "x2 >= 0"],
        ).unwrap();

        assert_eq!(program.objective(), Objective::Maximize);
        assert_eq!(program.variables(), ["x1", "x2"]);
        assert_eq!(program.cost(), [R!(1), R!(2)]);
        assert_eq!(program.nr_constraints(), 2);
        assert_eq!(program.constraints()[0], Constraint {
            coefficients: vec![R!(2), R!(3)],
            constraint_type: ConstraintType::Less,
            right_hand_side: R!(12),
        });
    }

    #[test]
    fn normalization() {
        let program = LinearProgram::parse("min 3 + x", &["x + 2 >= y - 1", "0.5y = x/4"]).unwrap();
        assert_eq!(program.variables(), ["x", "y"]);
        assert_eq!(program.objective_constant(), R!(3));
        assert_eq!(program.constraints()[0], Constraint {
            coefficients: vec![R!(1), R!(-1)],
            constraint_type: ConstraintType::Greater,
            right_hand_side: R!(-3),
        });
        assert_eq!(program.constraints()[1].coefficients, vec![R!(-1, 4), R!(1, 2)]);
    }

    #[test]
    fn variables_only_in_constraints() {
        let program = LinearProgram::parse("max x", &["x + y <= 4", "z >= 0"]).unwrap();
        assert_eq!(program.variables(), ["x", "y", "z"]);
        assert_eq!(program.cost(), [R!(1), R!(0), R!(0)]);
        assert_eq!(program.nr_constraints(), 1);
    }

    #[test]
    fn errors() {
        assert!(matches!(LinearProgram::parse("max x*y", &["x <= 1"]), Err(Import::Inconsistency(_))));
        assert!(matches!(LinearProgram::parse("max x", &["x^2 <= 1"]), Err(Import::Inconsistency(_))));
        assert!(matches!(LinearProgram::parse("max x", &["x < 1"]), Err(Import::Parse(_))));
        assert!(matches!(LinearProgram::parse("x", &["x <= 1"]), Err(Import::Parse(_))));
        assert!(LinearProgram::new(Objective::Maximize, vec!["x".to_string()], vec![], R!(0), vec![]).is_err());
    }

    #[test]
    fn display() {
        let program = LinearProgram::parse("max x1 + 2x2 - 1", &["2x1 - x2 <= 1/2"]).unwrap();
        assert_eq!(
            program.to_string(),
            "maximize x1 + 2*x2 - 1\nsubject to\n    2*x1 - x2 <= 1/2\n    x1, x2 >= 0",
        );
    }
}
