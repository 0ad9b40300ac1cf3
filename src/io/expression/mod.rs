//! # Arithmetic expressions
//!
//! A small, explicitly scoped expression language: numbers, named variables, `+ - * / ^` and
//! parentheses. Expressions are parsed into a tree that can be evaluated exactly or expanded into
//! a polynomial, which is how objective functions and constraints are read.
use std::collections::HashMap;
use std::fmt;

use num_traits::{One, Zero};

use crate::data::linear_program::elements::ConstraintType;
use crate::data::number_types::rational::{ArithmeticError, Rational};
use crate::data::polynomial::Polynomial;
use crate::io::error::{Inconsistency, ParseResult};
use crate::io::expression::parse::{comparison_symbol, Parser};

mod parse;
pub mod token;

/// Parse a single expression, like `"3x^2 - 2(x + y)"`.
///
/// # Errors
///
/// When the text is not a valid expression, for example because of unbalanced parentheses.
pub fn parse(text: &str) -> ParseResult<Expression> {
    Parser::new(text)?.expression_only()
}

/// Parse two expressions separated by a comparison, like `"2x1 + 3x2 <= 12"`.
///
/// # Errors
///
/// When either side is not a valid expression, or when there is not exactly one comparison.
pub fn parse_relation(text: &str) -> ParseResult<Relation> {
    Parser::new(text)?.relation_only()
}

/// Binary operators, in the order of their precedence.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
            Operator::Power => 3,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Power => "^",
        }
    }
}

/// Expression tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expression {
    /// A literal number.
    Constant(Rational),
    /// A named variable.
    Variable(String),
    /// Unary minus.
    Negation(Box<Expression>),
    /// Two operands combined with an operator.
    Binary {
        /// How the operands are combined.
        operator: Operator,
        /// Left operand.
        left: Box<Expression>,
        /// Right operand.
        right: Box<Expression>,
    },
}

impl Expression {
    /// Combine two expressions.
    pub fn binary(operator: Operator, left: Expression, right: Expression) -> Self {
        Expression::Binary { operator, left: Box::new(left), right: Box::new(right) }
    }

    /// Compute the exact value, given values for all variables.
    ///
    /// # Errors
    ///
    /// For unknown variables, division by zero, non-integer exponents and overflow.
    pub fn evaluate(&self, bindings: &HashMap<String, Rational>) -> Result<Rational, Inconsistency> {
        match self {
            Expression::Constant(value) => Ok(*value),
            Expression::Variable(name) => bindings.get(name)
                .copied()
                .ok_or_else(|| Inconsistency::new(format!("No value for variable \"{}\"", name))),
            Expression::Negation(inner) => inner.evaluate(bindings)?
                .checked_neg()
                .map_err(|error| Inconsistency::new(format!("Could not negate: {}", error))),
            Expression::Binary { operator, left, right } => {
                let left = left.evaluate(bindings)?;
                let right = right.evaluate(bindings)?;
                let result = match operator {
                    Operator::Add => left.checked_add(right),
                    Operator::Subtract => left.checked_sub(right),
                    Operator::Multiply => left.checked_mul(right),
                    Operator::Divide => left.checked_div(right),
                    Operator::Power => {
                        let exponent = integer_exponent(right)?;
                        let magnitude = (0..exponent.unsigned_abs())
                            .try_fold(Rational::one(), |power, _| power.checked_mul(left));
                        if exponent < 0 {
                            magnitude.and_then(Rational::recip)
                        } else {
                            magnitude
                        }
                    },
                };

                result.map_err(|error| Inconsistency::new(format!(
                    "Could not evaluate {} {} {}: {}", left, operator.symbol(), right, error,
                )))
            },
        }
    }

    /// Expand into a polynomial.
    ///
    /// # Errors
    ///
    /// When dividing by a non-constant expression or by zero, when an exponent is not a
    /// non-negative integer constant, and on overflow.
    pub fn to_polynomial(&self) -> Result<Polynomial, Inconsistency> {
        let overflow = |error: ArithmeticError| Inconsistency::new(format!("Could not expand \"{}\": {}", self, error));

        match self {
            Expression::Constant(value) => Ok(Polynomial::constant(*value)),
            Expression::Variable(name) => Ok(Polynomial::variable(name.clone())),
            Expression::Negation(inner) => inner.to_polynomial()?
                .checked_scale(-Rational::one())
                .map_err(overflow),
            Expression::Binary { operator, left, right } => {
                let left_polynomial = left.to_polynomial()?;
                let right_polynomial = right.to_polynomial()?;
                match operator {
                    Operator::Add => left_polynomial.checked_add(&right_polynomial).map_err(overflow),
                    Operator::Subtract => left_polynomial.checked_sub(&right_polynomial).map_err(overflow),
                    Operator::Multiply => left_polynomial.checked_mul(&right_polynomial).map_err(overflow),
                    Operator::Divide => {
                        let divisor = right_polynomial.as_constant()
                            .ok_or_else(|| Inconsistency::new(format!(
                                "Can only divide by constants, not by \"{}\"", right,
                            )))?;
                        if divisor.is_zero() {
                            return Err(Inconsistency::new(format!("Division by zero in \"{}\"", self)));
                        }
                        let factor = divisor.recip().map_err(overflow)?;
                        left_polynomial.checked_scale(factor).map_err(overflow)
                    },
                    Operator::Power => {
                        let exponent = right_polynomial.as_constant()
                            .ok_or_else(|| Inconsistency::new(format!(
                                "Exponent \"{}\" should be a constant", right,
                            )))
                            .and_then(integer_exponent)?;
                        let exponent = u32::try_from(exponent)
                            .map_err(|_| Inconsistency::new(format!(
                                "Exponent in \"{}\" should be a non-negative integer", self,
                            )))?;
                        left_polynomial.checked_pow(exponent).map_err(overflow)
                    },
                }
            },
        }
    }

    /// Names of all variables, in order of first occurrence.
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut Vec<String>) {
        match self {
            Expression::Constant(_) => {},
            Expression::Variable(name) => {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            },
            Expression::Negation(inner) => inner.collect_variables(names),
            Expression::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            },
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expression::Binary { operator, .. } => operator.precedence(),
            Expression::Negation(_) => 2,
            // Printed as a fraction or with a sign
            Expression::Constant(value) if !value.is_integer() || value.is_negative() => 2,
            _ => 4,
        }
    }
}

fn integer_exponent(value: Rational) -> Result<i64, Inconsistency> {
    if value.is_integer() && value.numerator().unsigned_abs() <= 64 {
        Ok(value.numerator())
    } else {
        Err(Inconsistency::new(format!("Exponent {} should be a small integer", value)))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::Variable(name) => f.write_str(name),
            Expression::Negation(inner) => if inner.precedence() <= 2 {
                write!(f, "-({})", inner)
            } else {
                write!(f, "-{}", inner)
            },
            Expression::Binary { operator, left, right } => {
                let own = operator.precedence();
                let left_bracket = match operator {
                    Operator::Power => left.precedence() <= own,
                    _ => left.precedence() < own,
                };
                let right_bracket = match operator {
                    Operator::Subtract | Operator::Divide => right.precedence() <= own,
                    _ => right.precedence() < own,
                };

                if left_bracket { write!(f, "({})", left)?; } else { write!(f, "{}", left)?; }
                write!(f, " {} ", operator.symbol())?;
                if right_bracket { write!(f, "({})", right) } else { write!(f, "{}", right) }
            },
        }
    }
}

/// Two expressions compared with each other, like a constraint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Relation {
    /// Left hand side.
    pub left: Expression,
    /// The kind of comparison.
    pub relation: ConstraintType,
    /// Right hand side.
    pub right: Expression,
}

impl Relation {
    /// Move all variables to the left and all constants to the right.
    ///
    /// # Return value
    ///
    /// A polynomial without constant term, the comparison, and the constant it is compared with.
    ///
    /// # Errors
    ///
    /// When either side can't be expanded into a polynomial.
    pub fn normalize(&self) -> Result<(Polynomial, ConstraintType, Rational), Inconsistency> {
        let overflow = |error: ArithmeticError| Inconsistency::new(format!("Could not normalize \"{}\": {}", self, error));

        let difference = self.left.to_polynomial()?
            .checked_sub(&self.right.to_polynomial()?)
            .map_err(overflow)?;
        let constant = difference.constant_term();
        let variable_part = difference.checked_sub(&Polynomial::constant(constant)).map_err(overflow)?;
        let right_hand_side = constant.checked_neg().map_err(overflow)?;

        Ok((variable_part, self.relation, right_hand_side))
    }

    /// Names of all variables, in order of first occurrence.
    pub fn variables(&self) -> Vec<String> {
        let mut names = self.left.variables();
        for name in self.right.variables() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.left, comparison_symbol(self.relation), self.right)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use crate::data::linear_program::elements::ConstraintType;
    use crate::data::polynomial::Monomial;
    use crate::io::expression::{parse, parse_relation};
    use crate::R;

    #[test]
    fn evaluate() {
        let bindings = HashMap::from([("x".to_string(), R!(1, 2)), ("y".to_string(), R!(3))]);
        assert_eq!(parse("2x^2 + y/4").unwrap().evaluate(&bindings).unwrap(), R!(5, 4));
        assert_eq!(parse("x^-1").unwrap().evaluate(&bindings).unwrap(), R!(2));
        assert_eq!(parse("2^3^2").unwrap().evaluate(&bindings).unwrap(), R!(512));
        assert!(parse("z + 1").unwrap().evaluate(&bindings).is_err());
        assert!(parse("1 / (y - 3)").unwrap().evaluate(&bindings).is_err());
        assert!(parse("2^x").unwrap().evaluate(&bindings).is_err());
    }

    #[test]
    fn polynomial() {
        let polynomial = parse("(x + y)^2 - x*(x - 1)/2").unwrap().to_polynomial().unwrap();
        assert_eq!(polynomial.coefficient(&Monomial::product("x", "x")), R!(1, 2));
        assert_eq!(polynomial.coefficient(&Monomial::product("x", "y")), R!(2));
        assert_eq!(polynomial.coefficient(&Monomial::product("y", "y")), R!(1));
        assert_eq!(polynomial.coefficient(&Monomial::variable("x")), R!(1, 2));

        assert!(parse("1 / x").unwrap().to_polynomial().is_err());
        assert!(parse("x / (2 - 2)").unwrap().to_polynomial().is_err());
        assert!(parse("x^y").unwrap().to_polynomial().is_err());
        assert!(parse("x^(1/2)").unwrap().to_polynomial().is_err());
    }

    #[test]
    fn normalize() {
        let relation = parse_relation("2x1 + 3 >= x2 - 1").unwrap();
        let (polynomial, relation_type, rhs) = relation.normalize().unwrap();
        assert_eq!(relation_type, ConstraintType::Greater);
        assert_eq!(rhs, R!(-4));
        assert_eq!(polynomial.coefficient(&Monomial::variable("x1")), R!(2));
        assert_eq!(polynomial.coefficient(&Monomial::variable("x2")), R!(-1));
        assert_eq!(polynomial.constant_term(), R!(0));
        assert_eq!(relation.variables(), vec!["x1".to_string(), "x2".to_string()]);
    }

    #[test]
    fn display_round_trip() {
        for text in ["1 - (2 - 3)", "2 * (x + y)", "-(x + 1)", "(a ^ b) ^ c", "a / (b * c)"] {
            let expression = parse(text).unwrap();
            assert_eq!(parse(&expression.to_string()).unwrap(), expression, "{}", text);
        }
    }
}
