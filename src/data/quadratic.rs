//! # Quadratic functions
//!
//! Functions `f(x) = xᵀAx + bᵀx + c` over a fixed, ordered list of variables, with `A`
//! symmetric.
use std::fmt;

use num_traits::Zero;

use crate::data::number_types::rational::{ArithmeticError, Rational};
use crate::data::polynomial::{Monomial, Polynomial};
use crate::io::error::Inconsistency;

/// A polynomial of degree at most two, in matrix form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuadraticFunction {
    variables: Vec<String>,
    /// Symmetric; the coefficient of `x_i x_j` (for `i != j`) is split over two entries.
    quadratic: Vec<Vec<Rational>>,
    linear: Vec<Rational>,
    constant: Rational,
}

impl QuadraticFunction {
    /// Read the coefficients of a polynomial.
    ///
    /// # Arguments
    ///
    /// * `polynomial`: Of degree at most two.
    /// * `variables`: Order of the variables, should contain all variables of the polynomial.
    ///
    /// # Errors
    ///
    /// When the degree is too high or when a variable is missing.
    pub fn from_polynomial(polynomial: &Polynomial, variables: &[String]) -> Result<Self, Inconsistency> {
        if polynomial.degree() > 2 {
            return Err(Inconsistency::new(format!(
                "\"{}\" has degree {}, at most 2 is supported", polynomial, polynomial.degree(),
            )));
        }
        let index = |name: &str| {
            variables.iter().position(|variable| variable == name)
                .ok_or_else(|| Inconsistency::new(format!("Unknown variable \"{}\"", name)))
        };

        let n = variables.len();
        let mut quadratic = vec![vec![Rational::zero(); n]; n];
        let mut linear = vec![Rational::zero(); n];
        for (monomial, coefficient) in polynomial.terms() {
            let names = monomial.variables().collect::<Vec<_>>();
            match (monomial.degree(), names.as_slice()) {
                (0, _) => {},
                (1, &[name]) => linear[index(name)?] = coefficient,
                (2, &[name]) => {
                    let i = index(name)?;
                    quadratic[i][i] = coefficient;
                },
                (2, &[first, second]) => {
                    let (i, j) = (index(first)?, index(second)?);
                    let half = coefficient.checked_div(Rational::from_integer(2))
                        .map_err(|error| Inconsistency::new(error.to_string()))?;
                    quadratic[i][j] = half;
                    quadratic[j][i] = half;
                },
                _ => unreachable!("Degree was checked to be at most two."),
            }
        }

        Ok(Self {
            variables: variables.to_vec(),
            quadratic,
            linear,
            constant: polynomial.constant_term(),
        })
    }

    /// Variables of all polynomials, sorted.
    pub fn shared_variables(polynomials: &[&Polynomial]) -> Vec<String> {
        let mut variables = polynomials.iter()
            .flat_map(|polynomial| polynomial.variables())
            .map(str::to_string)
            .collect::<Vec<_>>();
        variables.sort();
        variables.dedup();
        variables
    }

    /// Names of the variables, in the order used by all vectors and matrices.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of variables.
    pub fn nr_variables(&self) -> usize {
        self.variables.len()
    }

    /// The symmetric matrix `A`.
    pub fn quadratic(&self) -> &[Vec<Rational>] {
        &self.quadratic
    }

    /// The vector `b`.
    pub fn linear(&self) -> &[Rational] {
        &self.linear
    }

    /// The constant `c`.
    pub fn constant(&self) -> Rational {
        self.constant
    }

    /// Whether `A` is zero.
    pub fn is_linear(&self) -> bool {
        self.quadratic.iter().flatten().all(Rational::is_zero)
    }

    /// Exact value at a point.
    ///
    /// # Errors
    ///
    /// On overflow.
    pub fn evaluate(&self, x: &[Rational]) -> Result<Rational, ArithmeticError> {
        let mut total = self.constant;
        for (i, row) in self.quadratic.iter().enumerate() {
            total = total.checked_add(self.linear[i].checked_mul(x[i])?)?;
            for (j, &a) in row.iter().enumerate() {
                if !a.is_zero() {
                    total = total.checked_add(a.checked_mul(x[i])?.checked_mul(x[j])?)?;
                }
            }
        }
        Ok(total)
    }

    /// Value at a point, in floating point.
    pub fn evaluate_approximate(&self, x: &[f64]) -> f64 {
        let quadratic = self.quadratic.iter().zip(x)
            .map(|(row, &xi)| row.iter().zip(x).map(|(a, &xj)| a.approximate() * xi * xj).sum::<f64>())
            .sum::<f64>();
        let linear = self.linear.iter().zip(x).map(|(b, &xi)| b.approximate() * xi).sum::<f64>();
        quadratic + linear + self.constant.approximate()
    }

    /// Exact gradient `2Ax + b` at a point.
    ///
    /// # Errors
    ///
    /// On overflow.
    pub fn gradient(&self, x: &[Rational]) -> Result<Vec<Rational>, ArithmeticError> {
        self.quadratic.iter().zip(&self.linear)
            .map(|(row, &b)| {
                row.iter().zip(x)
                    .try_fold(Rational::zero(), |total, (&a, &xj)| total.checked_add(a.checked_mul(xj)?))?
                    .checked_mul(Rational::from_integer(2))?
                    .checked_add(b)
            })
            .collect()
    }

    /// Gradient at a point, in floating point.
    pub fn gradient_approximate(&self, x: &[f64]) -> Vec<f64> {
        self.quadratic.iter().zip(&self.linear)
            .map(|(row, b)| {
                2_f64 * row.iter().zip(x).map(|(a, &xj)| a.approximate() * xj).sum::<f64>() + b.approximate()
            })
            .collect()
    }

    /// The Hessian `2A`, which is the same everywhere.
    ///
    /// # Errors
    ///
    /// On overflow.
    pub fn hessian(&self) -> Result<Vec<Vec<Rational>>, ArithmeticError> {
        self.quadratic.iter()
            .map(|row| row.iter().map(|&a| a.checked_mul(Rational::from_integer(2))).collect())
            .collect()
    }

    /// Back to a polynomial.
    ///
    /// # Errors
    ///
    /// On overflow.
    pub fn to_polynomial(&self) -> Result<Polynomial, ArithmeticError> {
        let mut polynomial = Polynomial::constant(self.constant);
        for (i, name) in self.variables.iter().enumerate() {
            polynomial = polynomial.checked_add(&Polynomial::term(Monomial::variable(name.clone()), self.linear[i]))?;
            polynomial = polynomial.checked_add(&Polynomial::term(Monomial::product(name, name), self.quadratic[i][i]))?;
            for (j, other) in self.variables.iter().enumerate().skip(i + 1) {
                let coefficient = self.quadratic[i][j].checked_mul(Rational::from_integer(2))?;
                polynomial = polynomial.checked_add(&Polynomial::term(Monomial::product(name, other), coefficient))?;
            }
        }
        Ok(polynomial)
    }
}

impl fmt::Display for QuadraticFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_polynomial() {
            Ok(polynomial) => write!(f, "{}", polynomial),
            Err(_) => f.write_str("<coefficients too large to display>"),
        }
    }
}
