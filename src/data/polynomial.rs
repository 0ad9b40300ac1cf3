//! # Polynomials
//!
//! Sparse polynomials with exact coefficients over named variables. Parsed expressions are
//! turned into polynomials, from which linear programs and quadratic functions read their
//! coefficients.
use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use num_traits::{One, Zero};

use crate::data::number_types::rational::{ArithmeticError, Rational};

/// Product of variables raised to positive powers.
///
/// The empty product is the constant monomial.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Monomial(BTreeMap<String, u32>);

impl Monomial {
    /// The constant monomial `1`.
    pub fn constant() -> Self {
        Self(BTreeMap::new())
    }

    /// A single variable with power one.
    pub fn variable(name: impl Into<String>) -> Self {
        Self(BTreeMap::from([(name.into(), 1)]))
    }

    /// Product of two variables (or the square of one).
    pub fn product(first: &str, second: &str) -> Self {
        Self::variable(first).multiply(&Self::variable(second))
    }

    /// Sum of all exponents.
    pub fn degree(&self) -> u32 {
        self.0.values().sum()
    }

    /// Power of a variable in this monomial, zero if it doesn't appear.
    pub fn exponent(&self, variable: &str) -> u32 {
        self.0.get(variable).copied().unwrap_or(0)
    }

    /// Variables with a positive exponent, sorted by name.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn multiply(&self, other: &Self) -> Self {
        let mut powers = self.0.clone();
        for (variable, exponent) in &other.0 {
            *powers.entry(variable.clone()).or_insert(0) += exponent;
        }

        Self(powers)
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = self.0.iter()
            .map(|(variable, &exponent)| if exponent == 1 {
                variable.clone()
            } else {
                format!("{}^{}", variable, exponent)
            })
            .join("*");
        f.write_str(&text)
    }
}

/// A sum of monomials with non-zero rational coefficients.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Polynomial {
    /// Zero coefficients are never stored.
    terms: BTreeMap<Monomial, Rational>,
}

impl Polynomial {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A constant polynomial.
    pub fn constant(value: Rational) -> Self {
        Self::term(Monomial::constant(), value)
    }

    /// A single variable with coefficient one.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::term(Monomial::variable(name), Rational::one())
    }

    /// A single term.
    pub fn term(monomial: Monomial, coefficient: Rational) -> Self {
        let mut terms = BTreeMap::new();
        if !coefficient.is_zero() {
            terms.insert(monomial, coefficient);
        }

        Self { terms }
    }

    /// Whether there are no terms.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The value of this polynomial if it has no variables.
    pub fn as_constant(&self) -> Option<Rational> {
        match self.degree() {
            0 => Some(self.constant_term()),
            _ => None,
        }
    }

    /// Highest degree among the terms, zero for the zero polynomial.
    pub fn degree(&self) -> u32 {
        self.terms.keys().map(Monomial::degree).max().unwrap_or(0)
    }

    /// Coefficient of a monomial, zero if absent.
    pub fn coefficient(&self, monomial: &Monomial) -> Rational {
        self.terms.get(monomial).copied().unwrap_or_else(Rational::zero)
    }

    /// Coefficient of the constant monomial.
    pub fn constant_term(&self) -> Rational {
        self.coefficient(&Monomial::constant())
    }

    /// All terms, with their coefficients.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, Rational)> {
        self.terms.iter().map(|(monomial, &coefficient)| (monomial, coefficient))
    }

    /// Names of the variables appearing in this polynomial, sorted and deduplicated.
    pub fn variables(&self) -> Vec<&str> {
        self.terms.keys()
            .flat_map(Monomial::variables)
            .sorted()
            .dedup()
            .collect()
    }

    /// Sum of two polynomials.
    ///
    /// # Errors
    ///
    /// On overflow of a coefficient.
    pub fn checked_add(&self, other: &Self) -> Result<Self, ArithmeticError> {
        let mut terms = self.terms.clone();
        for (monomial, &coefficient) in &other.terms {
            let new = match terms.get(monomial) {
                Some(existing) => existing.checked_add(coefficient)?,
                None => coefficient,
            };
            if new.is_zero() {
                terms.remove(monomial);
            } else {
                terms.insert(monomial.clone(), new);
            }
        }

        Ok(Self { terms })
    }

    /// Difference of two polynomials.
    ///
    /// # Errors
    ///
    /// On overflow of a coefficient.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, ArithmeticError> {
        self.checked_add(&other.checked_scale(-Rational::one())?)
    }

    /// Product of two polynomials.
    ///
    /// # Errors
    ///
    /// On overflow of a coefficient.
    pub fn checked_mul(&self, other: &Self) -> Result<Self, ArithmeticError> {
        let mut result = Self::zero();
        for (left_monomial, &left) in &self.terms {
            for (right_monomial, &right) in &other.terms {
                let term = Self::term(left_monomial.multiply(right_monomial), left.checked_mul(right)?);
                result = result.checked_add(&term)?;
            }
        }

        Ok(result)
    }

    /// Multiply every coefficient by a constant.
    ///
    /// # Errors
    ///
    /// On overflow of a coefficient.
    pub fn checked_scale(&self, factor: Rational) -> Result<Self, ArithmeticError> {
        if factor.is_zero() {
            return Ok(Self::zero());
        }

        let terms = self.terms.iter()
            .map(|(monomial, coefficient)| {
                coefficient.checked_mul(factor).map(|value| (monomial.clone(), value))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { terms })
    }

    /// Raise to a non-negative integer power.
    ///
    /// # Errors
    ///
    /// On overflow of a coefficient.
    pub fn checked_pow(&self, exponent: u32) -> Result<Self, ArithmeticError> {
        (0..exponent).try_fold(Self::constant(Rational::one()), |power, _| power.checked_mul(self))
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("0");
        }

        // Highest degree first
        let ordered = self.terms.iter()
            .sorted_by(|(left, _), (right, _)| right.degree().cmp(&left.degree()).then(left.cmp(right)));
        for (index, (monomial, coefficient)) in ordered.enumerate() {
            let magnitude = coefficient.abs();
            match (index, coefficient.is_negative()) {
                (0, true) => f.write_str("-")?,
                (0, false) => {},
                (_, true) => f.write_str(" - ")?,
                (_, false) => f.write_str(" + ")?,
            }

            if monomial.degree() == 0 {
                write!(f, "{}", magnitude)?;
            } else if magnitude.is_one() {
                write!(f, "{}", monomial)?;
            } else {
                write!(f, "{}*{}", magnitude, monomial)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::data::polynomial::{Monomial, Polynomial};
    use crate::R;

    fn x() -> Polynomial {
        Polynomial::variable("x")
    }

    fn y() -> Polynomial {
        Polynomial::variable("y")
    }

    #[test]
    fn arithmetic() {
        // (x + 1)^2 = x^2 + 2x + 1
        let square = x().checked_add(&Polynomial::constant(R!(1))).unwrap().checked_pow(2).unwrap();
        assert_eq!(square.degree(), 2);
        assert_eq!(square.coefficient(&Monomial::product("x", "x")), R!(1));
        assert_eq!(square.coefficient(&Monomial::variable("x")), R!(2));
        assert_eq!(square.constant_term(), R!(1));

        // Cancellation removes terms
        let difference = square.checked_sub(&square).unwrap();
        assert!(difference.is_zero());
        assert_eq!(difference.degree(), 0);
    }

    #[test]
    fn mixed_terms() {
        let product = x().checked_mul(&y()).unwrap().checked_scale(R!(3, 2)).unwrap();
        assert_eq!(product.coefficient(&Monomial::product("y", "x")), R!(3, 2));
        assert_eq!(product.variables(), vec!["x", "y"]);
        assert_eq!(product.as_constant(), None);
        assert_eq!(Polynomial::constant(R!(5)).as_constant(), Some(R!(5)));
    }

    #[test]
    fn display() {
        let polynomial = x().checked_pow(2).unwrap()
            .checked_sub(&y().checked_scale(R!(3)).unwrap()).unwrap()
            .checked_add(&Polynomial::constant(R!(-1, 2))).unwrap();
        assert_eq!(polynomial.to_string(), "x^2 - 3*y - 1/2");
        assert_eq!(Polynomial::zero().to_string(), "0");
        assert_eq!(x().checked_scale(R!(-1)).unwrap().to_string(), "-x");
    }
}
