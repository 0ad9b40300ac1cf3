//! # Nonlinear optimization
//!
//! Two small methods for quadratic functions: critical points under a single equality
//! constraint with the method of Lagrange multipliers, and steepest descent.
use std::fmt;

use crate::data::number_types::rational::Rational;

pub mod gradient_descent;
pub mod lagrange;

/// A number that is exact when possible.
///
/// Square roots of rationals that are not perfect squares leave exact arithmetic.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value {
    /// Computed without rounding.
    Exact(Rational),
    /// Rounded.
    Approximate(f64),
}

impl Value {
    /// Floating point approximation, exact values are converted.
    pub fn approximate(self) -> f64 {
        match self {
            Value::Exact(value) => value.approximate(),
            Value::Approximate(value) => value,
        }
    }

    /// The value, if it is exact.
    pub fn exact(self) -> Option<Rational> {
        match self {
            Value::Exact(value) => Some(value),
            Value::Approximate(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Exact(value) => write!(f, "{}", value),
            Value::Approximate(value) => write!(f, "≈{:.6}", value),
        }
    }
}

/// Nature of a critical point, from the second order conditions.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Classification {
    /// Local minimum.
    Minimum,
    /// Local maximum.
    Maximum,
    /// Neither.
    Saddle,
    /// The test doesn't decide, for example because a minor is zero.
    Inconclusive,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Classification::Minimum => "local minimum",
            Classification::Maximum => "local maximum",
            Classification::Saddle => "saddle point",
            Classification::Inconclusive => "inconclusive",
        })
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::nonlinear::Value;
    use crate::R;

    #[test]
    fn display() {
        assert_eq!(Value::Exact(R!(3, 2)).to_string(), "3/2");
        assert_eq!(Value::Approximate(2_f64.sqrt()).to_string(), "≈1.414214");
        assert_eq!(Value::Exact(R!(1, 4)).approximate(), 0.25);
        assert_eq!(Value::Approximate(0.5).exact(), None);
    }
}
