//! # Rational numbers
//!
//! Exact fractions over machine integers. All solvers in this crate compute with this type, such
//! that long sequences of pivots don't accumulate rounding errors.
//!
//! Values are always kept in canonical form: numerator and denominator share no common factor and
//! the denominator is positive. Intermediate results are computed with 128 bits and narrowed back
//! after reduction, so overflow is only reported when the reduced result doesn't fit.
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use num_integer::{Integer, Roots};
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};

use crate::io::error::Parse as ParseError;
use crate::io::number;

/// Failure of an exact arithmetic operation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ArithmeticError {
    /// The divisor was zero.
    DivisionByZero,
    /// The reduced result doesn't fit in 64 bit numerator and denominator.
    Overflow,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArithmeticError::DivisionByZero => f.write_str("division by zero"),
            ArithmeticError::Overflow => f.write_str("rational overflow"),
        }
    }
}

impl Error for ArithmeticError {
}

/// An exact fraction `numerator / denominator`.
///
/// Immutable value type; every operation creates a new, reduced instance.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rational {
    numerator: i64,
    /// Always positive.
    denominator: i64,
}

impl Rational {
    /// Create a new rational number, reducing it to canonical form.
    ///
    /// # Errors
    ///
    /// If the denominator is zero.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, ArithmeticError> {
        Self::reduce(i128::from(numerator), i128::from(denominator))
    }

    /// A rational number with denominator one.
    pub const fn from_integer(value: i64) -> Self {
        Self { numerator: value, denominator: 1 }
    }

    /// Divide out the greatest common divisor and move the sign onto the numerator.
    fn reduce(numerator: i128, denominator: i128) -> Result<Self, ArithmeticError> {
        if denominator == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }

        let gcd = numerator.gcd(&denominator);
        let (mut numerator, mut denominator) = (numerator / gcd, denominator / gcd);
        if denominator < 0 {
            numerator = -numerator;
            denominator = -denominator;
        }

        Ok(Self {
            numerator: i64::try_from(numerator).map_err(|_| ArithmeticError::Overflow)?,
            denominator: i64::try_from(denominator).map_err(|_| ArithmeticError::Overflow)?,
        })
    }

    /// The numerator, carrying the sign.
    pub fn numerator(self) -> i64 {
        self.numerator
    }

    /// The denominator, always positive.
    pub fn denominator(self) -> i64 {
        self.denominator
    }

    /// Exact addition.
    ///
    /// # Errors
    ///
    /// When the reduced result doesn't fit.
    pub fn checked_add(self, rhs: Self) -> Result<Self, ArithmeticError> {
        Self::reduce(
            i128::from(self.numerator) * i128::from(rhs.denominator)
                + i128::from(rhs.numerator) * i128::from(self.denominator),
            i128::from(self.denominator) * i128::from(rhs.denominator),
        )
    }

    /// Exact subtraction.
    ///
    /// # Errors
    ///
    /// When the reduced result doesn't fit.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, ArithmeticError> {
        Self::reduce(
            i128::from(self.numerator) * i128::from(rhs.denominator)
                - i128::from(rhs.numerator) * i128::from(self.denominator),
            i128::from(self.denominator) * i128::from(rhs.denominator),
        )
    }

    /// Exact multiplication.
    ///
    /// # Errors
    ///
    /// When the reduced result doesn't fit.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, ArithmeticError> {
        Self::reduce(
            i128::from(self.numerator) * i128::from(rhs.numerator),
            i128::from(self.denominator) * i128::from(rhs.denominator),
        )
    }

    /// Exact division.
    ///
    /// # Errors
    ///
    /// When `rhs` is zero, or when the reduced result doesn't fit.
    pub fn checked_div(self, rhs: Self) -> Result<Self, ArithmeticError> {
        if rhs.numerator == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }

        Self::reduce(
            i128::from(self.numerator) * i128::from(rhs.denominator),
            i128::from(self.denominator) * i128::from(rhs.numerator),
        )
    }

    /// Exact additive inverse.
    ///
    /// # Errors
    ///
    /// Only for a numerator of `i64::MIN`.
    pub fn checked_neg(self) -> Result<Self, ArithmeticError> {
        Self::reduce(-i128::from(self.numerator), i128::from(self.denominator))
    }

    /// Multiplicative inverse.
    ///
    /// # Errors
    ///
    /// When this value is zero.
    pub fn recip(self) -> Result<Self, ArithmeticError> {
        Self::one().checked_div(self)
    }

    /// Whether this value is strictly smaller than zero.
    pub fn is_negative(self) -> bool {
        self.numerator < 0
    }

    /// Whether this value is strictly larger than zero.
    pub fn is_positive(self) -> bool {
        self.numerator > 0
    }

    /// Whether the denominator is one.
    pub fn is_integer(self) -> bool {
        self.denominator == 1
    }

    /// Absolute value.
    ///
    /// # Panics
    ///
    /// On overflow, only possible for a numerator of `i64::MIN`.
    #[must_use]
    pub fn abs(self) -> Self {
        if self.is_negative() { -self } else { self }
    }

    /// Minus one, zero or one.
    pub fn signum(self) -> i64 {
        self.numerator.signum()
    }

    /// Nearest floating point value.
    ///
    /// Only meant for display purposes and for computations that leave the exact domain, like
    /// taking square roots.
    pub fn approximate(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Exact square root, if it exists.
    ///
    /// # Return value
    ///
    /// `Some` if both numerator and denominator are perfect squares, `None` otherwise (including
    /// negative values).
    pub fn sqrt_exact(self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }

        let numerator = self.numerator.sqrt();
        let denominator = self.denominator.sqrt();
        if numerator * numerator == self.numerator && denominator * denominator == self.denominator {
            // Both roots are coprime when their squares are
            Some(Self { numerator, denominator })
        } else {
            None
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self::from_integer(0)
    }

    fn is_zero(&self) -> bool {
        self.numerator == 0
    }
}

impl One for Rational {
    fn one() -> Self {
        Self::from_integer(1)
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross multiplication preserves the order
        (i128::from(self.numerator) * i128::from(other.denominator))
            .cmp(&(i128::from(other.numerator) * i128::from(self.denominator)))
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self.checked_neg() {
            Ok(value) => value,
            Err(error) => panic!("{} while negating {}", error, self),
        }
    }
}

macro_rules! impl_operator {
    ($trait_name:ident, $method:ident, $checked:ident, $assign_trait:ident, $assign_method:ident, $symbol:literal) => {
        /// # Panics
        ///
        /// On overflow, and for division, when dividing by zero. Use the checked variant to
        /// handle these cases.
        impl $trait_name for Rational {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                match self.$checked(rhs) {
                    Ok(value) => value,
                    Err(error) => panic!("{} in {} {} {}", error, self, $symbol, rhs),
                }
            }
        }

        impl $trait_name<i64> for Rational {
            type Output = Self;

            fn $method(self, rhs: i64) -> Self::Output {
                $trait_name::$method(self, Rational::from_integer(rhs))
            }
        }

        impl $assign_trait for Rational {
            fn $assign_method(&mut self, rhs: Self) {
                *self = $trait_name::$method(*self, rhs);
            }
        }

        impl $assign_trait<i64> for Rational {
            fn $assign_method(&mut self, rhs: i64) {
                *self = $trait_name::$method(*self, rhs);
            }
        }
    };
}

impl_operator!(Add, add, checked_add, AddAssign, add_assign, "+");
impl_operator!(Sub, sub, checked_sub, SubAssign, sub_assign, "-");
impl_operator!(Mul, mul, checked_mul, MulAssign, mul_assign, "*");
impl_operator!(Div, div, checked_div, DivAssign, div_assign, "/");

impl Sum for Rational {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |total, value| total + value)
    }
}

impl<'a> Sum<&'a Rational> for Rational {
    fn sum<I: Iterator<Item = &'a Rational>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Product for Rational {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |total, value| total * value)
    }
}

impl FromPrimitive for Rational {
    fn from_i64(n: i64) -> Option<Self> {
        Some(Self::from_integer(n))
    }

    fn from_u64(n: u64) -> Option<Self> {
        i64::try_from(n).ok().map(Self::from_integer)
    }

    /// Convert through the shortest decimal representation, such that `0.1` becomes `1/10`
    /// rather than the exact binary value of the float.
    fn from_f64(n: f64) -> Option<Self> {
        if !n.is_finite() {
            return None;
        }

        number::parse_rational(&n.to_string()).ok()
    }
}

impl ToPrimitive for Rational {
    /// Truncating towards zero.
    fn to_i64(&self) -> Option<i64> {
        Some(self.numerator / self.denominator)
    }

    fn to_u64(&self) -> Option<u64> {
        self.to_i64().and_then(|value| u64::try_from(value).ok())
    }

    fn to_f64(&self) -> Option<f64> {
        Some(self.approximate())
    }
}

impl FromStr for Rational {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        number::parse_rational(text)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Shorthand for creating a rational number in tests.
#[macro_export]
macro_rules! R {
    ($value:expr) => {
        $crate::data::number_types::rational::Rational::from_integer($value)
    };
    ($numerator:expr, $denominator:expr) => {
        $crate::data::number_types::rational::Rational::new($numerator, $denominator)
            .expect("Shorthand should only be used with a non-zero denominator.")
    };
}

#[cfg(test)]
mod test {
    use num_integer::Integer;
    use num_traits::{FromPrimitive, One, ToPrimitive, Zero};
    use proptest::prelude::*;

    use crate::data::number_types::rational::{ArithmeticError, Rational};

    #[test]
    fn field_identities() {
        for i in -10..0 {
            assert_eq!(R!(0, i), Rational::zero());
            assert_eq!(R!(i, i), Rational::one());
        }
        for i in 1..10 {
            assert_eq!(R!(0, i), Rational::zero());
            assert_eq!(R!(i, i), Rational::one());
        }
    }

    #[test]
    fn canonical() {
        let value = R!(6, -4);
        assert_eq!(value.numerator(), -3);
        assert_eq!(value.denominator(), 2);
        assert_eq!(R!(0, -7).denominator(), 1);
    }

    #[test]
    fn zero_denominator() {
        assert_eq!(Rational::new(3, 0), Err(ArithmeticError::DivisionByZero));
        assert_eq!(Rational::new(0, 0), Err(ArithmeticError::DivisionByZero));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(R!(3, 2) + R!(6, 4), R!(3));
        assert_eq!(R!(1, 2) - R!(1, 3), R!(1, 6));
        assert_eq!(R!(2, 3) * R!(9, 4), R!(3, 2));
        assert_eq!(R!(2, 3) / R!(4, 9), R!(3, 2));
        assert_eq!(-R!(2, 3), R!(-2, 3));
        assert_eq!(R!(1, 2) + 1, R!(3, 2));
        assert_eq!(R!(1, 2) * 4, R!(2));

        let mut x = R!(0);
        for _ in 0..1000 {
            x += R!(1, 1000);
        }
        assert_eq!(x, R!(1));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(R!(4564, 65468).checked_div(R!(0, 654654)), Err(ArithmeticError::DivisionByZero));
        assert_eq!(Rational::zero().recip(), Err(ArithmeticError::DivisionByZero));
    }

    #[test]
    #[should_panic]
    fn division_operator_by_zero() {
        let _result = R!(1) / R!(0);
    }

    #[test]
    fn overflow() {
        let large = R!(i64::MAX);
        assert_eq!(large.checked_add(R!(1)), Err(ArithmeticError::Overflow));
        assert_eq!(large.checked_mul(R!(2)), Err(ArithmeticError::Overflow));
        // Reduction happens before narrowing
        assert_eq!(large.checked_mul(R!(1, 7)).and_then(|v| v.checked_mul(R!(7))), Ok(large));
        assert_eq!(R!(i64::MIN).checked_neg(), Err(ArithmeticError::Overflow));
    }

    #[test]
    fn ordering() {
        assert!(R!(1, 3) < R!(1, 2));
        assert!(R!(-1, 2) < R!(-1, 3));
        assert!(R!(-1) < R!(0));
        assert_eq!([R!(3), R!(-2, 3), R!(1, 2)].iter().copied().min(), Some(R!(-2, 3)));
        assert_eq!([R!(3), R!(-2, 3), R!(1, 2)].iter().copied().max(), Some(R!(3)));
    }

    #[test]
    fn sums() {
        assert_eq!([R!(1, 2), R!(1, 3), R!(1, 6)].iter().sum::<Rational>(), R!(1));
        assert_eq!([R!(2, 3), R!(3, 4)].into_iter().product::<Rational>(), R!(1, 2));
    }

    #[test]
    fn conversion() {
        assert_eq!(Rational::from_f64(0.25), Some(R!(1, 4)));
        assert_eq!(Rational::from_f64(0.1), Some(R!(1, 10)));
        assert_eq!(Rational::from_f64(-3.0), Some(R!(-3)));
        assert_eq!(Rational::from_f64(f64::NAN), None);
        assert_eq!(R!(7, 2).to_i64(), Some(3));
        assert_eq!(R!(-7, 2).to_i64(), Some(-3));
        assert_eq!(R!(1, 4).to_f64(), Some(0.25));
    }

    #[test]
    fn parse() {
        assert_eq!("0.25".parse::<Rational>().unwrap(), R!(1, 4));
        assert_eq!("-1.5".parse::<Rational>().unwrap(), R!(-3, 2));
        assert_eq!("6/8".parse::<Rational>().unwrap(), R!(3, 4));
        assert!("1/0".parse::<Rational>().is_err());
        assert!("abc".parse::<Rational>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(R!(3, 4).to_string(), "3/4");
        assert_eq!(R!(-3, 4).to_string(), "-3/4");
        assert_eq!(R!(8, 4).to_string(), "2");
    }

    #[test]
    fn square_root() {
        assert_eq!(R!(9, 4).sqrt_exact(), Some(R!(3, 2)));
        assert_eq!(R!(0).sqrt_exact(), Some(R!(0)));
        assert_eq!(R!(2).sqrt_exact(), None);
        assert_eq!(R!(-4).sqrt_exact(), None);
    }

    fn small_rational() -> impl Strategy<Value = Rational> {
        (-1_000_i64..1_000, 1_i64..1_000).prop_map(|(n, d)| R!(n, d))
    }

    proptest! {
        #[test]
        fn division_round_trip(a in small_rational(), b in small_rational()) {
            prop_assume!(!b.is_zero());
            prop_assert_eq!(a.checked_div(b).and_then(|q| q.checked_mul(b)), Ok(a));
        }

        #[test]
        fn canonical_form(a in small_rational(), b in small_rational()) {
            for value in [a + b, a - b, a * b] {
                prop_assert!(value.denominator() > 0);
                prop_assert_eq!(value.numerator().unsigned_abs().gcd(&value.denominator().unsigned_abs()), 1);
            }
        }

        #[test]
        fn order_agrees_with_approximation(a in small_rational(), b in small_rational()) {
            if a < b {
                prop_assert!(a.approximate() < b.approximate());
            }
        }
    }
}
