//! # Number parsing
//!
//! Reading exact numbers from strings. Decimals are read without passing through floating point:
//! the digits after the decimal point determine a power of ten that becomes the denominator, so
//! `"0.25"` is read as `25/100 = 1/4`.
use std::convert::TryFrom;

use crate::data::number_types::rational::Rational;
use crate::io::error::{Parse as ParseError, ParseResult};

/// Read a rational number from text.
///
/// Accepts integers (`"-3"`), decimals (`"0.25"`, `".5"`, `"2."`) and fractions of those
/// (`"3/4"`, `"1.5/2"`). Surrounding whitespace is ignored.
///
/// # Errors
///
/// When the text is not a number, when a fraction has a zero denominator, or when the value
/// doesn't fit.
pub fn parse_rational(text: &str) -> ParseResult<Rational> {
    let text = text.trim();

    match text.split_once('/') {
        None => Raw::try_from(text)?.try_into(),
        Some((numerator, denominator)) => {
            let numerator: Rational = Raw::try_from(numerator.trim())?.try_into()?;
            let denominator: Rational = Raw::try_from(denominator.trim())?.try_into()?;

            numerator.checked_div(denominator)
                .map_err(|error| ParseError::wrap_other(
                    error,
                    format!("Failed to compute the fraction \"{}\"", text),
                ))
        },
    }
}

/// Intermediate form of a read decimal number.
#[derive(Eq, PartialEq, Clone, Debug)]
pub(crate) struct Raw {
    sign: Sign,
    integer: i64,
    decimal_steps_from_right: u32,
}

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub(crate) enum Sign {
    Positive,
    Negative,
}

impl TryFrom<&str> for Raw {
    type Error = ParseError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        let (sign, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (Sign::Negative, rest),
            None => (Sign::Positive, text.strip_prefix('+').unwrap_or(text)),
        };

        if unsigned.is_empty() || unsigned == "." {
            return Err(ParseError::new(format!("Expected a number, found \"{}\"", text)));
        }
        if let Some(bad) = unsigned.chars().find(|&c| !c.is_ascii_digit() && c != '.') {
            return Err(ParseError::new(format!("Unexpected character '{}' in number \"{}\"", bad, text)));
        }

        let parse = |part: &str, number_part| {
            if part.is_empty() {
                Ok(0)
            } else {
                part.parse::<i64>()
                    .map_err(|error| ParseError::wrap_other(
                        error,
                        format!("Failed to parse {} \"{}\" as i64", number_part, part),
                    ))
            }
        };

        let (integer, decimal_steps_from_right) = match unsigned.find('.') {
            None => (parse(unsigned, "entire value")?, 0),
            Some(index) => {
                let mantissa = &unsigned[(index + 1)..];
                if mantissa.contains('.') {
                    return Err(ParseError::new(format!("Multiple decimal points in \"{}\"", text)));
                }
                // Trailing zeros don't change the value, but do cost precision
                let mantissa = mantissa.trim_end_matches('0');
                let from_right = u32::try_from(mantissa.len())
                    .map_err(|error| ParseError::wrap_other(error, "Too many decimals"))?;

                let integer_part = parse(&unsigned[..index], "integer part")?;
                let mantissa_part = parse(mantissa, "mantissa part")?;

                let integer = 10_i64.checked_pow(from_right)
                    .and_then(|scale| integer_part.checked_mul(scale))
                    .and_then(|scaled| scaled.checked_add(mantissa_part))
                    .ok_or_else(|| ParseError::new(format!("Number \"{}\" has too many digits", text)))?;

                (integer, from_right)
            },
        };

        Ok(Self { sign, integer, decimal_steps_from_right })
    }
}

impl TryFrom<Raw> for Rational {
    type Error = ParseError;

    fn try_from(value: Raw) -> Result<Self, Self::Error> {
        let Raw { sign, integer, decimal_steps_from_right } = value;

        let denominator = 10_i64.checked_pow(decimal_steps_from_right)
            .ok_or_else(|| ParseError::new("Too many decimals"))?;
        let numerator = match sign {
            Sign::Positive => integer,
            Sign::Negative => -integer,
        };

        Rational::new(numerator, denominator)
            .map_err(|error| ParseError::wrap_other(error, "Could not represent the number"))
    }
}
