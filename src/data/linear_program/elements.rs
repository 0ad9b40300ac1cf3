//! # Building blocks to describe linear programs.
use std::fmt;
use std::ops::Not;

/// A `Constraint` is a type of (in)equality.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ConstraintType {
    Equal,
    Greater,
    Less,
}

/// Multiplying both sides of a constraint by minus one.
impl Not for ConstraintType {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            ConstraintType::Equal => ConstraintType::Equal,
            ConstraintType::Greater => ConstraintType::Less,
            ConstraintType::Less => ConstraintType::Greater,
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ConstraintType::Equal => "=",
            ConstraintType::Greater => ">=",
            ConstraintType::Less => "<=",
        })
    }
}

/// Direction of optimization.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Objective {
    #[default]
    Maximize,
    Minimize,
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Objective::Maximize => "maximize",
            Objective::Minimize => "minimize",
        })
    }
}
