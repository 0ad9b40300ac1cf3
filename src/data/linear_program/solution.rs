//! # Representation of optimal solutions
//!
//! Once a linear program is solved, the values of the standard form variables are translated back
//! to the variables as named in the original problem.
use std::fmt;

use crate::data::number_types::rational::Rational;

/// Optimal solution of a linear program.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Solution {
    /// Value of the objective function for this solution, including any constant that was included
    /// in the original problem.
    pub objective_value: Rational,
    /// (variable name, solution value) tuples for all variables, named and ordered as in the
    /// original problem.
    pub values: Vec<(String, Rational)>,
}

impl Solution {
    /// Create a new `Solution` instance.
    pub fn new(objective_value: Rational, values: Vec<(String, Rational)>) -> Self {
        Self { objective_value, values }
    }

    /// Value of a variable by name.
    pub fn value(&self, name: &str) -> Option<Rational> {
        self.values.iter()
            .find(|(variable, _)| variable == name)
            .map(|&(_, value)| value)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Optimal value: {}", self.objective_value)?;
        for (name, value) in &self.values {
            writeln!(f, "    {} = {}", name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::solution::Solution;
    use crate::R;

    #[test]
    fn lookup_and_display() {
        let solution = Solution::new(R!(51, 7), vec![("x1".to_string(), R!(15, 7)), ("x2".to_string(), R!(18, 7))]);
        assert_eq!(solution.value("x2"), Some(R!(18, 7)));
        assert_eq!(solution.value("x3"), None);
        assert_eq!(solution.to_string(), "Optimal value: 51/7\n    x1 = 15/7\n    x2 = 18/7\n");
    }
}
