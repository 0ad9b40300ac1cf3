//! # Pivot rules
//!
//! Strategies for choosing the variable that enters the basis.
use crate::algorithm::simplex::tableau::Tableau;

/// Deciding how to pivot.
///
/// During the simplex method, one needs to decide how to move from basic solution to basic
/// solution. The pivot rule describes that behavior.
///
/// Once the column has been selected, a row is found with the ratio test. That decision is made
/// independent of the strategy.
pub trait PivotRule {
    /// Create a new instance.
    fn new() -> Self;

    /// Column selection rule for the primal simplex method.
    ///
    /// # Return value
    ///
    /// A column with a negative objective row entry, or `None` if there is none (the tableau is
    /// optimal).
    fn select_primal_pivot_column(&mut self, tableau: &Tableau) -> Option<usize>;
}

/// Pivot on the column with the most negative objective row entry.
///
/// Ties are broken by the lowest column index.
pub struct MostNegative;
impl PivotRule for MostNegative {
    fn new() -> Self {
        Self
    }

    fn select_primal_pivot_column(&mut self, tableau: &Tableau) -> Option<usize> {
        (0..tableau.nr_columns())
            .map(|column| (column, tableau.relative_cost(column)))
            .filter(|(_, cost)| cost.is_negative())
            // `min_by_key` returns the first of equal elements
            .min_by_key(|&(_, cost)| cost)
            .map(|(column, _)| column)
    }
}

/// Pivot on the negative column whose variable comes first in the standard form.
///
/// This is Bland's rule for the entering variable; it can't cycle on degenerate problems.
pub struct FirstNegative;
impl PivotRule for FirstNegative {
    fn new() -> Self {
        Self
    }

    fn select_primal_pivot_column(&mut self, tableau: &Tableau) -> Option<usize> {
        (0..tableau.nr_columns())
            .filter(|&column| tableau.relative_cost(column).is_negative())
            .min_by_key(|&column| tableau.standard_form_index(tableau.column_labels()[column]))
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::simplex::pivot_rule::{FirstNegative, MostNegative, PivotRule};
    use crate::algorithm::simplex::tableau::{Label, Tableau};
    use crate::data::linear_program::general_form::LinearProgram;
    use crate::R;

    fn tableau(objective: &str) -> Tableau {
        let program = LinearProgram::parse(objective, &["x + y + w <= 1"]).unwrap();
        let mut tableau = Tableau::new(&program).unwrap();
        tableau.reprice(|label| match label {
            Label::Decision(index) => program.cost()[index],
            _ => R!(0),
        }).unwrap();
        tableau
    }

    #[test]
    fn most_negative() {
        assert_eq!(MostNegative::new().select_primal_pivot_column(&tableau("max x + 3y + 3w")), Some(1));
        assert_eq!(MostNegative::new().select_primal_pivot_column(&tableau("max -x - y")), None);
    }

    #[test]
    fn first_negative() {
        assert_eq!(FirstNegative::new().select_primal_pivot_column(&tableau("max -x + 3y + 3w")), Some(1));
        assert_eq!(FirstNegative::new().select_primal_pivot_column(&tableau("max x + 3y")), Some(0));
    }
}
