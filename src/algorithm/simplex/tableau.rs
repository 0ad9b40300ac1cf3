//! # Condensed tableau
//!
//! One row per basic variable and one column per non basic variable. A row labeled `x_B` reads
//!
//! ```text
//! x_B = rhs - Σ_j a_j x_N_j
//! ```
//!
//! and the objective row reads `z = value - Σ_j d_j x_N_j`, where `z` is maximized. Non basic
//! variables are zero, so basic variable `x_B` has value `rhs` and the objective has value
//! `value`. The basis is optimal when no `d_j` is negative.
//!
//! A pivot exchanges a row label with a column label (a Jordan exchange).
use std::fmt;

use cumsum::cumsum_array_owned;
use enum_map::{Enum, enum_map, EnumMap};
use index_utils::remove_indices;
use num_traits::{One, Zero};

use crate::data::linear_program::elements::ConstraintType;
use crate::data::linear_program::general_form::LinearProgram;
use crate::data::number_types::rational::{ArithmeticError, Rational};

/// Groups of variables in the standard form.
///
/// The standard form lists the variables of each group consecutively, in this order.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColumnType {
    /// Variables of the original problem.
    Decision,
    /// Added to `<=` constraints.
    Slack,
    /// Subtracted from `>=` constraints.
    Surplus,
    /// Added to `>=` and `=` constraints to obtain an initial basis.
    Artificial,
}

/// Identifies a variable of the standard form.
///
/// The index counts within the group, such that `Slack(0)` belongs to the first `<=` constraint.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Label {
    Decision(usize),
    Slack(usize),
    Surplus(usize),
    Artificial(usize),
}

impl Label {
    fn new(column_type: ColumnType, index: usize) -> Self {
        match column_type {
            ColumnType::Decision => Label::Decision(index),
            ColumnType::Slack => Label::Slack(index),
            ColumnType::Surplus => Label::Surplus(index),
            ColumnType::Artificial => Label::Artificial(index),
        }
    }

    /// Group this variable belongs to.
    pub fn column_type(self) -> ColumnType {
        match self {
            Label::Decision(_) => ColumnType::Decision,
            Label::Slack(_) => ColumnType::Slack,
            Label::Surplus(_) => ColumnType::Surplus,
            Label::Artificial(_) => ColumnType::Artificial,
        }
    }

    /// Index within the group.
    pub fn index(self) -> usize {
        match self {
            Label::Decision(index)
            | Label::Slack(index)
            | Label::Surplus(index)
            | Label::Artificial(index) => index,
        }
    }

    /// Whether this variable was only introduced to find an initial basis.
    pub fn is_artificial(self) -> bool {
        matches!(self, Label::Artificial(_))
    }
}

/// Working state of the simplex method.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tableau {
    /// Names of the decision variables.
    names: Vec<String>,
    /// Indices that separate the different groups in the standard form.
    column_group_end: EnumMap<ColumnType, usize>,

    /// Basic variables.
    row_labels: Vec<Label>,
    /// Non basic variables.
    column_labels: Vec<Label>,
    /// Row major, `row_labels.len()` rows of length `column_labels.len()`.
    matrix: Vec<Vec<Rational>>,
    rhs: Vec<Rational>,
    objective_row: Vec<Rational>,
    objective_value: Rational,
}

impl Tableau {
    /// Bring a linear program in standard form.
    ///
    /// Constraints with a negative right hand side are multiplied by minus one. Then, a `<=`
    /// constraint gets a slack, a `>=` constraint a surplus and an artificial and an `=`
    /// constraint an artificial. The slacks and artificials form the initial basis, which is
    /// feasible. The objective row is zero; see `reprice`.
    ///
    /// # Errors
    ///
    /// When negating a coefficient overflows.
    pub fn new(program: &LinearProgram) -> Result<Self, ArithmeticError> {
        let mut counts: EnumMap<ColumnType, usize> = enum_map! { _ => 0 };
        counts[ColumnType::Decision] = program.nr_variables();
        let mut next_label = |column_type| {
            let label = Label::new(column_type, counts[column_type]);
            counts[column_type] += 1;
            label
        };

        let mut row_labels = Vec::with_capacity(program.nr_constraints());
        let mut matrix = Vec::with_capacity(program.nr_constraints());
        let mut rhs = Vec::with_capacity(program.nr_constraints());
        let mut surplus_rows = Vec::new();
        for (row, constraint) in program.constraints().iter().enumerate() {
            let (coefficients, constraint_type, right_hand_side) = if constraint.right_hand_side.is_negative() {
                (
                    constraint.coefficients.iter().map(|value| value.checked_neg()).collect::<Result<Vec<_>, _>>()?,
                    !constraint.constraint_type,
                    constraint.right_hand_side.checked_neg()?,
                )
            } else {
                (constraint.coefficients.clone(), constraint.constraint_type, constraint.right_hand_side)
            };

            let basic = match constraint_type {
                ConstraintType::Less => next_label(ColumnType::Slack),
                ConstraintType::Greater => {
                    surplus_rows.push((row, next_label(ColumnType::Surplus)));
                    next_label(ColumnType::Artificial)
                },
                ConstraintType::Equal => next_label(ColumnType::Artificial),
            };
            row_labels.push(basic);
            matrix.push(coefficients);
            rhs.push(right_hand_side);
        }

        // Surplus columns: artificial = rhs - Σ a x + surplus
        for (row, values) in matrix.iter_mut().enumerate() {
            values.extend(surplus_rows.iter().map(|&(surplus_row, _)| {
                if surplus_row == row { -Rational::one() } else { Rational::zero() }
            }));
        }
        let column_labels = (0..program.nr_variables())
            .map(Label::Decision)
            .chain(surplus_rows.iter().map(|&(_, label)| label))
            .collect::<Vec<_>>();

        let cumulative = cumsum_array_owned([
            counts[ColumnType::Decision],
            counts[ColumnType::Slack],
            counts[ColumnType::Surplus],
            counts[ColumnType::Artificial],
        ]);
        let column_group_end = enum_map! {
            ColumnType::Decision   => cumulative[0],
            ColumnType::Slack      => cumulative[1],
            ColumnType::Surplus    => cumulative[2],
            ColumnType::Artificial => cumulative[3],
        };

        let nr_columns = column_labels.len();
        Ok(Self {
            names: program.variables().to_vec(),
            column_group_end,
            row_labels,
            column_labels,
            matrix,
            rhs,
            objective_row: vec![Rational::zero(); nr_columns],
            objective_value: Rational::zero(),
        })
    }

    /// Recompute the objective row for the current basis.
    ///
    /// With cost `c` for every variable, `d_j = Σ_i c_B_i a_ij - c_N_j` and `value = Σ_i c_B_i b_i`.
    ///
    /// # Errors
    ///
    /// When a value doesn't fit.
    pub fn reprice(&mut self, cost: impl Fn(Label) -> Rational) -> Result<(), ArithmeticError> {
        let basic_cost = self.row_labels.iter().map(|&label| cost(label)).collect::<Vec<_>>();

        for (column, label) in self.column_labels.iter().enumerate() {
            let mut total = cost(*label).checked_neg()?;
            for (row, c) in basic_cost.iter().enumerate().filter(|(_, c)| !c.is_zero()) {
                total = total.checked_add(c.checked_mul(self.matrix[row][column])?)?;
            }
            self.objective_row[column] = total;
        }

        let mut value = Rational::zero();
        for (c, b) in basic_cost.iter().zip(&self.rhs) {
            value = value.checked_add(c.checked_mul(*b)?)?;
        }
        self.objective_value = value;

        Ok(())
    }

    /// Exchange the basic variable of `pivot_row` with the non basic variable of `pivot_column`.
    ///
    /// Applies the rectangle rule to all cells, the right hand side and the objective row.
    ///
    /// # Errors
    ///
    /// When the pivot is zero or when a value doesn't fit.
    pub fn pivot(&mut self, pivot_row: usize, pivot_column: usize) -> Result<(), ArithmeticError> {
        let pivot = self.matrix[pivot_row][pivot_column];
        if pivot.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }

        // The pivot row, divided by the pivot. The entry in the pivot column becomes 1 / pivot.
        let mut new_pivot_row = self.matrix[pivot_row].iter()
            .map(|value| value.checked_div(pivot))
            .collect::<Result<Vec<_>, _>>()?;
        new_pivot_row[pivot_column] = pivot.recip()?;
        let new_pivot_rhs = self.rhs[pivot_row].checked_div(pivot)?;

        let update = |row: &mut [Rational], rhs: &mut Rational| -> Result<(), ArithmeticError> {
            let factor = row[pivot_column];
            if factor.is_zero() {
                return Ok(());
            }
            for (column, value) in row.iter_mut().enumerate() {
                *value = if column == pivot_column {
                    factor.checked_mul(new_pivot_row[column])?.checked_neg()?
                } else {
                    value.checked_sub(factor.checked_mul(new_pivot_row[column])?)?
                };
            }
            *rhs = rhs.checked_sub(factor.checked_mul(new_pivot_rhs)?)?;
            Ok(())
        };

        for (row, (values, rhs)) in self.matrix.iter_mut().zip(self.rhs.iter_mut()).enumerate() {
            if row != pivot_row {
                update(values, rhs)?;
            }
        }
        update(&mut self.objective_row, &mut self.objective_value)?;

        self.matrix[pivot_row] = new_pivot_row;
        self.rhs[pivot_row] = new_pivot_rhs;
        std::mem::swap(&mut self.row_labels[pivot_row], &mut self.column_labels[pivot_column]);

        Ok(())
    }

    /// Ratio test: the row limiting the increase of the variable of `column` first.
    ///
    /// Only rows with a positive entry in the column limit the increase. Ties are broken by the
    /// lowest row index.
    ///
    /// # Return value
    ///
    /// `None` if the variable can increase without bound.
    ///
    /// # Errors
    ///
    /// When a ratio doesn't fit.
    pub fn select_primal_pivot_row(&self, column: usize) -> Result<Option<usize>, ArithmeticError> {
        let mut best: Option<(usize, Rational)> = None;
        for (row, values) in self.matrix.iter().enumerate() {
            let value = values[column];
            if !value.is_positive() {
                continue;
            }

            let ratio = self.rhs[row].checked_div(value)?;
            if best.is_none_or(|(_, smallest)| ratio < smallest) {
                best = Some((row, ratio));
            }
        }

        Ok(best.map(|(row, _)| row))
    }

    /// Remove a non basic variable from the problem.
    pub fn remove_column(&mut self, column: usize) {
        self.column_labels.remove(column);
        self.objective_row.remove(column);
        for row in &mut self.matrix {
            row.remove(column);
        }
    }

    /// Remove constraints, given by sorted row indices.
    pub fn remove_rows(&mut self, rows: &[usize]) {
        debug_assert!(rows.is_sorted());

        remove_indices(&mut self.row_labels, rows);
        remove_indices(&mut self.matrix, rows);
        remove_indices(&mut self.rhs, rows);
    }

    /// Whether no objective row entry is negative.
    pub fn is_optimal(&self) -> bool {
        self.objective_row.iter().all(|value| !value.is_negative())
    }

    /// Whether all basic variables are non negative.
    pub fn is_feasible(&self) -> bool {
        self.rhs.iter().all(|value| !value.is_negative())
    }

    /// Value of a variable in the current basic solution.
    pub fn value_of(&self, label: Label) -> Rational {
        self.row_labels.iter()
            .position(|&basic| basic == label)
            .map_or_else(Rational::zero, |row| self.rhs[row])
    }

    /// Objective row entry of a non basic variable, zero for basic variables.
    ///
    /// At an optimum, the entry under the slack of a constraint is the dual value of that
    /// constraint.
    pub fn dual_value(&self, label: Label) -> Rational {
        self.column_labels.iter()
            .position(|&non_basic| non_basic == label)
            .map_or_else(Rational::zero, |column| self.objective_row[column])
    }

    /// Value of `z`.
    pub fn objective_value(&self) -> Rational {
        self.objective_value
    }

    /// Position of a variable in the standard form, which lists the groups consecutively.
    pub fn standard_form_index(&self, label: Label) -> usize {
        let group_start = match label.column_type() {
            ColumnType::Decision => 0,
            ColumnType::Slack => self.column_group_end[ColumnType::Decision],
            ColumnType::Surplus => self.column_group_end[ColumnType::Slack],
            ColumnType::Artificial => self.column_group_end[ColumnType::Surplus],
        };
        debug_assert!(group_start + label.index() < self.column_group_end[label.column_type()]);

        group_start + label.index()
    }

    /// Display name of a variable.
    pub fn name(&self, label: Label) -> String {
        match label {
            Label::Decision(index) => self.names[index].clone(),
            Label::Slack(index) => format!("s{}", index + 1),
            Label::Surplus(index) => format!("e{}", index + 1),
            Label::Artificial(index) => format!("a{}", index + 1),
        }
    }

    /// Number of basic variables.
    pub fn nr_rows(&self) -> usize {
        self.row_labels.len()
    }

    /// Number of non basic variables.
    pub fn nr_columns(&self) -> usize {
        self.column_labels.len()
    }

    /// Basic variables, by row.
    pub fn row_labels(&self) -> &[Label] {
        &self.row_labels
    }

    /// Non basic variables, by column.
    pub fn column_labels(&self) -> &[Label] {
        &self.column_labels
    }

    /// Objective row entry of a column.
    pub fn relative_cost(&self, column: usize) -> Rational {
        self.objective_row[column]
    }

    /// A single cell.
    pub fn entry(&self, row: usize, column: usize) -> Rational {
        self.matrix[row][column]
    }

    /// Right hand side of a row, the value of its basic variable.
    pub fn rhs(&self, row: usize) -> Rational {
        self.rhs[row]
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = 10;
        let separator = "-".repeat((self.nr_columns() + 2) * width);

        write!(f, "{:>width$}{:>width$}", "basis", "rhs")?;
        for &label in &self.column_labels {
            write!(f, "{:>width$}", self.name(label))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", separator)?;

        for (row, &label) in self.row_labels.iter().enumerate() {
            write!(f, "{:>width$}{:>width$}", self.name(label), self.rhs[row].to_string())?;
            for value in &self.matrix[row] {
                write!(f, "{:>width$}", value.to_string())?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{}", separator)?;
        write!(f, "{:>width$}{:>width$}", "z", self.objective_value.to_string())?;
        for value in &self.objective_row {
            write!(f, "{:>width$}", value.to_string())?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod test {
    use num_traits::Zero;

    use crate::algorithm::simplex::tableau::{ColumnType, Label, Tableau};
    use crate::data::linear_program::general_form::LinearProgram;
    use crate::R;

    fn textbook() -> Tableau {
        let program = LinearProgram::parse("max x1 + 2x2", &["2x1 + 3x2 <= 12", "x1 + 5x2 <= 15"]).unwrap();
        let mut tableau = Tableau::new(&program).unwrap();
        tableau.reprice(|label| match label {
            Label::Decision(index) => program.cost()[index],
            _ => R!(0),
        }).unwrap();
        tableau
    }

    #[test]
    fn standard_form() {
        let tableau = textbook();
        assert_eq!(tableau.row_labels(), [Label::Slack(0), Label::Slack(1)]);
        assert_eq!(tableau.column_labels(), [Label::Decision(0), Label::Decision(1)]);
        assert_eq!(tableau.relative_cost(0), R!(-1));
        assert_eq!(tableau.relative_cost(1), R!(-2));
        assert_eq!(tableau.objective_value(), R!(0));
        assert!(tableau.is_feasible());
        assert!(!tableau.is_optimal());
    }

    #[test]
    fn groups() {
        let program = LinearProgram::parse(
            "min x + y",
            &["x + y >= 2", "x - y = -1", "x <= 3"],
        ).unwrap();
        let tableau = Tableau::new(&program).unwrap();

        assert_eq!(tableau.row_labels(), [Label::Artificial(0), Label::Artificial(1), Label::Slack(0)]);
        assert_eq!(tableau.column_labels(), [Label::Decision(0), Label::Decision(1), Label::Surplus(0)]);
        // Negated because of the negative right hand side
        assert_eq!(tableau.entry(1, 0), R!(-1));
        assert_eq!(tableau.rhs(1), R!(1));
        assert_eq!(tableau.entry(0, 2), R!(-1));
        assert!(tableau.entry(1, 2).is_zero());

        assert_eq!(tableau.standard_form_index(Label::Decision(1)), 1);
        assert_eq!(tableau.standard_form_index(Label::Slack(0)), 2);
        assert_eq!(tableau.standard_form_index(Label::Surplus(0)), 3);
        assert_eq!(tableau.standard_form_index(Label::Artificial(1)), 5);
        assert_eq!(Label::Artificial(1).column_type(), ColumnType::Artificial);
        assert_eq!(tableau.name(Label::Surplus(0)), "e1");
    }

    #[test]
    fn rectangle_rule() {
        let mut tableau = textbook();
        // x2 enters, ratio test picks the second row: 15 / 5 < 12 / 3
        assert_eq!(tableau.select_primal_pivot_row(1).unwrap(), Some(1));
        tableau.pivot(1, 1).unwrap();

        assert_eq!(tableau.row_labels(), [Label::Slack(0), Label::Decision(1)]);
        assert_eq!(tableau.column_labels(), [Label::Decision(0), Label::Slack(1)]);
        assert_eq!(tableau.rhs(0), R!(3));
        assert_eq!(tableau.rhs(1), R!(3));
        assert_eq!(tableau.entry(0, 0), R!(7, 5));
        assert_eq!(tableau.entry(0, 1), R!(-3, 5));
        assert_eq!(tableau.entry(1, 0), R!(1, 5));
        assert_eq!(tableau.entry(1, 1), R!(1, 5));
        assert_eq!(tableau.relative_cost(0), R!(-3, 5));
        assert_eq!(tableau.relative_cost(1), R!(2, 5));
        assert_eq!(tableau.objective_value(), R!(6));
        assert_eq!(tableau.value_of(Label::Decision(1)), R!(3));
        assert_eq!(tableau.value_of(Label::Decision(0)), R!(0));
    }

    #[test]
    fn pivot_then_reprice_agree() {
        let mut tableau = textbook();
        tableau.pivot(1, 1).unwrap();
        let pivoted = tableau.clone();
        tableau.reprice(|label| match label {
            Label::Decision(0) => R!(1),
            Label::Decision(1) => R!(2),
            _ => R!(0),
        }).unwrap();
        assert_eq!(tableau, pivoted);
    }

    #[test]
    fn remove() {
        let mut tableau = textbook();
        tableau.remove_rows(&[0]);
        assert_eq!(tableau.nr_rows(), 1);
        assert_eq!(tableau.rhs(0), R!(15));
        tableau.remove_column(0);
        assert_eq!(tableau.column_labels(), [Label::Decision(1)]);
        assert_eq!(tableau.entry(0, 0), R!(5));
    }

    #[test]
    fn display() {
        let text = textbook().to_string();
        assert!(text.contains("basis"));
        assert!(text.lines().any(|line| line.trim_start().starts_with("s1")));
    }
}
