//! # Dual potentials
//!
//! For a basis tree, the potentials `u` of the sources and `v` of the destinations satisfy
//! `u[i] + v[j] = cost[i][j]` on every basic cell, with `u[0] = 0`.
use std::fmt;

use fifo_set::FIFOSet;
use itertools::Itertools;
use num_traits::Zero;

use crate::algorithm::SolveError;
use crate::algorithm::transportation::Line;
use crate::data::number_types::rational::{ArithmeticError, Rational};
use crate::data::transportation::Allocation;

/// Potentials of the sources and destinations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Potentials {
    /// One for each source.
    pub u: Vec<Rational>,
    /// One for each destination.
    pub v: Vec<Rational>,
}

impl Potentials {
    /// Propagate potentials over the basic cells, starting from `u[0] = 0`.
    ///
    /// # Errors
    ///
    /// When a line can't be reached through the basic cells, i.e. the basis is not connected.
    pub fn compute(allocation: &Allocation) -> Result<Self, SolveError> {
        let mut u = vec![None; allocation.nr_rows()];
        let mut v = vec![None; allocation.nr_columns()];
        u[0] = Some(Rational::zero());

        let mut queue = [Line::Row(0)].into_iter().collect::<FIFOSet<_>>();
        while let Some(line) = queue.pop() {
            match line {
                Line::Row(row) => {
                    let potential = u[row].expect("Rows are only queued after their potential is known.");
                    for column in allocation.basic_in_row(row) {
                        if v[column].is_none() {
                            v[column] = Some(allocation.cell(row, column).cost.checked_sub(potential)?);
                            queue.push(Line::Column(column));
                        }
                    }
                },
                Line::Column(column) => {
                    let potential = v[column].expect("Columns are only queued after their potential is known.");
                    for row in allocation.basic_in_column(column) {
                        if u[row].is_none() {
                            u[row] = Some(allocation.cell(row, column).cost.checked_sub(potential)?);
                            queue.push(Line::Row(row));
                        }
                    }
                },
            }
        }

        let unreached = |line: Line| SolveError::Structural(format!("basis does not reach {}", line));
        Ok(Self {
            u: u.into_iter().enumerate()
                .map(|(row, potential)| potential.ok_or_else(|| unreached(Line::Row(row))))
                .collect::<Result<_, _>>()?,
            v: v.into_iter().enumerate()
                .map(|(column, potential)| potential.ok_or_else(|| unreached(Line::Column(column))))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Reduced cost `cost[i][j] - u[i] - v[j]` of every cell; zero for basic cells.
    ///
    /// # Errors
    ///
    /// On overflow.
    pub fn reduced_costs(&self, allocation: &Allocation) -> Result<Vec<Vec<Rational>>, ArithmeticError> {
        allocation.rows().iter().zip(&self.u)
            .map(|(cells, &u)| {
                cells.iter().zip(&self.v)
                    .map(|(cell, &v)| {
                        if cell.is_basic {
                            Ok(Rational::zero())
                        } else {
                            cell.cost.checked_sub(u)?.checked_sub(v)
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Potentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "u = ({})", self.u.iter().join(", "))?;
        write!(f, "v = ({})", self.v.iter().join(", "))
    }
}

/// Non-basic cell with the most negative reduced cost, first in row-major order on ties.
pub fn entering_cell(reduced_costs: &[Vec<Rational>]) -> Option<(usize, usize)> {
    let mut entering: Option<(usize, usize, Rational)> = None;
    for (row, costs) in reduced_costs.iter().enumerate() {
        for (column, &cost) in costs.iter().enumerate() {
            if cost.is_negative() && entering.is_none_or(|(_, _, best)| cost < best) {
                entering = Some((row, column, cost));
            }
        }
    }
    entering.map(|(row, column, _)| (row, column))
}

#[cfg(test)]
mod test {
    use crate::algorithm::SolveError;
    use crate::algorithm::transportation::potentials::{entering_cell, Potentials};
    use crate::data::transportation::{Allocation, TransportationProblem};
    use crate::R;

    fn allocation(basic: &[(usize, usize, i64)]) -> Allocation {
        let problem = TransportationProblem::new(
            vec![R!(20), R!(50), R!(30)],
            vec![R!(30), R!(20), R!(40), R!(10)],
            vec![
                vec![R!(2), R!(3), R!(11), R!(7)],
                vec![R!(1), R!(0), R!(6), R!(1)],
                vec![R!(5), R!(8), R!(15), R!(9)],
            ],
        ).unwrap();
        let mut allocation = Allocation::empty(&problem);
        for &(row, column, value) in basic {
            let cell = allocation.cell_mut(row, column);
            cell.value = R!(value);
            cell.is_basic = true;
        }
        allocation
    }

    #[test]
    fn initial_basis() {
        let allocation = allocation(&[(0, 2, 10), (0, 3, 10), (1, 0, 30), (1, 1, 20), (1, 3, 0), (2, 2, 30)]);
        let potentials = Potentials::compute(&allocation).unwrap();
        assert_eq!(potentials.u, [R!(0), R!(-6), R!(4)]);
        assert_eq!(potentials.v, [R!(7), R!(6), R!(11), R!(7)]);

        let reduced = potentials.reduced_costs(&allocation).unwrap();
        assert_eq!(reduced[2], [R!(-6), R!(-2), R!(0), R!(-2)]);
        assert_eq!(reduced[0][0], R!(-5));
        assert_eq!(entering_cell(&reduced), Some((2, 0)));
    }

    #[test]
    fn optimal() {
        let allocation = allocation(&[(0, 1, 20), (1, 2, 40), (1, 3, 10), (2, 0, 30), (2, 1, 0), (2, 3, 0)]);
        let potentials = Potentials::compute(&allocation).unwrap();
        let reduced = potentials.reduced_costs(&allocation).unwrap();
        assert!(reduced.iter().flatten().all(|cost| !cost.is_negative()));
        assert_eq!(entering_cell(&reduced), None);
    }

    #[test]
    fn disconnected() {
        let allocation = allocation(&[(0, 2, 10), (0, 3, 10), (1, 0, 30), (1, 1, 20), (2, 2, 30)]);
        assert!(matches!(Potentials::compute(&allocation), Err(SolveError::Structural(_))));
    }
}
