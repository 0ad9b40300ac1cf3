//! # Linear algebra primitives
//!
//! Dense, exact elimination on small square systems. Matrices are stored row major as
//! `Vec<Vec<Rational>>`.
use num_traits::{One, Zero};

use crate::data::number_types::rational::{ArithmeticError, Rational};

/// Outcome of solving a square linear system `Ax = b`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SystemSolution {
    /// `A` is invertible.
    Unique(Vec<Rational>),
    /// `A` is singular but the system is consistent: there are infinitely many solutions.
    Underdetermined,
    /// `A` is singular and there is no solution.
    Inconsistent,
}

/// Solve a square system with Gauss-Jordan elimination.
///
/// # Arguments
///
/// * `matrix`: Row major, `n` rows of length `n`.
/// * `rhs`: Right hand side of length `n`.
///
/// # Errors
///
/// When an intermediate value doesn't fit.
pub fn solve(
    mut matrix: Vec<Vec<Rational>>,
    mut rhs: Vec<Rational>,
) -> Result<SystemSolution, ArithmeticError> {
    let n = matrix.len();
    debug_assert!(matrix.iter().all(|row| row.len() == n));
    debug_assert_eq!(rhs.len(), n);

    let mut rank = 0;
    for column in 0..n {
        // Any non zero pivot will do, the arithmetic is exact
        let Some(pivot_row) = (rank..n).find(|&row| !matrix[row][column].is_zero()) else {
            continue;
        };
        matrix.swap(rank, pivot_row);
        rhs.swap(rank, pivot_row);

        let pivot = matrix[rank][column];
        for value in &mut matrix[rank][column..] {
            *value = value.checked_div(pivot)?;
        }
        rhs[rank] = rhs[rank].checked_div(pivot)?;

        let pivot_values = matrix[rank].clone();
        let pivot_rhs = rhs[rank];
        for row in (0..n).filter(|&row| row != rank) {
            let factor = matrix[row][column];
            if factor.is_zero() {
                continue;
            }
            for j in column..n {
                matrix[row][j] = matrix[row][j].checked_sub(factor.checked_mul(pivot_values[j])?)?;
            }
            rhs[row] = rhs[row].checked_sub(factor.checked_mul(pivot_rhs)?)?;
        }

        rank += 1;
    }

    Ok(if rank == n {
        SystemSolution::Unique(rhs)
    } else if rhs[rank..].iter().all(Rational::is_zero) {
        SystemSolution::Underdetermined
    } else {
        SystemSolution::Inconsistent
    })
}

/// Determinant of a square matrix by Gaussian elimination.
///
/// # Errors
///
/// When an intermediate value doesn't fit.
pub fn determinant(matrix: &[Vec<Rational>]) -> Result<Rational, ArithmeticError> {
    let n = matrix.len();
    debug_assert!(matrix.iter().all(|row| row.len() == n));

    let mut rows = matrix.to_vec();
    let mut result = Rational::one();
    for column in 0..n {
        let Some(pivot_row) = (column..n).find(|&row| !rows[row][column].is_zero()) else {
            return Ok(Rational::zero());
        };
        if pivot_row != column {
            rows.swap(column, pivot_row);
            result = -result;
        }

        let pivot = rows[column][column];
        result = result.checked_mul(pivot)?;
        let pivot_values = rows[column].clone();
        for row in &mut rows[column + 1..] {
            let factor = row[column].checked_div(pivot)?;
            if factor.is_zero() {
                continue;
            }
            for j in column..n {
                row[j] = row[j].checked_sub(factor.checked_mul(pivot_values[j])?)?;
            }
        }
    }

    Ok(result)
}

/// Determinant in floating point, with partial pivoting.
pub fn determinant_approximate(matrix: &[Vec<f64>]) -> f64 {
    let n = matrix.len();
    let mut rows = matrix.to_vec();
    let mut result = 1_f64;
    for column in 0..n {
        let pivot_row = (column..n)
            .max_by(|&i, &j| rows[i][column].abs().total_cmp(&rows[j][column].abs()))
            .expect("Range is not empty.");
        if rows[pivot_row][column] == 0_f64 {
            return 0_f64;
        }
        if pivot_row != column {
            rows.swap(column, pivot_row);
            result = -result;
        }

        let pivot = rows[column][column];
        result *= pivot;
        let pivot_values = rows[column].clone();
        for row in &mut rows[column + 1..] {
            let factor = row[column] / pivot;
            for j in column..n {
                row[j] -= factor * pivot_values[j];
            }
        }
    }

    result
}

/// Leading principal submatrix of order `k`.
pub fn leading_principal<T: Copy>(matrix: &[Vec<T>], k: usize) -> Vec<Vec<T>> {
    matrix[..k].iter().map(|row| row[..k].to_vec()).collect()
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::{determinant, determinant_approximate, leading_principal, solve, SystemSolution};
    use crate::R;

    #[test]
    fn unique() {
        let matrix = vec![vec![R!(2), R!(3)], vec![R!(1), R!(5)]];
        let solution = solve(matrix, vec![R!(12), R!(15)]).unwrap();
        assert_eq!(solution, SystemSolution::Unique(vec![R!(15, 7), R!(18, 7)]));
    }

    #[test]
    fn needs_row_swap() {
        let matrix = vec![vec![R!(0), R!(1)], vec![R!(1), R!(0)]];
        let solution = solve(matrix, vec![R!(3), R!(4)]).unwrap();
        assert_eq!(solution, SystemSolution::Unique(vec![R!(4), R!(3)]));
    }

    #[test]
    fn singular() {
        let matrix = vec![vec![R!(1), R!(2)], vec![R!(2), R!(4)]];
        assert_eq!(solve(matrix.clone(), vec![R!(1), R!(2)]).unwrap(), SystemSolution::Underdetermined);
        assert_eq!(solve(matrix, vec![R!(1), R!(3)]).unwrap(), SystemSolution::Inconsistent);
    }

    #[test]
    fn determinants() {
        let matrix = vec![
            vec![R!(0), R!(1), R!(1)],
            vec![R!(1), R!(2), R!(0)],
            vec![R!(1), R!(0), R!(2)],
        ];
        assert_eq!(determinant(&matrix).unwrap(), R!(-4));
        assert_eq!(determinant(&leading_principal(&matrix, 2)).unwrap(), R!(-1));
        assert_eq!(determinant(&[vec![R!(1, 2), R!(1)], vec![R!(1), R!(2)]]).unwrap(), R!(0));
    }

    #[test]
    fn approximate_determinant() {
        let matrix = vec![
            vec![0_f64, 1_f64, 1_f64],
            vec![1_f64, 2_f64, 0_f64],
            vec![1_f64, 0_f64, 2_f64],
        ];
        assert!((determinant_approximate(&matrix) + 4_f64).abs() < 1e-12);
        assert_eq!(determinant_approximate(&[vec![1_f64, 2_f64], vec![2_f64, 4_f64]]), 0_f64);
    }
}
