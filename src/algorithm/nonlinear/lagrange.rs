//! # Lagrange multipliers
//!
//! Critical points of a quadratic function subject to a single equality constraint `g(x) = 0`.
//! The critical points are the solutions of `∇f(x) = λ∇g(x)` together with the constraint.
//!
//! When the constraint is linear, these conditions form a square linear system. When the
//! constraint is quadratic and the objective is linear, every solution can be written as
//! `x = μP + Q` with `μ = 1 / λ`, and substituting that into the constraint leaves a quadratic
//! equation in `μ`.
use std::fmt;

use itertools::Itertools;
use log::{debug, info};
use num_traits::Zero;

use crate::algorithm::{SolveError, SolverSettings};
use crate::algorithm::log::IterationLog;
use crate::algorithm::nonlinear::{Classification, Value};
use crate::data::linear_algebra::{determinant, determinant_approximate, leading_principal, solve, SystemSolution};
use crate::data::number_types::rational::{ArithmeticError, Rational};
use crate::data::polynomial::{Monomial, Polynomial};
use crate::data::quadratic::QuadraticFunction;

const MULTIPLIER: &str = "λ";

/// A solution of the first order conditions.
#[derive(Clone, Debug, PartialEq)]
pub struct CriticalPoint {
    /// In the order of the variables of the problem.
    pub coordinates: Vec<Value>,
    /// `λ`.
    pub multiplier: Value,
    /// Value of the objective function.
    pub objective_value: Value,
    /// From the bordered Hessian.
    pub classification: Classification,
}

impl fmt::Display for CriticalPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "({}), λ = {}, f = {}: {}",
            self.coordinates.iter().join(", "), self.multiplier, self.objective_value, self.classification,
        )
    }
}

/// All critical points of a problem.
#[derive(Clone, Debug, PartialEq)]
pub struct LagrangeSolution {
    /// Names of the coordinates.
    pub variables: Vec<String>,
    /// Possibly empty.
    pub points: Vec<CriticalPoint>,
}

impl fmt::Display for LagrangeSolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.points.is_empty() {
            return writeln!(f, "No critical points");
        }
        writeln!(f, "Critical points in ({}):", self.variables.iter().join(", "))?;
        for point in &self.points {
            writeln!(f, "    {}", point)?;
        }
        Ok(())
    }
}

/// What happened during a single step of finding the critical points.
#[derive(Clone, Debug, PartialEq)]
pub enum LagrangeStep {
    /// `L = f - λg`.
    Lagrangian {
        /// `f`.
        objective: QuadraticFunction,
        /// `g`.
        constraint: QuadraticFunction,
    },
    /// First order conditions, each polynomial should be zero.
    Stationarity {
        /// Partial derivative of the Lagrangian to each variable.
        partials: Vec<(String, Polynomial)>,
        /// The constraint itself.
        constraint: Polynomial,
    },
    /// The first order conditions as a linear system in the variables and `λ`.
    LinearSystem {
        /// Square, the last column belongs to `λ`.
        matrix: Vec<Vec<Rational>>,
        /// Right hand side.
        rhs: Vec<Rational>,
    },
    /// Solutions lie on the line `x = μP + Q`.
    Parametrization {
        /// Direction.
        p: Vec<Rational>,
        /// Offset.
        q: Vec<Rational>,
    },
    /// The constraint along that line.
    QuadraticInMultiplier {
        /// Coefficients of `μ²`, `μ` and `1`.
        coefficients: [Rational; 3],
        /// Of the quadratic equation.
        discriminant: Rational,
    },
    /// A critical point was found and classified.
    Classify {
        /// The classified point.
        point: CriticalPoint,
        /// Last `n - 1` leading principal minors of the bordered Hessian.
        minors: Vec<Value>,
    },
}

impl fmt::Display for LagrangeStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LagrangeStep::Lagrangian { objective, constraint } => {
                write!(f, "L = {} - λ({})", objective, constraint)
            },
            LagrangeStep::Stationarity { partials, constraint } => {
                for (variable, partial) in partials {
                    writeln!(f, "∂L/∂{}: {} = 0", variable, partial)?;
                }
                write!(f, "∂L/∂λ: {} = 0", constraint)
            },
            LagrangeStep::LinearSystem { matrix, rhs } => {
                let rows = matrix.iter().zip(rhs)
                    .map(|(row, value)| format!("{} | {}", row.iter().map(|v| format!("{:>6}", v.to_string())).join(""), value));
                write!(f, "{}", rows.format("\n"))
            },
            LagrangeStep::Parametrization { p, q } => {
                write!(f, "x = μ({}) + ({}), with μ = 1/λ", p.iter().join(", "), q.iter().join(", "))
            },
            LagrangeStep::QuadraticInMultiplier { coefficients: [a, b, c], discriminant } => {
                write!(f, "({})μ² + ({})μ + ({}) = 0, discriminant {}", a, b, c, discriminant)
            },
            LagrangeStep::Classify { point, minors } => {
                write!(f, "Bordered Hessian minors ({}) → {}", minors.iter().join(", "), point)
            },
        }
    }
}

/// Find and classify the critical points of `f` subject to `g(x) = 0`.
///
/// # Arguments
///
/// * `objective`: `f`.
/// * `constraint`: `g`, over the same variables as `f`.
/// * `settings`: The tolerance decides when an approximate minor counts as zero.
///
/// # Errors
///
/// `Unsupported` when both functions are quadratic, when the critical points are not isolated or
/// when the constraint matrix is singular; or an arithmetic error.
pub fn critical_points(
    objective: &QuadraticFunction,
    constraint: &QuadraticFunction,
    settings: &SolverSettings,
) -> Result<(LagrangeSolution, IterationLog<LagrangeStep>), SolveError> {
    if objective.variables() != constraint.variables() {
        return Err(SolveError::Unsupported(
            "the objective and the constraint should be over the same variables".to_string(),
        ));
    }

    let mut log = IterationLog::new();
    log.record(LagrangeStep::Lagrangian { objective: objective.clone(), constraint: constraint.clone() });
    log.record(stationarity(objective, constraint)?);

    let points = if constraint.is_linear() {
        linear_constraint(objective, constraint, &mut log)?
    } else if objective.is_linear() {
        quadratic_constraint(objective, constraint, settings, &mut log)?
    } else {
        return Err(SolveError::Unsupported(
            "a quadratic objective with a quadratic constraint".to_string(),
        ));
    };

    info!("Found {} critical point(s)", points.len());
    let solution = LagrangeSolution { variables: objective.variables().to_vec(), points };
    Ok((solution, log))
}

fn stationarity(objective: &QuadraticFunction, constraint: &QuadraticFunction) -> Result<LagrangeStep, ArithmeticError> {
    let objective_hessian = objective.hessian()?;
    let constraint_hessian = constraint.hessian()?;
    let multiplier = Polynomial::variable(MULTIPLIER);

    let partials = objective.variables().iter().enumerate()
        .map(|(i, name)| -> Result<_, ArithmeticError> {
            let objective_partial = partial(objective, &objective_hessian, i)?;
            let constraint_partial = partial(constraint, &constraint_hessian, i)?;
            let derivative = objective_partial.checked_sub(&constraint_partial.checked_mul(&multiplier)?)?;
            Ok((name.clone(), derivative))
        })
        .collect::<Result<_, _>>()?;

    Ok(LagrangeStep::Stationarity { partials, constraint: constraint.to_polynomial()? })
}

/// Partial derivative to variable `i`, as a polynomial.
fn partial(
    function: &QuadraticFunction,
    hessian: &[Vec<Rational>],
    i: usize,
) -> Result<Polynomial, ArithmeticError> {
    function.variables().iter().zip(&hessian[i])
        .try_fold(Polynomial::constant(function.linear()[i]), |total, (name, &coefficient)| {
            total.checked_add(&Polynomial::term(Monomial::variable(name.clone()), coefficient))
        })
}

/// The first order conditions are linear: `Hx - λb_g = -b_f` and `b_gᵀx = -c_g`.
fn linear_constraint(
    objective: &QuadraticFunction,
    constraint: &QuadraticFunction,
    log: &mut IterationLog<LagrangeStep>,
) -> Result<Vec<CriticalPoint>, SolveError> {
    let mut matrix = objective.hessian()?;
    let mut rhs = Vec::with_capacity(matrix.len() + 1);
    for (i, row) in matrix.iter_mut().enumerate() {
        row.push(constraint.linear()[i].checked_neg()?);
        rhs.push(objective.linear()[i].checked_neg()?);
    }
    matrix.push(constraint.linear().iter().copied().chain([Rational::zero()]).collect());
    rhs.push(constraint.constant().checked_neg()?);
    log.record(LagrangeStep::LinearSystem { matrix: matrix.clone(), rhs: rhs.clone() });

    match solve(matrix, rhs)? {
        SystemSolution::Unique(mut solution) => {
            let multiplier = solution.pop().expect("The system has a row for the multiplier.");
            let point = exact_point(objective, constraint, solution, multiplier, log)?;
            Ok(vec![point])
        },
        SystemSolution::Underdetermined => Err(SolveError::Unsupported(
            "the critical points are not isolated".to_string(),
        )),
        SystemSolution::Inconsistent => {
            debug!("First order conditions are inconsistent");
            Ok(Vec::new())
        },
    }
}

/// Linear objective, quadratic constraint with invertible matrix.
///
/// From `b_f = λ(2A_g x + b_g)` follows `x = μP + Q` with `2A_g P = b_f` and `2A_g Q = -b_g`.
fn quadratic_constraint(
    objective: &QuadraticFunction,
    constraint: &QuadraticFunction,
    settings: &SolverSettings,
    log: &mut IterationLog<LagrangeStep>,
) -> Result<Vec<CriticalPoint>, SolveError> {
    if objective.linear().iter().all(Rational::is_zero) {
        return Err(SolveError::Unsupported("a constant objective".to_string()));
    }
    let hessian = constraint.hessian()?;
    if determinant(&hessian)?.is_zero() {
        return Err(SolveError::Unsupported("a quadratic constraint with a singular matrix".to_string()));
    }

    let negated_linear = constraint.linear().iter()
        .map(|value| value.checked_neg())
        .collect::<Result<Vec<_>, _>>()?;
    let p = unique(solve(hessian.clone(), objective.linear().to_vec())?)?;
    let q = unique(solve(hessian, negated_linear)?)?;
    log.record(LagrangeStep::Parametrization { p: p.clone(), q: q.clone() });

    // g(μP + Q) = aμ² + bμ + c
    let a = bilinear(constraint.quadratic(), &p, &p)?;
    let b = bilinear(constraint.quadratic(), &p, &q)?
        .checked_mul(Rational::from_integer(2))?
        .checked_add(dot(constraint.linear(), &p)?)?;
    let c = constraint.evaluate(&q)?;
    let discriminant = b.checked_mul(b)?
        .checked_sub(Rational::from_integer(4).checked_mul(a)?.checked_mul(c)?)?;
    log.record(LagrangeStep::QuadraticInMultiplier { coefficients: [a, b, c], discriminant });

    let roots = if a.is_zero() {
        if b.is_zero() {
            return if c.is_zero() {
                Err(SolveError::Unsupported("the critical points are not isolated".to_string()))
            } else {
                Ok(Vec::new())
            };
        }
        vec![Value::Exact(c.checked_neg()?.checked_div(b)?)]
    } else if discriminant.is_negative() {
        debug!("Negative discriminant {}, no real solutions", discriminant);
        Vec::new()
    } else {
        let denominator = a.checked_mul(Rational::from_integer(2))?;
        match discriminant.sqrt_exact() {
            Some(root) => {
                let roots = [
                    b.checked_neg()?.checked_sub(root)?.checked_div(denominator)?,
                    b.checked_neg()?.checked_add(root)?.checked_div(denominator)?,
                ];
                roots.into_iter().dedup().map(Value::Exact).collect()
            },
            None => {
                debug!("Discriminant {} is not a square, continuing in floating point", discriminant);
                let root = discriminant.approximate().sqrt();
                let (b, denominator) = (b.approximate(), denominator.approximate());
                vec![Value::Approximate((-b - root) / denominator), Value::Approximate((-b + root) / denominator)]
            },
        }
    };

    let mut points = Vec::with_capacity(roots.len());
    for root in roots {
        match root {
            Value::Exact(mu) => {
                if mu.is_zero() {
                    debug!("Skipping μ = 0, the constraint gradient vanishes there");
                    continue;
                }
                let x = p.iter().zip(&q)
                    .map(|(&p, &q)| mu.checked_mul(p)?.checked_add(q))
                    .collect::<Result<Vec<_>, _>>()?;
                points.push(exact_point(objective, constraint, x, mu.recip()?, log)?);
            },
            Value::Approximate(mu) => {
                if mu.abs() <= settings.tolerance {
                    continue;
                }
                let x = p.iter().zip(&q)
                    .map(|(p, q)| mu * p.approximate() + q.approximate())
                    .collect::<Vec<_>>();
                points.push(approximate_point(objective, constraint, x, 1_f64 / mu, settings, log));
            },
        }
    }

    Ok(points)
}

fn unique(solution: SystemSolution) -> Result<Vec<Rational>, SolveError> {
    match solution {
        SystemSolution::Unique(values) => Ok(values),
        _ => Err(SolveError::Structural("an invertible system has a unique solution".to_string())),
    }
}

fn dot(left: &[Rational], right: &[Rational]) -> Result<Rational, ArithmeticError> {
    left.iter().zip(right).try_fold(Rational::zero(), |total, (&l, &r)| total.checked_add(l.checked_mul(r)?))
}

/// `leftᵀ A right`.
fn bilinear(matrix: &[Vec<Rational>], left: &[Rational], right: &[Rational]) -> Result<Rational, ArithmeticError> {
    matrix.iter().zip(left)
        .try_fold(Rational::zero(), |total, (row, &l)| total.checked_add(l.checked_mul(dot(row, right)?)?))
}

fn exact_point(
    objective: &QuadraticFunction,
    constraint: &QuadraticFunction,
    x: Vec<Rational>,
    multiplier: Rational,
    log: &mut IterationLog<LagrangeStep>,
) -> Result<CriticalPoint, SolveError> {
    // [[0, ∇gᵀ], [∇g, H_f - λH_g]]
    let gradient = constraint.gradient(&x)?;
    let objective_hessian = objective.hessian()?;
    let constraint_hessian = constraint.hessian()?;
    let mut bordered = vec![[Rational::zero()].into_iter().chain(gradient.iter().copied()).collect::<Vec<_>>()];
    for (i, &border) in gradient.iter().enumerate() {
        let row = objective_hessian[i].iter().zip(&constraint_hessian[i])
            .map(|(&f, &g)| f.checked_sub(multiplier.checked_mul(g)?))
            .collect::<Result<Vec<_>, _>>()?;
        bordered.push([border].into_iter().chain(row).collect());
    }

    let minors = (3..=bordered.len())
        .map(|order| determinant(&leading_principal(&bordered, order)))
        .collect::<Result<Vec<_>, _>>()?;
    let classification = classify(&minors.iter().map(|minor| minor.signum()).collect::<Vec<_>>());
    let point = CriticalPoint {
        objective_value: Value::Exact(objective.evaluate(&x)?),
        coordinates: x.into_iter().map(Value::Exact).collect(),
        multiplier: Value::Exact(multiplier),
        classification,
    };

    log.record(LagrangeStep::Classify { point: point.clone(), minors: minors.into_iter().map(Value::Exact).collect() });
    Ok(point)
}

fn approximate_point(
    objective: &QuadraticFunction,
    constraint: &QuadraticFunction,
    x: Vec<f64>,
    multiplier: f64,
    settings: &SolverSettings,
    log: &mut IterationLog<LagrangeStep>,
) -> CriticalPoint {
    let gradient = constraint.gradient_approximate(&x);
    let mut bordered = vec![[0_f64].into_iter().chain(gradient.iter().copied()).collect::<Vec<_>>()];
    for (i, &border) in gradient.iter().enumerate() {
        let row = objective.quadratic()[i].iter().zip(&constraint.quadratic()[i])
            .map(|(f, g)| 2_f64 * (f.approximate() - multiplier * g.approximate()));
        bordered.push([border].into_iter().chain(row).collect());
    }

    let minors = (3..=bordered.len())
        .map(|order| determinant_approximate(&leading_principal(&bordered, order)))
        .collect::<Vec<_>>();
    let signs = minors.iter()
        .map(|&minor| if minor.abs() <= settings.tolerance { 0 } else if minor < 0_f64 { -1 } else { 1 })
        .collect::<Vec<_>>();
    let point = CriticalPoint {
        objective_value: Value::Approximate(objective.evaluate_approximate(&x)),
        coordinates: x.into_iter().map(Value::Approximate).collect(),
        multiplier: Value::Approximate(multiplier),
        classification: classify(&signs),
    };

    log.record(LagrangeStep::Classify { point: point.clone(), minors: minors.into_iter().map(Value::Approximate).collect() });
    point
}

/// Second order test with one constraint, from the signs of the minors of order `3..=n + 1`.
///
/// All negative means a minimum, alternating starting with positive means a maximum.
fn classify(signs: &[i64]) -> Classification {
    if signs.is_empty() || signs.contains(&0) {
        Classification::Inconclusive
    } else if signs.iter().all(|&sign| sign < 0) {
        Classification::Minimum
    } else if signs.iter().enumerate().all(|(i, &sign)| sign == if i % 2 == 0 { 1 } else { -1 }) {
        Classification::Maximum
    } else {
        Classification::Saddle
    }
}
