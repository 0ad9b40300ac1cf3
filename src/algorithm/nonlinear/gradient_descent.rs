//! # Steepest descent
//!
//! Minimizing a quadratic function by repeatedly stepping against the gradient. Iterates are
//! floating point: the denominators of exact iterates grow with every step.
use std::fmt;

use itertools::Itertools;
use log::{debug, info, warn};

use crate::algorithm::{SolveError, SolverSettings};
use crate::algorithm::log::IterationLog;
use crate::data::quadratic::QuadraticFunction;

/// How far to step along the negative gradient.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StepRule {
    /// The same step size in every iteration.
    Fixed(f64),
    /// The step size minimizing the function along the negative gradient, `gᵀg / gᵀHg`.
    ExactLineSearch,
}

impl fmt::Display for StepRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StepRule::Fixed(size) => write!(f, "fixed step {}", size),
            StepRule::ExactLineSearch => f.write_str("exact line search"),
        }
    }
}

/// A single step `x_{k+1} = x_k - t∇f(x_k)`.
#[derive(Clone, Debug, PartialEq)]
pub struct DescentStep {
    /// `k`, starting at zero.
    pub iteration: usize,
    /// `x_k`.
    pub point: Vec<f64>,
    /// `∇f(x_k)`.
    pub gradient: Vec<f64>,
    /// `t`.
    pub step_size: f64,
    /// `x_{k+1}`.
    pub next: Vec<f64>,
    /// `f(x_{k+1})`.
    pub value: f64,
}

impl DescentStep {
    /// The update with all numbers filled in.
    pub fn substitution(&self) -> String {
        format!(
            "x{} = x{} - t∇f(x{}) = ({}) - {}·({}) = ({})",
            self.iteration + 1, self.iteration, self.iteration,
            format_vector(&self.point), format_number(self.step_size), format_vector(&self.gradient),
            format_vector(&self.next),
        )
    }
}

impl fmt::Display for DescentStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, f = {}", self.substitution(), format_number(self.value))
    }
}

fn format_number(value: f64) -> String {
    let text = format!("{:.6}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
}

fn format_vector(values: &[f64]) -> String {
    values.iter().map(|&value| format_number(value)).join(", ")
}

/// Where the descent stopped.
#[derive(Clone, Debug, PartialEq)]
pub struct DescentResult {
    /// Names of the coordinates.
    pub variables: Vec<String>,
    /// Final iterate.
    pub point: Vec<f64>,
    /// Function value at the final iterate.
    pub value: f64,
    /// Norm of the gradient at the final iterate, at most the tolerance.
    pub gradient_norm: f64,
    /// Number of steps taken.
    pub iterations: usize,
}

impl fmt::Display for DescentResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Converged after {} iterations", self.iterations)?;
        for (name, &value) in self.variables.iter().zip(&self.point) {
            writeln!(f, "    {} = {}", name, format_number(value))?;
        }
        writeln!(f, "f = {}", format_number(self.value))
    }
}

/// Minimize a quadratic function with steepest descent.
///
/// Stops as soon as the norm of the gradient is at most the tolerance.
///
/// # Errors
///
/// `IterationLimit` when not converged in time, `Unbounded` when exact line search finds that
/// the function doesn't curve upwards along the negative gradient, `Dimension` when the start
/// point doesn't have one coordinate per variable.
pub fn descend(
    function: &QuadraticFunction,
    start: &[f64],
    rule: StepRule,
    settings: &SolverSettings,
) -> Result<(DescentResult, IterationLog<DescentStep>), SolveError> {
    if start.len() != function.nr_variables() {
        return Err(SolveError::Dimension { expected: function.nr_variables(), found: start.len() });
    }

    let hessian = function.hessian()?.iter()
        .map(|row| row.iter().map(|value| value.approximate()).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let mut log = IterationLog::new();
    let mut point = start.to_vec();
    for iteration in 0.. {
        let gradient = function.gradient_approximate(&point);
        let gradient_norm = norm(&gradient);
        if gradient_norm <= settings.tolerance {
            info!("Converged after {} iterations", iteration);
            let result = DescentResult {
                variables: function.variables().to_vec(),
                value: function.evaluate_approximate(&point),
                point,
                gradient_norm,
                iterations: iteration,
            };
            return Ok((result, log));
        }
        if iteration == settings.iteration_limit {
            warn!("Gradient norm {} after {} iterations", gradient_norm, iteration);
            break;
        }
        if !gradient_norm.is_finite() {
            warn!("Iterates diverge with {}", rule);
            break;
        }

        let step_size = match rule {
            StepRule::Fixed(size) => size,
            StepRule::ExactLineSearch => {
                let curvature = gradient.iter().zip(&hessian)
                    .map(|(&gi, row)| gi * row.iter().zip(&gradient).map(|(h, gj)| h * gj).sum::<f64>())
                    .sum::<f64>();
                if curvature <= 0_f64 {
                    debug!("Curvature {} along the gradient is not positive", curvature);
                    return Err(SolveError::Unbounded);
                }
                gradient.iter().map(|g| g * g).sum::<f64>() / curvature
            },
        };

        let next = point.iter().zip(&gradient)
            .map(|(x, g)| x - step_size * g)
            .collect::<Vec<_>>();
        log.record(DescentStep {
            iteration,
            point,
            gradient,
            step_size,
            value: function.evaluate_approximate(&next),
            next: next.clone(),
        });
        point = next;
    }

    Err(SolveError::IterationLimit { limit: settings.iteration_limit })
}

fn norm(vector: &[f64]) -> f64 {
    vector.iter().map(|value| value * value).sum::<f64>().sqrt()
}
