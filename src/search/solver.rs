//! Projected limited-memory quasi-Newton minimisation over a box
//!
//! The search direction comes from the usual two-loop recursion over the most
//! recent curvature pairs. Coordinates pinned at a bound with the gradient
//! pushing outward are frozen for the step, and every trial point is projected
//! back into the box. A backtracking Armijo search picks the step length.
//!
//! The solver is fully deterministic and always reports the best point it
//! evaluated, whatever the reason it stopped.

use crate::io::configuration::{
    SOLVER_FUNCTION_TOLERANCE, SOLVER_GRADIENT_TOLERANCE, SOLVER_MAX_ITERATIONS,
    SOLVER_MAX_LINE_SEARCH, SOLVER_MEMORY,
};
use std::collections::VecDeque;

// Sufficient decrease constant for the Armijo condition
const ARMIJO_C1: f64 = 1e-4;
// Curvature pairs with a smaller s.y are discarded
const CURVATURE_EPSILON: f64 = 1e-10;

/// Stopping criteria for [`minimize`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverOptions {
    /// Maximum number of accepted steps
    pub max_iterations: usize,
    /// Number of curvature pairs remembered
    pub memory: usize,
    /// Maximum step halvings per line search
    pub max_line_search: usize,
    /// Stop once the projected gradient's infinity norm is this small
    pub gradient_tolerance: f64,
    /// Stop once the relative objective reduction is this small
    pub function_tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: SOLVER_MAX_ITERATIONS,
            memory: SOLVER_MEMORY,
            max_line_search: SOLVER_MAX_LINE_SEARCH,
            gradient_tolerance: SOLVER_GRADIENT_TOLERANCE,
            function_tolerance: SOLVER_FUNCTION_TOLERANCE,
        }
    }
}

/// Reason the solver stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Projected gradient fell below tolerance
    GradientTolerance,
    /// Objective stopped improving meaningfully
    FunctionTolerance,
    /// No step length gave sufficient decrease
    LineSearchExhausted,
    /// Iteration cap reached
    IterationLimit,
}

/// Outcome of a minimisation
#[derive(Clone, Debug)]
pub struct SolverReport {
    /// Best point evaluated
    pub point: Vec<f64>,
    /// Objective at `point`
    pub value: f64,
    /// Accepted steps taken
    pub iterations: usize,
    /// Objective evaluations, including line search trials
    pub evaluations: usize,
    /// Gradient evaluations
    pub gradient_evaluations: usize,
    /// Why the search ended
    pub termination: Termination,
}

struct CurvaturePair {
    s: Vec<f64>,
    y: Vec<f64>,
    rho: f64,
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn project(point: &mut [f64], lower: &[f64], upper: &[f64]) {
    for ((value, &lo), &hi) in point.iter_mut().zip(lower).zip(upper) {
        *value = value.clamp(lo, hi);
    }
}

// A coordinate is frozen when it sits on a bound and descent would leave the box
fn frozen_mask(point: &[f64], gradient: &[f64], lower: &[f64], upper: &[f64]) -> Vec<bool> {
    point
        .iter()
        .zip(gradient)
        .zip(lower.iter().zip(upper))
        .map(|((&x, &g), (&lo, &hi))| (x <= lo && g > 0.0) || (x >= hi && g < 0.0))
        .collect()
}

fn projected_gradient_norm(point: &[f64], gradient: &[f64], lower: &[f64], upper: &[f64]) -> f64 {
    point
        .iter()
        .zip(gradient)
        .zip(lower.iter().zip(upper))
        .map(|((&x, &g), (&lo, &hi))| ((x - g).clamp(lo, hi) - x).abs())
        .fold(0.0, f64::max)
}

fn two_loop_direction(gradient: &[f64], history: &VecDeque<CurvaturePair>, frozen: &[bool]) -> Vec<f64> {
    let mut q: Vec<f64> = gradient
        .iter()
        .zip(frozen)
        .map(|(&g, &f)| if f { 0.0 } else { g })
        .collect();

    let mut alphas = Vec::with_capacity(history.len());
    for pair in history.iter().rev() {
        let alpha = pair.rho * dot(&pair.s, &q);
        for (qi, yi) in q.iter_mut().zip(&pair.y) {
            *qi -= alpha * yi;
        }
        alphas.push(alpha);
    }

    let gamma = history.back().map_or(1.0, |pair| {
        let yy = dot(&pair.y, &pair.y);
        if yy > 0.0 { dot(&pair.s, &pair.y) / yy } else { 1.0 }
    });
    for qi in &mut q {
        *qi *= gamma;
    }

    for (pair, alpha) in history.iter().zip(alphas.iter().rev()) {
        let beta = pair.rho * dot(&pair.y, &q);
        for (ri, si) in q.iter_mut().zip(&pair.s) {
            *ri += si * (alpha - beta);
        }
    }

    q.iter()
        .zip(frozen)
        .map(|(&r, &f)| if f { 0.0 } else { -r })
        .collect()
}

/// Minimise `objective` inside the box `[lower, upper]` starting from `seed`
///
/// The seed is projected into the box before the first evaluation. The
/// `gradient` closure may be any approximation; it is only used to build
/// search directions, never trusted for the reported value.
pub fn minimize<F, G>(
    mut objective: F,
    mut gradient: G,
    seed: &[f64],
    lower: &[f64],
    upper: &[f64],
    options: &SolverOptions,
) -> SolverReport
where
    F: FnMut(&[f64]) -> f64,
    G: FnMut(&[f64]) -> Vec<f64>,
{
    let mut x = seed.to_vec();
    project(&mut x, lower, upper);
    let mut fx = objective(&x);
    let mut gx = gradient(&x);

    let mut evaluations = 1;
    let mut gradient_evaluations = 1;
    let mut best_point = x.clone();
    let mut best_value = fx;
    let mut history: VecDeque<CurvaturePair> = VecDeque::with_capacity(options.memory);
    let mut iterations = 0;
    let mut termination = Termination::IterationLimit;

    while iterations < options.max_iterations {
        if projected_gradient_norm(&x, &gx, lower, upper) <= options.gradient_tolerance {
            termination = Termination::GradientTolerance;
            break;
        }

        let frozen = frozen_mask(&x, &gx, lower, upper);
        let mut direction = two_loop_direction(&gx, &history, &frozen);
        if dot(&direction, &gx) >= 0.0 {
            // Stale curvature; fall back to steepest descent
            history.clear();
            direction = gx
                .iter()
                .zip(&frozen)
                .map(|(&g, &f)| if f { 0.0 } else { -g })
                .collect();
        }

        let longest = direction.iter().fold(0.0_f64, |m, d| m.max(d.abs()));
        let mut step = if history.is_empty() && longest > 1.0 {
            1.0 / longest
        } else {
            1.0
        };

        let mut accepted = None;
        for _ in 0..options.max_line_search {
            let mut trial: Vec<f64> = x
                .iter()
                .zip(&direction)
                .map(|(xi, di)| xi + step * di)
                .collect();
            project(&mut trial, lower, upper);

            let displacement: Vec<f64> = trial.iter().zip(&x).map(|(t, xi)| t - xi).collect();
            if displacement.iter().all(|d| *d == 0.0) {
                break;
            }

            let f_trial = objective(&trial);
            evaluations += 1;
            if f_trial < best_value {
                best_value = f_trial;
                best_point.clone_from(&trial);
            }

            if f_trial <= ARMIJO_C1.mul_add(dot(&gx, &displacement), fx) {
                accepted = Some((trial, f_trial, displacement));
                break;
            }
            step *= 0.5;
        }

        let Some((next, f_next, s)) = accepted else {
            termination = Termination::LineSearchExhausted;
            break;
        };

        iterations += 1;
        let g_next = gradient(&next);
        gradient_evaluations += 1;

        let y: Vec<f64> = g_next.iter().zip(&gx).map(|(a, b)| a - b).collect();
        let sy = dot(&s, &y);
        if sy > CURVATURE_EPSILON {
            if history.len() == options.memory {
                history.pop_front();
            }
            if options.memory > 0 {
                history.push_back(CurvaturePair { s, y, rho: 1.0 / sy });
            }
        }

        let reduction = (fx - f_next) / fx.abs().max(f_next.abs()).max(1.0);
        x = next;
        fx = f_next;
        gx = g_next;

        if reduction <= options.function_tolerance {
            termination = Termination::FunctionTolerance;
            break;
        }
    }

    SolverReport {
        point: best_point,
        value: best_value,
        iterations,
        evaluations,
        gradient_evaluations,
        termination,
    }
}
