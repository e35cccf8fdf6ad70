//! # Numeric Sampler
//!
//! Evaluates V(x) and M(x) on `N` evenly spaced positions over `[0, L]`.
//!
//! 1. Fast path: the whole grid at once, term by term
//!    ([`Expr::evaluate_grid`]).
//! 2. Fallback when the fast path fails: one position at a time. A position
//!    that does not evaluate becomes 0.0 with a warning. The per-point loop
//!    may run on the rayon pool; results land at fixed indices and warnings
//!    are logged in grid order either way.
//! 3. Sanitizing: any value that is still not finite becomes 0.0.
//!
//! Both output arrays always have length `N` and hold finite numbers only.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::beam::AnalysisSettings;
use crate::equations::Expr;
use crate::errors::CalcResult;

use super::diagrams::Diagrams;
use super::explanation::{ExplanationLog, Section};

/// Positions and sampled values, index-aligned
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationGrid {
    /// x from 0 to L inclusive
    pub positions: Vec<f64>,
    /// V at each position
    pub shear: Vec<f64>,
    /// M at each position
    pub moment: Vec<f64>,
}

impl EvaluationGrid {
    /// Number of grid positions
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Distance between neighbouring positions
    pub fn spacing(&self) -> f64 {
        match self.positions.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }
}

/// `n` evenly spaced values from `start` to `end`; the last one is exactly `end`
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Sample both diagrams over `[0, length]`
pub fn sample(
    diagrams: &Diagrams,
    length: f64,
    settings: &AnalysisSettings,
    log: &mut ExplanationLog,
) -> EvaluationGrid {
    let positions = linspace(0.0, length, settings.grid_size());
    let shear = sample_expression(&diagrams.shear, "V", &positions, settings, log);
    let moment = sample_expression(&diagrams.moment, "M", &positions, settings, log);
    EvaluationGrid {
        positions,
        shear,
        moment,
    }
}

/// Sample one expression with the fast path, fallback and sanitizing steps
pub fn sample_expression(
    expr: &Expr,
    name: &str,
    positions: &[f64],
    settings: &AnalysisSettings,
    log: &mut ExplanationLog,
) -> Vec<f64> {
    let values = match expr.evaluate_grid(positions) {
        Ok(values) => {
            log.info(
                Section::NumericEvaluation,
                format!("{}(x) evaluated on {} points (vectorized)", name, positions.len()),
            );
            values
        }
        Err(e) => {
            log.warning(
                Section::NumericEvaluation,
                format!("Vectorized evaluation of {}(x) failed ({}); falling back to point-by-point substitution", name, e),
            );
            evaluate_pointwise(expr, name, positions, settings, log)
        }
    };
    sanitize(values, name, settings.precision, log)
}

fn evaluate_pointwise(
    expr: &Expr,
    name: &str,
    positions: &[f64],
    settings: &AnalysisSettings,
    log: &mut ExplanationLog,
) -> Vec<f64> {
    let results: Vec<CalcResult<f64>> = if settings.parallel_fallback {
        positions.par_iter().map(|&x| expr.try_evaluate(x)).collect()
    } else {
        positions.iter().map(|&x| expr.try_evaluate(x)).collect()
    };

    let mut failures = 0;
    let values: Vec<f64> = results
        .into_iter()
        .zip(positions)
        .map(|(result, &x)| match result {
            Ok(value) => value,
            Err(e) => {
                failures += 1;
                log.warning(
                    Section::NumericEvaluation,
                    format!(
                        "Could not evaluate {}({:.*}) by substitution: {}. Using 0",
                        name, settings.precision, x, e
                    ),
                );
                0.0
            }
        })
        .collect();

    if failures == 0 {
        log.info(
            Section::NumericEvaluation,
            format!("{}(x) evaluated point by point on {} points", name, positions.len()),
        );
    }
    values
}

/// Replace non-finite values with 0.0, logging how many were replaced
fn sanitize(mut values: Vec<f64>, name: &str, precision: usize, log: &mut ExplanationLog) -> Vec<f64> {
    let mut replaced = 0;
    for value in values.iter_mut().filter(|v| !v.is_finite()) {
        *value = 0.0;
        replaced += 1;
    }
    if replaced > 0 {
        log.warning(
            Section::NumericEvaluation,
            format!(
                "{} non-finite {}(x) value(s) found in the sampled array; converted to {:.*}",
                replaced, name, precision, 0.0
            ),
        );
    }
    values
}
