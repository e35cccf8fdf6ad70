//! # Equilibrium Solver
//!
//! Builds the two static equilibrium equations, substitutes the boundary
//! values from the support classification, and solves for what is left.
//!
//! ```text
//! ΣFy   :  R_A + R_B − P − ∫w dx = 0
//! ΣM_A  : −M_A + R_B·L + M_B − P·x_P − ∫w·x dx = 0
//! ```
//!
//! Moment reactions follow the moment-diagram convention (`M(0) = M_A`,
//! `M(L) = M_B`), hence the sign on `M_A`. A cantilever fixed at the left
//! under a downward load therefore reports a negative `M_A`.
//!
//! At most two equations exist, so at most two unknowns can be solved.
//! Anything more is statically indeterminate for this model.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::equations::{format_number, LinearEquation, Reaction};
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadModel;
use crate::supports::BoundaryConditions;

use super::explanation::{ExplanationLog, Section};

/// Residual magnitude (relative to the applied load) above which an unused
/// equation is reported as unsatisfied
const RESIDUAL_TOLERANCE: f64 = 1e-9;

/// Where a reaction value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactionOrigin {
    /// Fixed by the support type
    Boundary,
    /// Solved from equilibrium
    Solved,
    /// Zero default after a failed solve
    Fallback,
}

/// A reaction value with its origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionValue {
    pub value: f64,
    pub origin: ReactionOrigin,
}

impl ReactionValue {
    fn fallback() -> Self {
        ReactionValue {
            value: 0.0,
            origin: ReactionOrigin::Fallback,
        }
    }
}

/// Support reactions for one analysis. Every entry holds a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionSet {
    /// Left vertical reaction (positive upward)
    pub r_a: ReactionValue,
    /// Left moment reaction, equal to M(0)
    pub m_a: ReactionValue,
    /// Right vertical reaction (positive upward)
    pub r_b: ReactionValue,
    /// Right moment reaction, equal to M(L)
    pub m_b: ReactionValue,
}

impl ReactionSet {
    /// All four reactions zero, marked as fallback values
    pub fn zeroed() -> Self {
        ReactionSet {
            r_a: ReactionValue::fallback(),
            m_a: ReactionValue::fallback(),
            r_b: ReactionValue::fallback(),
            m_b: ReactionValue::fallback(),
        }
    }

    /// Value of one reaction
    pub fn value(&self, reaction: Reaction) -> f64 {
        self.entry(reaction).value
    }

    /// Value and origin of one reaction
    pub fn entry(&self, reaction: Reaction) -> ReactionValue {
        match reaction {
            Reaction::Ra => self.r_a,
            Reaction::Ma => self.m_a,
            Reaction::Rb => self.r_b,
            Reaction::Mb => self.m_b,
        }
    }

    fn entry_mut(&mut self, reaction: Reaction) -> &mut ReactionValue {
        match reaction {
            Reaction::Ra => &mut self.r_a,
            Reaction::Ma => &mut self.m_a,
            Reaction::Rb => &mut self.r_b,
            Reaction::Mb => &mut self.m_b,
        }
    }

    /// Plain `{"R_A": .., "M_A": .., "R_B": .., "M_B": ..}` mapping
    pub fn as_map(&self) -> BTreeMap<String, f64> {
        Reaction::ALL
            .iter()
            .map(|r| (r.symbol().to_string(), self.value(*r)))
            .collect()
    }

    fn values(&self) -> BTreeMap<Reaction, f64> {
        Reaction::ALL.iter().map(|r| (*r, self.value(*r))).collect()
    }

    /// True when any value is a fallback default
    pub fn is_fallback(&self) -> bool {
        Reaction::ALL
            .iter()
            .any(|r| self.entry(*r).origin == ReactionOrigin::Fallback)
    }
}

/// The force and moment equations before any substitution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumSystem {
    /// ΣFy = 0
    pub force: LinearEquation,
    /// ΣM about the left end = 0
    pub moment: LinearEquation,
}

impl EquilibriumSystem {
    /// Assemble both equations from the load model
    pub fn build(loads: &LoadModel) -> Self {
        let p = loads.point.magnitude;
        let force = LinearEquation::new("ΣFy")
            .with_term(Reaction::Ra, 1.0)
            .with_term(Reaction::Rb, 1.0)
            .with_constant(-p - loads.total_distributed());

        let moment = LinearEquation::new("ΣM_A")
            .with_term(Reaction::Ma, -1.0)
            .with_term(Reaction::Rb, loads.length)
            .with_term(Reaction::Mb, 1.0)
            .with_constant(-p * loads.point.position - loads.distributed_moment_about_left());

        EquilibriumSystem { force, moment }
    }

    /// Both equations with the known reactions substituted
    pub fn substitute(&self, known: &BTreeMap<Reaction, f64>) -> Self {
        EquilibriumSystem {
            force: self.force.substitute(known),
            moment: self.moment.substitute(known),
        }
    }

    /// Equations used for `unknown_count` unknowns: force first, then moment
    pub fn select(&self, unknown_count: usize) -> Vec<&LinearEquation> {
        [&self.force, &self.moment]
            .into_iter()
            .take(unknown_count)
            .collect()
    }
}

/// Solve the selected equations for the unknown reactions.
///
/// Returns the solved values in the order of `unknowns`.
pub fn solve_unknowns(equations: &[&LinearEquation], unknowns: &[Reaction]) -> CalcResult<Vec<f64>> {
    let n = unknowns.len();
    if equations.len() < n {
        return Err(CalcError::StaticallyIndeterminate {
            unknowns: n,
            equations: equations.len(),
        });
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    let a = DMatrix::from_fn(n, n, |i, j| equations[i].coefficient(unknowns[j]));
    let b = DVector::from_fn(n, |i, _| -equations[i].constant());

    let solution = a.lu().solve(&b).ok_or_else(|| {
        CalcError::singular(format!(
            "no unique solution for {}",
            unknowns.iter().map(Reaction::symbol).collect::<Vec<_>>().join(", ")
        ))
    })?;

    if solution.iter().any(|v| !v.is_finite()) {
        return Err(CalcError::singular("solution contains non-finite values"));
    }
    Ok(solution.iter().copied().collect())
}

/// Find every reaction for the given supports and loads.
///
/// Failures never escape: an indeterminate or singular system yields
/// [`ReactionSet::zeroed`] and an error entry in `log`.
pub fn resolve_reactions(
    loads: &LoadModel,
    conditions: &BoundaryConditions,
    precision: usize,
    log: &mut ExplanationLog,
) -> ReactionSet {
    let system = EquilibriumSystem::build(loads);
    log.info(Section::Reactions, format!("Force equilibrium: {}", system.force.display(precision)));
    log.info(Section::Reactions, format!("Moment equilibrium about A: {}", system.moment.display(precision)));

    for note in &conditions.notes {
        log.warning(Section::Reactions, note.clone());
    }
    if !conditions.known.is_empty() {
        let known = conditions
            .known
            .iter()
            .map(|(r, v)| format!("{} = {}", r, format_number(*v, precision)))
            .collect::<Vec<_>>()
            .join(", ");
        log.info(Section::Reactions, format!("Boundary conditions: {}", known));
    }

    let mut reactions = ReactionSet::zeroed();
    for (&reaction, &value) in &conditions.known {
        *reactions.entry_mut(reaction) = ReactionValue {
            value,
            origin: ReactionOrigin::Boundary,
        };
    }

    if conditions.unknowns.is_empty() {
        log.info(
            Section::Reactions,
            "No unknown reactions; every value is fixed by the boundary conditions",
        );
        check_unused_equations(&system, 0, &reactions, loads, precision, log);
        return reactions;
    }

    let reduced = system.substitute(&conditions.known);
    let selected = reduced.select(conditions.unknowns.len());
    for equation in &selected {
        log.info(Section::Reactions, format!("Solving {}", equation));
    }

    match solve_unknowns(&selected, &conditions.unknowns) {
        Ok(values) => {
            for (&reaction, value) in conditions.unknowns.iter().zip(values) {
                *reactions.entry_mut(reaction) = ReactionValue {
                    value,
                    origin: ReactionOrigin::Solved,
                };
            }
            log.info(Section::Reactions, "Reactions:");
            for reaction in Reaction::ALL {
                log.info(
                    Section::Reactions,
                    format!("- {} = {:.*}", reaction, precision, reactions.value(reaction)),
                );
            }
            check_unused_equations(&system, selected.len(), &reactions, loads, precision, log);
            reactions
        }
        Err(e) => {
            log.error(Section::Reactions, format!("Could not compute reactions: {}", e));
            log.warning(Section::Reactions, "Using default reactions (0)");
            ReactionSet::zeroed()
        }
    }
}

/// Report equilibrium equations that the solve did not enforce
fn check_unused_equations(
    system: &EquilibriumSystem,
    used: usize,
    reactions: &ReactionSet,
    loads: &LoadModel,
    precision: usize,
    log: &mut ExplanationLog,
) {
    let values = reactions.values();
    let scale = loads.total_load().abs().max(1.0) * loads.length.max(1.0);
    for equation in [&system.force, &system.moment].into_iter().skip(used) {
        let residual = equation.residual(&values);
        if residual.abs() > RESIDUAL_TOLERANCE * scale {
            log.warning(
                Section::Reactions,
                format!(
                    "{} is not satisfied (residual {}); the supports cannot carry this load in equilibrium",
                    equation.name,
                    format_number(residual, precision)
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beam::{BeamConfiguration, SupportKind};
    use crate::supports::classify;
    use approx::assert_abs_diff_eq;

    fn solve(config: &BeamConfiguration) -> (ReactionSet, ExplanationLog) {
        let (config, _) = config.normalize(1.0 / 6.0);
        let loads = LoadModel::from_configuration(&config);
        let conditions = classify(config.support_left, config.support_right);
        let mut log = ExplanationLog::new();
        let reactions = resolve_reactions(&loads, &conditions, 3, &mut log);
        (reactions, log)
    }

    #[test]
    fn test_simply_supported_point_load() {
        let config = BeamConfiguration::new(10.0, SupportKind::Simple, SupportKind::Simple)
            .with_point_load(1000.0, 3.0);
        let (r, _) = solve(&config);
        // R1 = P(L-a)/L = 700, R2 = Pa/L = 300
        assert_abs_diff_eq!(r.r_a.value, 700.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.r_b.value, 300.0, epsilon = 1e-9);
        assert_eq!(r.m_a.origin, ReactionOrigin::Boundary);
        assert_eq!(r.r_a.origin, ReactionOrigin::Solved);
    }

    #[test]
    fn test_simply_supported_partial_uniform() {
        // 100 over [2, 8] on 10: W = 600, centroid 5
        let config = BeamConfiguration::new(10.0, SupportKind::Simple, SupportKind::Simple)
            .with_distributed_load(100.0, 2.0, 8.0);
        let (r, _) = solve(&config);
        assert_abs_diff_eq!(r.r_a.value, 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.r_b.value, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cantilever_uniform_load() {
        let config = BeamConfiguration::new(10.0, SupportKind::Fixed, SupportKind::Free)
            .with_distributed_load(2.0, 0.0, 10.0);
        let (r, _) = solve(&config);
        assert_abs_diff_eq!(r.r_a.value, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.m_a.value, -100.0, epsilon = 1e-9);
        assert_eq!(r.r_b.value, 0.0);
        assert_eq!(r.m_b.value, 0.0);
    }

    #[test]
    fn test_cantilever_fixed_on_the_right() {
        let config = BeamConfiguration::new(4.0, SupportKind::Free, SupportKind::Fixed)
            .with_point_load(10.0, 1.0);
        let (r, log) = solve(&config);
        assert_abs_diff_eq!(r.r_b.value, 10.0, epsilon = 1e-9);
        // M(L) = -P (L - a) = -30
        assert_abs_diff_eq!(r.m_b.value, -30.0, epsilon = 1e-9);
        assert!(log.problems().any(|e| e.message.contains("free left support")));
    }

    #[test]
    fn test_fixed_fixed_is_indeterminate() {
        let config = BeamConfiguration::new(10.0, SupportKind::Fixed, SupportKind::Fixed)
            .with_point_load(10.0, 5.0);
        let (r, log) = solve(&config);
        assert_eq!(r, ReactionSet::zeroed());
        assert!(r.is_fallback());
        assert!(log
            .lines()
            .iter()
            .any(|l| l.contains("Statically indeterminate") && l.contains("4 unknowns")));
    }

    #[test]
    fn test_propped_cantilever_is_indeterminate() {
        let config = BeamConfiguration::new(10.0, SupportKind::Fixed, SupportKind::Simple)
            .with_point_load(10.0, 5.0);
        let (r, _) = solve(&config);
        assert!(r.is_fallback());
        assert_eq!(r.as_map().values().copied().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_simple_free_warns_about_moment_residual() {
        let config = BeamConfiguration::new(10.0, SupportKind::Simple, SupportKind::Free)
            .with_point_load(10.0, 5.0);
        let (r, log) = solve(&config);
        assert_abs_diff_eq!(r.r_a.value, 10.0, epsilon = 1e-9);
        assert!(log.problems().any(|e| e.message.starts_with("ΣM_A is not satisfied")));
    }

    #[test]
    fn test_free_free_has_no_unknowns() {
        let config = BeamConfiguration::new(10.0, SupportKind::Free, SupportKind::Free)
            .with_point_load(10.0, 5.0);
        let (r, log) = solve(&config);
        assert!(!r.is_fallback());
        assert_eq!(r.r_a.value, 0.0);
        assert!(log.lines().iter().any(|l| l.starts_with("No unknown reactions")));
        let lines = log.lines();
        assert!(lines.iter().any(|l| l.contains("ΣFy") && l.contains("is not satisfied")));
        assert!(lines.iter().any(|l| l.contains("ΣM_A") && l.contains("is not satisfied")));
    }

    #[test]
    fn test_free_free_unloaded_is_balanced() {
        let config = BeamConfiguration::new(10.0, SupportKind::Free, SupportKind::Free)
            .with_point_load(0.0, 5.0);
        let (_, log) = solve(&config);
        assert!(!log.lines().iter().any(|l| l.contains("is not satisfied")));
    }

    #[test]
    fn test_singular_system_is_reported() {
        let eq = LinearEquation::new("degenerate").with_constant(5.0);
        let err = solve_unknowns(&[&eq], &[Reaction::Ra]).unwrap_err();
        assert_eq!(err.error_code(), "SINGULAR_SYSTEM");
    }

    #[test]
    fn test_too_many_unknowns() {
        let eq = LinearEquation::new("one").with_term(Reaction::Ra, 1.0);
        let err = solve_unknowns(&[&eq], &[Reaction::Ra, Reaction::Rb]).unwrap_err();
        assert_eq!(err, CalcError::StaticallyIndeterminate { unknowns: 2, equations: 1 });
    }

    #[test]
    fn test_reaction_map_keys() {
        let map = ReactionSet::zeroed().as_map();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["M_A", "M_B", "R_A", "R_B"]);
    }
}
