//! # Beam Analysis
//!
//! The single entry point of the solver. One call runs the whole pipeline:
//!
//! ```text
//! configuration → load model → support classification → reactions
//!               → V(x), M(x) → sampled grid → BeamAnalysisResult
//! ```
//!
//! The call never fails. Every problem on the way (indeterminate supports,
//! points that do not evaluate, NaN in the arrays, even an invalid length)
//! degrades to default values plus an entry in the explanation log, so the
//! caller always receives a complete result.
//!
//! ## Example
//! ```rust
//! use beam_core::beam::{BeamConfiguration, SupportKind};
//! use beam_core::calculations::beam_analysis::analyze_beam;
//!
//! // 10 m simply supported beam, 10 kN at midspan
//! let config = BeamConfiguration::new(10.0, SupportKind::Simple, SupportKind::Simple)
//!     .with_point_load(10.0, 5.0);
//!
//! let result = analyze_beam(&config);
//! assert!((result.reactions.r_a.value - 5.0).abs() < 1e-9);
//! assert_eq!(result.positions.len(), 500);
//! println!("V(x) = {}", result.shear_expression);
//! println!("M(x) = {}", result.moment_expression);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::beam::{AnalysisSettings, BeamConfiguration};
use crate::equations::{format_number, Expr};
use crate::loads::LoadModel;
use crate::supports::classify;

use super::diagrams::Diagrams;
use super::equilibrium::{resolve_reactions, ReactionSet};
use super::explanation::{ExplanationLog, Section};
use super::sampler::{linspace, sample, EvaluationGrid};

/// A sampled extreme value and where it occurs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extreme {
    pub value: f64,
    pub position: f64,
}

/// Governing values read from the sampled arrays
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DiagramExtremes {
    /// Largest |V| (value reported with its sign)
    pub max_abs_shear: Extreme,
    /// Largest M (sagging)
    pub max_moment: Extreme,
    /// Smallest M (hogging)
    pub min_moment: Extreme,
}

impl DiagramExtremes {
    /// Scan index-aligned arrays. Ties keep the first position.
    pub fn from_samples(positions: &[f64], shear: &[f64], moment: &[f64]) -> Self {
        let mut extremes = DiagramExtremes::default();
        let Some(&first) = positions.first() else {
            return extremes;
        };
        extremes.max_abs_shear = Extreme { value: shear[0], position: first };
        extremes.max_moment = Extreme { value: moment[0], position: first };
        extremes.min_moment = Extreme { value: moment[0], position: first };

        for ((&x, &v), &m) in positions.iter().zip(shear).zip(moment).skip(1) {
            if v.abs() > extremes.max_abs_shear.value.abs() {
                extremes.max_abs_shear = Extreme { value: v, position: x };
            }
            if m > extremes.max_moment.value {
                extremes.max_moment = Extreme { value: m, position: x };
            }
            if m < extremes.min_moment.value {
                extremes.min_moment = Extreme { value: m, position: x };
            }
        }
        extremes
    }
}

/// Everything one analysis produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamAnalysisResult {
    /// The configuration after clamping and widening
    pub configuration: BeamConfiguration,
    /// R_A, M_A, R_B, M_B
    pub reactions: ReactionSet,
    /// V(x) in closed form
    pub shear_expression: Expr,
    /// M(x) in closed form
    pub moment_expression: Expr,
    /// Grid positions from 0 to L
    pub positions: Vec<f64>,
    /// V at each position
    pub shear_values: Vec<f64>,
    /// M at each position
    pub moment_values: Vec<f64>,
    /// Governing values from the samples
    pub extremes: DiagramExtremes,
    /// Ordered derivation steps, notes and warnings
    pub explanation_log: ExplanationLog,
}

impl BeamAnalysisResult {
    /// Reactions as a plain `{"R_A": .., ...}` mapping
    pub fn reactions_map(&self) -> BTreeMap<String, f64> {
        self.reactions.as_map()
    }

    /// Explanation flattened to strings
    pub fn explanation_lines(&self) -> Vec<String> {
        self.explanation_log.lines()
    }

    /// The sampled arrays as a grid
    pub fn grid(&self) -> EvaluationGrid {
        EvaluationGrid {
            positions: self.positions.clone(),
            shear: self.shear_values.clone(),
            moment: self.moment_values.clone(),
        }
    }
}

/// Stateless beam solver. Create one per request, or share it; it holds only
/// settings.
#[derive(Debug, Clone, Default)]
pub struct BeamAnalyzer {
    settings: AnalysisSettings,
}

impl BeamAnalyzer {
    /// Analyzer with custom settings
    pub fn new(settings: AnalysisSettings) -> Self {
        BeamAnalyzer { settings }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Run the full analysis
    pub fn analyze(&self, config: &BeamConfiguration) -> BeamAnalysisResult {
        let p = self.settings.precision;
        let mut log = ExplanationLog::new();

        if let Err(e) = config.validate() {
            log.error(Section::Inputs, format!("{}", e));
            log.warning(Section::Inputs, "Configuration cannot be analysed; returning zero results");
            return self.empty_result(config, log);
        }

        let (config, corrections) = config.normalize(self.settings.min_span_fraction);
        log_inputs(&config, p, &mut log);
        for note in corrections {
            log.info(Section::Inputs, note);
        }

        // Load model
        let loads = LoadModel::from_configuration(&config);
        log.info(Section::LoadFunction, format!("w(x) = {}", loads.distributed.display(p)));
        log.info(
            Section::LoadFunction,
            format!(
                "Point load P = {} at x = {:.2}",
                format_number(loads.point.magnitude, p),
                loads.point.position
            ),
        );
        log.info(
            Section::LoadFunction,
            format!("Resultant of w(x): {}", format_number(loads.total_distributed(), p)),
        );

        // Reactions
        let conditions = classify(config.support_left, config.support_right);
        let reactions = resolve_reactions(&loads, &conditions, p, &mut log);

        // Closed-form diagrams
        let diagrams = Diagrams::derive(&loads, &reactions);
        log.info(Section::Shear, format!("V(x) = {}", diagrams.shear.display(p)));
        log.info(Section::Moment, format!("M(x) = {}", diagrams.moment.display(p)));

        // Sampling
        let grid = sample(&diagrams, config.length, &self.settings, &mut log);
        let extremes = DiagramExtremes::from_samples(&grid.positions, &grid.shear, &grid.moment);

        BeamAnalysisResult {
            configuration: config,
            reactions,
            shear_expression: diagrams.shear,
            moment_expression: diagrams.moment,
            positions: grid.positions,
            shear_values: grid.shear,
            moment_values: grid.moment,
            extremes,
            explanation_log: log,
        }
    }

    /// Complete all-zero result for a configuration that cannot be analysed
    fn empty_result(&self, config: &BeamConfiguration, log: ExplanationLog) -> BeamAnalysisResult {
        let n = self.settings.grid_size();
        let length = if config.length.is_finite() && config.length > 0.0 {
            config.length
        } else {
            0.0
        };
        BeamAnalysisResult {
            configuration: config.clone(),
            reactions: ReactionSet::zeroed(),
            shear_expression: Expr::zero(),
            moment_expression: Expr::zero(),
            positions: linspace(0.0, length, n),
            shear_values: vec![0.0; n],
            moment_values: vec![0.0; n],
            extremes: DiagramExtremes::default(),
            explanation_log: log,
        }
    }
}

fn log_inputs(config: &BeamConfiguration, p: usize, log: &mut ExplanationLog) {
    log.info(Section::Inputs, format!("Length (L): {}", format_number(config.length, p)));
    log.info(Section::Inputs, format!("Left support: {}", config.support_left));
    log.info(Section::Inputs, format!("Right support: {}", config.support_right));
    log.info(
        Section::Inputs,
        format!(
            "Point load P: {} @ x={:.2}",
            format_number(config.point_load.magnitude, p),
            config.point_load.position
        ),
    );
    log.info(
        Section::Inputs,
        format!(
            "Distributed load w: {} from x={:.2} to x={:.2}",
            format_number(config.distributed_load.magnitude, p),
            config.distributed_load.start,
            config.distributed_load.end
        ),
    );
    log.info(Section::Inputs, format!("Stiffness (EI): {} (not used for V and M)", format_number(config.stiffness, p)));
}

/// Analyse one beam with default settings
pub fn analyze_beam(config: &BeamConfiguration) -> BeamAnalysisResult {
    BeamAnalyzer::default().analyze(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beam::SupportKind;

    const EPSILON: f64 = 0.01; // 1% tolerance for tests

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if b.abs() < 1e-10 {
            a.abs() < tol
        } else {
            ((a - b) / b).abs() < tol
        }
    }

    #[test]
    fn test_result_arrays_have_grid_size() {
        let config = BeamConfiguration::default().with_point_load(10.0, 5.0);
        let result = BeamAnalyzer::new(AnalysisSettings::default().with_sample_points(101)).analyze(&config);
        assert_eq!(result.positions.len(), 101);
        assert_eq!(result.shear_values.len(), 101);
        assert_eq!(result.moment_values.len(), 101);
    }

    #[test]
    fn test_extremes_for_midspan_point_load() {
        let config = BeamConfiguration::default().with_point_load(10.0, 5.0);
        let result = BeamAnalyzer::new(AnalysisSettings::default().with_sample_points(101)).analyze(&config);
        // grid hits x = 5 exactly with 101 points on [0, 10]
        assert!(approx_eq(result.extremes.max_moment.value, 25.0, EPSILON));
        assert!(approx_eq(result.extremes.max_moment.position, 5.0, EPSILON));
        assert!(approx_eq(result.extremes.max_abs_shear.value.abs(), 5.0, EPSILON));
    }

    #[test]
    fn test_log_walks_through_every_section() {
        let config = BeamConfiguration::default()
            .with_point_load(10.0, 5.0)
            .with_distributed_load(1.0, 2.0, 4.0);
        let result = analyze_beam(&config);
        let log = &result.explanation_log;
        for section in [
            Section::Inputs,
            Section::LoadFunction,
            Section::Reactions,
            Section::Shear,
            Section::Moment,
            Section::NumericEvaluation,
        ] {
            assert!(log.section(section).count() > 0, "missing {:?}", section);
        }
        assert!(result.explanation_lines()[0].starts_with("Length (L): 10"));
    }

    #[test]
    fn test_invalid_length_returns_complete_zero_result() {
        let config = BeamConfiguration::new(-3.0, SupportKind::Simple, SupportKind::Simple);
        let result = analyze_beam(&config);
        assert_eq!(result.positions.len(), 500);
        assert!(result.shear_values.iter().all(|v| *v == 0.0));
        assert!(result.reactions.is_fallback());
        assert!(result.explanation_log.problems().count() >= 1);
    }

    #[test]
    fn test_reactions_map_is_plain_numbers() {
        let config = BeamConfiguration::default().with_point_load(10.0, 5.0);
        let map = analyze_beam(&config).reactions_map();
        assert!(approx_eq(map["R_A"], 5.0, EPSILON));
        assert!(approx_eq(map["R_B"], 5.0, EPSILON));
        assert_eq!(map["M_A"], 0.0);
    }

    #[test]
    fn test_extremes_empty_input() {
        assert_eq!(DiagramExtremes::from_samples(&[], &[], &[]), DiagramExtremes::default());
    }
}
