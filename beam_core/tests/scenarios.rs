//! End-to-end checks of the analysis entry point against hand-calculated
//! beams and the structural properties every result must satisfy.

use approx::assert_abs_diff_eq;
use beam_core::calculations::{Level, ReactionOrigin, Section};
use beam_core::{analyze_beam, AnalysisSettings, BeamAnalysisResult, BeamAnalyzer, BeamConfiguration, SupportKind};

const TOL: f64 = 1e-9;

fn simple_simple(length: f64) -> BeamConfiguration {
    BeamConfiguration::new(length, SupportKind::Simple, SupportKind::Simple)
}

/// Configurations spread over the determinate support combinations
fn determinate_cases() -> Vec<BeamConfiguration> {
    vec![
        simple_simple(10.0).with_point_load(10.0, 5.0),
        simple_simple(7.5).with_point_load(3.0, 1.2).with_distributed_load(4.0, 2.0, 6.5),
        simple_simple(3.0).with_distributed_load(9.0, 0.0, 3.0),
        BeamConfiguration::new(10.0, SupportKind::Fixed, SupportKind::Free)
            .with_distributed_load(2.0, 0.0, 10.0),
        BeamConfiguration::new(6.0, SupportKind::Fixed, SupportKind::Free)
            .with_point_load(8.0, 4.5)
            .with_distributed_load(1.5, 1.0, 3.0),
        BeamConfiguration::new(4.0, SupportKind::Free, SupportKind::Fixed).with_point_load(10.0, 1.0),
    ]
}

fn index_bracketing(positions: &[f64], x: f64) -> usize {
    positions
        .windows(2)
        .position(|w| w[0] < x && x < w[1])
        .expect("x lies strictly between two grid points")
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

#[test]
fn scenario_a_simply_supported_midspan_point_load() {
    let result = analyze_beam(&simple_simple(10.0).with_point_load(10.0, 5.0));
    let r = &result.reactions;

    assert_abs_diff_eq!(r.r_a.value, 5.0, epsilon = TOL);
    assert_abs_diff_eq!(r.r_b.value, 5.0, epsilon = TOL);
    assert_eq!(r.m_a.value, 0.0);
    assert_eq!(r.m_b.value, 0.0);

    assert_abs_diff_eq!(result.shear_expression.evaluate(2.0), 5.0, epsilon = TOL);
    assert_abs_diff_eq!(result.shear_expression.evaluate(8.0), -5.0, epsilon = TOL);
    assert_abs_diff_eq!(result.moment_expression.evaluate(5.0), 25.0, epsilon = TOL);

    // the sampled peak sits next to midspan and never exceeds PL/4
    let peak = result.extremes.max_moment;
    assert!(peak.value <= 25.0 + TOL);
    assert!(peak.value > 24.9);
    assert!((peak.position - 5.0).abs() < 0.05);
}

#[test]
fn scenario_b_cantilever_under_full_uniform_load() {
    let result = analyze_beam(
        &BeamConfiguration::new(10.0, SupportKind::Fixed, SupportKind::Free)
            .with_distributed_load(2.0, 0.0, 10.0),
    );
    let r = &result.reactions;

    assert_abs_diff_eq!(r.r_a.value, 20.0, epsilon = TOL);
    assert_abs_diff_eq!(r.m_a.value, -100.0, epsilon = TOL);
    assert_eq!(r.r_b.value, 0.0);
    assert_eq!(r.m_b.value, 0.0);

    // |M| shrinks from the fixed end to the free end
    let m = &result.moment_values;
    assert_abs_diff_eq!(m[0], -100.0, epsilon = TOL);
    assert_abs_diff_eq!(m[m.len() - 1], 0.0, epsilon = 1e-6);
    assert!(m.windows(2).all(|w| w[1].abs() <= w[0].abs() + 1e-12));
    assert_abs_diff_eq!(result.extremes.min_moment.value, -100.0, epsilon = TOL);
}

#[test]
fn simple_supports_never_carry_moment() {
    for config in [
        simple_simple(10.0).with_point_load(10.0, 5.0),
        simple_simple(4.0).with_point_load(-3.0, 0.0).with_distributed_load(2.0, 3.0, 1.0),
        simple_simple(12.0).with_distributed_load(5.0, 6.0, 6.0),
        simple_simple(1.0),
    ] {
        let result = analyze_beam(&config);
        assert_eq!(result.reactions.m_a.value, 0.0);
        assert_eq!(result.reactions.m_b.value, 0.0);
        assert_eq!(result.reactions.m_a.origin, ReactionOrigin::Boundary);
    }
}

#[test]
fn vertical_reactions_balance_applied_load() {
    for config in determinate_cases() {
        let result = analyze_beam(&config);
        let c = &result.configuration;
        let applied = c.point_load.magnitude + c.distributed_load.magnitude * (c.distributed_load.end - c.distributed_load.start);
        let r = &result.reactions;
        assert_abs_diff_eq!(r.r_a.value + r.r_b.value, applied, epsilon = 1e-9 * applied.abs().max(1.0));
    }
}

#[test]
fn shear_drops_by_point_load_across_its_position() {
    let p = 10.0;
    let result = analyze_beam(&simple_simple(10.0).with_point_load(p, 5.0));
    let k = index_bracketing(&result.positions, 5.0);
    assert_abs_diff_eq!(result.shear_values[k + 1] - result.shear_values[k], -p, epsilon = TOL);

    // with a distributed load as well, the jump is P plus w over one grid step
    let w = 3.0;
    let result = analyze_beam(&simple_simple(10.0).with_point_load(p, 3.3).with_distributed_load(w, 0.0, 10.0));
    let k = index_bracketing(&result.positions, 3.3);
    let dx = result.positions[k + 1] - result.positions[k];
    assert_abs_diff_eq!(result.shear_values[k + 1] - result.shear_values[k], -p - w * dx, epsilon = 1e-9);
}

#[test]
fn moment_is_continuous_on_the_grid() {
    for config in determinate_cases() {
        let result = analyze_beam(&config);
        let dx = result.positions[1] - result.positions[0];
        let c = &result.configuration;
        let bound = (max_abs(&result.shear_values) + c.point_load.magnitude.abs() + c.distributed_load.magnitude.abs() * dx) * dx + TOL;
        for w in result.moment_values.windows(2) {
            assert!((w[1] - w[0]).abs() <= bound, "jump {} exceeds {}", w[1] - w[0], bound);
        }
        assert!(result.moment_expression.discontinuities().is_empty());
    }
}

#[test]
fn moment_derivative_recovers_shear() {
    for config in determinate_cases() {
        let result = analyze_beam(&config);
        let BeamAnalysisResult { positions, shear_values, moment_values, configuration, .. } = &result;
        let x_p = configuration.point_load.position;
        let scale = max_abs(shear_values).max(1.0);

        for i in 1..positions.len() - 1 {
            // central differences straddling the kink average both sides
            if positions[i - 1] <= x_p && x_p <= positions[i + 1] {
                continue;
            }
            let slope = (moment_values[i + 1] - moment_values[i - 1]) / (positions[i + 1] - positions[i - 1]);
            assert!(
                (slope - shear_values[i]).abs() < 0.02 * scale,
                "dM/dx = {} but V = {} at x = {}",
                slope,
                shear_values[i],
                positions[i]
            );
        }
    }
}

#[test]
fn degenerate_span_is_widened_and_still_loads_the_beam() {
    let result = analyze_beam(&simple_simple(12.0).with_distributed_load(4.0, 3.0, 3.0));
    let span = &result.configuration.distributed_load;
    assert_abs_diff_eq!(span.start, 3.0, epsilon = TOL);
    assert_abs_diff_eq!(span.end, 5.0, epsilon = TOL);
    assert_abs_diff_eq!(result.reactions.r_a.value + result.reactions.r_b.value, 8.0, epsilon = TOL);
    assert!(result
        .explanation_log
        .section(Section::Inputs)
        .any(|e| e.message.contains("widened")));

    // at the right end the span grows leftwards instead
    let result = analyze_beam(&simple_simple(12.0).with_distributed_load(4.0, 12.0, 12.0));
    let span = &result.configuration.distributed_load;
    assert_abs_diff_eq!(span.start, 10.0, epsilon = TOL);
    assert_abs_diff_eq!(span.end, 12.0, epsilon = TOL);
    assert!(result.reactions.r_b.value > result.reactions.r_a.value);
}

#[test]
fn zero_span_fraction_still_widens_to_a_sixth() {
    let settings = AnalysisSettings {
        min_span_fraction: 0.0,
        ..AnalysisSettings::default()
    };
    let result = BeamAnalyzer::new(settings).analyze(&simple_simple(12.0).with_distributed_load(4.0, 3.0, 3.0));
    let span = &result.configuration.distributed_load;
    assert!(span.end > span.start);
    assert_abs_diff_eq!(span.end - span.start, 2.0, epsilon = TOL);
    assert_abs_diff_eq!(result.reactions.r_a.value + result.reactions.r_b.value, 8.0, epsilon = TOL);
}

#[test]
fn out_of_range_positions_are_clamped() {
    let result = analyze_beam(&simple_simple(10.0).with_point_load(6.0, 14.0).with_distributed_load(1.0, 8.0, -2.0));
    let c = &result.configuration;
    assert_eq!(c.point_load.position, 10.0);
    assert_eq!(c.distributed_load.start, 0.0);
    assert_eq!(c.distributed_load.end, 8.0);
    // a point load over the right support goes straight into R_B
    assert_abs_diff_eq!(result.reactions.r_b.value, 6.0 + 8.0 * 4.0 / 10.0, epsilon = TOL);
}

#[test]
fn free_left_support_zeroes_its_reactions_with_a_warning() {
    let result = analyze_beam(&BeamConfiguration::new(4.0, SupportKind::Free, SupportKind::Fixed).with_point_load(10.0, 1.0));
    let r = &result.reactions;
    assert_eq!(r.r_a.value, 0.0);
    assert_eq!(r.m_a.value, 0.0);
    assert_abs_diff_eq!(r.r_b.value, 10.0, epsilon = TOL);
    assert_abs_diff_eq!(r.m_b.value, -30.0, epsilon = TOL);
    assert_abs_diff_eq!(result.moment_values[result.moment_values.len() - 1], -30.0, epsilon = TOL);
    assert!(result
        .explanation_log
        .problems()
        .any(|e| e.message.contains("free left support")));
}

#[test]
fn fixed_fixed_falls_back_to_zero_reactions() {
    let result = analyze_beam(&BeamConfiguration::new(10.0, SupportKind::Fixed, SupportKind::Fixed).with_point_load(10.0, 5.0));
    assert!(result.reactions.is_fallback());
    assert!(result.reactions_map().values().all(|v| *v == 0.0));

    let errors: Vec<_> = result
        .explanation_log
        .entries()
        .iter()
        .filter(|e| e.level == Level::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("indeterminate"));
    assert!(result.explanation_lines().iter().any(|l| l == "Warning: Using default reactions (0)"));

    // the diagrams are still complete, built from the zero reactions
    assert_eq!(result.shear_values.len(), 500);
    assert_abs_diff_eq!(result.shear_values[0], 0.0, epsilon = TOL);
}

#[test]
fn unstable_arrangement_reports_unbalanced_moment() {
    let result = analyze_beam(&BeamConfiguration::new(5.0, SupportKind::Simple, SupportKind::Free).with_point_load(2.0, 3.0));
    assert_abs_diff_eq!(result.reactions.r_a.value, 2.0, epsilon = TOL);
    assert!(result
        .explanation_log
        .problems()
        .any(|e| e.message.contains("is not satisfied")));
}

#[test]
fn free_free_under_load_reports_both_unbalanced_equations() {
    let result = analyze_beam(&BeamConfiguration::new(10.0, SupportKind::Free, SupportKind::Free).with_point_load(10.0, 5.0));
    assert!(!result.reactions.is_fallback());
    assert_abs_diff_eq!(result.shear_values[result.shear_values.len() - 1], -10.0, epsilon = TOL);

    let unbalanced: Vec<_> = result
        .explanation_log
        .problems()
        .filter(|e| e.message.contains("is not satisfied"))
        .collect();
    assert_eq!(unbalanced.len(), 2);
}

#[test]
fn outputs_have_grid_length_and_finite_values() {
    let analyzer = BeamAnalyzer::new(AnalysisSettings::default().with_sample_points(37));
    let mut cases = determinate_cases();
    cases.push(BeamConfiguration::new(10.0, SupportKind::Fixed, SupportKind::Fixed));
    cases.push(BeamConfiguration::new(f64::NAN, SupportKind::Simple, SupportKind::Simple));
    cases.push(simple_simple(1.0e300).with_distributed_load(1.0e300, 0.0, 1.0e300));

    for config in cases {
        let result = analyzer.analyze(&config);
        assert_eq!(result.positions.len(), 37);
        assert_eq!(result.shear_values.len(), 37);
        assert_eq!(result.moment_values.len(), 37);
        assert!(result.shear_values.iter().chain(&result.moment_values).all(|v| v.is_finite()));
        assert!(result.reactions_map().values().all(|v| v.is_finite()));
    }
}

#[test]
fn concurrent_analyses_are_independent() {
    let cases = determinate_cases();
    let sequential: Vec<_> = cases.iter().map(analyze_beam).collect();

    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = cases.iter().map(|c| scope.spawn(move || analyze_beam(c))).collect();
        handles.into_iter().map(|h| h.join().expect("analysis thread panicked")).collect()
    });

    for (a, b) in sequential.iter().zip(&parallel) {
        assert_eq!(a.reactions, b.reactions);
        assert_eq!(a.shear_values, b.shear_values);
        assert_eq!(a.explanation_lines(), b.explanation_lines());
    }
}

#[test]
fn result_serializes_to_json() {
    let result = analyze_beam(&simple_simple(10.0).with_point_load(10.0, 5.0));
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["positions"].as_array().map(|a| a.len()), Some(500));
    assert_eq!(json["configuration"]["support_left"], "Simple");
    assert!(json["explanation_log"]["entries"].is_array());
}
