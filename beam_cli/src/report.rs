use std::fmt::{self, Write};

use beam_core::calculations::{BeamAnalysisResult, Level, Section};
use beam_core::equations::format_number;
use beam_core::{BeamConfiguration, DiceRolls};

const RULE: &str = "═══════════════════════════════════════";

/// Rows in the coarse value table
const TABLE_ROWS: usize = 11;

/// Render the full terminal report for one analysis.
///
/// `precision` is the number of decimals used for reactions and table values.
pub fn render_report(result: &BeamAnalysisResult, dice: Option<&DiceRolls>, latex: bool, precision: usize) -> String {
    let mut output = String::new();
    // writing to a String cannot fail
    let _ = write_report(&mut output, result, dice, latex, precision);
    output
}

fn write_report(
    out: &mut String,
    result: &BeamAnalysisResult,
    dice: Option<&DiceRolls>,
    latex: bool,
    precision: usize,
) -> fmt::Result {
    if let Some(dice) = dice {
        write_dice(out, dice)?;
        writeln!(out)?;
    }

    banner(out, "BEAM INPUT")?;
    write_configuration(out, &result.configuration, precision)?;
    writeln!(out)?;

    banner(out, "DERIVATION")?;
    write_explanation(out, result)?;
    writeln!(out)?;

    banner(out, "RESULTS")?;
    writeln!(out, "Reactions:")?;
    for (name, value) in result.reactions_map() {
        writeln!(out, "  {:<4} = {:>12.*}", name, precision, value)?;
    }
    writeln!(out)?;
    writeln!(out, "V(x) = {}", result.shear_expression.display(precision))?;
    writeln!(out, "M(x) = {}", result.moment_expression.display(precision))?;
    if latex {
        writeln!(out, "V(x) [LaTeX] = {}", result.shear_expression.to_latex(precision))?;
        writeln!(out, "M(x) [LaTeX] = {}", result.moment_expression.to_latex(precision))?;
    }
    writeln!(out)?;

    let e = &result.extremes;
    writeln!(out, "Extremes (sampled):")?;
    writeln!(out, "  max |V| = {:.*} at x = {:.3}", precision, e.max_abs_shear.value, e.max_abs_shear.position)?;
    writeln!(out, "  max M   = {:.*} at x = {:.3}", precision, e.max_moment.value, e.max_moment.position)?;
    writeln!(out, "  min M   = {:.*} at x = {:.3}", precision, e.min_moment.value, e.min_moment.position)?;
    writeln!(out)?;

    write_table(out, result, precision)?;

    let problems = result.explanation_log.problems().count();
    writeln!(out, "{}", RULE)?;
    if problems == 0 {
        writeln!(out, "  STATUS: OK")?;
    } else {
        writeln!(out, "  STATUS: {} warning(s), see derivation", problems)?;
    }
    writeln!(out, "{}", RULE)?;
    Ok(())
}

fn banner(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "  {}", title)?;
    writeln!(out, "{}", RULE)
}

fn write_dice(out: &mut String, dice: &DiceRolls) -> fmt::Result {
    writeln!(out, "Dice rolled:")?;
    for (name, values) in dice.groups() {
        let faces: Vec<String> = values.iter().map(u8::to_string).collect();
        writeln!(out, "  {:<28} {}", name, faces.join(" "))?;
    }
    Ok(())
}

fn write_configuration(out: &mut String, config: &BeamConfiguration, precision: usize) -> fmt::Result {
    let n = |v: f64| format_number(v, precision);
    writeln!(out, "  Length:           {}", n(config.length))?;
    writeln!(out, "  Supports:         {} (left), {} (right)", config.support_left, config.support_right)?;
    writeln!(
        out,
        "  Point load:       P = {} at x = {}",
        n(config.point_load.magnitude),
        n(config.point_load.position)
    )?;
    writeln!(
        out,
        "  Distributed load: w = {} on [{}, {}]",
        n(config.distributed_load.magnitude),
        n(config.distributed_load.start),
        n(config.distributed_load.end)
    )?;
    writeln!(out, "  Stiffness (EI):   {}", n(config.stiffness))
}

fn write_explanation(out: &mut String, result: &BeamAnalysisResult) -> fmt::Result {
    let mut current: Option<Section> = None;
    for entry in result.explanation_log.entries() {
        if current != Some(entry.section) {
            writeln!(out, "{}", entry.section.title())?;
            current = Some(entry.section);
        }
        let marker = match entry.level {
            Level::Info => " ",
            Level::Warning => "!",
            Level::Error => "x",
        };
        writeln!(out, " {} {}", marker, entry)?;
    }
    Ok(())
}

fn write_table(out: &mut String, result: &BeamAnalysisResult, precision: usize) -> fmt::Result {
    let grid = result.grid();
    if grid.is_empty() {
        return Ok(());
    }
    let n = grid.len();
    writeln!(out, "Grid: {} points, dx = {:.4}", n, grid.spacing())?;
    writeln!(out, "{:>10} {:>14} {:>14}", "x", "V(x)", "M(x)")?;
    let rows = TABLE_ROWS.min(n);
    let mut last = None;
    for k in 0..rows {
        let i = if rows == 1 { 0 } else { k * (n - 1) / (rows - 1) };
        if last == Some(i) {
            continue;
        }
        last = Some(i);
        writeln!(
            out,
            "{:>10.3} {:>14.*} {:>14.*}",
            grid.positions[i], precision, grid.shear[i], precision, grid.moment[i]
        )?;
    }
    writeln!(out)
}
