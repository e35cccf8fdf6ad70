//! Closed-form functions of the beam position `x`.
//!
//! An [`Expr`] is a sum of [`Term`]s. Four term shapes are enough to write the
//! load, shear and moment of a beam carrying one point load and one uniform
//! load exactly:
//!
//! | Term | Value |
//! |---|---|
//! | `Constant(c)` | `c` |
//! | `Power { c, n }` | `c·xⁿ` |
//! | `Step { c, a, n }` | `c·(x − a)ⁿ·H(x − a)` |
//! | `Interval { c, s, e }` | `c` on `[s, e]`, 0 elsewhere |
//!
//! `H` is the unit step with `H(0) = 1` (right-continuous).
//!
//! Integration rules (antiderivative taken from 0):
//! - constant → linear power
//! - `c·xⁿ` → `c/(n+1)·xⁿ⁺¹`
//! - step of order n → step of order n+1 (a step becomes a ramp)
//! - interval `[s, e]` → ramp at `s` minus ramp at `e`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// One additive piece of an [`Expr`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Term {
    /// `c`
    Constant { value: f64 },
    /// `c·xⁿ` with `n ≥ 1`
    Power { coefficient: f64, exponent: u32 },
    /// `c·(x − a)ⁿ·H(x − a)`
    Step { coefficient: f64, at: f64, exponent: u32 },
    /// `c` for `start ≤ x ≤ end`, 0 elsewhere
    Interval { coefficient: f64, start: f64, end: f64 },
}

impl Term {
    /// Scale factor of the term
    pub fn coefficient(&self) -> f64 {
        match *self {
            Term::Constant { value } => value,
            Term::Power { coefficient, .. }
            | Term::Step { coefficient, .. }
            | Term::Interval { coefficient, .. } => coefficient,
        }
    }

    fn with_coefficient(&self, c: f64) -> Term {
        match *self {
            Term::Constant { .. } => Term::Constant { value: c },
            Term::Power { exponent, .. } => Term::Power { coefficient: c, exponent },
            Term::Step { at, exponent, .. } => Term::Step { coefficient: c, at, exponent },
            Term::Interval { start, end, .. } => Term::Interval { coefficient: c, start, end },
        }
    }

    /// Every number in the term is finite
    fn is_finite(&self) -> bool {
        match *self {
            Term::Constant { value } => value.is_finite(),
            Term::Power { coefficient, .. } => coefficient.is_finite(),
            Term::Step { coefficient, at, .. } => coefficient.is_finite() && at.is_finite(),
            Term::Interval { coefficient, start, end } => {
                coefficient.is_finite() && start.is_finite() && end.is_finite()
            }
        }
    }

    /// Value at `x`, no checks
    pub fn evaluate(&self, x: f64) -> f64 {
        match *self {
            Term::Constant { value } => value,
            Term::Power { coefficient, exponent } => coefficient * x.powi(exponent as i32),
            Term::Step { coefficient, at, exponent } => {
                if x >= at {
                    coefficient * (x - at).powi(exponent as i32)
                } else {
                    0.0
                }
            }
            Term::Interval { coefficient, start, end } => {
                if x >= start && x <= end {
                    coefficient
                } else {
                    0.0
                }
            }
        }
    }

    /// Antiderivative of the term (not yet pinned to F(0) = 0)
    fn antiderivative(&self) -> Vec<Term> {
        match *self {
            Term::Constant { value } => vec![Term::Power { coefficient: value, exponent: 1 }],
            Term::Power { coefficient, exponent } => vec![Term::Power {
                coefficient: coefficient / f64::from(exponent + 1),
                exponent: exponent + 1,
            }],
            Term::Step { coefficient, at, exponent } => vec![Term::Step {
                coefficient: coefficient / f64::from(exponent + 1),
                at,
                exponent: exponent + 1,
            }],
            Term::Interval { coefficient, start, end } => vec![
                Term::Step { coefficient, at: start, exponent: 1 },
                Term::Step { coefficient: -coefficient, at: end, exponent: 1 },
            ],
        }
    }

    /// `∫ x·term dx` over `[lo, hi]`
    fn first_moment(&self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return 0.0;
        }
        match *self {
            Term::Constant { value } => value * (hi * hi - lo * lo) / 2.0,
            Term::Power { coefficient, exponent } => {
                let n = exponent as i32 + 2;
                coefficient * (hi.powi(n) - lo.powi(n)) / f64::from(n)
            }
            Term::Step { coefficient, at, exponent } => {
                let from = lo.max(at);
                if hi <= from {
                    return 0.0;
                }
                // substitute u = x - a: ∫ (u + a)·uⁿ du
                let (u1, u2) = (from - at, hi - at);
                let n = exponent as i32;
                let upper = (u2.powi(n + 2) - u1.powi(n + 2)) / f64::from(n + 2);
                let lower = at * (u2.powi(n + 1) - u1.powi(n + 1)) / f64::from(n + 1);
                coefficient * (upper + lower)
            }
            Term::Interval { coefficient, start, end } => {
                let (from, to) = (lo.max(start), hi.min(end));
                if to <= from {
                    0.0
                } else {
                    coefficient * (to * to - from * from) / 2.0
                }
            }
        }
    }

    fn is_constant(&self) -> bool {
        matches!(self, Term::Constant { .. })
    }
}

/// Sum of terms, a closed-form function of `x`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expr {
    terms: Vec<Term>,
}

impl Expr {
    /// The zero function
    pub fn zero() -> Self {
        Expr { terms: Vec::new() }
    }

    /// A constant function
    pub fn constant(value: f64) -> Self {
        Expr::zero().plus(Term::Constant { value })
    }

    /// `c` on `[start, end]`, 0 elsewhere
    pub fn interval(coefficient: f64, start: f64, end: f64) -> Self {
        Expr::zero().plus(Term::Interval { coefficient, start, end })
    }

    /// `c·H(x − at)`
    pub fn step(coefficient: f64, at: f64) -> Self {
        Expr::zero().plus(Term::Step { coefficient, at, exponent: 0 })
    }

    /// Add one term
    pub fn plus(mut self, term: Term) -> Self {
        self.terms.push(term);
        self
    }

    /// Terms in insertion order
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Sum of two expressions
    pub fn plus_expr(&self, other: &Expr) -> Expr {
        let mut terms = self.terms.clone();
        terms.extend_from_slice(&other.terms);
        Expr { terms }.simplified()
    }

    /// Difference of two expressions
    pub fn minus_expr(&self, other: &Expr) -> Expr {
        self.plus_expr(&other.scale(-1.0))
    }

    /// Multiply by a number
    pub fn scale(&self, factor: f64) -> Expr {
        Expr {
            terms: self
                .terms
                .iter()
                .map(|t| t.with_coefficient(t.coefficient() * factor))
                .collect(),
        }
    }

    /// Merge constants and like powers, drop zero terms.
    ///
    /// Step and interval terms keep their order. The merged constant goes
    /// first, then powers by ascending exponent.
    pub fn simplified(&self) -> Expr {
        let mut constant = 0.0;
        let mut powers: Vec<(u32, f64)> = Vec::new();
        let mut rest = Vec::new();

        for term in &self.terms {
            match *term {
                Term::Constant { value } => constant += value,
                Term::Power { coefficient, exponent } => {
                    match powers.iter_mut().find(|(n, _)| *n == exponent) {
                        Some((_, c)) => *c += coefficient,
                        None => powers.push((exponent, coefficient)),
                    }
                }
                other => rest.push(other),
            }
        }
        powers.sort_by_key(|(n, _)| *n);

        let mut terms = Vec::with_capacity(1 + powers.len() + rest.len());
        if constant != 0.0 {
            terms.push(Term::Constant { value: constant });
        }
        terms.extend(
            powers
                .into_iter()
                .filter(|(_, c)| *c != 0.0)
                .map(|(exponent, coefficient)| Term::Power { coefficient, exponent }),
        );
        terms.extend(rest.into_iter().filter(|t| t.coefficient() != 0.0));
        Expr { terms }
    }

    /// Antiderivative `F(x) = ∫₀ˣ f(t) dt`
    pub fn integrate(&self) -> Expr {
        let mut terms: Vec<Term> = self.terms.iter().flat_map(Term::antiderivative).collect();
        // Steps placed left of the origin are already non-zero at x = 0.
        let offset: f64 = terms
            .iter()
            .filter(|t| !t.is_constant())
            .map(|t| t.evaluate(0.0))
            .sum();
        if offset != 0.0 {
            terms.push(Term::Constant { value: -offset });
        }
        Expr { terms }.simplified()
    }

    /// `∫ f(x) dx` over `[lo, hi]`
    pub fn definite_integral(&self, lo: f64, hi: f64) -> f64 {
        let antiderivative = self.integrate();
        antiderivative.evaluate(hi) - antiderivative.evaluate(lo)
    }

    /// `∫ x·f(x) dx` over `[lo, hi]`
    pub fn first_moment(&self, lo: f64, hi: f64) -> f64 {
        self.terms.iter().map(|t| t.first_moment(lo, hi)).sum()
    }

    /// Value at `x`, no checks
    pub fn evaluate(&self, x: f64) -> f64 {
        self.terms.iter().map(|t| t.evaluate(x)).sum()
    }

    /// Value at `x`, rejecting non-finite results
    pub fn try_evaluate(&self, x: f64) -> CalcResult<f64> {
        let value = self.evaluate(x);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(CalcError::evaluation_failed(self.to_string(), x, format!("result is {}", value)))
        }
    }

    /// Evaluate over a whole grid at once, term by term.
    ///
    /// Fails without partial output if any coefficient is non-finite or if
    /// any grid value comes out non-finite.
    pub fn evaluate_grid(&self, xs: &[f64]) -> CalcResult<Vec<f64>> {
        if let Some(term) = self.terms.iter().find(|t| !t.is_finite()) {
            return Err(CalcError::evaluation_failed(
                self.to_string(),
                xs.first().copied().unwrap_or(0.0),
                format!("term {} has a non-finite parameter", TermDisplay::new(term, 3)),
            ));
        }

        let mut values = vec![0.0; xs.len()];
        for term in &self.terms {
            for (value, &x) in values.iter_mut().zip(xs) {
                *value += term.evaluate(x);
            }
        }

        if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(CalcError::evaluation_failed(
                self.to_string(),
                xs[i],
                format!("result is {}", v),
            ));
        }
        Ok(values)
    }

    /// Positions where the function jumps (zero-order steps and interval edges)
    pub fn discontinuities(&self) -> Vec<f64> {
        let mut points: Vec<f64> = self
            .terms
            .iter()
            .flat_map(|t| match *t {
                Term::Step { at, exponent: 0, .. } => vec![at],
                Term::Interval { start, end, .. } => vec![start, end],
                _ => Vec::new(),
            })
            .collect();
        points.sort_by(|a, b| a.total_cmp(b));
        points.dedup();
        points
    }

    /// Plain-text rendering with `precision` decimals
    pub fn display(&self, precision: usize) -> String {
        let mut out = String::new();
        for (i, term) in self.terms.iter().enumerate() {
            let c = term.coefficient();
            let negative = c.is_sign_negative() && c != 0.0;
            if i == 0 {
                if negative {
                    out.push('-');
                }
            } else {
                out.push_str(if negative { " - " } else { " + " });
            }
            out.push_str(&TermDisplay::new(&term.with_coefficient(c.abs()), precision).to_string());
        }
        if out.is_empty() {
            out.push('0');
        }
        out
    }

    /// LaTeX rendering, `H` written as `\theta` like common CAS output
    pub fn to_latex(&self, precision: usize) -> String {
        let mut out = String::new();
        for (i, term) in self.terms.iter().enumerate() {
            let c = term.coefficient();
            let negative = c.is_sign_negative() && c != 0.0;
            if i == 0 {
                if negative {
                    out.push('-');
                }
            } else {
                out.push_str(if negative { " - " } else { " + " });
            }
            out.push_str(&latex_term(&term.with_coefficient(c.abs()), precision));
        }
        if out.is_empty() {
            out.push('0');
        }
        out
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(3))
    }
}

/// Format a number with at most `precision` decimals, trailing zeros removed
pub fn format_number(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{:.*}", precision, value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

/// `x - a`, `x + a` or `x`
fn shifted(at: f64, precision: usize) -> String {
    let a = format_number(at.abs(), precision);
    if a == "0" {
        "x".to_string()
    } else if at < 0.0 {
        format!("x + {}", a)
    } else {
        format!("x - {}", a)
    }
}

/// Coefficient prefix: empty for 1, `c·` otherwise
fn coefficient_prefix(c: f64, precision: usize, separator: &str) -> String {
    let text = format_number(c, precision);
    if text == "1" {
        String::new()
    } else {
        format!("{}{}", text, separator)
    }
}

struct TermDisplay<'a> {
    term: &'a Term,
    precision: usize,
}

impl<'a> TermDisplay<'a> {
    fn new(term: &'a Term, precision: usize) -> Self {
        TermDisplay { term, precision }
    }
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.precision;
        match *self.term {
            Term::Constant { value } => write!(f, "{}", format_number(value, p)),
            Term::Power { coefficient, exponent } => {
                let prefix = coefficient_prefix(coefficient, p, "·");
                if exponent == 1 {
                    write!(f, "{}x", prefix)
                } else {
                    write!(f, "{}x^{}", prefix, exponent)
                }
            }
            Term::Step { coefficient, at, exponent } => {
                let prefix = coefficient_prefix(coefficient, p, "·");
                let arg = shifted(at, p);
                match exponent {
                    0 => write!(f, "{}H({})", prefix, arg),
                    1 if arg == "x" => write!(f, "{}x·H({})", prefix, arg),
                    1 => write!(f, "{}({})·H({})", prefix, arg, arg),
                    n if arg == "x" => write!(f, "{}x^{}·H({})", prefix, n, arg),
                    n => write!(f, "{}({})^{}·H({})", prefix, arg, n, arg),
                }
            }
            Term::Interval { coefficient, start, end } => write!(
                f,
                "{{{} if {} ≤ x ≤ {}; 0 otherwise}}",
                format_number(coefficient, p),
                format_number(start, p),
                format_number(end, p)
            ),
        }
    }
}

fn latex_term(term: &Term, precision: usize) -> String {
    let p = precision;
    match *term {
        Term::Constant { value } => format_number(value, p),
        Term::Power { coefficient, exponent } => {
            let prefix = coefficient_prefix(coefficient, p, " ");
            if exponent == 1 {
                format!("{}x", prefix)
            } else {
                format!("{}x^{{{}}}", prefix, exponent)
            }
        }
        Term::Step { coefficient, at, exponent } => {
            let prefix = coefficient_prefix(coefficient, p, " ");
            let arg = shifted(at, p);
            let step = format!("\\theta\\left({}\\right)", arg);
            match exponent {
                0 => format!("{}{}", prefix, step),
                1 if arg == "x" => format!("{}x {}", prefix, step),
                1 => format!("{}\\left({}\\right) {}", prefix, arg, step),
                n if arg == "x" => format!("{}x^{{{}}} {}", prefix, n, step),
                n => format!("{}\\left({}\\right)^{{{}}} {}", prefix, arg, n, step),
            }
        }
        Term::Interval { coefficient, start, end } => format!(
            "\\begin{{cases}} {} & \\text{{for}}\\: {} \\leq x \\leq {} \\\\ 0 & \\text{{otherwise}} \\end{{cases}}",
            format_number(coefficient, p),
            format_number(start, p),
            format_number(end, p)
        ),
    }
}
