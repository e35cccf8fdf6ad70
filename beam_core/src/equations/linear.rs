//! Reaction symbols and linear equilibrium equations.
//!
//! An equation is stored as `Σ cᵢ·rᵢ + k = 0` over the four support
//! reactions. Substituting a known reaction folds its contribution into `k`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::expression::format_number;

/// One support degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Reaction {
    /// Vertical reaction at the left end
    #[serde(rename = "R_A")]
    Ra,
    /// Moment reaction at the left end
    #[serde(rename = "M_A")]
    Ma,
    /// Vertical reaction at the right end
    #[serde(rename = "R_B")]
    Rb,
    /// Moment reaction at the right end
    #[serde(rename = "M_B")]
    Mb,
}

impl Reaction {
    /// All reactions in solving order (left support first)
    pub const ALL: [Reaction; 4] = [Reaction::Ra, Reaction::Ma, Reaction::Rb, Reaction::Mb];

    /// Symbol used in equations and reports
    pub fn symbol(&self) -> &'static str {
        match self {
            Reaction::Ra => "R_A",
            Reaction::Ma => "M_A",
            Reaction::Rb => "R_B",
            Reaction::Mb => "M_B",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `Σ cᵢ·rᵢ + constant = 0`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinearEquation {
    /// Label shown in reports, e.g. `ΣFy`
    pub name: String,
    coefficients: BTreeMap<Reaction, f64>,
    constant: f64,
}

impl LinearEquation {
    /// Empty equation `0 = 0`
    pub fn new(name: impl Into<String>) -> Self {
        LinearEquation {
            name: name.into(),
            coefficients: BTreeMap::new(),
            constant: 0.0,
        }
    }

    /// Add `c·r`
    pub fn with_term(mut self, reaction: Reaction, coefficient: f64) -> Self {
        *self.coefficients.entry(reaction).or_insert(0.0) += coefficient;
        self
    }

    /// Add a constant
    pub fn with_constant(mut self, value: f64) -> Self {
        self.constant += value;
        self
    }

    /// Coefficient of `reaction` (0 when absent)
    pub fn coefficient(&self, reaction: Reaction) -> f64 {
        self.coefficients.get(&reaction).copied().unwrap_or(0.0)
    }

    /// Constant part
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Replace known reactions by their values
    pub fn substitute(&self, known: &BTreeMap<Reaction, f64>) -> LinearEquation {
        let mut out = LinearEquation::new(self.name.clone()).with_constant(self.constant);
        for (&reaction, &coefficient) in &self.coefficients {
            match known.get(&reaction) {
                Some(value) => out.constant += coefficient * value,
                None => {
                    out.coefficients.insert(reaction, coefficient);
                }
            }
        }
        out
    }

    /// Left-hand side evaluated with every reaction given (missing ones are 0)
    pub fn residual(&self, values: &BTreeMap<Reaction, f64>) -> f64 {
        self.coefficients
            .iter()
            .map(|(r, c)| c * values.get(r).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }

    /// Text form with `precision` decimals, e.g. `R_A + R_B - 30 = 0`
    pub fn display(&self, precision: usize) -> String {
        let mut out = String::new();
        let terms = self
            .coefficients
            .iter()
            .filter(|(_, c)| **c != 0.0)
            .map(|(r, c)| (*c, Some(*r)))
            .chain((self.constant != 0.0).then_some((self.constant, None)));

        for (i, (c, reaction)) in terms.enumerate() {
            let sign = if c < 0.0 { "-" } else { "+" };
            if i == 0 {
                if c < 0.0 {
                    out.push('-');
                }
            } else {
                out.push_str(&format!(" {} ", sign));
            }
            let magnitude = format_number(c.abs(), precision);
            match reaction {
                Some(r) if magnitude == "1" => out.push_str(r.symbol()),
                Some(r) => out.push_str(&format!("{}·{}", magnitude, r.symbol())),
                None => out.push_str(&magnitude),
            }
        }
        if out.is_empty() {
            out.push('0');
        }
        out.push_str(" = 0");
        out
    }
}

impl fmt::Display for LinearEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.display(3))
    }
}
