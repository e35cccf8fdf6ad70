//! # Dice-Driven Beam Generator
//!
//! Produces a practice problem from dice. Each input has its own group of
//! six-sided dice:
//!
//! | Input               | Dice | Rule                                         |
//! |---------------------|------|----------------------------------------------|
//! | Left support        | 3    | first die ≤ 3 → Fixed, else Simple           |
//! | Length              | 2    | sum / 2                                      |
//! | Point load position | 2    | (sum / 12) · L                               |
//! | Point load          | 3    | sum                                          |
//! | Distributed load    | 3    | sum                                          |
//! | Distributed span    | 2    | die / 6 each as a fraction of L, sorted      |
//! | Right support       | 3    | first die ≤ 3 → Simple, else Free            |
//! | Stiffness (EI)      | 4    | sum                                          |
//!
//! ## Example
//!
//! ```rust
//! use beam_core::dice::DiceRolls;
//! use beam_core::beam::SupportKind;
//!
//! let dice = DiceRolls {
//!     support_left: [1, 5, 5],
//!     length: [6, 6],
//!     point_load_position: [3, 3],
//!     point_load_magnitude: [4, 4, 4],
//!     distributed_load_magnitude: [1, 1, 1],
//!     distributed_load_span: [2, 5],
//!     support_right: [6, 1, 1],
//!     stiffness: [6, 6, 6, 6],
//! };
//!
//! let config = dice.interpret().unwrap();
//! assert_eq!(config.support_left, SupportKind::Fixed);
//! assert_eq!(config.support_right, SupportKind::Free);
//! assert_eq!(config.length, 6.0);
//! assert_eq!(config.point_load.position, 3.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::beam::{BeamConfiguration, SupportKind};
use crate::errors::{CalcError, CalcResult};

const FACES: u32 = 6;

/// One set of dice for every generated input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRolls {
    pub support_left: [u8; 3],
    pub length: [u8; 2],
    pub point_load_position: [u8; 2],
    pub point_load_magnitude: [u8; 3],
    pub distributed_load_magnitude: [u8; 3],
    pub distributed_load_span: [u8; 2],
    pub support_right: [u8; 3],
    pub stiffness: [u8; 4],
}

impl DiceRolls {
    /// Roll every die from the OS entropy source
    pub fn roll() -> CalcResult<Self> {
        Ok(DiceRolls {
            support_left: roll_group()?,
            length: roll_group()?,
            point_load_position: roll_group()?,
            point_load_magnitude: roll_group()?,
            distributed_load_magnitude: roll_group()?,
            distributed_load_span: roll_group()?,
            support_right: roll_group()?,
            stiffness: roll_group()?,
        })
    }

    /// Each group with its name, for display and validation
    pub fn groups(&self) -> [(&'static str, &[u8]); 8] {
        [
            ("support_left", &self.support_left),
            ("length", &self.length),
            ("point_load_position", &self.point_load_position),
            ("point_load_magnitude", &self.point_load_magnitude),
            ("distributed_load_magnitude", &self.distributed_load_magnitude),
            ("distributed_load_span", &self.distributed_load_span),
            ("support_right", &self.support_right),
            ("stiffness", &self.stiffness),
        ]
    }

    /// Reject any die outside 1..=6
    pub fn validate(&self) -> CalcResult<()> {
        for (name, dice) in self.groups() {
            if let Some(bad) = dice.iter().find(|d| !(1..=FACES as u8).contains(*d)) {
                return Err(CalcError::invalid_input(
                    format!("dice.{}", name),
                    bad.to_string(),
                    "Dice values must be between 1 and 6",
                ));
            }
        }
        Ok(())
    }

    /// Turn the dice into a beam configuration
    pub fn interpret(&self) -> CalcResult<BeamConfiguration> {
        self.validate()?;

        let support_left = if self.support_left[0] <= 3 {
            SupportKind::Fixed
        } else {
            SupportKind::Simple
        };
        let support_right = if self.support_right[0] <= 3 {
            SupportKind::Simple
        } else {
            SupportKind::Free
        };

        let length = sum(&self.length) / 2.0;
        let position = sum(&self.point_load_position) / 12.0 * length;

        let mut start = f64::from(self.distributed_load_span[0]) / 6.0;
        let mut end = f64::from(self.distributed_load_span[1]) / 6.0;
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        if start == end {
            end = (start + 1.0 / 6.0).min(1.0);
        }

        Ok(BeamConfiguration::new(length, support_left, support_right)
            .with_point_load(sum(&self.point_load_magnitude), position)
            .with_distributed_load(sum(&self.distributed_load_magnitude), start * length, end * length)
            .with_stiffness(sum(&self.stiffness)))
    }
}

fn sum(dice: &[u8]) -> f64 {
    dice.iter().map(|d| f64::from(*d)).sum()
}

fn roll_group<const N: usize>() -> CalcResult<[u8; N]> {
    let mut dice = [0u8; N];
    for die in dice.iter_mut() {
        *die = roll_die()?;
    }
    Ok(dice)
}

/// Uniform 1..=6. Draws above the largest multiple of 6 are rejected to
/// avoid modulo bias.
fn roll_die() -> CalcResult<u8> {
    let limit = u32::MAX - u32::MAX % FACES;
    loop {
        let draw = getrandom::u32().map_err(|e| CalcError::Internal {
            message: format!("Entropy source unavailable: {}", e),
        })?;
        if draw < limit {
            return Ok((draw % FACES) as u8 + 1);
        }
    }
}
