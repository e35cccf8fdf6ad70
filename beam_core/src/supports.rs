//! # Support Classifier
//!
//! Maps each end's [`SupportKind`] to the reactions it fixes (boundary
//! values) and the reactions left for equilibrium to solve.
//!
//! | Support | Known | Unknown |
//! |---|---|---|
//! | Simple | moment = 0 | vertical reaction |
//! | Fixed | - | vertical reaction, moment |
//! | Free | vertical reaction = 0, moment = 0 | - |
//!
//! A free left end cannot hold the beam up. It is still classified
//! (both reactions zero) and a note is attached instead of failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::beam::SupportKind;
use crate::equations::Reaction;

/// Which end of the beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamEnd {
    /// x = 0, reactions `R_A` and `M_A`
    Left,
    /// x = L, reactions `R_B` and `M_B`
    Right,
}

impl BeamEnd {
    /// `(vertical, moment)` reactions belonging to this end
    pub fn reactions(&self) -> (Reaction, Reaction) {
        match self {
            BeamEnd::Left => (Reaction::Ra, Reaction::Ma),
            BeamEnd::Right => (Reaction::Rb, Reaction::Mb),
        }
    }

    /// Lower-case name for messages
    pub fn name(&self) -> &'static str {
        match self {
            BeamEnd::Left => "left",
            BeamEnd::Right => "right",
        }
    }
}

/// Known values and unknowns for both supports
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundaryConditions {
    /// Reactions fixed by the support type
    pub known: BTreeMap<Reaction, f64>,
    /// Reactions to solve for, left support first
    pub unknowns: Vec<Reaction>,
    /// Remarks about unusual support choices
    pub notes: Vec<String>,
}

impl BoundaryConditions {
    /// Whether `reaction` is fixed by the supports
    pub fn is_known(&self, reaction: Reaction) -> bool {
        self.known.contains_key(&reaction)
    }

    fn apply(&mut self, end: BeamEnd, kind: SupportKind) {
        let (vertical, moment) = end.reactions();
        match kind {
            SupportKind::Simple => {
                self.known.insert(moment, 0.0);
                self.unknowns.push(vertical);
            }
            SupportKind::Fixed => {
                self.unknowns.push(vertical);
                self.unknowns.push(moment);
            }
            SupportKind::Free => {
                self.known.insert(vertical, 0.0);
                self.known.insert(moment, 0.0);
                if end == BeamEnd::Left {
                    self.notes.push(format!(
                        "A free {} support is not a stable boundary; using {} = {} = 0",
                        end.name(),
                        vertical,
                        moment
                    ));
                }
            }
        }
    }
}

/// Classify both supports.
///
/// # Example
///
/// ```
/// use beam_core::beam::SupportKind;
/// use beam_core::equations::Reaction;
/// use beam_core::supports::classify;
///
/// let bc = classify(SupportKind::Fixed, SupportKind::Free);
/// assert_eq!(bc.unknowns, vec![Reaction::Ra, Reaction::Ma]);
/// assert_eq!(bc.known.get(&Reaction::Rb), Some(&0.0));
/// ```
pub fn classify(left: SupportKind, right: SupportKind) -> BoundaryConditions {
    let mut conditions = BoundaryConditions::default();
    conditions.apply(BeamEnd::Left, left);
    conditions.apply(BeamEnd::Right, right);
    conditions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_simple() {
        let bc = classify(SupportKind::Simple, SupportKind::Simple);
        assert_eq!(bc.unknowns, vec![Reaction::Ra, Reaction::Rb]);
        assert_eq!(bc.known.get(&Reaction::Ma), Some(&0.0));
        assert_eq!(bc.known.get(&Reaction::Mb), Some(&0.0));
        assert!(bc.notes.is_empty());
    }

    #[test]
    fn test_fixed_fixed_has_four_unknowns() {
        let bc = classify(SupportKind::Fixed, SupportKind::Fixed);
        assert_eq!(bc.unknowns, Reaction::ALL.to_vec());
        assert!(bc.known.is_empty());
    }

    #[test]
    fn test_free_left_zeroes_reactions_with_note() {
        let bc = classify(SupportKind::Free, SupportKind::Simple);
        assert_eq!(bc.known.get(&Reaction::Ra), Some(&0.0));
        assert_eq!(bc.known.get(&Reaction::Ma), Some(&0.0));
        assert_eq!(bc.unknowns, vec![Reaction::Rb]);
        assert_eq!(bc.notes.len(), 1);
        assert!(bc.notes[0].contains("R_A = M_A = 0"));
    }

    #[test]
    fn test_free_right_is_silent() {
        let bc = classify(SupportKind::Simple, SupportKind::Free);
        assert!(bc.is_known(Reaction::Rb));
        assert!(bc.is_known(Reaction::Mb));
        assert!(bc.notes.is_empty());
    }
}
