//! # Diagram Derivation
//!
//! Shear and moment as closed-form functions of `x`:
//!
//! ```text
//! V(x) = R_A − ∫₀ˣ w(t) dt − P·H(x − x_P)
//! M(x) = M_A + ∫₀ˣ V(t) dt
//! ```
//!
//! The step term is the only discontinuity in `V`: a drop of `P` at `x_P`.
//! Integrating it gives a ramp, so `M` is continuous with a kink there.

use serde::{Deserialize, Serialize};

use crate::equations::{Expr, Reaction};
use crate::loads::LoadModel;

use super::equilibrium::ReactionSet;

/// Shear and moment expressions of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagrams {
    /// V(x)
    pub shear: Expr,
    /// M(x)
    pub moment: Expr,
}

impl Diagrams {
    /// Derive both diagrams from the loads and solved reactions
    pub fn derive(loads: &LoadModel, reactions: &ReactionSet) -> Self {
        let shear = shear_expression(loads, reactions.value(Reaction::Ra));
        let moment = Expr::constant(reactions.value(Reaction::Ma))
            .plus_expr(&shear.integrate());
        Diagrams { shear, moment }
    }
}

/// `V(x)` for a given left reaction
pub fn shear_expression(loads: &LoadModel, r_a: f64) -> Expr {
    let mut shear = Expr::constant(r_a).minus_expr(&loads.distributed.integrate());
    if loads.has_point_load() {
        shear = shear.minus_expr(&Expr::step(loads.point.magnitude, loads.point.position));
    }
    shear
}
