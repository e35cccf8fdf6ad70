//! # Closed-Form Equations
//!
//! The small algebra the beam solver works in:
//!
//! - [`expression`] - functions of position `x` built from constant, power,
//!   step and interval terms, with exact integration rules
//! - [`linear`] - reaction symbols and linear equilibrium equations
//!
//! ## Sign Conventions
//!
//! - **Loads**: Positive downward (gravity direction)
//! - **Reactions**: Positive upward (resisting gravity)
//! - **Shear**: Positive when left side moves up relative to right
//! - **Moment**: Positive causes tension on bottom fiber (sagging)
//! - **Moment reactions**: Reported in the moment-diagram convention,
//!   so `M(0) = M_A` and `M(L) = M_B`

pub mod expression;
pub mod linear;

pub use expression::{format_number, Expr, Term};
pub use linear::{LinearEquation, Reaction};
