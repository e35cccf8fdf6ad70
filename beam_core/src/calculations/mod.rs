//! # Beam Calculations
//!
//! The analysis pipeline, one module per step:
//!
//! - [`equilibrium`] - Equilibrium equations and reaction solving
//! - [`diagrams`] - Closed-form shear and moment expressions
//! - [`sampler`] - Grid evaluation with fallback and sanitizing
//! - [`explanation`] - Ordered, user-facing derivation log
//! - [`beam_analysis`] - The entry point tying the steps together
//!
//! All inputs and outputs are JSON-serializable.

pub mod beam_analysis;
pub mod diagrams;
pub mod equilibrium;
pub mod explanation;
pub mod sampler;

// Re-export commonly used types
pub use beam_analysis::{analyze_beam, BeamAnalysisResult, BeamAnalyzer, DiagramExtremes, Extreme};
pub use diagrams::Diagrams;
pub use equilibrium::{ReactionOrigin, ReactionSet, ReactionValue};
pub use explanation::{ExplanationLog, Level, LogEntry, Section};
pub use sampler::EvaluationGrid;
