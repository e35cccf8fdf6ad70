//! # beam_core - Single-Span Beam Statics Solver
//!
//! `beam_core` analyses one straight beam with an end support at each side,
//! one point load and one uniformly distributed load over a sub-span. It
//! produces the support reactions, closed-form shear V(x) and moment M(x)
//! expressions, both diagrams sampled on an even grid, and an ordered
//! explanation of every derivation step. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Never fails**: Analysis degrades to defaults and says so in its log
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types between internal stages
//!
//! ## Quick Start
//!
//! ```rust
//! use beam_core::{analyze_beam, BeamConfiguration, SupportKind};
//!
//! let config = BeamConfiguration::new(10.0, SupportKind::Fixed, SupportKind::Free)
//!     .with_distributed_load(2.0, 0.0, 10.0);
//!
//! let result = analyze_beam(&config);
//! assert!((result.reactions.m_a.value + 100.0).abs() < 1e-9);
//!
//! for line in result.explanation_lines() {
//!     println!("{}", line);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`beam`] - Beam configuration and analysis settings
//! - [`loads`] - Load function w(x) built from the configuration
//! - [`supports`] - Support classification into known and unknown reactions
//! - [`equations`] - Closed-form expressions and linear equilibrium equations
//! - [`calculations`] - Reactions, diagrams, sampling, and the entry point
//! - [`dice`] - Dice-driven configuration generator
//! - [`errors`] - Structured error types
//! - [`file_io`] - JSON configurations and reports with atomic saves

pub mod beam;
pub mod calculations;
pub mod dice;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod supports;

// Re-export commonly used types at crate root for convenience
pub use beam::{AnalysisSettings, BeamConfiguration, DistributedLoad, PointLoad, SupportKind};
pub use calculations::{analyze_beam, BeamAnalysisResult, BeamAnalyzer};
pub use dice::DiceRolls;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_configuration, load_report, save_configuration, save_report, AnalysisReport};
