//! # Load Model
//!
//! Turns the configured loads into the pieces the solver integrates:
//!
//! - the continuous load `w(x)`: the distributed magnitude on
//!   `[start, end]`, 0 elsewhere
//! - the point load, kept apart as a `(magnitude, position)` pair because it
//!   is not part of `w(x)`; it enters shear as a jump
//!
//! # Example
//!
//! ```
//! use beam_core::beam::{BeamConfiguration, SupportKind};
//! use beam_core::loads::LoadModel;
//!
//! let config = BeamConfiguration::new(10.0, SupportKind::Fixed, SupportKind::Free)
//!     .with_distributed_load(2.0, 0.0, 10.0);
//! let model = LoadModel::from_configuration(&config);
//!
//! assert_eq!(model.total_distributed(), 20.0);
//! assert_eq!(model.distributed_moment_about_left(), 100.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::beam::{BeamConfiguration, PointLoad};
use crate::equations::Expr;

/// Loads acting on the beam, ready for integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadModel {
    /// Beam length the integrals run over
    pub length: f64,
    /// Continuous load `w(x)`
    pub distributed: Expr,
    /// Concentrated load, outside `w(x)`
    pub point: PointLoad,
}

impl LoadModel {
    /// Build the load model.
    ///
    /// Expects a configuration already passed through
    /// [`BeamConfiguration::normalize`], so the span is inside the beam.
    pub fn from_configuration(config: &BeamConfiguration) -> Self {
        let load = &config.distributed_load;
        LoadModel {
            length: config.length,
            distributed: Expr::interval(load.magnitude, load.start, load.end).simplified(),
            point: config.point_load,
        }
    }

    /// `∫₀ᴸ w(x) dx`
    pub fn total_distributed(&self) -> f64 {
        self.distributed.definite_integral(0.0, self.length)
    }

    /// `∫₀ᴸ w(x)·x dx`
    pub fn distributed_moment_about_left(&self) -> f64 {
        self.distributed.first_moment(0.0, self.length)
    }

    /// Total downward force, `P + ∫w`
    pub fn total_load(&self) -> f64 {
        self.point.magnitude + self.total_distributed()
    }

    /// True when the point load is non-zero and produces a jump in shear
    pub fn has_point_load(&self) -> bool {
        self.point.magnitude != 0.0
    }
}
