//! # Beam Configuration
//!
//! Input types for a single-span beam: length, the two end supports, one
//! point load and one uniformly distributed load over a sub-span.
//!
//! Positions are measured from the left end (x = 0). Loads are positive
//! downward.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::beam::{BeamConfiguration, SupportKind};
//!
//! let config = BeamConfiguration::new(10.0, SupportKind::Simple, SupportKind::Simple)
//!     .with_point_load(10.0, 5.0);
//!
//! assert!(config.validate().is_ok());
//! let json = serde_json::to_string(&config).unwrap();
//! assert!(json.contains("\"Simple\""));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Boundary condition at one end of the beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SupportKind {
    /// Clamped end: carries a vertical reaction and a moment reaction
    #[serde(alias = "Empotrado")]
    Fixed,
    /// Pin or roller: carries a vertical reaction, no moment
    #[default]
    Simple,
    /// Unsupported end
    #[serde(alias = "Libre")]
    Free,
}

impl SupportKind {
    /// All support kinds, in menu order
    pub const ALL: [SupportKind; 3] = [SupportKind::Fixed, SupportKind::Simple, SupportKind::Free];

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportKind::Fixed => "Fixed",
            SupportKind::Simple => "Simple",
            SupportKind::Free => "Free",
        }
    }

    /// Parse a user-typed label (case-insensitive, accepts the Spanish names)
    pub fn parse(label: &str) -> CalcResult<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "fixed" | "empotrado" | "f" => Ok(SupportKind::Fixed),
            "simple" | "pin" | "roller" | "s" => Ok(SupportKind::Simple),
            "free" | "libre" | "none" => Ok(SupportKind::Free),
            other => Err(CalcError::invalid_input(
                "support",
                other,
                "Expected one of Fixed, Simple, Free",
            )),
        }
    }
}

impl fmt::Display for SupportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Concentrated force at a single position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointLoad {
    /// Force (positive downward)
    pub magnitude: f64,
    /// Distance from the left end
    pub position: f64,
}

/// Uniform load intensity over `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Force per unit length (positive downward)
    pub magnitude: f64,
    /// Start of the loaded span
    pub start: f64,
    /// End of the loaded span
    pub end: f64,
}

impl DistributedLoad {
    /// Loaded length
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Resultant force `w·(end - start)`
    pub fn resultant(&self) -> f64 {
        self.magnitude * self.span()
    }
}

/// Immutable beam input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamConfiguration {
    /// Beam length (> 0)
    pub length: f64,
    /// Support at x = 0
    pub support_left: SupportKind,
    /// Support at x = length
    pub support_right: SupportKind,
    /// The single point load (magnitude 0 for none)
    #[serde(default)]
    pub point_load: PointLoad,
    /// The single distributed load (magnitude 0 for none)
    #[serde(default)]
    pub distributed_load: DistributedLoad,
    /// Flexural stiffness EI. Carried through for display; shear and moment
    /// do not depend on it.
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
}

fn default_stiffness() -> f64 {
    1.0
}

impl Default for BeamConfiguration {
    fn default() -> Self {
        BeamConfiguration::new(10.0, SupportKind::Simple, SupportKind::Simple)
    }
}

impl BeamConfiguration {
    /// Create an unloaded beam
    pub fn new(length: f64, support_left: SupportKind, support_right: SupportKind) -> Self {
        BeamConfiguration {
            length,
            support_left,
            support_right,
            point_load: PointLoad::default(),
            distributed_load: DistributedLoad::default(),
            stiffness: default_stiffness(),
        }
    }

    /// Set the point load
    pub fn with_point_load(mut self, magnitude: f64, position: f64) -> Self {
        self.point_load = PointLoad { magnitude, position };
        self
    }

    /// Set the distributed load
    pub fn with_distributed_load(mut self, magnitude: f64, start: f64, end: f64) -> Self {
        self.distributed_load = DistributedLoad { magnitude, start, end };
        self
    }

    /// Set the flexural stiffness
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Check that every value can be analysed.
    ///
    /// Out-of-range positions are not errors; [`normalize`](Self::normalize)
    /// clamps them.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(CalcError::invalid_input(
                "length",
                self.length.to_string(),
                "Length must be a positive finite number",
            ));
        }

        let fields = [
            ("point_load.magnitude", self.point_load.magnitude),
            ("point_load.position", self.point_load.position),
            ("distributed_load.magnitude", self.distributed_load.magnitude),
            ("distributed_load.start", self.distributed_load.start),
            ("distributed_load.end", self.distributed_load.end),
            ("stiffness", self.stiffness),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Value must be finite"));
            }
        }

        Ok(())
    }

    /// Bring load positions inside the beam.
    ///
    /// - the point load position is clamped to `[0, L]`
    /// - the distributed span is clamped to `[0, L]` and swapped if inverted
    /// - a zero-width span is widened to `min_span_fraction · L`, growing to
    ///   the right and shifting left when it would pass the end of the beam
    ///
    /// Returns the corrected configuration and one note per correction made.
    /// The fraction is raised to at least [`MIN_SPAN_FRACTION`] so a zero-width
    /// span never integrates to nothing. A configuration without a positive
    /// length is returned unchanged with a note.
    pub fn normalize(&self, min_span_fraction: f64) -> (BeamConfiguration, Vec<String>) {
        let length = self.length;
        let mut notes = Vec::new();
        let mut normalized = self.clone();

        if !(length > 0.0) {
            notes.push(format!("Length {} is not positive; load positions left as given", length));
            return (normalized, notes);
        }

        let position = self.point_load.position.clamp(0.0, length);
        if position != self.point_load.position {
            notes.push(format!(
                "Point load position {} clamped to {}",
                self.point_load.position, position
            ));
        }
        normalized.point_load.position = position;

        let mut start = self.distributed_load.start.clamp(0.0, length);
        let mut end = self.distributed_load.end.clamp(0.0, length);
        if start != self.distributed_load.start || end != self.distributed_load.end {
            notes.push(format!(
                "Distributed load span [{}, {}] clamped to [{}, {}]",
                self.distributed_load.start, self.distributed_load.end, start, end
            ));
        }
        if start > end {
            std::mem::swap(&mut start, &mut end);
            notes.push(format!("Distributed load span inverted; using [{}, {}]", start, end));
        }
        if start == end {
            let fraction = min_span_fraction.max(MIN_SPAN_FRACTION).min(1.0);
            let width = length * fraction;
            end = (start + width).min(length);
            if end - start < width {
                start = (end - width).max(0.0);
            }
            notes.push(format!(
                "Distributed load span had zero width; widened to [{}, {}]",
                start, end
            ));
        }
        normalized.distributed_load.start = start;
        normalized.distributed_load.end = end;

        (normalized, notes)
    }
}

/// Smallest width of a widened distributed-load span, as a fraction of the length
pub const MIN_SPAN_FRACTION: f64 = 1.0 / 6.0;

/// Tunables for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Number of evenly spaced grid positions (at least 2)
    pub sample_points: usize,
    /// Width given to a zero-width distributed-load span, as a fraction of
    /// the length. Values below [`MIN_SPAN_FRACTION`] are raised to it.
    pub min_span_fraction: f64,
    /// Run the per-point fallback evaluation on the rayon pool
    pub parallel_fallback: bool,
    /// Decimal places used for numbers in the explanation log
    pub precision: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            sample_points: 500,
            min_span_fraction: MIN_SPAN_FRACTION,
            parallel_fallback: false,
            precision: 3,
        }
    }
}

impl AnalysisSettings {
    /// Set the number of grid positions (minimum 2)
    pub fn with_sample_points(mut self, points: usize) -> Self {
        self.sample_points = points.max(2);
        self
    }

    /// Enable or disable the parallel fallback path
    pub fn with_parallel_fallback(mut self, parallel: bool) -> Self {
        self.parallel_fallback = parallel;
        self
    }

    /// Grid size actually used
    pub fn grid_size(&self) -> usize {
        self.sample_points.max(2)
    }
}
