//! # File I/O Module
//!
//! JSON files for beam configurations and analysis reports:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Reports carry a schema version checked on load
//!
//! ## Example
//!
//! ```rust,no_run
//! use beam_core::beam::{BeamConfiguration, SupportKind};
//! use beam_core::calculations::analyze_beam;
//! use beam_core::file_io::{save_report, load_report, AnalysisReport};
//! use std::path::Path;
//!
//! let config = BeamConfiguration::new(6.0, SupportKind::Fixed, SupportKind::Free)
//!     .with_point_load(5.0, 6.0);
//! let report = AnalysisReport::new(analyze_beam(&config));
//!
//! save_report(&report, Path::new("cantilever.json")).unwrap();
//! let loaded = load_report(Path::new("cantilever.json")).unwrap();
//! assert_eq!(loaded.id, report.id);
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::beam::BeamConfiguration;
use crate::calculations::BeamAnalysisResult;
use crate::dice::DiceRolls;
use crate::errors::{CalcError, CalcResult};

/// Current report schema version
pub const SCHEMA_VERSION: &str = "0.1.0";

/// A saved analysis with its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique report identifier
    pub id: Uuid,
    /// When the analysis was run
    pub generated_at: DateTime<Utc>,
    /// Schema version the report was written with
    pub version: String,
    /// Dice the configuration was generated from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice: Option<DiceRolls>,
    /// The full analysis result
    pub result: BeamAnalysisResult,
}

impl AnalysisReport {
    /// Wrap a result with a fresh id and timestamp
    pub fn new(result: BeamAnalysisResult) -> Self {
        AnalysisReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            version: SCHEMA_VERSION.to_string(),
            dice: None,
            result,
        }
    }

    /// Record the dice the configuration came from
    pub fn with_dice(mut self, dice: DiceRolls) -> Self {
        self.dice = Some(dice);
        self
    }
}

/// Load a beam configuration from a JSON file.
///
/// Missing load fields default to zero loads and `stiffness` to 1.0.
/// Support labels accept the Spanish names (`"Empotrado"`, `"Libre"`).
///
/// # Example
///
/// ```rust,no_run
/// use beam_core::file_io::load_configuration;
/// use std::path::Path;
///
/// let config = load_configuration(Path::new("beam.json"))?;
/// println!("L = {}", config.length);
/// # Ok::<(), beam_core::errors::CalcError>(())
/// ```
pub fn load_configuration(path: &Path) -> CalcResult<BeamConfiguration> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid configuration in {}: {}", path.display(), e),
    })
}

/// Save a beam configuration as pretty-printed JSON
pub fn save_configuration(config: &BeamConfiguration, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(config)?;
    write_atomic(path, json.as_bytes())
}

/// Save a report to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize the report to JSON
/// 2. Write to a temporary sibling file (`<name>.tmp`)
/// 3. Sync to disk (fsync)
/// 4. Rename over the target (atomic on most filesystems)
///
/// This prevents a half-written report if the process is interrupted.
pub fn save_report(report: &AnalysisReport, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    write_atomic(path, json.as_bytes())
}

/// Load a report from a file.
///
/// # Returns
///
/// * `Ok(AnalysisReport)` - Successfully loaded report
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_report(path: &Path) -> CalcResult<AnalysisReport> {
    let contents = read_file(path)?;

    let report: AnalysisReport =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&report.version)?;

    Ok(report)
}

fn read_file(path: &Path) -> CalcResult<String> {
    let mut file = File::open(path)
        .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// `report.json` -> `report.json.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, contents: &[u8]) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    log::debug!("Saved {}", path.display());
    Ok(())
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .map(|p| p.parse())
        .collect::<Result<_, _>>()
        .map_err(|_| mismatch())?;
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };

    // Major version must match
    if file_major != current_major {
        return Err(mismatch());
    }

    // In 0.x a newer minor may have breaking changes
    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}
