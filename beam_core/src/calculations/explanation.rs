//! Ordered, user-facing record of each derivation step.
//!
//! Entries at warning or error level are also sent to the `log` facade, so a
//! host application sees recovered failures in its own logs.

use std::fmt;

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

/// Derivation step an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    /// Input parameters and corrections
    Inputs,
    /// The load function w(x)
    LoadFunction,
    /// Equilibrium equations and reactions
    Reactions,
    /// Shear V(x)
    Shear,
    /// Moment M(x)
    Moment,
    /// Grid sampling
    NumericEvaluation,
}

impl Section {
    /// Heading with its step number
    pub fn title(&self) -> &'static str {
        match self {
            Section::Inputs => "1. Input parameters",
            Section::LoadFunction => "2. Load function w(x)",
            Section::Reactions => "3. Reactions",
            Section::Shear => "4. Shear force V(x)",
            Section::Moment => "5. Bending moment M(x)",
            Section::NumericEvaluation => "6. Numeric evaluation",
        }
    }
}

/// Severity of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// One line of the explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub section: Section,
    pub level: Level,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Level::Info => write!(f, "{}", self.message),
            Level::Warning => write!(f, "Warning: {}", self.message),
            Level::Error => write!(f, "Error: {}", self.message),
        }
    }
}

/// Ordered explanation of one analysis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExplanationLog {
    entries: Vec<LogEntry>,
}

impl ExplanationLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, section: Section, level: Level, message: String) {
        match level {
            Level::Info => debug!("[{}] {}", section.title(), message),
            Level::Warning => warn!("[{}] {}", section.title(), message),
            Level::Error => error!("[{}] {}", section.title(), message),
        }
        self.entries.push(LogEntry { section, level, message });
    }

    /// Record a derivation step
    pub fn info(&mut self, section: Section, message: impl Into<String>) {
        self.push(section, Level::Info, message.into());
    }

    /// Record a recovered problem
    pub fn warning(&mut self, section: Section, message: impl Into<String>) {
        self.push(section, Level::Warning, message.into());
    }

    /// Record a failure that was replaced by defaults
    pub fn error(&mut self, section: Section, message: impl Into<String>) {
        self.push(section, Level::Error, message.into());
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one section, in order
    pub fn section(&self, section: Section) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.section == section)
    }

    /// Entries at warning level or above
    pub fn problems(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.level >= Level::Warning)
    }

    /// Flatten to plain strings, one per entry
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}
