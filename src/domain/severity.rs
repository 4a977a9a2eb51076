//! Alert severity levels and ratio-based classification

use crate::error::SeverityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alert severity levels, ordered by urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// At or below the medium cut point
    Low,
    /// Slightly over threshold
    Medium,
    /// Well over threshold
    High,
    /// Far over threshold
    Critical,
}

impl Severity {
    /// All levels in ascending urgency
    pub const ALL: [Severity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Lowercase level name, as used in overrides and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl FromStr for Severity {
    type Err = SeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(SeverityError::Unknown(s.to_string())),
        }
    }
}

/// Ratio cut points separating the severity bands
///
/// Each cut point is an exclusive lower bound: a ratio must be strictly
/// greater than `critical` to be classified critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityRatios {
    pub critical_ratio: f64,
    pub high_ratio: f64,
    pub medium_ratio: f64,
}

impl Default for SeverityRatios {
    fn default() -> Self {
        Self {
            critical_ratio: 1.5,
            high_ratio: 1.2,
            medium_ratio: 1.0,
        }
    }
}

/// Maps a value/threshold pair onto a severity
#[derive(Debug, Clone, Default)]
pub struct SeverityCalculator {
    ratios: SeverityRatios,
}

impl SeverityCalculator {
    /// Create a calculator with custom cut points
    pub fn new(ratios: SeverityRatios) -> Self {
        Self { ratios }
    }

    /// Classify `value` against `threshold`.
    ///
    /// A non-empty `override_level` bypasses the ratio entirely and must name
    /// a known level. `threshold` must be non-zero.
    pub fn calculate(
        &self,
        value: f64,
        threshold: f64,
        override_level: Option<&str>,
    ) -> Result<Severity, SeverityError> {
        if let Some(level) = override_level.filter(|s| !s.is_empty()) {
            return level.parse();
        }

        Ok(self.classify(value / threshold))
    }

    /// Classify a precomputed ratio
    pub fn classify(&self, ratio: f64) -> Severity {
        if ratio > self.ratios.critical_ratio {
            Severity::Critical
        } else if ratio > self.ratios.high_ratio {
            Severity::High
        } else if ratio > self.ratios.medium_ratio {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}
