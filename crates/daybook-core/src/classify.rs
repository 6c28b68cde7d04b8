//! Classification of a country's day count against the 183-day rule.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Days of presence in a year from which tax residency is presumed.
pub const THRESHOLD_DAYS: u32 = 183;

/// Percentage from which a country is flagged as approaching the threshold.
pub const WARNING_PERCENT: f64 = 75.0;

/// Percentage from which the threshold counts as reached.
pub const CRITICAL_PERCENT: f64 = 100.0;

/// `days / threshold * 100`, rounded to one decimal. Not clamped.
pub fn percent_of_threshold(days: u32, threshold: u32) -> f64 {
  if threshold == 0 {
    return 0.0;
  }
  let raw = f64::from(days) / f64::from(threshold) * 100.0;
  (raw * 10.0).round() / 10.0
}

// ─── Severity ────────────────────────────────────────────────────────────────

/// Where a percentage sits relative to the warning and critical tiers.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
  Normal,
  Warning,
  Critical,
}

impl Severity {
  pub fn classify(percent: f64) -> Self {
    if percent >= CRITICAL_PERCENT {
      Self::Critical
    } else if percent >= WARNING_PERCENT {
      Self::Warning
    } else {
      Self::Normal
    }
  }
}

// ─── Tone ────────────────────────────────────────────────────────────────────

/// Display polarity of a severity.
///
/// For a foreign country a high count is a risk. For the residence country a
/// high count is the goal, so the same tiers read the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
  Good,
  Caution,
  Alert,
}

impl Tone {
  pub fn of(severity: Severity, is_residence: bool) -> Self {
    match (severity, is_residence) {
      (Severity::Normal, false) | (Severity::Critical, true) => Self::Good,
      (Severity::Warning, _) => Self::Caution,
      (Severity::Critical, false) | (Severity::Normal, true) => Self::Alert,
    }
  }
}
