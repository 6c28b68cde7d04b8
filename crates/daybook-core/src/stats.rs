//! Derived per-year aggregates. Never stored; always computed from the
//! presence records by [`crate::ledger::Ledger::stats`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  classify::{Severity, Tone},
  country::CountryCode,
};

// ─── CountryStats ────────────────────────────────────────────────────────────

/// Aggregate over one country's records within one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryStats {
  pub country:              CountryCode,
  pub country_name:         String,
  pub total_days:           u32,
  pub confirmed_days:       u32,
  pub manual_days:          u32,
  /// Keyed by `YYYY-MM`.
  pub days_by_month:        BTreeMap<String, u32>,
  pub first_day:            Option<NaiveDate>,
  pub last_day:             Option<NaiveDate>,
  pub longest_streak:       u32,
  pub threshold:            u32,
  /// May exceed 100.
  pub percent_of_threshold: f64,
  /// `threshold - total_days`; negative once the threshold is overshot.
  pub remaining_days:       i64,
  pub severity:             Severity,
  pub tone:                 Tone,
  pub is_residence:         bool,
}

impl CountryStats {
  /// Percentage clamped to 100 for progress bars.
  pub fn progress(&self) -> f64 { self.percent_of_threshold.min(100.0) }

  /// Days past the threshold, zero while under it.
  pub fn overshoot(&self) -> u32 {
    u32::try_from(-self.remaining_days).unwrap_or(0)
  }

  /// The longest streak, only when it is worth showing (more than one day).
  pub fn notable_streak(&self) -> Option<u32> {
    (self.longest_streak > 1).then_some(self.longest_streak)
  }
}

// ─── Warnings ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
  ApproachingThreshold,
  ThresholdExceeded,
}

/// A threshold crossing for a country that is not the residence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
  pub kind:         WarningKind,
  pub country:      CountryCode,
  pub country_name: String,
  pub severity:     Severity,
  pub message:      String,
  /// Days remaining before the threshold, or days over it once exceeded.
  pub days:         u32,
}

impl Warning {
  /// The warning for `stats`, if its severity calls for one.
  pub fn for_country(stats: &CountryStats) -> Option<Self> {
    if stats.is_residence {
      return None;
    }
    let (kind, days, message) = match stats.severity {
      Severity::Normal => return None,
      Severity::Warning => {
        let remaining = u32::try_from(stats.remaining_days).unwrap_or(0);
        (
          WarningKind::ApproachingThreshold,
          remaining,
          format!(
            "{}: {}/{} days ({}%), {} days remaining",
            stats.country_name,
            stats.total_days,
            stats.threshold,
            stats.percent_of_threshold,
            remaining,
          ),
        )
      }
      Severity::Critical => {
        let overshoot = stats.overshoot();
        (
          WarningKind::ThresholdExceeded,
          overshoot,
          format!(
            "{}-day threshold reached in {} ({} days, {} over)",
            stats.threshold, stats.country_name, stats.total_days, overshoot,
          ),
        )
      }
    };

    Some(Self {
      kind,
      country: stats.country.clone(),
      country_name: stats.country_name.clone(),
      severity: stats.severity,
      message,
      days,
    })
  }
}

// ─── ResidenceStats ──────────────────────────────────────────────────────────

/// Per-year summary across all countries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidenceStats {
  pub year:               i32,
  /// Sorted by `total_days` descending, then by country code.
  pub countries:          Vec<CountryStats>,
  pub primary_country:    Option<CountryStats>,
  pub residence_country:  Option<CountryCode>,
  /// Distinct dates recorded in the year, any country.
  pub total_days_tracked: u32,
  pub warnings:           Vec<Warning>,
}

impl ResidenceStats {
  pub fn country(&self, code: &str) -> Option<&CountryStats> {
    self.countries.iter().find(|c| c.country.as_str() == code)
  }
}
