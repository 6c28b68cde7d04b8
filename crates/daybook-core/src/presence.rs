//! Day-presence records: one calendar date attributed to one country.
//!
//! The date is the key: a ledger holds at most one record per date, and a
//! later write for the same date replaces the earlier one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::country::CountryCode;

// ─── Status ──────────────────────────────────────────────────────────────────

/// How a presence record came to exist.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PresenceStatus {
  /// Entered by the user.
  #[default]
  Manual,
  /// Derived from the device position.
  Confirmed,
}

// ─── DayPresence ─────────────────────────────────────────────────────────────

/// A stored presence record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPresence {
  pub date:         NaiveDate,
  pub country:      CountryCode,
  /// Copied from the country catalog when the record was last written.
  pub country_name: String,
  pub status:       PresenceStatus,
  pub notes:        Option<String>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::PresenceStore::put_day`].
/// Timestamps and `country_name` are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDay {
  pub date:    NaiveDate,
  pub country: CountryCode,
  pub status:  PresenceStatus,
  pub notes:   Option<String>,
}

impl NewDay {
  /// A manually entered day with no notes.
  pub fn manual(date: NaiveDate, country: CountryCode) -> Self {
    Self { date, country, status: PresenceStatus::Manual, notes: None }
  }

  /// A geolocation-derived day.
  pub fn confirmed(date: NaiveDate, country: CountryCode) -> Self {
    Self { date, country, status: PresenceStatus::Confirmed, notes: None }
  }

  pub fn with_notes(mut self, notes: Option<String>) -> Self {
    self.notes = notes.filter(|n| !n.trim().is_empty());
    self
  }
}

/// Partial update applied by [`crate::store::PresenceStore::update_day`].
/// `None` leaves the field untouched; the date itself never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DayPatch {
  pub country: Option<CountryCode>,
  pub status:  Option<PresenceStatus>,
  pub notes:   Option<String>,
}

impl DayPatch {
  pub fn is_empty(&self) -> bool {
    self.country.is_none() && self.status.is_none() && self.notes.is_none()
  }

  /// Apply the patch to an existing record, refreshing the denormalised
  /// country name when the country changes.
  pub fn apply(&self, day: &mut DayPresence, now: DateTime<Utc>) {
    if let Some(country) = &self.country {
      day.country_name = country.display_name().to_owned();
      day.country = country.clone();
    }
    if let Some(status) = self.status {
      day.status = status;
    }
    if let Some(notes) = &self.notes {
      day.notes = (!notes.trim().is_empty()).then(|| notes.clone());
    }
    day.updated_at = now;
  }
}
