//! Automatic "log today" from the device position.
//!
//! Two halves:
//!
//! - [`TrackingState`] lives on the device. It gates the flow on the user's
//!   GPS-tracking preference and remembers the last date it logged, so a
//!   second attempt on the same day needs no network call.
//! - [`log_today`] runs against the store and is the authoritative check: it
//!   never creates a second record for a date, and never replaces a manual
//!   entry.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  country::CountryCode,
  presence::{DayPresence, NewDay, PresenceStatus},
  store::{Inserted, PresenceStore},
};

// ─── Locating ────────────────────────────────────────────────────────────────

/// The resolved position of the device, reduced to what the ledger needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
  pub country:      CountryCode,
  pub country_name: String,
  pub city:         Option<String>,
}

#[derive(Debug, Error)]
pub enum LocateError {
  #[error("cannot determine position: {0}")]
  Unavailable(String),

  #[error("position resolved outside any known country: {0:?}")]
  UnknownCountry(String),
}

/// Best-effort resolution of the current country.
pub trait Locator: Send + Sync {
  fn locate(&self) -> impl Future<Output = Result<Location, LocateError>> + Send + '_;
}

// ─── Device-side gate ────────────────────────────────────────────────────────

/// Locally persisted tracking preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingState {
  #[serde(default)]
  pub gps_enabled: bool,
  #[serde(default)]
  pub last_logged: Option<NaiveDate>,
}

/// What the device should do about logging `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
  /// Tracking is switched off.
  Disabled,
  /// Already logged today from this device.
  AlreadyLogged,
  /// Resolve the position and log.
  Proceed,
}

impl TrackingState {
  pub fn gate(&self, today: NaiveDate) -> Gate {
    if !self.gps_enabled {
      Gate::Disabled
    } else if self.last_logged == Some(today) {
      Gate::AlreadyLogged
    } else {
      Gate::Proceed
    }
  }

  /// Record the result of a server-side attempt. The marker only moves when
  /// today is known to hold a confirmed record.
  pub fn record(&mut self, today: NaiveDate, outcome: &LogOutcome) {
    match outcome {
      LogOutcome::Logged(_) | LogOutcome::AlreadyLogged(_) => {
        self.last_logged = Some(today);
      }
      LogOutcome::ManualEntryKept(_) => {}
    }
  }
}

// ─── Server-side write ───────────────────────────────────────────────────────

/// Result of [`log_today`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "day", rename_all = "snake_case")]
pub enum LogOutcome {
  /// A confirmed record was written.
  Logged(DayPresence),
  /// A confirmed record already existed; nothing was written.
  AlreadyLogged(DayPresence),
  /// A manual record exists for today and was left in place. Replacing it
  /// takes an explicit single-day add.
  ManualEntryKept(DayPresence),
}

impl LogOutcome {
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Logged(_) => "logged",
      Self::AlreadyLogged(_) => "already_logged",
      Self::ManualEntryKept(_) => "manual_entry_kept",
    }
  }

  pub fn day(&self) -> &DayPresence {
    match self {
      Self::Logged(d) | Self::AlreadyLogged(d) | Self::ManualEntryKept(d) => d,
    }
  }
}

/// Write a confirmed record for `today` unless the date already has one.
pub async fn log_today<S: PresenceStore>(
  store: &S,
  today: NaiveDate,
  country: CountryCode,
) -> Result<LogOutcome, S::Error> {
  let outcome = match store.insert_day(NewDay::confirmed(today, country)).await? {
    Inserted::Created(day) => {
      tracing::info!(%today, country = %day.country, "logged today from position");
      return Ok(LogOutcome::Logged(day));
    }
    Inserted::Existing(day) => match day.status {
      PresenceStatus::Confirmed => LogOutcome::AlreadyLogged(day),
      PresenceStatus::Manual => LogOutcome::ManualEntryKept(day),
    },
  };
  tracing::debug!(%today, outcome = outcome.kind(), "log today skipped");
  Ok(outcome)
}
