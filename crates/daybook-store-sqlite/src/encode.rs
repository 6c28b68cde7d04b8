//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD`, so lexical order is calendar order.
//! Timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, NaiveDate, Utc};
use daybook_core::{
  country::CountryCode,
  presence::{DayPresence, PresenceStatus},
};

use crate::{Error, Result};

/// Column list shared by every query that materialises a [`DayPresence`].
pub const DAY_COLUMNS: &str =
  "date, country, country_name, status, notes, created_at, updated_at";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── PresenceStatus ──────────────────────────────────────────────────────────

pub fn encode_status(s: PresenceStatus) -> String { s.to_string() }

pub fn decode_status(s: &str) -> Result<PresenceStatus> {
  s.parse()
    .map_err(|_| Error::Core(daybook_core::Error::InvalidStatus(s.to_owned())))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw strings read directly from a `days` row.
pub struct RawDay {
  pub date:         String,
  pub country:      String,
  pub country_name: String,
  pub status:       String,
  pub notes:        Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawDay {
  /// Read a row selected with [`DAY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      date:         row.get(0)?,
      country:      row.get(1)?,
      country_name: row.get(2)?,
      status:       row.get(3)?,
      notes:        row.get(4)?,
      created_at:   row.get(5)?,
      updated_at:   row.get(6)?,
    })
  }

  pub fn into_day(self) -> Result<DayPresence> {
    Ok(DayPresence {
      date:         decode_date(&self.date)?,
      country:      CountryCode::parse(&self.country)?,
      country_name: self.country_name,
      status:       decode_status(&self.status)?,
      notes:        self.notes,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}
