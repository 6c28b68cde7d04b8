//! The `PresenceStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `daybook-store-sqlite`).
//! Higher layers (`daybook-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::presence::{DayPatch, DayPresence, NewDay};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`PresenceStore::list_days`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayQuery {
  pub year:  i32,
  /// 1-12; restricts the listing to one month of `year`.
  pub month: Option<u32>,
}

impl DayQuery {
  pub fn year(year: i32) -> Self { Self { year, month: None } }

  /// Inclusive date bounds of the query, or `None` when the month is out of
  /// range.
  pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
    match self.month {
      None => Some((
        NaiveDate::from_ymd_opt(self.year, 1, 1)?,
        NaiveDate::from_ymd_opt(self.year, 12, 31)?,
      )),
      Some(m) => {
        let first = NaiveDate::from_ymd_opt(self.year, m, 1)?;
        let next = if m == 12 {
          NaiveDate::from_ymd_opt(self.year + 1, 1, 1)?
        } else {
          NaiveDate::from_ymd_opt(self.year, m + 1, 1)?
        };
        Some((first, next.pred_opt()?))
      }
    }
  }
}

// ─── Insert-if-absent ────────────────────────────────────────────────────────

/// Result of [`PresenceStore::insert_day`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inserted {
  /// The date was free and now holds the new record.
  Created(DayPresence),
  /// The date already had a record; it was left untouched.
  Existing(DayPresence),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a presence-record backend.
///
/// The date is the primary key. Apart from [`insert_day`](Self::insert_day),
/// every write path is an upsert: writing a date that already has a record
/// replaces its country, status and notes while keeping its `created_at`.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PresenceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert or replace the record for `input.date`.
  fn put_day(
    &self,
    input: NewDay,
  ) -> impl Future<Output = Result<DayPresence, Self::Error>> + Send + '_;

  /// Write `input` only if its date has no record yet. The check and the
  /// write are one atomic step, so a concurrent write for the same date is
  /// never replaced.
  fn insert_day(
    &self,
    input: NewDay,
  ) -> impl Future<Output = Result<Inserted, Self::Error>> + Send + '_;

  /// Insert or replace several records atomically. Either all rows are
  /// written or none are.
  fn put_days(
    &self,
    inputs: Vec<NewDay>,
  ) -> impl Future<Output = Result<Vec<DayPresence>, Self::Error>> + Send + '_;

  /// Retrieve the record for `date`. Returns `None` if not found.
  fn get_day(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<DayPresence>, Self::Error>> + Send + '_;

  /// Apply `patch` to the record for `date`. Returns `None` if not found.
  fn update_day(
    &self,
    date: NaiveDate,
    patch: DayPatch,
  ) -> impl Future<Output = Result<Option<DayPresence>, Self::Error>> + Send + '_;

  /// Delete the record for `date`. Returns `false` if there was none.
  fn delete_day(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Records matching `query`, ascending by date.
  fn list_days(
    &self,
    query: DayQuery,
  ) -> impl Future<Output = Result<Vec<DayPresence>, Self::Error>> + Send + '_;
}
