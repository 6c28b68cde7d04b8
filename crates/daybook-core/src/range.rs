//! Inclusive date ranges for bulk day entry.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  Error, Result,
  country::CountryCode,
  presence::NewDay,
};

/// Largest number of days a single bulk add may cover.
pub const MAX_BULK_DAYS: u32 = 90;

/// A validated range `[start, end]`, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRange {
  start: NaiveDate,
  end:   NaiveDate,
}

impl DayRange {
  /// Validate a bulk-entry range. `end` may equal `start`.
  pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
    if end < start {
      return Err(Error::InvalidRange { start, end });
    }
    let range = Self { start, end };
    let days = range.len();
    if days > MAX_BULK_DAYS {
      return Err(Error::RangeTooLong { days, max: MAX_BULK_DAYS });
    }
    Ok(range)
  }

  pub fn start(&self) -> NaiveDate { self.start }

  pub fn end(&self) -> NaiveDate { self.end }

  /// Number of calendar days covered, counting both ends. This is the count
  /// shown before submission and the number of rows written.
  pub fn len(&self) -> u32 {
    // Validated ranges are at most MAX_BULK_DAYS long.
    (self.end - self.start).num_days() as u32 + 1
  }

  /// Always false; a range holds at least one day.
  pub fn is_empty(&self) -> bool { false }

  /// Every date in the range, ascending.
  pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
    self
      .start
      .iter_days()
      .take_while(move |d| *d <= self.end)
  }

  /// One manual record per day in the range.
  pub fn expand(&self, country: &CountryCode, notes: Option<&str>) -> Vec<NewDay> {
    self
      .days()
      .map(|date| {
        NewDay::manual(date, country.clone()).with_notes(notes.map(str::to_owned))
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use chrono::Days;

  use super::*;
  use crate::presence::PresenceStatus;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn single_day_range_has_one_row() {
    let r = DayRange::new(d(2026, 2, 4), d(2026, 2, 4)).unwrap();
    assert_eq!(r.len(), 1);
    assert_eq!(r.days().collect::<Vec<_>>(), vec![d(2026, 2, 4)]);
  }

  #[test]
  fn expansion_is_inclusive_and_distinct() {
    let nl = CountryCode::parse("NL").unwrap();
    let r = DayRange::new(d(2026, 2, 8), d(2026, 2, 16)).unwrap();
    let rows = r.expand(&nl, Some("Rotterdam"));

    assert_eq!(rows.len(), 9);
    assert_eq!(rows.len() as u32, r.len());
    let distinct: HashSet<_> = rows.iter().map(|n| n.date).collect();
    assert_eq!(distinct.len(), 9);
    assert!(rows.iter().all(|n| r.start() <= n.date && n.date <= r.end()));
    assert!(rows.iter().all(|n| n.status == PresenceStatus::Manual));
    assert!(rows.iter().all(|n| n.notes.as_deref() == Some("Rotterdam")));
  }

  #[test]
  fn range_crossing_year_end() {
    let r = DayRange::new(d(2025, 12, 30), d(2026, 1, 2)).unwrap();
    assert_eq!(r.len(), 4);
    let days: Vec<_> = r.days().collect();
    assert_eq!(days.first(), Some(&d(2025, 12, 30)));
    assert_eq!(days.last(), Some(&d(2026, 1, 2)));
    assert_eq!(days.len(), 4);
  }

  #[test]
  fn reversed_range_is_rejected() {
    let err = DayRange::new(d(2026, 2, 10), d(2026, 2, 9)).unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));
    assert!(err.is_validation());
  }

  #[test]
  fn ninety_days_accepted_ninety_one_rejected() {
    let start = d(2026, 1, 1);
    let ok = DayRange::new(start, start + Days::new(89)).unwrap();
    assert_eq!(ok.len(), 90);
    assert_eq!(ok.days().count(), 90);

    let err = DayRange::new(start, start + Days::new(90)).unwrap_err();
    assert!(matches!(err, Error::RangeTooLong { days: 91, max: 90 }));
  }

  #[test]
  fn blank_notes_are_dropped() {
    let fr = CountryCode::parse("FR").unwrap();
    let r = DayRange::new(d(2026, 5, 24), d(2026, 5, 25)).unwrap();
    assert!(r.expand(&fr, Some("   ")).iter().all(|n| n.notes.is_none()));
  }
}
