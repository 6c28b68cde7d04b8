//! The residency ledger: a date-keyed set of presence records and the
//! per-year aggregation over it.
//!
//! The ledger is a render-side snapshot. It is rebuilt from the store's list
//! after every mutation instead of being patched incrementally.

use std::collections::{BTreeMap, btree_map::Entry};

use chrono::{Datelike, NaiveDate};

use crate::{
  classify::{Severity, THRESHOLD_DAYS, Tone, percent_of_threshold},
  country::CountryCode,
  presence::{DayPresence, PresenceStatus},
  stats::{CountryStats, ResidenceStats, Warning},
};

/// Date-keyed presence records. Inserting a date that is already present
/// replaces the record.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
  days: BTreeMap<NaiveDate, DayPresence>,
}

impl Ledger {
  pub fn new() -> Self { Self::default() }

  /// Insert `day`, returning the record it replaced, if any.
  pub fn insert(&mut self, day: DayPresence) -> Option<DayPresence> {
    match self.days.entry(day.date) {
      Entry::Occupied(mut slot) => Some(slot.insert(day)),
      Entry::Vacant(slot) => {
        slot.insert(day);
        None
      }
    }
  }

  /// Records of one calendar year, ascending.
  pub fn year(&self, year: i32) -> impl Iterator<Item = &DayPresence> {
    let bounds = NaiveDate::from_ymd_opt(year, 1, 1)
      .zip(NaiveDate::from_ymd_opt(year, 12, 31));
    bounds
      .into_iter()
      .flat_map(move |(first, last)| self.days.range(first..=last).map(|(_, d)| d))
  }

  /// Aggregate one year. `residence` is the designated tax home, whose
  /// tiers are read with inverted polarity and which never raises warnings.
  pub fn stats(&self, year: i32, residence: Option<&CountryCode>) -> ResidenceStats {
    let mut groups: BTreeMap<&CountryCode, Vec<&DayPresence>> = BTreeMap::new();
    let mut total_days_tracked = 0;
    for day in self.year(year) {
      groups.entry(&day.country).or_default().push(day);
      total_days_tracked += 1;
    }

    let mut countries: Vec<CountryStats> = groups
      .into_iter()
      .map(|(country, days)| {
        country_stats(country, &days, residence == Some(country))
      })
      .collect();
    countries.sort_by(|a, b| {
      b.total_days
        .cmp(&a.total_days)
        .then_with(|| a.country.cmp(&b.country))
    });

    let warnings = countries.iter().filter_map(Warning::for_country).collect();

    let primary_country = countries
      .iter()
      .find(|c| c.is_residence)
      .or_else(|| countries.first())
      .cloned();

    tracing::debug!(
      year,
      countries = countries.len(),
      total_days_tracked,
      "aggregated residence stats"
    );

    ResidenceStats {
      year,
      countries,
      primary_country,
      residence_country: residence.cloned(),
      total_days_tracked,
      warnings,
    }
  }
}

impl FromIterator<DayPresence> for Ledger {
  fn from_iter<I: IntoIterator<Item = DayPresence>>(iter: I) -> Self {
    let mut ledger = Self::new();
    for day in iter {
      ledger.insert(day);
    }
    ledger
  }
}

/// Length of the longest run of consecutive dates. `dates` must be sorted
/// ascending and free of duplicates.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
  let Some(first) = dates.first() else {
    return 0;
  };
  let mut longest = 1;
  let mut current = 1;
  let mut prev = *first;
  for &date in &dates[1..] {
    if prev.succ_opt() == Some(date) {
      current += 1;
      longest = longest.max(current);
    } else {
      current = 1;
    }
    prev = date;
  }
  longest
}

/// `days` belong to one country and are in ascending date order.
fn country_stats(country: &CountryCode, days: &[&DayPresence], is_residence: bool) -> CountryStats {
  let total_days = days.len() as u32;
  let confirmed_days = days
    .iter()
    .filter(|d| d.status == PresenceStatus::Confirmed)
    .count() as u32;

  let mut days_by_month: BTreeMap<String, u32> = BTreeMap::new();
  for day in days {
    let key = format!("{:04}-{:02}", day.date.year(), day.date.month());
    *days_by_month.entry(key).or_default() += 1;
  }

  let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
  let percent = percent_of_threshold(total_days, THRESHOLD_DAYS);
  let severity = Severity::classify(percent);

  CountryStats {
    country: country.clone(),
    // Latest write wins for the denormalised name.
    country_name: days
      .iter()
      .max_by_key(|d| d.updated_at)
      .map(|d| d.country_name.clone())
      .unwrap_or_else(|| country.display_name().to_owned()),
    total_days,
    confirmed_days,
    manual_days: total_days - confirmed_days,
    days_by_month,
    first_day: dates.first().copied(),
    last_day: dates.last().copied(),
    longest_streak: longest_streak(&dates),
    threshold: THRESHOLD_DAYS,
    percent_of_threshold: percent,
    remaining_days: i64::from(THRESHOLD_DAYS) - i64::from(total_days),
    severity,
    tone: Tone::of(severity, is_residence),
    is_residence,
  }
}
