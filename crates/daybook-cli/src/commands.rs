//! Non-interactive subcommands.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use daybook_core::{
  autolog::{Gate, LogOutcome, Locator},
  country::CountryCode,
  presence::PresenceStatus,
  range::DayRange,
};

use crate::{
  client::{self, ApiClient},
  render,
  state::{SnapshotCache, StateFile},
};

/// Everything a subcommand may touch, owned by `main`.
pub struct Session {
  pub client:    ApiClient,
  pub state:     StateFile,
  pub cache:     SnapshotCache,
  pub residence: Option<CountryCode>,
}

pub async fn countries(s: &Session) -> Result<()> {
  for entry in s.client.countries().await? {
    println!("{}  {}", entry.code, entry.name);
  }
  Ok(())
}

pub async fn list_days(s: &Session, year: i32, month: Option<u32>) -> Result<()> {
  let days = s.client.list_days(year, month).await?;
  print!("{}", render::days(&days));
  Ok(())
}

pub async fn add(
  s: &Session,
  date: NaiveDate,
  country: CountryCode,
  status: PresenceStatus,
  notes: Option<String>,
) -> Result<()> {
  let day = s
    .client
    .add_day(date, &country, status, notes.as_deref())
    .await?;
  println!("Saved {}", render::day_line(&day));
  Ok(())
}

/// Validate locally so a bad range never reaches the server, then write it
/// in one request.
pub async fn add_range(
  s: &Session,
  start: NaiveDate,
  end: NaiveDate,
  country: CountryCode,
  notes: Option<String>,
) -> Result<()> {
  let range = DayRange::new(start, end).context("invalid date range")?;
  println!(
    "Adding {} day(s) in {} ({} → {})",
    range.len(),
    country.display_name(),
    range.start(),
    range.end()
  );
  let added = s
    .client
    .add_range(range.start(), range.end(), &country, notes.as_deref())
    .await?;
  for day in &added.days {
    println!("  {}", render::day_line(day));
  }
  println!("Added {} day(s).", added.added);
  Ok(())
}

pub async fn edit(
  s: &Session,
  date: NaiveDate,
  country: Option<CountryCode>,
  status: Option<PresenceStatus>,
  notes: Option<String>,
) -> Result<()> {
  if country.is_none() && status.is_none() && notes.is_none() {
    anyhow::bail!("nothing to change: pass --country, --status or --notes");
  }
  let day = s
    .client
    .update_day(date, country.as_ref(), status, notes.as_deref())
    .await?;
  println!("Updated {}", render::day_line(&day));
  Ok(())
}

pub async fn remove(s: &Session, date: NaiveDate) -> Result<()> {
  s.client.delete_day(date).await?;
  println!("Deleted {date}.");
  Ok(())
}

/// Print the year's summary, falling back to the last cached snapshot when
/// the server cannot be reached or fails on its side. A rejected request
/// (4xx) is reported as is.
pub async fn stats(s: &Session, year: i32, residence: Option<CountryCode>) -> Result<()> {
  let residence = residence.or_else(|| s.residence.clone());
  match s.client.stats(year, residence.as_ref()).await {
    Ok(stats) => {
      if let Err(e) = s.cache.store(&stats) {
        tracing::warn!(error = %e, "failed to cache stats snapshot");
      }
      print!("{}", render::stats(&stats, false));
      Ok(())
    }
    Err(e) if !client::is_unavailable(&e) => Err(e),
    Err(e) => match s.cache.load(year) {
      Some(cached) => {
        eprintln!("error: {e:#}");
        print!("{}", render::stats(&cached, true));
        Ok(())
      }
      None => Err(e),
    },
  }
}

pub fn tracking(s: &mut Session, enabled: Option<bool>) -> Result<()> {
  if let Some(enabled) = enabled {
    s.state.set_gps_enabled(enabled)?;
  }
  let t = s.state.tracking();
  println!(
    "GPS tracking: {}",
    if t.gps_enabled { "on" } else { "off" }
  );
  match t.last_logged {
    Some(d) => println!("Last logged:  {d}"),
    None => println!("Last logged:  never"),
  }
  Ok(())
}

/// The device half of "log today".
///
/// Returns the server outcome, or `None` when the flow stopped before any
/// write was attempted.
pub async fn log_today<L: Locator>(
  s: &mut Session,
  locator: &L,
  today: NaiveDate,
) -> Result<Option<LogOutcome>> {
  match s.state.gate(today) {
    Gate::Disabled => {
      println!("GPS tracking is off. Turn it on with `daybook tracking on`.");
      return Ok(None);
    }
    Gate::AlreadyLogged => {
      println!("Already logged {today}.");
      return Ok(None);
    }
    Gate::Proceed => {}
  }

  let location = match locator.locate().await {
    Ok(loc) => loc,
    Err(e) => {
      println!("{e}. Add today manually with `daybook add {today} <COUNTRY>`.");
      return Ok(None);
    }
  };
  tracing::debug!(country = %location.country, city = ?location.city, "located");

  let outcome = s.client.log_today(today, &location.country).await?;
  s.state.record(today, &outcome)?;
  println!("{}", render::log_outcome(&outcome));
  Ok(Some(outcome))
}
