//! Plain-text rendering for the non-interactive subcommands.

use std::fmt::Write as _;

use daybook_core::{
  autolog::LogOutcome,
  classify::Tone,
  presence::{DayPresence, PresenceStatus},
  stats::{CountryStats, ResidenceStats},
};

const BAR_WIDTH: usize = 20;

/// A fixed-width progress bar, full at 100%.
pub fn bar(progress: f64) -> String {
  let filled = ((progress / 100.0) * BAR_WIDTH as f64).round() as usize;
  let filled = filled.min(BAR_WIDTH);
  format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn tone_marker(tone: Tone) -> &'static str {
  match tone {
    Tone::Good => " ",
    Tone::Caution => "!",
    Tone::Alert => "‼",
  }
}

/// One row of the stats table.
pub fn country_line(c: &CountryStats) -> String {
  let mut line = format!(
    "{} {} {:<22} {:>3}/{} {} {:>5.1}%",
    tone_marker(c.tone),
    c.country,
    truncate(&c.country_name, 22),
    c.total_days,
    c.threshold,
    bar(c.progress()),
    c.percent_of_threshold,
  );
  if c.is_residence {
    line.push_str("  (residence)");
  }
  if let Some(streak) = c.notable_streak() {
    let _ = write!(line, "  streak {streak}");
  }
  line
}

pub fn stats(s: &ResidenceStats, stale: bool) -> String {
  let mut out = String::new();
  let _ = write!(out, "Residence summary {}", s.year);
  if stale {
    out.push_str("  [stale: cached snapshot, server unreachable]");
  }
  out.push('\n');

  if s.countries.is_empty() {
    out.push_str("No days tracked this year.\n");
    return out;
  }

  if let Some(primary) = &s.primary_country {
    let _ = writeln!(
      out,
      "Primary: {} ({} days), {} days tracked",
      primary.country_name, primary.total_days, s.total_days_tracked
    );
  }
  out.push('\n');
  for c in &s.countries {
    out.push_str(&country_line(c));
    out.push('\n');
  }

  if !s.warnings.is_empty() {
    out.push_str("\nWarnings:\n");
    for w in &s.warnings {
      let _ = writeln!(out, "  [{}] {}", w.severity, w.message);
    }
  }
  out
}

pub fn day_line(d: &DayPresence) -> String {
  let status = match d.status {
    PresenceStatus::Confirmed => "gps",
    PresenceStatus::Manual => "   ",
  };
  let mut line = format!("{}  {} {:<22} {}", d.date, d.country, d.country_name, status);
  if let Some(notes) = &d.notes {
    let _ = write!(line, "  {notes}");
  }
  line.trim_end().to_string()
}

pub fn days(list: &[DayPresence]) -> String {
  if list.is_empty() {
    return "No days recorded.\n".to_string();
  }
  let mut out = String::new();
  for d in list {
    out.push_str(&day_line(d));
    out.push('\n');
  }
  let _ = writeln!(out, "{} day(s)", list.len());
  out
}

pub fn log_outcome(outcome: &LogOutcome) -> String {
  let day = outcome.day();
  match outcome {
    LogOutcome::Logged(_) => format!("Logged {} in {}.", day.date, day.country_name),
    LogOutcome::AlreadyLogged(_) => {
      format!("Already logged {} in {}.", day.date, day.country_name)
    }
    LogOutcome::ManualEntryKept(_) => format!(
      "{} already has a manual entry for {}; left unchanged. \
       Use `daybook add {} <COUNTRY>` to replace it.",
      day.date, day.country_name, day.date
    ),
  }
}

fn truncate(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
    t.push('…');
    t
  }
}
