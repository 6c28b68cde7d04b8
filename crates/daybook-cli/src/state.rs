//! On-device state: the tracking preferences and the last good stats
//! snapshot per year.
//!
//! Layout of the state directory:
//!
//! ```text
//! <state-dir>/state.toml          gps_enabled, last_logged
//! <state-dir>/stats-<year>.json   last ResidenceStats fetched for <year>
//! ```

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use daybook_core::{
  autolog::{Gate, LogOutcome, TrackingState},
  stats::ResidenceStats,
};

const STATE_FILE: &str = "state.toml";

/// Default state directory: `$XDG_STATE_HOME/daybook` or
/// `~/.local/state/daybook`.
pub fn default_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("XDG_STATE_HOME")
    && !dir.is_empty()
  {
    return PathBuf::from(dir).join("daybook");
  }
  match std::env::var("HOME") {
    Ok(home) => PathBuf::from(home).join(".local/state/daybook"),
    Err(_) => PathBuf::from(".daybook"),
  }
}

// ─── StateFile ────────────────────────────────────────────────────────────────

/// Owner of the persisted [`TrackingState`].
///
/// Loaded once at startup; every mutating method writes the file back before
/// returning.
#[derive(Debug)]
pub struct StateFile {
  dir:   PathBuf,
  state: TrackingState,
}

impl StateFile {
  /// Load from `dir`, starting from defaults when no state file exists yet.
  pub fn load(dir: impl Into<PathBuf>) -> Result<Self> {
    let dir = dir.into();
    let path = dir.join(STATE_FILE);
    let state = match fs::read_to_string(&path) {
      Ok(raw) => toml::from_str(&raw)
        .with_context(|| format!("parsing state file {}", path.display()))?,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => TrackingState::default(),
      Err(e) => {
        return Err(e).with_context(|| format!("reading state file {}", path.display()));
      }
    };
    Ok(Self { dir, state })
  }

  pub fn dir(&self) -> &Path { &self.dir }

  pub fn tracking(&self) -> &TrackingState { &self.state }

  pub fn gate(&self, today: NaiveDate) -> Gate { self.state.gate(today) }

  pub fn set_gps_enabled(&mut self, enabled: bool) -> Result<()> {
    self.state.gps_enabled = enabled;
    self.save()
  }

  /// Fold a server outcome into the state and persist it.
  pub fn record(&mut self, today: NaiveDate, outcome: &LogOutcome) -> Result<()> {
    self.state.record(today, outcome);
    self.save()
  }

  fn save(&self) -> Result<()> {
    fs::create_dir_all(&self.dir)
      .with_context(|| format!("creating state dir {}", self.dir.display()))?;
    let path = self.dir.join(STATE_FILE);
    let raw = toml::to_string(&self.state).context("serialising state")?;
    fs::write(&path, raw).with_context(|| format!("writing state file {}", path.display()))
  }
}

// ─── Snapshot cache ───────────────────────────────────────────────────────────

/// Last successfully fetched stats, one JSON file per year.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
  dir: PathBuf,
}

impl SnapshotCache {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  fn path(&self, year: i32) -> PathBuf { self.dir.join(format!("stats-{year}.json")) }

  pub fn store(&self, stats: &ResidenceStats) -> Result<()> {
    fs::create_dir_all(&self.dir)
      .with_context(|| format!("creating state dir {}", self.dir.display()))?;
    let raw = serde_json::to_vec_pretty(stats).context("serialising stats snapshot")?;
    let path = self.path(stats.year);
    fs::write(&path, raw).with_context(|| format!("writing {}", path.display()))
  }

  /// The cached snapshot for `year`. A missing or unreadable file is a miss.
  pub fn load(&self, year: i32) -> Option<ResidenceStats> {
    let path = self.path(year);
    let raw = fs::read(&path).ok()?;
    match serde_json::from_slice(&raw) {
      Ok(stats) => Some(stats),
      Err(e) => {
        tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt stats snapshot");
        None
      }
    }
  }
}
