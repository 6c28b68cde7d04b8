//! Dashboard state machine and event dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use daybook_core::{
  country::CountryCode,
  presence::DayPresence,
  stats::{CountryStats, ResidenceStats},
};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};

use crate::{
  client::{self, ApiClient},
  state::SnapshotCache,
};

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level dashboard state.
pub struct App {
  /// Year on display.
  pub year: i32,

  /// Residence override passed to `/stats`; `None` uses the server setting.
  pub residence: Option<CountryCode>,

  /// Latest stats for `year`, live or from the snapshot cache.
  pub stats: Option<ResidenceStats>,

  /// Whether `stats` came from the cache after a failed fetch.
  pub stale: bool,

  /// Every recorded day of `year`, ascending.
  pub days: Vec<DayPresence>,

  /// Current fuzzy-filter string.
  pub filter: String,

  pub filter_active: bool,

  /// Cursor position within the *filtered* country list.
  pub list_cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  client: ApiClient,
  cache:  SnapshotCache,
}

impl App {
  pub fn new(
    client: ApiClient,
    cache: SnapshotCache,
    year: i32,
    residence: Option<CountryCode>,
  ) -> Self {
    Self {
      year,
      residence,
      stats: None,
      stale: false,
      days: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      status_msg: String::new(),
      client,
      cache,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Refetch stats and days for the current year.
  ///
  /// When the server is unreachable or fails on its side, stats fall back to
  /// the cached snapshot and the view is marked stale; that is only an error
  /// when there is nothing to show. A rejected request is always an error.
  pub async fn load(&mut self) -> anyhow::Result<()> {
    self.status_msg = format!("Loading {}…", self.year);

    match self.client.stats(self.year, self.residence.as_ref()).await {
      Ok(stats) => {
        if let Err(e) = self.cache.store(&stats) {
          tracing::warn!(error = %e, "failed to cache stats snapshot");
        }
        self.stats = Some(stats);
        self.stale = false;
        self.status_msg.clear();
      }
      Err(e) if !client::is_unavailable(&e) => {
        self.status_msg = format!("Error: {e}");
        return Err(e);
      }
      Err(e) => match self.cache.load(self.year) {
        Some(cached) => {
          self.stats = Some(cached);
          self.stale = true;
          self.status_msg = format!("Offline, showing cached snapshot: {e}");
        }
        None => {
          self.status_msg = format!("Error: {e}");
          return Err(e);
        }
      },
    }

    match self.client.list_days(self.year, None).await {
      Ok(days) => self.days = days,
      Err(e) => {
        self.days.clear();
        if self.status_msg.is_empty() {
          self.status_msg = format!("Error loading days: {e}");
        }
      }
    }

    self.clamp_cursor();
    Ok(())
  }

  fn clamp_cursor(&mut self) {
    let len = self.filtered_countries().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Countries whose code or name match the current filter.
  pub fn filtered_countries(&self) -> Vec<&CountryStats> {
    let Some(stats) = &self.stats else {
      return Vec::new();
    };
    if self.filter.is_empty() {
      return stats.countries.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    stats
      .countries
      .iter()
      .filter(|c| {
        matcher.fuzzy_match(&c.country_name, &self.filter).is_some()
          || matcher.fuzzy_match(c.country.as_str(), &self.filter).is_some()
      })
      .collect()
  }

  /// The country under the cursor, if any.
  pub fn cursor_country(&self) -> Option<&CountryStats> {
    self.filtered_countries().get(self.list_cursor).copied()
  }

  /// Recorded days of the country under the cursor, most recent first.
  pub fn cursor_days(&self) -> Vec<&DayPresence> {
    let Some(country) = self.cursor_country() else {
      return Vec::new();
    };
    self
      .days
      .iter()
      .rev()
      .filter(|d| d.country == country.country)
      .collect()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return Ok(true);
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_countries().len();
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      // Year navigation
      KeyCode::Char('[') | KeyCode::Left | KeyCode::Char('h') => {
        self.year -= 1;
        self.list_cursor = 0;
        self.reload().await;
      }
      KeyCode::Char(']') | KeyCode::Right | KeyCode::Char('l') => {
        self.year += 1;
        self.list_cursor = 0;
        self.reload().await;
      }

      KeyCode::Char('r') => self.reload().await,

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      _ => {}
    }
    Ok(true)
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
  }

  /// [`load`](Self::load) for interactive use, where failures stay in the
  /// status bar.
  async fn reload(&mut self) {
    if self.load().await.is_err() {
      self.stats = None;
      self.days.clear();
    }
  }
}
