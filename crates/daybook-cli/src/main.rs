//! `daybook`: command-line client for the Daybook residency ledger.
//!
//! # Usage
//!
//! ```
//! daybook                                   # interactive dashboard
//! daybook add 2026-02-04 FR
//! daybook add-range 2026-02-08 2026-02-16 NL --notes "conference"
//! daybook stats --year 2026
//! daybook tracking on && daybook log-today
//! ```

mod app;
mod client;
mod commands;
mod locate;
mod render;
mod state;
mod ui;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use app::App;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use client::{ApiClient, ApiConfig};
use commands::Session;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use daybook_core::{country::CountryCode, presence::PresenceStatus};
use locate::{DEFAULT_LOCATOR_URL, FixedLocator, IpLocator};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use state::{SnapshotCache, StateFile};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "daybook", about = "Track days spent per country against the 183-day rule")]
struct Args {
  /// Path to a TOML config file (url, locator_url, residence).
  #[arg(short, long, value_name = "FILE", env = "DAYBOOK_CONFIG")]
  config: Option<PathBuf>,

  /// Base URL of the daybook server (default: http://localhost:5233).
  #[arg(long, env = "DAYBOOK_URL")]
  url: Option<String>,

  /// Directory holding the tracking state and cached stats.
  #[arg(long, env = "DAYBOOK_STATE_DIR", value_name = "DIR")]
  state_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Interactive dashboard (the default).
  Dashboard {
    #[arg(long)]
    year: Option<i32>,
  },
  /// List supported countries.
  Countries,
  /// List recorded days.
  Days {
    #[arg(long)]
    year:  Option<i32>,
    /// Restrict to one month (1-12).
    #[arg(long)]
    month: Option<u32>,
  },
  /// Record a single day, replacing any record for that date.
  Add {
    date:    NaiveDate,
    country: CountryCode,
    #[arg(long, value_enum, default_value_t = StatusArg::Manual)]
    status:  StatusArg,
    #[arg(long)]
    notes:   Option<String>,
  },
  /// Record every day from START to END inclusive (at most 90).
  AddRange {
    start:   NaiveDate,
    end:     NaiveDate,
    country: CountryCode,
    #[arg(long)]
    notes:   Option<String>,
  },
  /// Change the country, status or notes of a recorded day.
  Edit {
    date:    NaiveDate,
    #[arg(long)]
    country: Option<CountryCode>,
    #[arg(long, value_enum)]
    status:  Option<StatusArg>,
    /// New notes; an empty string clears them.
    #[arg(long)]
    notes:   Option<String>,
  },
  /// Delete a recorded day.
  Rm { date: NaiveDate },
  /// Per-country totals and threshold warnings.
  Stats {
    #[arg(long)]
    year:      Option<i32>,
    /// Residence country for this report.
    #[arg(long)]
    residence: Option<CountryCode>,
  },
  /// Record today from the device position.
  LogToday {
    /// Skip geolocation and use this country.
    #[arg(long)]
    country: Option<CountryCode>,
  },
  /// Show or switch automatic GPS tracking.
  Tracking {
    #[arg(value_enum)]
    switch: Option<Switch>,
  },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
  Manual,
  Confirmed,
}

impl From<StatusArg> for PresenceStatus {
  fn from(s: StatusArg) -> Self {
    match s {
      StatusArg::Manual => Self::Manual,
      StatusArg::Confirmed => Self::Confirmed,
    }
  }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Switch {
  On,
  Off,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:         String,
  #[serde(default)]
  locator_url: String,
  #[serde(default)]
  residence:   Option<CountryCode>,
  #[serde(default)]
  state_dir:   Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:5233".to_string()),
  };
  let locator_url = if file_cfg.locator_url.is_empty() {
    DEFAULT_LOCATOR_URL.to_string()
  } else {
    file_cfg.locator_url.clone()
  };
  let state_dir = args
    .state_dir
    .or(file_cfg.state_dir)
    .unwrap_or_else(state::default_dir);

  let mut session = Session {
    client:    ApiClient::new(api_config)?,
    state:     StateFile::load(&state_dir)?,
    cache:     SnapshotCache::new(&state_dir),
    residence: file_cfg.residence,
  };

  // The device's calendar date, not the server's.
  let today = Local::now().date_naive();
  let this_year = today.year();

  match args.command.unwrap_or(Command::Dashboard { year: None }) {
    Command::Dashboard { year } => dashboard(session, year.unwrap_or(this_year)).await,
    Command::Countries => commands::countries(&session).await,
    Command::Days { year, month } => {
      commands::list_days(&session, year.unwrap_or(this_year), month).await
    }
    Command::Add { date, country, status, notes } => {
      commands::add(&session, date, country, status.into(), notes).await
    }
    Command::AddRange { start, end, country, notes } => {
      commands::add_range(&session, start, end, country, notes).await
    }
    Command::Edit { date, country, status, notes } => {
      commands::edit(&session, date, country, status.map(Into::into), notes).await
    }
    Command::Rm { date } => commands::remove(&session, date).await,
    Command::Stats { year, residence } => {
      commands::stats(&session, year.unwrap_or(this_year), residence).await
    }
    Command::LogToday { country: Some(country) } => {
      commands::log_today(&mut session, &FixedLocator(country), today)
        .await
        .map(drop)
    }
    Command::LogToday { country: None } => {
      let locator = IpLocator::new(locator_url)?;
      commands::log_today(&mut session, &locator, today)
        .await
        .map(drop)
    }
    Command::Tracking { switch } => {
      commands::tracking(&mut session, switch.map(|s| matches!(s, Switch::On)))
    }
  }
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

async fn dashboard(session: Session, year: i32) -> Result<()> {
  let mut app = App::new(session.client, session.cache, year, session.residence);

  // Load before touching the terminal so errors print normally.
  app.load().await?;

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
