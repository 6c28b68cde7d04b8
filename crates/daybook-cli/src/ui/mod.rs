//! Dashboard rendering: orchestrates all panes.

pub mod country_detail;
pub mod country_list;

use chrono::Local;
use daybook_core::classify::Tone;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

/// Foreground colour for a display tone.
pub fn tone_color(tone: Tone) -> Color {
  match tone {
    Tone::Good => Color::Green,
    Tone::Caution => Color::Yellow,
    Tone::Alert => Color::Red,
  }
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let mut title = format!(" daybook  {}", app.year);
  if let Some(stats) = &app.stats {
    title.push_str(&format!("  {} days tracked", stats.total_days_tracked));
  }
  if app.stale {
    title.push_str("  [stale]");
  }

  let left = Span::styled(
    title,
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.content.chars().count() as u16)
    .saturating_sub(right.content.chars().count() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
    .split(area);

  country_list::draw(f, cols[0], app);

  if app.cursor_country().is_some() {
    country_detail::draw(f, cols[1], app);
  } else {
    draw_empty_detail(f, cols[1], app);
  }
}

fn draw_empty_detail(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let text = if app.stats.is_none() {
    "No data. Press r to retry."
  } else if app.filter.is_empty() {
    "No days tracked this year."
  } else {
    "No country matches the filter."
  };
  f.render_widget(
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = if app.filter_active {
    ("SEARCH", "Type to filter  Esc cancel  Enter keep")
  } else {
    ("NORMAL", "↑↓/jk country  ←→/[] year  / search  r reload  q quit")
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
