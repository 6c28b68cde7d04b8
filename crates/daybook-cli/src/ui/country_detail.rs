//! Country detail pane: right panel.

use daybook_core::{presence::PresenceStatus, stats::CountryStats};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use super::tone_color;
use crate::app::App;

/// Render the country under the cursor into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(country) = app.cursor_country() else {
    return;
  };

  let block = Block::default()
    .title(format!(" {} ({}) ", country.country_name, country.country))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // gauge
      Constraint::Length(1),
      Constraint::Min(0), // summary + days
    ])
    .split(inner);

  let gauge = Gauge::default()
    .gauge_style(Style::default().fg(tone_color(country.tone)).bg(Color::Black))
    .ratio(country.progress() / 100.0)
    .label(format!(
      "{}/{} days  {:.1}%",
      country.total_days, country.threshold, country.percent_of_threshold
    ));
  f.render_widget(gauge, rows[0]);

  let mut lines = summary_lines(country);

  if let Some(warning) = app
    .stats
    .as_ref()
    .and_then(|s| s.warnings.iter().find(|w| w.country == country.country))
  {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      warning.message.clone(),
      Style::default()
        .fg(tone_color(country.tone))
        .add_modifier(Modifier::BOLD),
    )));
  }

  lines.push(Line::from(""));
  lines.push(heading("Days"));
  for day in app.cursor_days() {
    let mut spans = vec![Span::raw(format!("  {}", day.date))];
    if day.status == PresenceStatus::Confirmed {
      spans.push(Span::styled("  gps", Style::default().fg(Color::Green)));
    }
    if let Some(notes) = &day.notes {
      spans.push(Span::styled(
        format!("  {notes}"),
        Style::default().fg(Color::DarkGray),
      ));
    }
    lines.push(Line::from(spans));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), rows[2]);
}

fn heading(text: &str) -> Line<'static> {
  Line::from(Span::styled(
    text.to_string(),
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  ))
}

fn field(label: &str, value: String) -> Line<'static> {
  Line::from(vec![
    Span::styled(format!("{label:<14}"), Style::default().fg(Color::Cyan)),
    Span::raw(value),
  ])
}

fn summary_lines(c: &CountryStats) -> Vec<Line<'static>> {
  let mut lines = Vec::new();

  let remaining = if c.remaining_days >= 0 {
    format!("{} days", c.remaining_days)
  } else {
    format!("threshold reached, {} over", c.overshoot())
  };
  lines.push(field("Remaining", remaining));
  lines.push(field(
    "Recorded",
    format!("{} gps, {} manual", c.confirmed_days, c.manual_days),
  ));
  if let Some(streak) = c.notable_streak() {
    lines.push(field("Longest run", format!("{streak} consecutive days")));
  }
  if let (Some(first), Some(last)) = (c.first_day, c.last_day) {
    lines.push(field("Span", format!("{first} → {last}")));
  }
  if c.is_residence {
    lines.push(field("Residence", "yes".into()));
  }

  if !c.days_by_month.is_empty() {
    lines.push(Line::from(""));
    lines.push(heading("By month"));
    for (month, n) in &c.days_by_month {
      lines.push(Line::from(vec![
        Span::raw(format!("  {month}  {n:>2} ")),
        Span::styled("▇".repeat(*n as usize), Style::default().fg(Color::Blue)),
      ]));
    }
  }
  lines
}
