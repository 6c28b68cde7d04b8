//! Country list pane: left panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::tone_color;
use crate::app::App;

/// Render the per-country totals into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_countries();
  let total = app.stats.as_ref().map_or(0, |s| s.countries.len());

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Countries ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Countries ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|c| {
      let marker = if c.is_residence { "⌂ " } else { "  " };
      ListItem::new(Line::from(vec![
        Span::raw(marker),
        Span::styled(
          format!("{} ", c.country),
          Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!("{:<18}", c.country_name)),
        Span::styled(
          format!("{:>4}", c.total_days),
          Style::default().fg(tone_color(c.tone)),
        ),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  let mut state = ListState::default();
  state.select((!filtered.is_empty()).then_some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
