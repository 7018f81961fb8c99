//! TUI rendering: orchestrates all panes.

pub mod compose;
pub mod message_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Focus, ViewState};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // threads
      Constraint::Length(compose::HEIGHT),
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  message_list::draw(f, rows[1], app);
  compose::draw(f, rows[2], app);
  draw_status(f, rows[3], app);
}

/// Local wall-clock rendering for message timestamps.
pub(crate) fn format_time(at: chrono::DateTime<chrono::Utc>) -> String {
  at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let left = Span::styled(
    " board",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{} ", app.client.base_url()),
    Style::default().fg(Color::Gray),
  );

  let used = left.width() + right.width();
  let pad = usize::from(area.width).saturating_sub(used);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad)), right]);
  f.render_widget(
    Paragraph::new(line).block(Block::default().style(Style::default().bg(Color::DarkGray))),
    area,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.focus {
    Focus::List => (
      "BROWSE",
      "↑↓/jk move  r reply  d delete  R/F5 refresh  i compose  q quit",
    ),
    Focus::Compose => (
      "COMPOSE",
      "Tab switch field  Enter post  Esc cancel reply/back",
    ),
  };

  let (status, style) = match (&app.state, &app.notice) {
    (ViewState::Error(e), _) => (e.clone(), Style::default().fg(Color::Red)),
    (ViewState::Loading, _) => (
      "Loading messages...".to_owned(),
      Style::default().fg(Color::Yellow),
    ),
    (ViewState::Loaded, Some(n)) => (n.clone(), Style::default().fg(Color::Green)),
    (ViewState::Loaded, None) => (hints.to_owned(), Style::default().fg(Color::DarkGray)),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let line = Line::from(vec![mode_span, Span::styled(format!("  {status}"), style)]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
