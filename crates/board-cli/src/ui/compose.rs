//! New-message form.

use board_core::message::{AUTHOR_MAX_CHARS, TEXT_MAX_CHARS};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, Field, Focus};

/// Rows taken by the form, borders included.
pub const HEIGHT: u16 = 6;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let composer = &app.composer;
  let focused = app.focus == Focus::Compose;

  let title = match &composer.reply_target {
    Some(target) => format!(" Reply to {} ", target.author),
    None => " New message ".to_owned(),
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));

  let field_line = |label: &str, value: &str, max: usize, field: Field| {
    let active = focused && composer.field == field;
    let cursor = if active { "_" } else { "" };
    Line::from(vec![
      Span::styled(
        format!("{label:>7}: "),
        Style::default().fg(if active { Color::Cyan } else { Color::Gray }),
      ),
      Span::raw(format!("{value}{cursor}")),
      Span::styled(
        format!("  {}/{max}", value.chars().count()),
        Style::default().fg(Color::DarkGray),
      ),
    ])
  };

  let mut lines = Vec::new();
  if let Some(target) = &composer.reply_target {
    lines.push(Line::from(Span::styled(
      format!("  ↪ {}: {}", target.author, target.preview()),
      Style::default().fg(Color::DarkGray),
    )));
  }
  lines.push(field_line("Name", &composer.author, AUTHOR_MAX_CHARS, Field::Author));
  lines.push(field_line("Message", &composer.text, TEXT_MAX_CHARS, Field::Text));

  f.render_widget(
    Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
    area,
  );
}
