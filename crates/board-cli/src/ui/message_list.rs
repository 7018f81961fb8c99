//! Thread list pane: top-level messages with their replies beneath.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::format_time;
use crate::app::{App, Focus, ViewState};

/// Render the thread list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let threads = app.threads();
  let top = threads.top_level();

  let mut title = format!(
    " {} {} ",
    top.len(),
    if top.len() == 1 { "conversation" } else { "conversations" }
  );
  let hidden = threads.unresolved_reply_count();
  if hidden > 0 {
    title.push_str(&format!("· {hidden} replies to hidden messages "));
  }

  let border = if app.focus == Focus::List { Color::Cyan } else { Color::DarkGray };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  if app.messages.is_empty() {
    let text = match app.state {
      ViewState::Loading => "Loading messages...",
      _ => "No messages yet. Be the first to post! (R to refresh)",
    };
    f.render_widget(
      Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))).block(block),
      area,
    );
    return;
  }

  let mut items = Vec::new();
  let mut selected_item = None;

  for (i, message) in top.iter().enumerate() {
    if i == app.cursor {
      selected_item = Some(items.len());
    }
    items.push(ListItem::new(vec![
      Line::from(vec![
        Span::styled(
          message.author.clone(),
          Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
          format!("  {}", format_time(message.timestamp)),
          Style::default().fg(Color::DarkGray),
        ),
      ]),
      Line::from(format!("  {}", message.text)),
    ]));

    // Groups arrive newest first; read them oldest first.
    for reply in threads.replies_of(message.id).iter().rev() {
      items.push(ListItem::new(Line::from(vec![
        Span::styled("    ↳ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
          format!("{}: ", reply.author),
          Style::default().fg(Color::Cyan),
        ),
        Span::raw(reply.text.clone()),
      ])));
    }
  }

  let mut state = ListState::default();
  state.select(selected_item);

  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
      .highlight_symbol("▌"),
    area,
    &mut state,
  );
}
