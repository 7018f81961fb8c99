//! Application state machine and event dispatcher.

use std::sync::Arc;

use board_core::{
  message::{AUTHOR_MAX_CHARS, Message, MessageDraft, TEXT_MAX_CHARS},
  thread::Threads,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::client::{ApiClient, ClientError};

pub const LOAD_FAILED: &str = "Failed to load messages. Please try again.";
pub const SEND_FAILED: &str = "Failed to send message";
pub const DELETE_FAILED: &str = "Failed to delete message";

// ─── View state ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
  /// Painted before the first load completes. Later refreshes run inside a
  /// key handler, so the previous frame stays up until they finish.
  Loading,
  Loaded,
  Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  List,
  Compose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
  #[default]
  Author,
  Text,
}

// ─── Composer ─────────────────────────────────────────────────────────────────

/// The new-message form.
#[derive(Debug, Clone, Default)]
pub struct Composer {
  pub author:       String,
  pub text:         String,
  pub field:        Field,
  /// Message being replied to, if any.
  pub reply_target: Option<Message>,
}

impl Composer {
  fn active_mut(&mut self) -> (&mut String, usize) {
    match self.field {
      Field::Author => (&mut self.author, AUTHOR_MAX_CHARS),
      Field::Text => (&mut self.text, TEXT_MAX_CHARS),
    }
  }

  fn push(&mut self, c: char) {
    let (buf, max) = self.active_mut();
    if buf.chars().count() < max {
      buf.push(c);
    }
  }

  fn pop(&mut self) { self.active_mut().0.pop(); }

  fn clear(&mut self) {
    self.text.clear();
    self.author.clear();
    self.reply_target = None;
    self.field = Field::Author;
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub state:    ViewState,
  /// Last successfully loaded list, newest first.
  pub messages: Vec<Message>,
  pub focus:    Focus,
  pub composer: Composer,
  /// Index into the top-level threads.
  pub cursor:   usize,
  /// One-shot success text for the status bar.
  pub notice:   Option<String>,
  pub client:   Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      state:    ViewState::Loading,
      messages: Vec::new(),
      focus:    Focus::List,
      composer: Composer::default(),
      cursor:   0,
      notice:   None,
      client:   Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Refetch the whole list. Failure clears it.
  pub async fn refresh(&mut self) {
    self.state = ViewState::Loading;
    match self.client.list_messages().await {
      Ok(messages) => {
        self.messages = messages;
        self.state = ViewState::Loaded;
        let threads = self.threads().top_level().len();
        self.cursor = self.cursor.min(threads.saturating_sub(1));
      }
      Err(e) => {
        tracing::warn!(error = %e, "failed to load messages");
        self.messages.clear();
        self.cursor = 0;
        self.state = ViewState::Error(LOAD_FAILED.to_owned());
      }
    }
  }

  pub fn threads(&self) -> Threads<'_> { Threads::partition(&self.messages) }

  /// The top-level message under the cursor.
  pub fn selected(&self) -> Option<&Message> {
    self.threads().top_level().get(self.cursor).copied()
  }

  // ── Composing ─────────────────────────────────────────────────────────────

  pub fn start_reply(&mut self) {
    if let Some(target) = self.selected().cloned() {
      self.composer.reply_target = Some(target);
      self.focus = Focus::Compose;
      self.composer.field = if self.composer.author.trim().is_empty() {
        Field::Author
      } else {
        Field::Text
      };
    }
  }

  pub fn cancel_reply(&mut self) { self.composer.reply_target = None; }

  pub fn can_submit(&self) -> bool {
    !self.composer.text.trim().is_empty() && !self.composer.author.trim().is_empty()
  }

  pub fn build_draft(&self) -> MessageDraft {
    let draft = MessageDraft::new(
      self.composer.text.trim(),
      self.composer.author.trim(),
    );
    match &self.composer.reply_target {
      Some(target) => draft.replying_to(target),
      None => draft,
    }
  }

  /// Post the composed message, then resync. No-op while the form is
  /// incomplete.
  pub async fn submit(&mut self) {
    if !self.can_submit() {
      return;
    }
    let draft = self.build_draft();
    match self.client.create_message(&draft).await {
      Ok(message) => {
        tracing::info!(id = %message.id, "message posted");
        self.composer.clear();
        self.focus = Focus::List;
        self.notice = Some("Message posted successfully!".to_owned());
        self.refresh().await;
      }
      Err(e) => self.fail(e, SEND_FAILED),
    }
  }

  /// Soft-delete the selected thread's top-level message, then resync.
  pub async fn delete_selected(&mut self) {
    let Some((id, preview)) = self.selected().map(|m| (m.id, m.preview())) else {
      return;
    };
    match self.client.delete_message(id).await {
      Ok(()) => {
        tracing::info!(%id, "message deleted");
        if self.composer.reply_target.as_ref().is_some_and(|t| t.id == id) {
          self.cancel_reply();
        }
        self.notice = Some(format!("Deleted \"{preview}\""));
        self.refresh().await;
      }
      Err(e) => self.fail(e, DELETE_FAILED),
    }
  }

  /// Surface a mutation failure without touching the list.
  fn fail(&mut self, err: ClientError, fallback: &str) {
    tracing::warn!(error = %err, "{fallback}");
    self.notice = None;
    self.state = ViewState::Error(match err {
      ClientError::Server { message, .. } => message,
      _ => fallback.to_owned(),
    });
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Some terminals also report releases and repeats.
    if key.kind != KeyEventKind::Press {
      return Ok(true);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }
    if key.code == KeyCode::F(5) {
      self.refresh().await;
      return Ok(true);
    }
    self.notice = None;

    match self.focus {
      Focus::List => self.handle_list_key(key).await,
      Focus::Compose => self.handle_compose_key(key).await,
    }
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.threads().top_level().len();
        if self.cursor + 1 < len {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }

      KeyCode::Char('R') => self.refresh().await,
      KeyCode::Char('r') => self.start_reply(),
      KeyCode::Char('x') => self.cancel_reply(),
      KeyCode::Char('d') => self.delete_selected().await,

      KeyCode::Char('i') | KeyCode::Tab | KeyCode::Enter => {
        self.focus = Focus::Compose;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_compose_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // First Esc drops the reply target, the next leaves the form.
      KeyCode::Esc => {
        if self.composer.reply_target.is_some() {
          self.cancel_reply();
        } else {
          self.focus = Focus::List;
        }
      }
      KeyCode::Tab | KeyCode::BackTab => {
        self.composer.field = match self.composer.field {
          Field::Author => Field::Text,
          Field::Text => Field::Author,
        };
      }
      KeyCode::Enter => self.submit().await,
      KeyCode::Backspace => self.composer.pop(),
      KeyCode::Char(c) => self.composer.push(c),
      _ => {}
    }
    Ok(true)
  }
}
