//! App state transitions driven against a real router on an ephemeral port.

use std::sync::Arc;

use axum::Router;
use board_api::{ApiOptions, api_router};
use board_core::message::MessageDraft;
use board_store_sqlite::SqliteStore;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use tokio::net::TcpListener;

use crate::{
  app::{App, DELETE_FAILED, Field, Focus, LOAD_FAILED, SEND_FAILED, ViewState},
  client::{ApiClient, ApiConfig, ClientError},
  ui,
};

async fn spawn_server() -> String {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let router = Router::new().nest(
    "/api",
    api_router(Arc::new(store), ApiOptions::default()),
  );
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, router).await.unwrap();
  });
  format!("http://{addr}")
}

fn client(base_url: String) -> ApiClient {
  ApiClient::new(ApiConfig { base_url, limit: 50 }).unwrap()
}

/// A URL nothing is listening on.
fn dead_url() -> String {
  let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
  let port = listener.local_addr().unwrap().port();
  drop(listener);
  format!("http://127.0.0.1:{port}")
}

fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

fn render(app: &App, width: u16, height: u16) -> String {
  let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
  terminal.draw(|f| ui::draw(f, app)).unwrap();
  terminal
    .backend()
    .buffer()
    .content()
    .iter()
    .map(|cell| cell.symbol())
    .collect()
}

async fn type_str(app: &mut App, s: &str) {
  for c in s.chars() {
    app.handle_key(key(KeyCode::Char(c))).await.unwrap();
  }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_loads_messages_and_threads() {
  let url = spawn_server().await;
  let api = client(url.clone());
  let parent = api
    .create_message(&MessageDraft::new("parent", "Alice"))
    .await
    .unwrap();
  api
    .create_message(&MessageDraft::new("child", "Bob").replying_to(&parent))
    .await
    .unwrap();

  let mut app = App::new(client(url));
  assert_eq!(app.state, ViewState::Loading);
  app.refresh().await;

  assert_eq!(app.state, ViewState::Loaded);
  assert_eq!(app.messages.len(), 2);
  let threads = app.threads();
  assert_eq!(threads.top_level().len(), 1);
  assert_eq!(threads.replies_of(parent.id).len(), 1);
  assert_eq!(app.selected().map(|m| m.id), Some(parent.id));
}

#[tokio::test]
async fn unreachable_server_clears_the_list() {
  let mut app = App::new(client(dead_url()));
  app.refresh().await;
  assert_eq!(app.state, ViewState::Error(LOAD_FAILED.to_owned()));
  assert!(app.messages.is_empty());
  assert!(app.selected().is_none());
}

#[tokio::test]
async fn network_failure_is_a_network_error() {
  let api = client(dead_url());
  let err = api.list_messages().await.unwrap_err();
  assert!(matches!(err, ClientError::Network(_)));
}

// ─── Submit ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_posts_clears_form_and_resyncs() {
  let mut app = App::new(client(spawn_server().await));
  app.refresh().await;

  app.handle_key(key(KeyCode::Char('i'))).await.unwrap();
  assert_eq!(app.focus, Focus::Compose);
  type_str(&mut app, "Alice").await;
  app.handle_key(key(KeyCode::Tab)).await.unwrap();
  assert_eq!(app.composer.field, Field::Text);
  type_str(&mut app, "hello board").await;
  assert!(app.can_submit());

  app.handle_key(key(KeyCode::Enter)).await.unwrap();

  assert_eq!(app.state, ViewState::Loaded);
  assert_eq!(app.messages.len(), 1);
  assert_eq!(app.messages[0].text, "hello board");
  assert_eq!(app.messages[0].author, "Alice");
  assert!(app.composer.text.is_empty());
  assert!(app.composer.author.is_empty());
  assert!(app.notice.is_some());
}

#[tokio::test]
async fn incomplete_form_does_not_submit() {
  let mut app = App::new(client(spawn_server().await));
  app.refresh().await;

  app.composer.text = "no author".into();
  app.composer.author = "   ".into();
  assert!(!app.can_submit());
  app.submit().await;

  assert_eq!(app.state, ViewState::Loaded);
  assert!(app.notice.is_none());
  app.refresh().await;
  assert!(app.messages.is_empty());
}

#[tokio::test]
async fn server_rejection_surfaces_its_error_text() {
  let url = spawn_server().await;
  client(url.clone())
    .create_message(&MessageDraft::new("existing", "Alice"))
    .await
    .unwrap();

  let mut app = App::new(client(url));
  app.refresh().await;
  app.composer.author = "Bob".into();
  app.composer.text = "x".repeat(501);
  app.submit().await;

  assert_eq!(app.state, ViewState::Error("Validation failed".to_owned()));
  assert_eq!(app.messages.len(), 1, "list untouched on failure");
  assert_eq!(app.composer.author, "Bob", "form kept for correction");
}

#[tokio::test]
async fn submit_without_server_uses_fallback_text() {
  let mut app = App::new(client(dead_url()));
  app.composer.author = "Alice".into();
  app.composer.text = "hi".into();
  app.submit().await;
  assert_eq!(app.state, ViewState::Error(SEND_FAILED.to_owned()));
}

// ─── Replies ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reply_carries_parent_snapshot() {
  let url = spawn_server().await;
  let long_text = "y".repeat(150);
  let parent = client(url.clone())
    .create_message(&MessageDraft::new(long_text.as_str(), "Alice"))
    .await
    .unwrap();

  let mut app = App::new(client(url));
  app.refresh().await;
  app.composer.author = "Bob".into();
  app.start_reply();
  assert_eq!(app.focus, Focus::Compose);
  assert_eq!(app.composer.field, Field::Text);

  let draft = app.build_draft();
  assert_eq!(draft.reply_to, Some(parent.id));
  assert_eq!(draft.reply_to_author.as_deref(), Some("Alice"));
  assert_eq!(draft.reply_to_text.as_ref().map(|t| t.chars().count()), Some(100));

  type_str(&mut app, "agreed").await;
  app.submit().await;

  assert!(app.composer.reply_target.is_none());
  let threads = app.threads();
  let replies = threads.replies_of(parent.id);
  assert_eq!(replies.len(), 1);
  assert_eq!(replies[0].text, "agreed");
}

#[tokio::test]
async fn escape_cancels_reply_then_leaves_form() {
  let url = spawn_server().await;
  client(url.clone())
    .create_message(&MessageDraft::new("parent", "Alice"))
    .await
    .unwrap();

  let mut app = App::new(client(url));
  app.refresh().await;
  app.handle_key(key(KeyCode::Char('r'))).await.unwrap();
  assert!(app.composer.reply_target.is_some());

  app.handle_key(key(KeyCode::Esc)).await.unwrap();
  assert!(app.composer.reply_target.is_none());
  assert_eq!(app.focus, Focus::Compose);

  app.handle_key(key(KeyCode::Esc)).await.unwrap();
  assert_eq!(app.focus, Focus::List);
  assert!(app.build_draft().reply_to.is_none());
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_selected_thread() {
  let url = spawn_server().await;
  let api = client(url.clone());
  let keep = api
    .create_message(&MessageDraft::new("keep", "Alice"))
    .await
    .unwrap();
  api
    .create_message(&MessageDraft::new("drop", "Bob"))
    .await
    .unwrap();

  let mut app = App::new(client(url));
  app.refresh().await;
  assert_eq!(app.selected().map(|m| m.text.as_str()), Some("drop"));

  app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
  assert_eq!(app.state, ViewState::Loaded);
  assert_eq!(app.messages.len(), 1);
  assert_eq!(app.messages[0].id, keep.id);
}

#[tokio::test]
async fn delete_failure_keeps_the_list() {
  let url = spawn_server().await;
  client(url.clone())
    .create_message(&MessageDraft::new("only", "Alice"))
    .await
    .unwrap();

  let mut app = App::new(client(url));
  app.refresh().await;
  app.client = Arc::new(client(dead_url()));
  app.delete_selected().await;

  assert_eq!(app.state, ViewState::Error(DELETE_FAILED.to_owned()));
  assert_eq!(app.messages.len(), 1);
}

// ─── Keys ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn quit_keys_and_input_caps() {
  let mut app = App::new(client(dead_url()));
  assert!(!app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
  assert!(
    !app
      .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
      .await
      .unwrap()
  );

  app.focus = Focus::Compose;
  app.composer.author = "a".repeat(100);
  app.handle_key(key(KeyCode::Char('z'))).await.unwrap();
  assert_eq!(app.composer.author.chars().count(), 100);
  app.handle_key(key(KeyCode::Backspace)).await.unwrap();
  assert_eq!(app.composer.author.chars().count(), 99);
  // `q` is text while composing.
  assert!(app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
}

#[tokio::test]
async fn only_key_presses_are_handled() {
  let mut app = App::new(client(dead_url()));
  let release =
    KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release);
  assert!(app.handle_key(release).await.unwrap());

  let repeat =
    KeyEvent::new_with_kind(KeyCode::Char('i'), KeyModifiers::NONE, KeyEventKind::Repeat);
  app.handle_key(repeat).await.unwrap();
  assert_eq!(app.focus, Focus::List);

  assert!(!app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
}

// ─── Rendering ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn draw_shows_threads_and_replies() {
  let url = spawn_server().await;
  let api = client(url.clone());
  let parent = api
    .create_message(&MessageDraft::new("first post", "Alice"))
    .await
    .unwrap();
  api
    .create_message(&MessageDraft::new("a reply", "Bob").replying_to(&parent))
    .await
    .unwrap();

  let mut app = App::new(client(url));
  app.refresh().await;

  let screen = render(&app, 80, 24);
  assert!(screen.contains("1 conversation"));
  assert!(screen.contains("Alice"));
  assert!(screen.contains("first post"));
  assert!(screen.contains("Bob: a reply"));
}

#[tokio::test]
async fn replies_render_oldest_first() {
  let url = spawn_server().await;
  let api = client(url.clone());
  let parent = api
    .create_message(&MessageDraft::new("the question", "Alice"))
    .await
    .unwrap();
  for (text, author) in [("reply one", "Bob"), ("reply two", "Carol")] {
    api
      .create_message(&MessageDraft::new(text, author).replying_to(&parent))
      .await
      .unwrap();
  }

  let mut app = App::new(client(url));
  app.refresh().await;
  let replies: Vec<&str> = app
    .threads()
    .replies_of(parent.id)
    .iter()
    .map(|m| m.text.as_str())
    .collect();
  // The list arrives newest first.
  assert_eq!(replies, ["reply two", "reply one"]);

  let screen = render(&app, 100, 30);
  let one = screen.find("Bob: reply one").unwrap();
  let two = screen.find("Carol: reply two").unwrap();
  assert!(one < two);
}

#[tokio::test]
async fn loading_state_is_painted_before_the_first_fetch() {
  let app = App::new(client(dead_url()));
  assert_eq!(app.state, ViewState::Loading);
  assert!(render(&app, 80, 24).contains("Loading messages..."));
}
