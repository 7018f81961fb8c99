//! The `MessageStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `board-store-sqlite`).
//! Higher layers (`board-api`, `board-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::{Message, MessagePatch, NewMessage};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_RECENT_COUNT: u32 = 5;

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`MessageStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageQuery {
  /// Case-insensitive substring filter on `author`.
  pub author: Option<String>,
  /// 1-based page number.
  pub page:   u32,
  pub limit:  u32,
}

impl Default for MessageQuery {
  fn default() -> Self {
    Self {
      author: None,
      page:   1,
      limit:  DEFAULT_PAGE_SIZE,
    }
  }
}

impl MessageQuery {
  /// Number of matching records to skip: `(page - 1) * limit`.
  pub fn offset(&self) -> u64 {
    u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
  }
}

/// Pagination metadata attached to every list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
  pub current: u32,
  pub limit:   u32,
  pub total:   u64,
  /// `ceil(total / limit)`; zero for an empty result.
  pub pages:   u64,
}

impl Pagination {
  pub fn new(current: u32, limit: u32, total: u64) -> Self {
    let pages = if limit == 0 {
      0
    } else {
      total.div_ceil(u64::from(limit))
    };
    Self { current, limit, total, pages }
  }
}

/// One page of results plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
  pub items:      Vec<T>,
  pub pagination: Pagination,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a message store backend.
///
/// Deleted messages are invisible to every read and write here: methods that
/// target a single message return `None` when it is absent *or* deleted.
/// Each method is a single store interaction; there are no multi-call
/// transactions.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait MessageStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new active message. `id`, `timestamp`, `created_at` and
  /// `updated_at` are assigned by the store.
  fn create(
    &self,
    input: NewMessage,
  ) -> impl Future<Output = Result<Message, Self::Error>> + Send + '_;

  /// Retrieve an active message by id.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Message>, Self::Error>> + Send + '_;

  /// Active messages matching `query`, newest `timestamp` first.
  fn list<'a>(
    &'a self,
    query: &'a MessageQuery,
  ) -> impl Future<Output = Result<Page<Message>, Self::Error>> + Send + 'a;

  /// Overwrite the supplied fields of an active message.
  fn update(
    &self,
    id: Uuid,
    patch: MessagePatch,
  ) -> impl Future<Output = Result<Option<Message>, Self::Error>> + Send + '_;

  /// Mark an active message as deleted and return it. Replies are untouched.
  fn soft_delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Message>, Self::Error>> + Send + '_;

  /// Up to `count` active messages, newest first.
  fn recent(
    &self,
    count: u32,
  ) -> impl Future<Output = Result<Vec<Message>, Self::Error>> + Send + '_;
}
