//! Message types: the single entity of the board.
//!
//! A message is created once, may have its `text`/`author` overwritten, and is
//! eventually soft-deleted. Replies point at their parent through `reply_to`
//! and carry a frozen snapshot of the parent's author and text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  error::{ValidationError, Violation},
};

// ─── Limits ──────────────────────────────────────────────────────────────────

pub const TEXT_MAX_CHARS: usize = 500;
pub const AUTHOR_MAX_CHARS: usize = 100;
/// Maximum length of the parent-text snapshot stored on a reply.
pub const SNAPSHOT_MAX_CHARS: usize = 100;
pub const PREVIEW_CHARS: usize = 50;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Soft-delete state. `Active → Deleted` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageStatus {
  #[default]
  Active,
  Deleted,
}

impl MessageStatus {
  pub fn is_active(self) -> bool { matches!(self, Self::Active) }

  pub fn from_active(active: bool) -> Self {
    if active { Self::Active } else { Self::Deleted }
  }
}

/// `MessageStatus` travels as the boolean `isActive` on the wire.
mod active_flag {
  use serde::{Deserialize, Deserializer, Serializer};

  use super::MessageStatus;

  pub fn serialize<S: Serializer>(
    status: &MessageStatus,
    s: S,
  ) -> Result<S::Ok, S::Error> {
    s.serialize_bool(status.is_active())
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    d: D,
  ) -> Result<MessageStatus, D::Error> {
    Ok(MessageStatus::from_active(bool::deserialize(d)?))
  }
}

// ─── Message ─────────────────────────────────────────────────────────────────

/// A stored message as returned by the store and sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
  pub id:              Uuid,
  pub text:            String,
  pub author:          String,
  /// Creation time; updates never touch it.
  pub timestamp:       DateTime<Utc>,
  #[serde(rename = "isActive", with = "active_flag")]
  pub status:          MessageStatus,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
  /// Parent message id. Not referentially enforced.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reply_to:        Option<Uuid>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reply_to_author: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reply_to_text:   Option<String>,
}

impl Message {
  pub fn is_reply(&self) -> bool { self.reply_to.is_some() }

  /// Short single-line summary: the first 50 characters of the text.
  pub fn preview(&self) -> String {
    let mut out = excerpt(&self.text, PREVIEW_CHARS);
    if self.text.chars().count() > PREVIEW_CHARS {
      out.push_str("...");
    }
    out
  }
}

/// The first `max` characters of `s` (character, not byte, count).
pub fn excerpt(s: &str, max: usize) -> String { s.chars().take(max).collect() }

/// Parse a message id from a path segment.
pub fn parse_id(raw: &str) -> Result<Uuid> {
  Uuid::parse_str(raw).map_err(|_| Error::InvalidId(raw.to_owned()))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Unvalidated create payload. Shared by the API body and the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text:            Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub author:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reply_to:        Option<Uuid>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reply_to_author: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reply_to_text:   Option<String>,
}

impl MessageDraft {
  pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
    Self {
      text: Some(text.into()),
      author: Some(author.into()),
      ..Self::default()
    }
  }

  /// Attach a reply reference and freeze the parent's author and text.
  pub fn replying_to(mut self, parent: &Message) -> Self {
    self.reply_to = Some(parent.id);
    self.reply_to_author = Some(parent.author.clone());
    self.reply_to_text = Some(excerpt(&parent.text, SNAPSHOT_MAX_CHARS));
    self
  }

  /// Trim and check every field, collecting all violations.
  ///
  /// Snapshot fields are truncated rather than rejected, and dropped when
  /// there is no `reply_to`.
  pub fn validate(self) -> Result<NewMessage> {
    let mut violations = Vec::new();
    let text = required(
      self.text,
      TEXT_MAX_CHARS,
      Violation::TextRequired,
      Violation::TextTooLong,
      &mut violations,
    );
    let author = required(
      self.author,
      AUTHOR_MAX_CHARS,
      Violation::AuthorRequired,
      Violation::AuthorTooLong,
      &mut violations,
    );
    if !violations.is_empty() {
      return Err(ValidationError::new(violations).into());
    }

    let (reply_to_author, reply_to_text) = match self.reply_to {
      Some(_) => (
        snapshot(self.reply_to_author, AUTHOR_MAX_CHARS),
        snapshot(self.reply_to_text, SNAPSHOT_MAX_CHARS),
      ),
      None => (None, None),
    };

    Ok(NewMessage {
      text,
      author,
      reply_to: self.reply_to,
      reply_to_author,
      reply_to_text,
    })
  }
}

fn required(
  raw: Option<String>,
  max: usize,
  missing: Violation,
  too_long: Violation,
  violations: &mut Vec<Violation>,
) -> String {
  let value = raw.as_deref().map(str::trim).unwrap_or_default();
  if value.is_empty() {
    violations.push(missing);
  } else if value.chars().count() > max {
    violations.push(too_long);
  }
  value.to_owned()
}

fn snapshot(raw: Option<String>, max: usize) -> Option<String> {
  raw
    .map(|s| excerpt(s.trim(), max))
    .filter(|s| !s.is_empty())
}

/// A validated message ready for insertion.
///
/// Only obtainable through [`MessageDraft::validate`]; `id` and timestamps
/// are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
  text:            String,
  author:          String,
  reply_to:        Option<Uuid>,
  reply_to_author: Option<String>,
  reply_to_text:   Option<String>,
}

impl NewMessage {
  pub fn text(&self) -> &str { &self.text }

  pub fn author(&self) -> &str { &self.author }

  pub fn reply_to(&self) -> Option<Uuid> { self.reply_to }

  pub fn reply_to_author(&self) -> Option<&str> { self.reply_to_author.as_deref() }

  pub fn reply_to_text(&self) -> Option<&str> { self.reply_to_text.as_deref() }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Partial update of `text` and/or `author`. Nothing else is mutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub author: Option<String>,
}

impl MessagePatch {
  pub fn is_empty(&self) -> bool { self.text.is_none() && self.author.is_none() }

  /// Normalise the patch: absent and `""` both mean "leave unchanged"; any
  /// other value is trimmed and must satisfy the create-time rules.
  pub fn validate(self) -> Result<Self> {
    let mut violations = Vec::new();
    let text = optional(
      self.text,
      TEXT_MAX_CHARS,
      Violation::TextRequired,
      Violation::TextTooLong,
      &mut violations,
    );
    let author = optional(
      self.author,
      AUTHOR_MAX_CHARS,
      Violation::AuthorRequired,
      Violation::AuthorTooLong,
      &mut violations,
    );
    if !violations.is_empty() {
      return Err(ValidationError::new(violations).into());
    }
    Ok(Self { text, author })
  }
}

fn optional(
  raw: Option<String>,
  max: usize,
  missing: Violation,
  too_long: Violation,
  violations: &mut Vec<Violation>,
) -> Option<String> {
  let raw = raw.filter(|s| !s.is_empty())?;
  Some(required(Some(raw), max, missing, too_long, violations))
}
