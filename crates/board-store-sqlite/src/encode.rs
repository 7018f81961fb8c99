//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that text ordering equals chronological ordering. UUIDs are
//! stored as hyphenated lowercase strings.

use board_core::message::{Message, MessageStatus};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// The current time at the precision the store keeps, so values handed back
/// from a write compare equal to values read later.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `messages` row.
pub struct RawMessage {
  pub message_id:      String,
  pub text:            String,
  pub author:          String,
  pub timestamp:       String,
  pub is_active:       bool,
  pub reply_to:        Option<String>,
  pub reply_to_author: Option<String>,
  pub reply_to_text:   Option<String>,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawMessage {
  /// Read a row selected with [`crate::schema::COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      message_id:      row.get(0)?,
      text:            row.get(1)?,
      author:          row.get(2)?,
      timestamp:       row.get(3)?,
      is_active:       row.get(4)?,
      reply_to:        row.get(5)?,
      reply_to_author: row.get(6)?,
      reply_to_text:   row.get(7)?,
      created_at:      row.get(8)?,
      updated_at:      row.get(9)?,
    })
  }

  pub fn into_message(self) -> Result<Message> {
    Ok(Message {
      id:              decode_uuid(&self.message_id)?,
      text:            self.text,
      author:          self.author,
      timestamp:       decode_dt(&self.timestamp)?,
      status:          MessageStatus::from_active(self.is_active),
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
      reply_to:        self.reply_to.as_deref().map(decode_uuid).transpose()?,
      reply_to_author: self.reply_to_author,
      reply_to_text:   self.reply_to_text,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn encoded_timestamps_sort_chronologically() {
    let base = now();
    let whole = base.trunc_subsecs(0);
    let later = whole + chrono::Duration::microseconds(1);
    assert!(encode_dt(whole) < encode_dt(later));
    assert_eq!(encode_dt(whole).len(), encode_dt(later).len());
  }

  #[test]
  fn timestamps_round_trip_at_store_precision() {
    let t = now();
    assert_eq!(decode_dt(&encode_dt(t)).unwrap(), t);
  }
}
