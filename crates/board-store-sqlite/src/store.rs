//! [`SqliteStore`]: the SQLite implementation of [`MessageStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use board_core::{
  message::{Message, MessagePatch, MessageStatus, NewMessage},
  store::{MessageQuery, MessageStore, Page, Pagination},
};

use crate::{
  encode::{RawMessage, encode_dt, encode_uuid, now},
  schema::{COLUMNS, SCHEMA},
  Result,
};

/// Active rows, optionally narrowed by a case-insensitive author substring
/// bound to `?1` (NULL disables the filter).
const LIST_FILTER: &str =
  "is_active = 1 AND (?1 IS NULL OR instr(lower(author), lower(?1)) > 0)";

/// Newest first; rows sharing a timestamp fall back to insertion order.
const NEWEST_FIRST: &str = "ORDER BY timestamp DESC, seq DESC";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A message store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Flush and close the underlying connection.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    tracing::debug!("message store closed");
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("message store schema ready");
    Ok(())
  }

  /// Apply `set` (an SQL `SET` fragment whose placeholders start at `?3`) to
  /// an active row and return the row afterwards. `?1` is the id and `?2`
  /// the update time.
  async fn mutate_active(
    &self,
    id: Uuid,
    set: &'static str,
    values: Vec<Option<String>>,
  ) -> Result<Option<Message>> {
    let id_str = encode_uuid(id);
    let mut bound = vec![Some(id_str.clone()), Some(encode_dt(now()))];
    bound.extend(values);

    let raw: Option<RawMessage> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          &format!(
            "UPDATE messages SET {set}, updated_at = ?2
             WHERE message_id = ?1 AND is_active = 1"
          ),
          rusqlite::params_from_iter(bound.iter()),
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &format!("SELECT {COLUMNS} FROM messages WHERE message_id = ?1"),
          rusqlite::params![id_str],
          RawMessage::from_row,
        )?))
      })
      .await?;

    raw.map(RawMessage::into_message).transpose()
  }
}

// ─── MessageStore impl ───────────────────────────────────────────────────────

impl MessageStore for SqliteStore {
  type Error = crate::Error;

  async fn create(&self, input: NewMessage) -> Result<Message> {
    let at = now();
    let message = Message {
      id:              Uuid::new_v4(),
      text:            input.text().to_owned(),
      author:          input.author().to_owned(),
      timestamp:       at,
      status:          MessageStatus::Active,
      created_at:      at,
      updated_at:      at,
      reply_to:        input.reply_to(),
      reply_to_author: input.reply_to_author().map(str::to_owned),
      reply_to_text:   input.reply_to_text().map(str::to_owned),
    };

    let id_str       = encode_uuid(message.id);
    let at_str       = encode_dt(at);
    let text         = message.text.clone();
    let author       = message.author.clone();
    let reply_to     = message.reply_to.map(encode_uuid);
    let reply_author = message.reply_to_author.clone();
    let reply_text   = message.reply_to_text.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO messages (
             message_id, text, author, timestamp, is_active,
             reply_to, reply_to_author, reply_to_text,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6, ?7, ?4, ?4)",
          rusqlite::params![
            id_str,
            text,
            author,
            at_str,
            reply_to,
            reply_author,
            reply_text,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(message)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Message>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMessage> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {COLUMNS} FROM messages
                 WHERE message_id = ?1 AND is_active = 1"
              ),
              rusqlite::params![id_str],
              RawMessage::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMessage::into_message).transpose()
  }

  async fn list(&self, query: &MessageQuery) -> Result<Page<Message>> {
    let author = query.author.clone().filter(|a| !a.is_empty());
    let limit  = i64::from(query.limit);
    let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);

    let (raws, total): (Vec<RawMessage>, i64) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM messages WHERE {LIST_FILTER}"),
          rusqlite::params![author],
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM messages
           WHERE {LIST_FILTER}
           {NEWEST_FIRST}
           LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![author, limit, offset],
            RawMessage::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((rows, total))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawMessage::into_message)
      .collect::<Result<Vec<_>>>()?;
    let total = u64::try_from(total).unwrap_or_default();

    Ok(Page {
      items,
      pagination: Pagination::new(query.page, query.limit, total),
    })
  }

  async fn update(&self, id: Uuid, patch: MessagePatch) -> Result<Option<Message>> {
    if patch.is_empty() {
      return self.get(id).await;
    }
    self
      .mutate_active(
        id,
        "text = COALESCE(?3, text), author = COALESCE(?4, author)",
        vec![patch.text, patch.author],
      )
      .await
  }

  async fn soft_delete(&self, id: Uuid) -> Result<Option<Message>> {
    self.mutate_active(id, "is_active = 0", Vec::new()).await
  }

  async fn recent(&self, count: u32) -> Result<Vec<Message>> {
    let limit = i64::from(count);

    let raws: Vec<RawMessage> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM messages
           WHERE is_active = 1
           {NEWEST_FIRST}
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], RawMessage::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMessage::into_message).collect()
  }
}
