//! SQL schema for the message board SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are never deleted by the application; `is_active = 0` hides them.
CREATE TABLE IF NOT EXISTS messages (
    seq             INTEGER PRIMARY KEY AUTOINCREMENT,  -- insertion order
    message_id      TEXT NOT NULL UNIQUE,
    text            TEXT NOT NULL,
    author          TEXT NOT NULL,
    timestamp       TEXT NOT NULL,   -- fixed-width RFC 3339, sortable as text
    is_active       INTEGER NOT NULL DEFAULT 1,
    reply_to        TEXT,            -- parent message_id, not a foreign key
    reply_to_author TEXT,
    reply_to_text   TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS messages_timestamp_idx ON messages(timestamp DESC);
CREATE INDEX IF NOT EXISTS messages_author_idx    ON messages(author);
CREATE INDEX IF NOT EXISTS messages_active_idx    ON messages(is_active);

PRAGMA user_version = 1;
";

/// Column list shared by every `SELECT`; order matches
/// [`crate::encode::RawMessage::from_row`].
pub const COLUMNS: &str = "message_id, text, author, timestamp, is_active, \
                           reply_to, reply_to_author, reply_to_text, \
                           created_at, updated_at";
