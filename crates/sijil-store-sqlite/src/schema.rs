//! SQL schema for the sijil SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persons (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    phone           TEXT NOT NULL,
    date            TEXT NOT NULL,          -- ISO 8601 calendar date
    status          TEXT NOT NULL,          -- workflow label
    list_number     TEXT NOT NULL UNIQUE,
    receipt_number  TEXT NOT NULL,
    register_number TEXT NOT NULL,
    request_name    TEXT NOT NULL,
    files           TEXT                    -- opaque delimited attachment names
);

-- Send attempts are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS sms_history (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    to_number       TEXT NOT NULL,
    message         TEXT NOT NULL,
    status          TEXT NOT NULL,          -- 'sent' | 'failed' | 'duplicate'
    delivery_status TEXT NOT NULL,
    error           TEXT,
    sent_at         TEXT NOT NULL           -- RFC 3339 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS persons_date_idx   ON persons(date);
CREATE INDEX IF NOT EXISTS sms_history_to_idx ON sms_history(to_number, sent_at);

PRAGMA user_version = 1;
";
