//! SQL schema for the gym document store.
//!
//! Each collection is a table of JSON documents keyed by id. `sort_key` holds
//! the field the collection is listed by (join date, creation time, expense
//! date) in a lexically sortable form. Executed once at connection startup;
//! future migrations will be gated on `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS members (
    id        TEXT PRIMARY KEY,
    sort_key  TEXT NOT NULL,   -- start_date, YYYY-MM-DD
    doc       TEXT NOT NULL    -- JSON Member
);

CREATE UNIQUE INDEX IF NOT EXISTS members_code_idx
    ON members(json_extract(doc, '$.member_code'));

CREATE TABLE IF NOT EXISTS gallery (
    id        TEXT PRIMARY KEY,
    sort_key  TEXT NOT NULL,   -- created_at, RFC 3339 UTC
    doc       TEXT NOT NULL    -- JSON GalleryItem
);

CREATE TABLE IF NOT EXISTS posts (
    id        TEXT PRIMARY KEY,
    sort_key  TEXT NOT NULL,   -- created_at, RFC 3339 UTC
    doc       TEXT NOT NULL    -- JSON Post
);

CREATE TABLE IF NOT EXISTS expenses (
    id        TEXT PRIMARY KEY,
    sort_key  TEXT NOT NULL,   -- date, YYYY-MM-DD
    doc       TEXT NOT NULL    -- JSON Expense
);

-- Singleton documents keyed by name, e.g. 'fees'.
CREATE TABLE IF NOT EXISTS settings (
    name      TEXT PRIMARY KEY,
    doc       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS members_sort_idx  ON members(sort_key);
CREATE INDEX IF NOT EXISTS gallery_sort_idx  ON gallery(sort_key);
CREATE INDEX IF NOT EXISTS posts_sort_idx    ON posts(sort_key);
CREATE INDEX IF NOT EXISTS expenses_sort_idx ON expenses(sort_key);

PRAGMA user_version = 1;
";
