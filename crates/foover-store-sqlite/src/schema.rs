//! SQL schema for the Foover SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS sessions (
    id          INTEGER PRIMARY KEY,
    token       TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

-- Replaced wholesale on every catalog sync.
CREATE TABLE IF NOT EXISTS products (
    id          INTEGER PRIMARY KEY,
    product_id  TEXT NOT NULL UNIQUE
);

-- One row per (session, product); re-votes overwrite in place.
-- No foreign key to products: a sync may drop a product that has votes.
CREATE TABLE IF NOT EXISTS votes (
    id             INTEGER PRIMARY KEY,
    session_token  TEXT NOT NULL,
    product_id     TEXT NOT NULL,
    score          INTEGER NOT NULL CHECK (score BETWEEN 1 AND 5),
    updated_at     TEXT NOT NULL,
    UNIQUE (session_token, product_id)
);

CREATE INDEX IF NOT EXISTS votes_product_idx ON votes(product_id);

PRAGMA user_version = 1;
";
