//! SQL schema for the Daybook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per calendar date. The primary key enforces that a date is
-- attributed to at most one country.
CREATE TABLE IF NOT EXISTS days (
    date          TEXT PRIMARY KEY,  -- YYYY-MM-DD
    country       TEXT NOT NULL,     -- ISO 3166-1 alpha-2, upper case
    country_name  TEXT NOT NULL,     -- copied from the catalog on write
    status        TEXT NOT NULL,     -- 'manual' | 'confirmed'
    notes         TEXT,
    created_at    TEXT NOT NULL,     -- RFC 3339 UTC
    updated_at    TEXT NOT NULL      -- RFC 3339 UTC
);

CREATE INDEX IF NOT EXISTS days_country_idx ON days(country);

PRAGMA user_version = 1;
";
