//! SQL schema for the Lineage SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Person references in `families` and `relationships` are deliberately
/// *not* foreign keys: legacy data contains dangling ids, and the graph
/// engine skips them at read time instead of rejecting them at write time.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS persons (
    person_id     TEXT PRIMARY KEY,
    name          TEXT,
    first_name    TEXT,
    middle_name   TEXT,
    last_name     TEXT,
    maiden_name   TEXT,
    nickname      TEXT,
    title         TEXT,
    gender        TEXT NOT NULL DEFAULT 'unknown',
    birth_date    TEXT,            -- ISO calendar date, YYYY-MM-DD
    birth_place   TEXT,
    death_date    TEXT,
    death_place   TEXT,
    deceased      INTEGER NOT NULL DEFAULT 0,
    bio           TEXT,
    occupation    TEXT,
    contact       TEXT,
    address       TEXT,
    notes         TEXT,
    is_public     INTEGER NOT NULL DEFAULT 1,
    display_order INTEGER NOT NULL DEFAULT 0,
    status        TEXT NOT NULL DEFAULT 'active',
    created_by    TEXT,
    updated_by    TEXT,
    created_at    TEXT NOT NULL,   -- ISO 8601 UTC
    updated_at    TEXT NOT NULL
);

-- Legacy grouping records, read-mostly. Modern edges live in relationships.
CREATE TABLE IF NOT EXISTS families (
    family_id  TEXT PRIMARY KEY,
    husband    TEXT,
    wife       TEXT,
    partners   TEXT NOT NULL DEFAULT '[]',   -- JSON array of person ids
    children   TEXT NOT NULL DEFAULT '[]',   -- JSON array of person ids
    status     TEXT NOT NULL DEFAULT 'active',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS relationships (
    relationship_id  TEXT PRIMARY KEY,
    person_a         TEXT NOT NULL,
    person_b         TEXT NOT NULL,
    kind             TEXT NOT NULL,   -- snake_case RelationshipKind code
    is_bidirectional INTEGER NOT NULL DEFAULT 0,
    date             TEXT,
    place            TEXT,
    note             TEXT,
    status           TEXT NOT NULL DEFAULT 'active',
    created_by       TEXT,
    created_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS persons_status_idx     ON persons(status);
CREATE INDEX IF NOT EXISTS relationships_a_idx    ON relationships(person_a);
CREATE INDEX IF NOT EXISTS relationships_b_idx    ON relationships(person_b);
CREATE INDEX IF NOT EXISTS relationships_kind_idx ON relationships(kind);

PRAGMA user_version = 1;
";
