//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
///
/// Timestamps are fixed-width RFC 3339 UTC strings (microsecond precision,
/// `Z` suffix) so that text comparison and `ORDER BY` match time order.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,   -- lowercase, trimmed
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    nickname      TEXT NOT NULL,
    avatar        TEXT NOT NULL DEFAULT '',
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

-- One row per (user, word). `version` is the compare-and-swap token.
CREATE TABLE IF NOT EXISTS review_records (
    user_id        TEXT    NOT NULL REFERENCES users(user_id),
    word           TEXT    NOT NULL,
    status         TEXT    NOT NULL,  -- 'unknown' | 'learning' | 'known'
    review_count   INTEGER NOT NULL,
    correct_count  INTEGER NOT NULL,
    last_review_at TEXT    NOT NULL,
    next_review_at TEXT    NOT NULL,
    version        INTEGER NOT NULL,
    created_at     TEXT    NOT NULL,
    updated_at     TEXT    NOT NULL,
    PRIMARY KEY (user_id, word),
    CHECK (correct_count <= review_count),
    CHECK (next_review_at >= last_review_at)
);

CREATE TABLE IF NOT EXISTS word_details (
    word             TEXT PRIMARY KEY,
    phonetic_json    TEXT NOT NULL,
    audio_url_json   TEXT NOT NULL,
    definitions_json TEXT NOT NULL DEFAULT '[]',
    translation      TEXT NOT NULL DEFAULT '',
    pos              TEXT NOT NULL DEFAULT '',
    examples_json    TEXT NOT NULL DEFAULT '[]',
    tags_json        TEXT NOT NULL DEFAULT '[]',
    difficulty       INTEGER NOT NULL DEFAULT 1 CHECK (difficulty BETWEEN 1 AND 5),
    frequency        INTEGER NOT NULL DEFAULT 0
);

-- Denormalised from word_details.tags_json for tag queries.
CREATE TABLE IF NOT EXISTS word_tags (
    word TEXT NOT NULL REFERENCES word_details(word) ON DELETE CASCADE,
    tag  TEXT NOT NULL,
    PRIMARY KEY (word, tag)
);

CREATE TABLE IF NOT EXISTS word_cache (
    word      TEXT PRIMARY KEY,
    info_json TEXT NOT NULL,   -- serialised WordInfo
    cached_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS wordbooks (
    wordbook_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category    TEXT NOT NULL,          -- 'CET4' | 'CET6' | 'IELTS' | ...
    words_json  TEXT NOT NULL DEFAULT '[]',
    is_preset   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

-- wordbook_id is not a foreign key; reseeding presets leaves users' copies
-- intact.
CREATE TABLE IF NOT EXISTS user_wordbooks (
    user_wordbook_id TEXT PRIMARY KEY,
    user_id          TEXT NOT NULL REFERENCES users(user_id),
    wordbook_id      TEXT,
    custom_name      TEXT NOT NULL,
    words_json       TEXT NOT NULL DEFAULT '[]',
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS review_due_idx    ON review_records(user_id, next_review_at);
CREATE INDEX IF NOT EXISTS review_status_idx ON review_records(user_id, status);
CREATE INDEX IF NOT EXISTS word_tags_tag_idx ON word_tags(tag);
CREATE INDEX IF NOT EXISTS word_cache_at_idx ON word_cache(cached_at);
CREATE UNIQUE INDEX IF NOT EXISTS user_wordbooks_link_idx
    ON user_wordbooks(user_id, IFNULL(wordbook_id, ''));

PRAGMA user_version = 1;
";
