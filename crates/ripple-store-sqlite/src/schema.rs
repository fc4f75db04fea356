//! SQL schema for the Ripple SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    account_id   INTEGER PRIMARY KEY,
    name         TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    email        TEXT NOT NULL UNIQUE,
    created_at   TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS contacts (
    contact_id   INTEGER PRIMARY KEY,
    owner_id     INTEGER NOT NULL REFERENCES accounts(account_id),
    name         TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    email        TEXT,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    post_id     INTEGER PRIMARY KEY,
    owner_id    INTEGER NOT NULL REFERENCES accounts(account_id),
    description TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS media_items (
    media_item_id INTEGER PRIMARY KEY,
    post_id       INTEGER NOT NULL REFERENCES posts(post_id),
    path          TEXT NOT NULL,
    kind          TEXT NOT NULL,    -- 'photo' | 'video'
    position      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS audiences (
    audience_id INTEGER PRIMARY KEY,
    owner_id    INTEGER NOT NULL REFERENCES accounts(account_id),
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- One membership table covers both subject variants.
-- member_id is not a foreign key: a deleted account/contact leaves a
-- dangling link, which resolvers treat as 'no access'.
CREATE TABLE IF NOT EXISTS audience_members (
    audience_id INTEGER NOT NULL REFERENCES audiences(audience_id),
    member_kind TEXT    NOT NULL,  -- 'account' | 'contact'
    member_id   INTEGER NOT NULL,
    PRIMARY KEY (audience_id, member_kind, member_id)
);

CREATE TABLE IF NOT EXISTS post_shares (
    post_id     INTEGER NOT NULL REFERENCES posts(post_id),
    audience_id INTEGER NOT NULL REFERENCES audiences(audience_id),
    PRIMARY KEY (post_id, audience_id)
);

CREATE INDEX IF NOT EXISTS contacts_owner_idx  ON contacts(owner_id);
CREATE INDEX IF NOT EXISTS posts_owner_idx     ON posts(owner_id);
CREATE INDEX IF NOT EXISTS media_post_idx      ON media_items(post_id);
CREATE INDEX IF NOT EXISTS audiences_owner_idx ON audiences(owner_id);
CREATE INDEX IF NOT EXISTS members_subject_idx ON audience_members(member_kind, member_id);
CREATE INDEX IF NOT EXISTS shares_audience_idx ON post_shares(audience_id);

PRAGMA user_version = 1;
";
