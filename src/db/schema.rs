//! SQL DDL for initializing the link storage.
//! SQLite-first design; the REST store expects tables of the same shape.

/// SQLite schema with:
/// - `credentials` keyed by `user_id` (one credential per user)
/// - `accounts` keyed by `account_id`, `item_id` not constrained against `credentials`
/// - timestamps stored as RFC3339 text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS credentials (
    user_id TEXT PRIMARY KEY NOT NULL,
    access_token TEXT NOT NULL,
    item_id TEXT NOT NULL,
    institution_id TEXT NULL,
    institution_name TEXT NULL,
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE TABLE IF NOT EXISTS accounts (
    account_id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    item_id TEXT NOT NULL,
    name TEXT NOT NULL,
    official_name TEXT NULL,
    type TEXT NOT NULL,
    subtype TEXT NULL,
    balance_available REAL NULL,
    balance_current REAL NULL,
    balance_limit REAL NULL,
    currency_code TEXT NULL,
    mask TEXT NULL,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_accounts_user_id ON accounts(user_id);
CREATE INDEX IF NOT EXISTS idx_accounts_item_id ON accounts(item_id)
"#;
