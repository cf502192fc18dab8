//! Database module: records, schema and the two store backends.
//!
//! Layout:
//! - `models.rs`: credential/account records as persisted
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: sqlx-backed store for `sqlite:` URLs
//! - `rest.rs`: PostgREST store for `http(s)://` URLs

pub mod models;
pub mod rest;
pub mod schema;
pub mod sqlite;

use crate::config::Config;
use crate::error::BuddyError;
use async_trait::async_trait;
use std::sync::Arc;

pub use models::{AccountRecord, CredentialRecord};
pub use rest::RestStore;
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, SqliteStore};

/// Upsert-capable persistence for linked credentials and accounts.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Insert or overwrite the credential keyed by `user_id`.
    async fn upsert_credential(&self, record: &CredentialRecord) -> Result<(), BuddyError>;

    /// Insert or overwrite every account keyed by `account_id`.
    async fn upsert_accounts(&self, records: &[AccountRecord]) -> Result<(), BuddyError>;
}

/// Pick the backend from the configured store URL.
pub async fn connect(cfg: &Config) -> Result<Arc<dyn LinkStore>, BuddyError> {
    let url = cfg.store_url.trim();
    if url.starts_with("sqlite:") {
        Ok(Arc::new(SqliteStore::connect(url).await?))
    } else if url.starts_with("http://") || url.starts_with("https://") {
        Ok(Arc::new(RestStore::new(
            url,
            &cfg.store_service_key,
            cfg.proxy.as_ref(),
        )?))
    } else {
        Err(BuddyError::Config(format!(
            "unsupported store url `{url}`; expected sqlite:, http:// or https://"
        )))
    }
}
