use crate::db::LinkStore;
use crate::db::models::{AccountRecord, CredentialRecord};
use crate::db::schema::SQLITE_INIT;
use crate::error::BuddyError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, BuddyError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), BuddyError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn get_credential(&self, user_id: &str) -> Result<Option<CredentialRecord>, BuddyError> {
        let row = sqlx::query(
            r#"SELECT user_id, access_token, item_id, institution_id, institution_name, updated_at
               FROM credentials WHERE user_id = ?"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_credential).transpose()
    }

    pub async fn list_accounts(&self, user_id: &str) -> Result<Vec<AccountRecord>, BuddyError> {
        let rows = sqlx::query(
            r#"SELECT account_id, user_id, item_id, name, official_name, type, subtype,
               balance_available, balance_current, balance_limit, currency_code, mask,
               created_at, updated_at
               FROM accounts WHERE user_id = ? ORDER BY account_id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_account).collect()
    }

    fn row_to_credential(row: SqliteRow) -> Result<CredentialRecord, BuddyError> {
        let updated_at: String = row.try_get("updated_at")?;
        Ok(CredentialRecord {
            user_id: row.try_get("user_id")?,
            access_token: row.try_get("access_token")?,
            item_id: row.try_get("item_id")?,
            institution_id: row.try_get("institution_id")?,
            institution_name: row.try_get("institution_name")?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn row_to_account(row: SqliteRow) -> Result<AccountRecord, BuddyError> {
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;
        Ok(AccountRecord {
            user_id: row.try_get("user_id")?,
            account_id: row.try_get("account_id")?,
            item_id: row.try_get("item_id")?,
            name: row.try_get("name")?,
            official_name: row.try_get("official_name")?,
            account_type: row.try_get("type")?,
            subtype: row.try_get("subtype")?,
            balance_available: row.try_get("balance_available")?,
            balance_current: row.try_get("balance_current")?,
            balance_limit: row.try_get("balance_limit")?,
            currency_code: row.try_get("currency_code")?,
            mask: row.try_get("mask")?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, BuddyError> {
    let ts = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc);
    Ok(ts)
}

#[async_trait]
impl LinkStore for SqliteStore {
    /// Upsert by `user_id`; a second institution for the same user replaces the first.
    async fn upsert_credential(&self, record: &CredentialRecord) -> Result<(), BuddyError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (
                user_id, access_token, item_id, institution_id, institution_name, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                access_token=excluded.access_token,
                item_id=excluded.item_id,
                institution_id=excluded.institution_id,
                institution_name=excluded.institution_name,
                updated_at=excluded.updated_at
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.access_token)
        .bind(&record.item_id)
        .bind(&record.institution_id)
        .bind(&record.institution_name)
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Batch upsert by `account_id` in a single transaction. Every column is
    /// overwritten on conflict, `created_at` included.
    async fn upsert_accounts(&self, records: &[AccountRecord]) -> Result<(), BuddyError> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO accounts (
                    account_id, user_id, item_id, name, official_name, type, subtype,
                    balance_available, balance_current, balance_limit, currency_code, mask,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(account_id) DO UPDATE SET
                    user_id=excluded.user_id,
                    item_id=excluded.item_id,
                    name=excluded.name,
                    official_name=excluded.official_name,
                    type=excluded.type,
                    subtype=excluded.subtype,
                    balance_available=excluded.balance_available,
                    balance_current=excluded.balance_current,
                    balance_limit=excluded.balance_limit,
                    currency_code=excluded.currency_code,
                    mask=excluded.mask,
                    created_at=excluded.created_at,
                    updated_at=excluded.updated_at
                "#,
            )
            .bind(&record.account_id)
            .bind(&record.user_id)
            .bind(&record.item_id)
            .bind(&record.name)
            .bind(&record.official_name)
            .bind(&record.account_type)
            .bind(&record.subtype)
            .bind(record.balance_available)
            .bind(record.balance_current)
            .bind(record.balance_limit)
            .bind(&record.currency_code)
            .bind(&record.mask)
            .bind(record.created_at.to_rfc3339())
            .bind(record.updated_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
