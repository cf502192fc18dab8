use crate::plaid::PlaidAccount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable Plaid access credential, one row per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CredentialRecord {
    pub user_id: String,
    pub access_token: String,
    pub item_id: String,
    pub institution_id: Option<String>,
    pub institution_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Linked bank account snapshot, one row per Plaid `account_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountRecord {
    pub user_id: String,
    pub account_id: String,
    pub item_id: String,
    pub name: String,
    pub official_name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: Option<String>,
    pub balance_available: Option<f64>,
    pub balance_current: Option<f64>,
    pub balance_limit: Option<f64>,
    pub currency_code: Option<String>,
    pub mask: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRecord {
    /// Both timestamps are stamped with `now`, also when the row already exists.
    pub fn from_plaid(
        account: PlaidAccount,
        user_id: &str,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let currency_code = account.balances.currency_code();
        Self {
            user_id: user_id.to_string(),
            account_id: account.account_id,
            item_id: item_id.to_string(),
            name: account.name,
            official_name: account.official_name,
            account_type: account.account_type,
            subtype: account.subtype,
            balance_available: account.balances.available,
            balance_current: account.balances.current,
            balance_limit: account.balances.limit,
            currency_code,
            mask: account.mask,
            created_at: now,
            updated_at: now,
        }
    }
}
